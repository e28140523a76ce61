use serde::{Deserialize, Serialize};

/// Selection and shaping options for a single load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Series tag used when the file name has no `LMS`/`NI` prefix
    pub test_series: String,
    /// Sensors to materialise (`None` = all)
    pub sensors: Option<Vec<String>>,
    /// Data fields to materialise (`None` = all); LMS only
    pub data: Option<Vec<String>>,
    /// Include the `Meta` entry
    pub meta: bool,
    /// Include recognised sensor attribute fields
    pub attrs: bool,
    /// Hoist the shared independent axis to the top level
    pub compress_x_axis: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            test_series: "LMS".to_string(),
            sensors: None,
            data: None,
            meta: true,
            attrs: true,
            compress_x_axis: false,
        }
    }
}

impl LoadOptions {
    pub fn with_series(mut self, tag: impl Into<String>) -> Self {
        self.test_series = tag.into();
        self
    }

    pub fn with_sensors<I, S>(mut self, sensors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensors = Some(sensors.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_data<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_meta(mut self, meta: bool) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_attrs(mut self, attrs: bool) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn compressed(mut self, compress_x_axis: bool) -> Self {
        self.compress_x_axis = compress_x_axis;
        self
    }

    pub fn sensor_selected(&self, name: &str) -> bool {
        selected(&self.sensors, name)
    }

    pub fn field_selected(&self, name: &str) -> bool {
        selected(&self.data, name)
    }
}

fn selected(filter: &Option<Vec<String>>, name: &str) -> bool {
    filter
        .as_ref()
        .map_or(true, |names| names.iter().any(|n| n == name))
}
