//! Lookup table from composite test keys to remote object ids
//!
//! Stored as TOML with one table per campaign:
//!
//! ```toml
//! [LMS]
//! BR_AR_1_1 = "1a2b3c"
//!
//! [NI]
//! BR_AR_1_1 = "4d5e6f"
//! ```

use crate::errors::{FetchError, FetchResult};
use crate::types::TestSeries;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Campaign tag as accepted by the orchestrator; anything but `LMS`/`NI` is rejected
pub fn parse_campaign(tag: &str) -> FetchResult<TestSeries> {
    tag.parse::<TestSeries>()
        .map_err(|_| FetchError::InvalidCampaign(tag.to_string()))
}

/// `"{test_id}_{run}_{rep}"`; the test id itself may contain underscores
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestKey {
    pub test_id: String,
    pub run: u32,
    pub rep: u32,
}

impl TestKey {
    pub fn new(test_id: impl Into<String>, run: u32, rep: u32) -> Self {
        Self {
            test_id: test_id.into(),
            run,
            rep,
        }
    }

    /// Split a composite key; `None` unless it ends in two integer components
    pub fn parse(key: &str) -> Option<Self> {
        let mut parts = key.rsplitn(3, '_');
        let rep = parts.next()?.parse().ok()?;
        let run = parts.next()?.parse().ok()?;
        let test_id = parts.next().filter(|id| !id.is_empty())?;
        Some(Self::new(test_id, run, rep))
    }
}

impl fmt::Display for TestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.test_id, self.run, self.rep)
    }
}

/// Immutable campaign -> key -> remote id table
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    tables: BTreeMap<TestSeries, BTreeMap<String, String>>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the TOML table at `path`
    pub fn load(path: &Path) -> FetchResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            FetchError::LookupTable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let table = Self::from_toml_str(&text)?;
        debug!("Loaded {} lookup entries from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_toml_str(text: &str) -> FetchResult<Self> {
        let raw: BTreeMap<String, BTreeMap<String, String>> =
            toml::from_str(text).map_err(|e| FetchError::LookupTable(e.to_string()))?;
        let mut table = Self::new();
        for (campaign, entries) in raw {
            let series = parse_campaign(&campaign)
                .map_err(|_| FetchError::LookupTable(format!("unknown campaign table [{}]", campaign)))?;
            for (key, remote_id) in entries {
                table.insert(series, &key, remote_id)?;
            }
        }
        Ok(table)
    }

    /// Add one entry; malformed keys are rejected
    pub fn insert(
        &mut self,
        campaign: TestSeries,
        key: &str,
        remote_id: impl Into<String>,
    ) -> FetchResult<()> {
        if TestKey::parse(key).is_none() {
            return Err(FetchError::LookupTable(format!(
                "malformed key '{}' in [{}]: expected <test_id>_<run>_<rep>",
                key, campaign
            )));
        }
        self.tables
            .entry(campaign)
            .or_default()
            .insert(key.to_string(), remote_id.into());
        Ok(())
    }

    pub fn remote_id(&self, campaign: TestSeries, key: &str) -> Option<&str> {
        self.tables
            .get(&campaign)
            .and_then(|t| t.get(key))
            .map(String::as_str)
    }

    /// Keys of one campaign, in sorted order
    pub fn keys(&self, campaign: TestSeries) -> impl Iterator<Item = &str> {
        self.tables
            .get(&campaign)
            .into_iter()
            .flat_map(|t| t.keys().map(String::as_str))
    }

    fn parsed(&self, campaign: TestSeries, test_id: &str) -> impl Iterator<Item = TestKey> + '_ {
        let test_id = test_id.to_string();
        self.keys(campaign)
            .filter_map(TestKey::parse)
            .filter(move |k| k.test_id == test_id)
    }

    /// Every run listed for `test_id`
    pub fn runs(&self, campaign: TestSeries, test_id: &str) -> BTreeSet<u32> {
        self.parsed(campaign, test_id).map(|k| k.run).collect()
    }

    /// Every rep listed for `run` of `test_id`
    pub fn reps(&self, campaign: TestSeries, test_id: &str, run: u32) -> BTreeSet<u32> {
        self.parsed(campaign, test_id)
            .filter(|k| k.run == run)
            .map(|k| k.rep)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
