//! Report formatting for loaded mappings
//!
//! Console output is an indented outline of the mapping with array shapes and
//! units; JSON output is the full mapping.

use crate::errors::{AppError, AppResult};
use crate::fetch::CacheStats;
use crate::types::{Entry, Tree};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Output format options for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented outline for the terminal
    #[default]
    Console,
    /// Full mapping as JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::Config(format!(
                "Unknown output format '{}' (expected console or json)",
                other
            ))),
        }
    }
}

/// Report formatter for loader and fetch results
pub struct ReportFormatter;

impl ReportFormatter {
    /// Outline of a mapping, one line per entry
    ///
    /// ```
    /// use hawk_loader::report::ReportFormatter;
    /// use hawk_loader::types::{ArrayData, Entry, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(
    ///     "X_data".to_string(),
    ///     Entry::with_units(ArrayData::from(vec![0.0f64, 1.0, 2.0]), Some("s".to_string())),
    /// );
    /// assert_eq!(ReportFormatter::outline(&tree), "X_data: f64[3] (s)\n");
    /// ```
    pub fn outline(tree: &Tree) -> String {
        let mut output = String::new();
        outline_into(&mut output, tree, 0);
        output
    }

    /// Format one loaded file
    pub fn format_tree(name: &str, tree: &Tree, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Console => {
                let leaves: usize = tree.values().map(Entry::leaf_count).sum();
                let mut output = format!("=== {} ({} arrays) ===\n", name, leaves);
                output.push_str(&Self::outline(tree));
                Ok(output)
            }
            OutputFormat::Json => Self::export_json(tree),
        }
    }

    /// Format several loaded files keyed by name
    pub fn format_batch(batch: &BTreeMap<String, Tree>, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Console => {
                let mut output = String::new();
                for (name, tree) in batch {
                    output.push_str(&Self::format_tree(name, tree, format)?);
                    output.push('\n');
                }
                Ok(output)
            }
            OutputFormat::Json => Self::export_json(batch),
        }
    }

    /// One-line cache summary
    pub fn format_cache_stats(stats: &CacheStats) -> String {
        format!(
            "Cache: {} hits, {} misses ({:.1}% hit rate), {} downloaded",
            stats.hits,
            stats.misses,
            stats.hit_rate(),
            Self::format_bytes(stats.bytes_downloaded)
        )
    }

    /// Format byte counts using conventional units (KB, MB, GB)
    pub fn format_bytes(bytes: u64) -> String {
        const KB: f64 = 1024.0;
        const MB: f64 = KB * 1024.0;
        const GB: f64 = MB * 1024.0;

        if bytes == 0 {
            "0 B".to_string()
        } else if bytes as f64 >= GB {
            format!("{:.2} GB", bytes as f64 / GB)
        } else if bytes as f64 >= MB {
            format!("{:.2} MB", bytes as f64 / MB)
        } else if bytes as f64 >= KB {
            format!("{:.2} KB", bytes as f64 / KB)
        } else {
            format!("{} B", bytes)
        }
    }

    pub fn export_json<T: Serialize + ?Sized>(data: &T) -> AppResult<String> {
        let mut json = serde_json::to_string_pretty(data)?;
        json.push('\n');
        Ok(json)
    }
}

fn outline_into(output: &mut String, tree: &Tree, depth: usize) {
    let indent = "  ".repeat(depth);
    for (name, entry) in tree {
        match entry {
            Entry::Group(children) => {
                output.push_str(&format!("{}{}/\n", indent, name));
                outline_into(output, children, depth + 1);
            }
            Entry::Array(value) => {
                output.push_str(&format!("{}{}: {}\n", indent, name, value));
            }
            Entry::Labeled(labeled) => {
                output.push_str(&format!(
                    "{}{}: {} ({})\n",
                    indent, name, labeled.value, labeled.units
                ));
            }
        }
    }
}

/// Write `content` to `path`, or to stdout without one
pub fn emit(content: &str, path: Option<&Path>) -> AppResult<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
            println!("Output written to: {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
