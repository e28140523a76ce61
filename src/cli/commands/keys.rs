use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::fetch::{parse_campaign, LookupTable, TestKey};
use clap::Args;
use std::path::PathBuf;

/// List lookup table keys
#[derive(Args)]
pub struct KeysCommand {
    /// Campaign (LMS or NI)
    #[arg(long)]
    campaign: String,

    /// Only keys of this test id
    #[arg(long)]
    test_id: Option<String>,

    /// Lookup table path (overrides hawk.toml)
    #[arg(long)]
    lookup_table: Option<PathBuf>,
}

impl KeysCommand {
    pub fn run(&self) -> AppResult<()> {
        let campaign = parse_campaign(&self.campaign)?;
        let app_config = AppConfig::get_defaults()?;
        let table_path = self
            .lookup_table
            .clone()
            .unwrap_or(app_config.paths.lookup_table);
        let table = LookupTable::load(&table_path)?;

        let mut count = 0;
        for key in table.keys(campaign) {
            let matches = match (&self.test_id, TestKey::parse(key)) {
                (Some(id), Some(parsed)) => &parsed.test_id == id,
                (None, _) => true,
                (Some(_), None) => false,
            };
            if matches {
                println!("{}", key);
                count += 1;
            }
        }
        println!("{} keys", count);
        Ok(())
    }
}
