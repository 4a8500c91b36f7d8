pub mod calc;
pub mod config;
pub mod history;
pub mod leads;
pub mod token;

use valuenum_core::{Config, Database};

/// Config from disk with environment overrides applied.
pub(crate) fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    config.apply_env()?;
    Ok(config)
}

/// Open the database configured by `database_path`.
pub(crate) fn open_database(config: &Config) -> Result<Database, Box<dyn std::error::Error>> {
    Ok(Database::open_at(config.database_path()?)?)
}
