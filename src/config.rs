use anyhow::Context;
use log::LevelFilter;

const LOG_LEVEL_VAR: &str = "MESSENGER_LOG_LEVEL";

pub struct Config {
    pub log_level: LevelFilter,
}

impl Config {
    /// Reads the environment, after loading a `.env` file if there is one.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let log_level = match dotenv::var(LOG_LEVEL_VAR) {
            Ok(level) => level
                .parse::<LevelFilter>()
                .with_context(|| format!("invalid {LOG_LEVEL_VAR}: {level}"))?,
            Err(_) => LevelFilter::Info,
        };

        Ok(Self { log_level })
    }
}
