use config::ConfigError;
use config::builder::{ConfigBuilder, DefaultState};

#[derive(serde::Deserialize)]
pub(crate) struct Config {
    pub telegram: tgdigest_client::Config,
    pub ai: tgdigest_ai::Config,
    pub digest: tgdigest_core::Config,
}

impl Config {
    pub fn new() -> Result<Config, ConfigError> {
        let mut conf_builder = config::Config::builder();

        if std::path::Path::new("Settings.toml").exists() {
            conf_builder = conf_builder.add_source(config::File::with_name("./Settings.toml"));
        }

        Self::from_builder(conf_builder.add_source(environment()))
    }

    pub(crate) fn from_builder(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<Config, ConfigError> {
        let config = builder.build()?.try_deserialize::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.api_id <= 0 {
            return Err(ConfigError::Message(
                "telegram.api_id must be a positive number".to_string(),
            ));
        }

        let required = [
            ("telegram.api_hash", &self.telegram.api_hash),
            ("telegram.phone", &self.telegram.phone),
            ("ai.api_key", &self.ai.api_key),
            ("digest.output_chat", &self.digest.output_chat),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }
}

/// Values stay strings until deserialization, so a numeric password or a
/// phone number with a leading `+` is kept as written.
pub(crate) fn environment() -> config::Environment {
    config::Environment::default().separator("__")
}
