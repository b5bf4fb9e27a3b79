use crate::error::AppError;
use config::{Config as Cfg, ConfigBuilder, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Layered load: optional `configuration.*` file, then `APP__*`
    /// variables, then a bare `PORT` as hosting platforms set it.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let builder = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        Self::from_builder(builder, std::env::var("PORT").ok())
    }

    fn from_builder(
        builder: ConfigBuilder<DefaultState>,
        port: Option<String>,
    ) -> Result<Self, AppError> {
        let config = builder.set_override_option("port", port)?.build()?;
        Ok(config.try_deserialize()?)
    }
}
