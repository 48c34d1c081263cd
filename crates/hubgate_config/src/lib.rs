//! hubgate_config
//!
//! Loads `Settings` from `config/default.*`, an optional explicit file and
//! `HUBGATE__`-prefixed environment variables, in that order of precedence
//! (later sources win). Nothing is mandatory: an empty environment yields
//! `Settings::default()`.
//!
//! Environment values reach the settings as raw strings. Numeric keys are
//! converted by the deserializer and topic lists are split on `,` when
//! merged, so secrets such as `00123456` are kept byte for byte.

pub mod settings;


use std::path::Path;

use config::{Config, ConfigError, Environment, File};

use crate::settings::PartialSettings;

pub use settings::{HubConfig, HubSettings, LogSettings, Settings, TopicList, TopicSettings};

pub const ENV_PREFIX: &str = "HUBGATE";

pub fn load_config() -> Result<Settings, ConfigError> {
    load(None)
}

/// Like [`load_config`], with `path` layered over `config/default`.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    load(Some(path.as_ref()))
}

fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder =
        Config::builder().add_source(File::with_name("config/default").required(false));

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.into_settings())
}
