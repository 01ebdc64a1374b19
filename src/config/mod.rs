//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

mod cli;

pub use cli::{
    BindArgs, CliArgs, Command, DescribeArgs, GlobalOverrides, InspectArgs, SchemaOverride,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "querybind";
const ENV_PREFIX: &str = "QUERYBIND";

#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub schema: SchemaSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, Default)]
pub struct SchemaSettings {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub pretty: bool,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_global_overrides(&cli.overrides);
    match &cli.command {
        Command::Bind(args) => raw.apply_schema_override(&args.schema),
        Command::Describe(args) => raw.apply_schema_override(&args.schema),
        Command::Inspect(_) => {}
    }

    Settings::from_raw(raw)
}

pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    schema: RawSchemaSettings,
    output: RawOutputSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSchemaSettings {
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawOutputSettings {
    pretty: Option<bool>,
}

impl RawSettings {
    fn apply_global_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(pretty) = overrides.pretty {
            self.output.pretty = Some(pretty);
        }
    }

    fn apply_schema_override(&mut self, overrides: &SchemaOverride) {
        if let Some(path) = overrides.schema.as_ref() {
            self.schema.path = Some(path.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            schema,
            output,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            schema: build_schema_settings(schema)?,
            output: OutputSettings {
                pretty: output.pretty.unwrap_or(true),
            },
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_schema_settings(schema: RawSchemaSettings) -> Result<SchemaSettings, LoadError> {
    let path = schema.path.filter(|path| !path.as_os_str().is_empty());
    let wrong_extension = path
        .as_ref()
        .filter(|path| path.extension().is_some_and(|ext| ext != "toml"));
    if let Some(path) = wrong_extension {
        return Err(LoadError::invalid(
            "schema.path",
            format!("expected a .toml file, got `{}`", path.display()),
        ));
    }
    Ok(SchemaSettings { path })
}
