use std::path::PathBuf;

use querybind::{
    BindError, QuerySource,
    config::{BindArgs, InspectArgs, LoadError, Settings},
    dynamic::{DynamicSchema, ParserRegistry, SchemaError},
    telemetry::TelemetryError,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("no record schema given; pass --schema or set schema.path")]
    MissingSchema,
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("bind failed: {0}")]
    Bind(#[from] BindError),
    #[error("invalid URL `{input}`: {source}")]
    Url {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

pub fn inspect(settings: &Settings, args: &InspectArgs) -> Result<(), CliError> {
    let source = read_source(&args.input)?;
    debug!(keys = source.len(), "decoded query");
    print_json(&source, settings.output.pretty)
}

pub fn bind(settings: &Settings, args: &BindArgs) -> Result<(), CliError> {
    let schema = load_schema(settings)?;
    let source = read_source(&args.input)?;

    let mut record = schema.record();
    record.bind(&source, &ParserRegistry::new())?;
    info!(schema = schema.name(), fields = schema.fields().len(), "bound record");

    print_json(&record.to_json(), settings.output.pretty)
}

pub fn describe(settings: &Settings) -> Result<(), CliError> {
    let schema = load_schema(settings)?;
    let fields: Vec<_> = schema
        .fields()
        .iter()
        .map(|field| {
            json!({
                "name": field.name(),
                "key": field.lookup_key(),
                "kind": field.kind().to_string(),
                "settable": field.is_settable(),
            })
        })
        .collect();

    print_json(
        &json!({ "name": schema.name(), "fields": fields }),
        settings.output.pretty,
    )
}

fn load_schema(settings: &Settings) -> Result<DynamicSchema, CliError> {
    let path: &PathBuf = settings.schema.path.as_ref().ok_or(CliError::MissingSchema)?;
    debug!(path = %path.display(), "loading record schema");
    Ok(DynamicSchema::from_path(path)?)
}

/// Accept either a full URL or a bare query string.
fn read_source(input: &str) -> Result<QuerySource, CliError> {
    if !input.contains("://") {
        return Ok(QuerySource::parse(input));
    }

    let url = Url::parse(input).map_err(|source| CliError::Url {
        input: input.to_string(),
        source,
    })?;
    Ok(QuerySource::from_url(&url))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
