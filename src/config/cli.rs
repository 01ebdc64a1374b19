use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the querybind binary.
#[derive(Debug, Parser)]
#[command(
    name = "querybind",
    version,
    about = "Bind URL query parameters onto record schemas"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "QUERYBIND_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Decode a URL or query string and print its parameters.
    Inspect(InspectArgs),
    /// Bind a query onto a record schema and print the resulting record.
    Bind(BindArgs),
    /// Print the fields declared by a record schema.
    Describe(DescribeArgs),
}

#[derive(Debug, Args, Clone)]
pub struct InspectArgs {
    /// Full URL (`https://host/path?a=1`) or bare query string (`a=1&b=2`).
    #[arg(value_name = "INPUT")]
    pub input: String,
}

#[derive(Debug, Args, Clone)]
pub struct BindArgs {
    #[command(flatten)]
    pub schema: SchemaOverride,

    /// Full URL or bare query string to bind.
    #[arg(value_name = "INPUT")]
    pub input: String,
}

#[derive(Debug, Args, Clone)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub schema: SchemaOverride,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SchemaOverride {
    /// Record schema (TOML) to bind against; overrides `schema.path`.
    #[arg(long = "schema", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub schema: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Toggle pretty-printed JSON output.
    #[arg(
        long = "pretty",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub pretty: Option<bool>,
}
