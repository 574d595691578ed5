use clap::{Parser, Subcommand};
use std::path::PathBuf;

use formatbox::value::Value;

#[derive(Parser, Debug)]
#[command(name = "formatbox")]
#[command(about = "Read and write documents through format handlers", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $FORMATBOX_CONFIG or config/formatbox.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a stored document and print its processed value
    Read(ReadArgs),
    /// Transform a value for the key's format and store it
    Write(WriteArgs),
    /// List registered format identifiers
    Formats,
    /// Print the effective configuration as TOML
    Config,
}

#[derive(clap::Args, Debug)]
pub struct ReadArgs {
    /// Storage key, e.g. chan4.kvs/properties.json
    pub key: String,
}

#[derive(clap::Args, Debug)]
pub struct WriteArgs {
    /// Storage key; its extension selects the format
    pub key: String,

    #[command(flatten)]
    pub value: ValueArgs,
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ValueArgs {
    /// Value given as JSON
    #[arg(long)]
    pub json: Option<String>,

    /// Value given as a plain string
    #[arg(long)]
    pub text: Option<String>,
}

impl ValueArgs {
    pub fn into_value(self) -> Result<Value, serde_json::Error> {
        match (self.json, self.text) {
            (Some(json), _) => Ok(Value::from(serde_json::from_str::<serde_json::Value>(&json)?)),
            (None, Some(text)) => Ok(Value::String(text)),
            (None, None) => Ok(Value::Null),
        }
    }
}
