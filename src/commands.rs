use formatbox::config::Config;
use formatbox::formats::FormatRegistry;
use formatbox::storage::{StorageClient, read_document, write_document};
use formatbox::value::Value;
use tracing::info;

use crate::cli::{ReadArgs, WriteArgs};

pub type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn read(
    config: &Config,
    registry: &FormatRegistry,
    args: ReadArgs,
) -> Result<(), AnyError> {
    let storage = StorageClient::from_config(&config.storage)?;
    let value = read_document(&storage, registry, &args.key).await?;

    match value {
        Value::Bytes(bytes) => println!("{}", String::from_utf8_lossy(&bytes)),
        other => println!("{other}"),
    }
    Ok(())
}

pub async fn write(
    config: &Config,
    registry: &FormatRegistry,
    args: WriteArgs,
) -> Result<(), AnyError> {
    let storage = StorageClient::from_config(&config.storage)?;
    let value = args.value.into_value()?;
    let receipt = write_document(&storage, registry, &args.key, &value).await?;

    info!(
        key = %receipt.upload.key,
        size = receipt.upload.size,
        content_type = %receipt.content_type,
        "Document written"
    );
    Ok(())
}

pub fn formats(registry: &FormatRegistry) -> Result<(), AnyError> {
    for format_id in registry.format_ids() {
        let handler = registry.get(format_id)?;
        println!("{format_id}\t{}\t{}", handler.name(), handler.content_type());
    }
    Ok(())
}

pub fn show_config(config: &Config) -> Result<(), AnyError> {
    print!("{}", config.to_toml()?);
    Ok(())
}
