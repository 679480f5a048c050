use anyhow::{bail, Context, Result};
use std::sync::Arc;

use tpu_specs::{
    ComponentKind, Config, FilterSelection, FilterStore, HttpFetcher, SortKey, SpecsScraper,
    SqliteStorage,
};

const USAGE: &str = "usage:
  tpu-specs filters <cpu|gpu>
  tpu-specs list <cpu|gpu> [name|released|generation] [field=value ...]
  tpu-specs cpu-detail <url>
  tpu-specs gpu-tdp <url>";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tpu_specs=info".parse()?),
        )
        .init();

    let config = Arc::new(Config::load().context("Failed to load configuration")?);
    let fetcher = HttpFetcher::new(&config)?;
    let scraper = SpecsScraper::new(config.clone(), fetcher);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let output = match (command.as_str(), rest) {
        ("filters", [kind]) => {
            let kind: ComponentKind = kind.parse()?;
            let vocabulary = scraper.discover_filters(kind).await?;

            let storage = open_storage(&config).await?;
            storage.save_vocabulary(kind, &vocabulary).await?;
            serde_json::to_string_pretty(&vocabulary)?
        }
        ("list", [kind, rest @ ..]) => {
            let (sort, filters) = match rest.split_first() {
                Some((sort, filters)) if !sort.contains('=') => (sort.as_str(), filters),
                _ => (SortKey::default().as_str(), rest),
            };
            let selection = parse_selection(filters)?;
            let storage = open_storage(&config).await?;
            let list = scraper
                .list_components_with_store(kind, selection.as_ref(), sort, &storage)
                .await?;
            serde_json::to_string_pretty(&list)?
        }
        ("cpu-detail", [link]) => serde_json::to_string_pretty(&scraper.cpu_detail(link).await?)?,
        ("gpu-tdp", [link]) => scraper.gpu_power_rating(link).await?.to_string(),
        _ => bail!(USAGE),
    };

    println!("{output}");
    Ok(())
}

async fn open_storage(config: &Config) -> Result<SqliteStorage> {
    let storage = SqliteStorage::new(&config.database_path).await?;
    storage.migrate().await?;
    Ok(storage)
}

fn parse_selection(pairs: &[String]) -> Result<Option<FilterSelection>> {
    if pairs.is_empty() {
        return Ok(None);
    }
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((field, value)) => Ok((field.to_string(), value.to_string())),
            None => bail!("expected field=value, got {pair:?}"),
        })
        .collect::<Result<FilterSelection>>()
        .map(Some)
}
