mod cli;

use crate::cli::{Command, LogFormat, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use shrtnr_allocator::AtomicAllocator;
use shrtnr_core::{KeySpace, ShortCode, ShortenParams, Shortener};
use shrtnr_shortener::ShortenerService;
use shrtnr_storage::{InMemoryStore, MappingStore, RedisStore};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    debug!(
        storage_backend = %config.store,
        namespace = %config.namespace,
        "starting shrtnr"
    );

    let keys = KeySpace::builder()
        .namespace(config.namespace.clone())
        .counter_name(config.counter_name.clone())
        .build();

    match config.store {
        StorageBackendArg::InMemory => {
            let service = ShortenerService::new(
                MappingStore::new(InMemoryStore::new(), keys),
                AtomicAllocator::new(),
            );
            run(&service, &config).await
        }
        StorageBackendArg::Redis => {
            let store = RedisStore::connect(&config.redis_url)
                .await
                .with_context(|| format!("failed to connect to {}", config.redis_url))?;
            run(&ShortenerService::with_store(store, keys), &config).await
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(shortener: &impl Shortener, config: &CLI) -> anyhow::Result<()> {
    match &config.command {
        Command::Create { url, ttl } => {
            let mut params = ShortenParams::new(url.as_str());
            if let Some(ttl) = ttl {
                params = params.with_ttl(Duration::from_secs(*ttl));
            }
            let code = shortener.create(params).await?;
            match config.base_url.as_deref() {
                Some(base_url) => println!("{}", code.to_url(base_url)),
                None => println!("{code}"),
            }
        }
        Command::Resolve { code } => {
            let long = shortener.resolve(&ShortCode::new(code.as_str())).await?;
            println!("{long}");
        }
        Command::Reverse { url } => {
            let code = shortener.reverse_resolve(url).await?;
            println!("{code}");
        }
        Command::Delete { code } => {
            shortener.delete(&ShortCode::new(code.as_str())).await?;
            println!("deleted {code}");
        }
        Command::Search { query } => {
            for mapping in shortener.search(query).await? {
                println!("{}\t{}", mapping.short, mapping.long);
            }
        }
    }

    Ok(())
}
