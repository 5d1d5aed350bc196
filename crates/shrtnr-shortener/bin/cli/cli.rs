use clap::{Parser, Subcommand, ValueEnum};
use shrtnr_core::urn::{DEFAULT_COUNTER_NAME, DEFAULT_NAMESPACE};
use std::fmt::{Display, Formatter};

pub const STORE_BACKEND_ENV: &str = "SHRTNR_STORE";
pub const REDIS_URL_ENV: &str = "SHRTNR_REDIS_URL";
pub const NAMESPACE_ENV: &str = "SHRTNR_NAMESPACE";
pub const COUNTER_NAME_ENV: &str = "SHRTNR_COUNTER_NAME";
pub const BASE_URL_ENV: &str = "SHRTNR_BASE_URL";
pub const LOG_FORMAT_ENV: &str = "SHRTNR_LOG_FORMAT";

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shrtnr", version, about = "Shorten URLs into compact base58 codes")]
pub struct CLI {
    #[arg(
        long,
        env = STORE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Redis
    )]
    pub store: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, default_value = DEFAULT_REDIS_URL)]
    pub redis_url: String,

    /// Prefix of every key written to the store.
    #[arg(long, env = NAMESPACE_ENV, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    #[arg(long, env = COUNTER_NAME_ENV, default_value = DEFAULT_COUNTER_NAME)]
    pub counter_name: String,

    /// Public base URL; when set, created codes are printed as full URLs.
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a URL.
    Create {
        url: String,
        /// Expire both directions of the mapping after this many seconds.
        #[arg(long, value_name = "SECONDS")]
        ttl: Option<u64>,
    },
    /// Print the long URL behind a short code.
    Resolve { code: String },
    /// Print the short code of an already shortened URL.
    Reverse { url: String },
    /// Delete a short code and its long URL record.
    Delete { code: String },
    /// Search existing mappings.
    Search { query: String },
}
