//! Containers for integration tests.
//!
//! Requires a running Docker daemon.

pub mod redis;

use thiserror::Error;

/// Failure to bring up or reach a test container.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to run container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("failed to reach containerized redis: {0}")]
    Redis(#[from] ::redis::RedisError),
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
