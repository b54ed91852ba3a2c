// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while resolving the appender configuration at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required option '{0}'")]
    MissingOption(&'static str),

    #[error("Invalid time format '{pattern}': {reason}")]
    InvalidTimeFormat { pattern: String, reason: String },

    #[error("Unknown time zone '{0}'")]
    UnknownTimeZone(String),
}

/// Errors reported by the transport client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProducerError {
    #[error("Local buffer exhausted after waiting {max_block_ms}ms")]
    BufferExhausted { max_block_ms: u64 },

    #[error("Producer is closed")]
    Closed,

    #[error("Records rejected: {0}")]
    Rejected(String),

    #[error("Failed to close producer: {0}")]
    Close(String),
}

/// Lifecycle errors of the appender and dispatcher
#[derive(Debug, thiserror::Error)]
pub enum AppenderError {
    #[error("Appender not started")]
    NotStarted,

    #[error("Appender already started")]
    AlreadyStarted,

    #[error("Appender stopped")]
    Stopped,

    #[error("Failed to create producer: {0}")]
    Producer(#[from] ProducerError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
