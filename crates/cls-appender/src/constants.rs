// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Field names and configuration defaults.

/// Formatted event timestamp.
pub const FIELD_TIME: &str = "time";
pub const FIELD_LEVEL: &str = "level";
pub const FIELD_THREAD: &str = "thread";
pub const FIELD_LOCATION: &str = "location";
pub const FIELD_MESSAGE: &str = "message";
/// Rendered error chain, only present when the event carries an error.
pub const FIELD_THROWABLE: &str = "throwable";
/// Layout output, only present when a layout is configured.
pub const FIELD_LOG: &str = "log";

/// Reported when an event has no call site.
pub const UNKNOWN_LOCATION: &str = "Unknown(Unknown Source)";

#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

pub const DEFAULT_TIME_FORMAT: &str = "yyyy-MM-dd'T'HH:mm:ssZ";
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Local buffer ceiling of the producer (100MB).
pub const DEFAULT_TOTAL_SIZE_IN_BYTES: usize = 104_857_600;
pub const DEFAULT_MAX_BLOCK_MS: u64 = 0;
pub const DEFAULT_SEND_THREAD_COUNT: usize = 8;
/// Batch flush size trigger (5MB).
pub const DEFAULT_BATCH_SIZE_THRESHOLD_IN_BYTES: usize = 5 * 1_024 * 1_024;
pub const DEFAULT_BATCH_COUNT_THRESHOLD: usize = 4096;
pub const DEFAULT_LINGER_MS: u64 = 3000;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_BASE_RETRY_BACKOFF_MS: u64 = 100;
pub const DEFAULT_MAX_RETRY_BACKOFF_MS: u64 = 100;

/// Used as the record source when no address can be detected.
pub const FALLBACK_SOURCE: &str = "127.0.0.1";

/// Prefix of the environment variables read by `AppenderConfig::from_env`.
pub const ENV_PREFIX: &str = "CLS_";
