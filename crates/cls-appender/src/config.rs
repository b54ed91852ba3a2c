// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::builder::FieldSelector;
use crate::constants::*;
use crate::error::ConfigError;
use crate::net::local_machine_ip;
use crate::time_format::TimeFormat;
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// User-supplied appender options, as written in the host configuration.
///
/// Every value is kept as text so that unparseable numbers can fall back to
/// their defaults when resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppenderConfig {
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub topic_id: Option<String>,
    pub source: Option<String>,
    pub time_format: Option<String>,
    pub time_zone: Option<String>,
    pub mdc_fields: Option<String>,
    pub total_size_in_bytes: Option<String>,
    pub max_block_ms: Option<String>,
    pub send_thread_count: Option<String>,
    pub batch_size_threshold_in_bytes: Option<String>,
    pub batch_count_threshold: Option<String>,
    pub linger_ms: Option<String>,
    pub retries: Option<String>,
    pub base_retry_backoff_ms: Option<String>,
    pub max_retry_backoff_ms: Option<String>,
}

/// Option names, in the camelCase form used by logging configuration files.
const OPTIONS: [&str; 17] = [
    "endpoint",
    "accessKeyId",
    "accessKeySecret",
    "topicId",
    "source",
    "timeFormat",
    "timeZone",
    "mdcFields",
    "totalSizeInBytes",
    "maxBlockMs",
    "sendThreadCount",
    "batchSizeThresholdInBytes",
    "batchCountThreshold",
    "lingerMs",
    "retries",
    "baseRetryBackoffMs",
    "maxRetryBackoffMs",
];

impl AppenderConfig {
    /// Builds the configuration from `name = value` attribute pairs.
    /// Unknown names are ignored with a warning.
    pub fn from_attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (name, value) in attributes {
            let name = name.as_ref();
            match config.slot(name) {
                Some(slot) => *slot = Some(value.into()),
                None => warn!("Ignoring unknown appender option '{name}'"),
            }
        }
        config
    }

    /// Reads `CLS_<OPTION>` environment variables, e.g. `CLS_TOPIC_ID` or
    /// `CLS_BATCH_COUNT_THRESHOLD`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        for option in OPTIONS {
            if let Ok(value) = env::var(env_var_name(option)) {
                if let Some(slot) = config.slot(option) {
                    *slot = Some(value);
                }
            }
        }
        config
    }

    fn slot(&mut self, option: &str) -> Option<&mut Option<String>> {
        let slot = match option {
            "endpoint" => &mut self.endpoint,
            "accessKeyId" => &mut self.access_key_id,
            "accessKeySecret" => &mut self.access_key_secret,
            "topicId" => &mut self.topic_id,
            "source" => &mut self.source,
            "timeFormat" => &mut self.time_format,
            "timeZone" => &mut self.time_zone,
            "mdcFields" => &mut self.mdc_fields,
            "totalSizeInBytes" => &mut self.total_size_in_bytes,
            "maxBlockMs" => &mut self.max_block_ms,
            "sendThreadCount" => &mut self.send_thread_count,
            "batchSizeThresholdInBytes" => &mut self.batch_size_threshold_in_bytes,
            "batchCountThreshold" => &mut self.batch_count_threshold,
            "lingerMs" => &mut self.linger_ms,
            "retries" => &mut self.retries,
            "baseRetryBackoffMs" => &mut self.base_retry_backoff_ms,
            "maxRetryBackoffMs" => &mut self.max_retry_backoff_ms,
            _ => return None,
        };
        Some(slot)
    }

    /// Resolves defaults and validates the options.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let endpoint = required(&self.endpoint, "endpoint")?;
        let access_key_id = required(&self.access_key_id, "accessKeyId")?;
        let access_key_secret = required(&self.access_key_secret, "accessKeySecret")?;
        let topic_id = required(&self.topic_id, "topicId")?;

        let source = non_blank(&self.source)
            .map(str::to_string)
            .unwrap_or_else(local_machine_ip);

        let time_format = TimeFormat::new(
            non_blank(&self.time_format).unwrap_or(DEFAULT_TIME_FORMAT),
            non_blank(&self.time_zone).unwrap_or(DEFAULT_TIME_ZONE),
        )?;

        let field_selector = self.mdc_fields.as_deref().map(FieldSelector::parse);

        let producer = ProducerSettings {
            total_size_in_bytes: parse_or_default(
                &self.total_size_in_bytes,
                DEFAULT_TOTAL_SIZE_IN_BYTES,
            ),
            max_block_ms: parse_or_default(&self.max_block_ms, DEFAULT_MAX_BLOCK_MS),
            send_thread_count: parse_or_default(
                &self.send_thread_count,
                DEFAULT_SEND_THREAD_COUNT,
            ),
            batch_size_threshold_in_bytes: parse_or_default(
                &self.batch_size_threshold_in_bytes,
                DEFAULT_BATCH_SIZE_THRESHOLD_IN_BYTES,
            ),
            batch_count_threshold: parse_or_default(
                &self.batch_count_threshold,
                DEFAULT_BATCH_COUNT_THRESHOLD,
            ),
            linger_ms: parse_or_default(&self.linger_ms, DEFAULT_LINGER_MS),
            retries: parse_or_default(&self.retries, DEFAULT_RETRIES),
            base_retry_backoff_ms: parse_or_default(
                &self.base_retry_backoff_ms,
                DEFAULT_BASE_RETRY_BACKOFF_MS,
            ),
            max_retry_backoff_ms: parse_or_default(
                &self.max_retry_backoff_ms,
                DEFAULT_MAX_RETRY_BACKOFF_MS,
            ),
        };

        Ok(ResolvedConfig {
            dispatch: DispatchConfig {
                topic_id,
                endpoint,
                credentials: Credentials {
                    access_key_id,
                    access_key_secret,
                },
                source,
                producer,
            },
            time_format,
            field_selector,
        })
    }
}

fn env_var_name(option: &str) -> String {
    let mut name = String::from(ENV_PREFIX);
    for c in option.chars() {
        if c.is_ascii_uppercase() {
            name.push('_');
        }
        name.push(c.to_ascii_uppercase());
    }
    name
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(value: &Option<String>, option: &'static str) -> Result<String, ConfigError> {
    non_blank(value)
        .map(str::to_string)
        .ok_or(ConfigError::MissingOption(option))
}

/// Unset, blank or unparseable values silently fall back to `default`.
pub fn parse_or_default<T: FromStr>(value: &Option<String>, default: T) -> T {
    non_blank(value)
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Access key pair. The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .finish()
    }
}

/// Transport tuning, passed to the producer verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerSettings {
    pub total_size_in_bytes: usize,
    pub max_block_ms: u64,
    pub send_thread_count: usize,
    pub batch_size_threshold_in_bytes: usize,
    pub batch_count_threshold: usize,
    pub linger_ms: u64,
    pub retries: u32,
    pub base_retry_backoff_ms: u64,
    pub max_retry_backoff_ms: u64,
}

impl Default for ProducerSettings {
    fn default() -> Self {
        Self {
            total_size_in_bytes: DEFAULT_TOTAL_SIZE_IN_BYTES,
            max_block_ms: DEFAULT_MAX_BLOCK_MS,
            send_thread_count: DEFAULT_SEND_THREAD_COUNT,
            batch_size_threshold_in_bytes: DEFAULT_BATCH_SIZE_THRESHOLD_IN_BYTES,
            batch_count_threshold: DEFAULT_BATCH_COUNT_THRESHOLD,
            linger_ms: DEFAULT_LINGER_MS,
            retries: DEFAULT_RETRIES,
            base_retry_backoff_ms: DEFAULT_BASE_RETRY_BACKOFF_MS,
            max_retry_backoff_ms: DEFAULT_MAX_RETRY_BACKOFF_MS,
        }
    }
}

/// Everything the dispatcher and its producer need, fixed at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    pub topic_id: String,
    pub endpoint: String,
    pub credentials: Credentials,
    /// Record source, the local host address unless configured
    pub source: String,
    pub producer: ProducerSettings,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub dispatch: DispatchConfig,
    pub time_format: TimeFormat,
    pub field_selector: Option<FieldSelector>,
}
