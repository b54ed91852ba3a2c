// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Boundary with the batching/retrying transport client.
//!
//! The client accepts single-record batches, groups them under its own
//! `ProducerSettings` thresholds, retries network failures and eventually
//! invokes the [`CompletionHandler`] exactly once per submission, on one of
//! its own threads.

use crate::callback::CompletionHandler;
use crate::config::DispatchConfig;
use crate::error::ProducerError;
use crate::record::Record;
use std::sync::Arc;

/// Asynchronous transport client
pub trait Producer: Send + Sync {
    /// Queues `records` for delivery to `topic_id`. May block for at most
    /// `max_block_ms` when the local buffer is full, never on the network.
    fn submit(
        &self,
        topic_id: &str,
        records: Arc<[Record]>,
        callback: CompletionHandler,
    ) -> Result<(), ProducerError>;

    /// Releases the client's resources.
    fn close(&self) -> Result<(), ProducerError>;
}

/// Creates the transport client bound to a dispatch configuration
pub trait ProducerFactory: Send + Sync {
    fn create(&self, config: &DispatchConfig) -> Result<Arc<dyn Producer>, ProducerError>;
}

impl<F> ProducerFactory for F
where
    F: Fn(&DispatchConfig) -> Result<Arc<dyn Producer>, ProducerError> + Send + Sync,
{
    fn create(&self, config: &DispatchConfig) -> Result<Arc<dyn Producer>, ProducerError> {
        self(config)
    }
}

/// Outcome of one submitted batch, as reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub successful: bool,
    pub error_code: String,
    pub error_message: String,
    /// Number of send attempts, retries included
    pub attempts: u32,
}

impl SendResult {
    pub fn success(attempts: u32) -> Self {
        Self {
            successful: true,
            error_code: String::new(),
            error_message: String::new(),
            attempts,
        }
    }

    pub fn failure(
        error_code: impl Into<String>,
        error_message: impl Into<String>,
        attempts: u32,
    ) -> Self {
        Self {
            successful: false,
            error_code: error_code.into(),
            error_message: error_message.into(),
            attempts,
        }
    }
}
