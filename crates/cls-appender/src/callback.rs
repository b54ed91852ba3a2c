// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::producer::SendResult;
use crate::record::{describe, Record};
use std::sync::Arc;
use tracing::error;

/// Reports the delivery outcome of one submitted batch.
///
/// Built once per dispatch and moved into the transport, which consumes it
/// on one of its own threads. Successful deliveries are not logged, since
/// the diagnostics may themselves be shipped through this appender.
#[derive(Debug, Clone)]
pub struct CompletionHandler {
    topic_id: Arc<str>,
    source: Arc<str>,
    records: Arc<[Record]>,
}

impl CompletionHandler {
    pub fn new(topic_id: Arc<str>, source: Arc<str>, records: Arc<[Record]>) -> Self {
        Self {
            topic_id,
            source,
            records,
        }
    }

    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn on_completion(self, result: SendResult) {
        if result.successful {
            return;
        }

        error!(
            attempts = result.attempts,
            "Failed to send log, topicId={}, source={}, logItem={}, errorCode={}, errorMessage={}",
            self.topic_id,
            self.source,
            describe(&self.records),
            result.error_code,
            result.error_message
        );
    }
}
