// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::event::LogEvent;
use tracing::debug;

/// Renders a whole event into the `log` field of a record
pub trait Layout: Send + Sync {
    fn to_bytes(&self, event: &LogEvent) -> Vec<u8>;
}

/// Serializes the event as a single JSON object
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLayout;

impl Layout for JsonLayout {
    fn to_bytes(&self, event: &LogEvent) -> Vec<u8> {
        serde_json::to_vec(event).unwrap_or_else(|e| {
            debug!("Failed to serialize event with JSON layout: {e}");
            Vec::new()
        })
    }
}

impl<F> Layout for F
where
    F: Fn(&LogEvent) -> Vec<u8> + Send + Sync,
{
    fn to_bytes(&self, event: &LogEvent) -> Vec<u8> {
        self(event)
    }
}
