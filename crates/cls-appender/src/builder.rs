// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Event to record transformation.
//!
//! Every record carries, in order: `time`, `level`, `thread`, `location`,
//! `message`, then `throwable` when the event has an error, `log` when a
//! layout is configured, and finally the context fields named by the
//! [`FieldSelector`]. Context fields are pushed last, so a context key that
//! collides with a built-in field name replaces the built-in value.

use crate::constants::{
    FIELD_LEVEL, FIELD_LOCATION, FIELD_LOG, FIELD_MESSAGE, FIELD_THREAD, FIELD_THROWABLE,
    FIELD_TIME, LINE_SEPARATOR, UNKNOWN_LOCATION,
};
use crate::event::LogEvent;
use crate::layout::Layout;
use crate::record::Record;
use crate::time_format::TimeFormat;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Context keys copied from an event into its record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector {
    keys: Vec<String>,
}

impl FieldSelector {
    /// Parses a comma-separated list of keys. Blank entries are dropped and
    /// duplicates keep their first position.
    pub fn parse(fields: &str) -> Self {
        let mut keys: Vec<String> = Vec::new();
        for key in fields.split(',').map(str::trim).filter(|key| !key.is_empty()) {
            if !keys.iter().any(|existing| existing == key) {
                keys.push(key.to_string());
            }
        }
        Self { keys }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Selected entries present in `context`, in selector order.
    pub fn select<'a>(
        &'a self,
        context: &'a BTreeMap<String, String>,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.keys.iter().filter_map(move |key| {
            context
                .get_key_value(key)
                .map(|(key, value)| (key.as_str(), value.as_str()))
        })
    }
}

/// Location string for an event. With `force`, the call site is reported
/// even when the host did not capture locations for this event.
pub fn location_string(event: &LogEvent, force: bool) -> String {
    event
        .location(force)
        .map_or_else(|| UNKNOWN_LOCATION.to_string(), ToString::to_string)
}

/// Builds one [`Record`] per [`LogEvent`]
#[derive(Clone, Default)]
pub struct RecordBuilder {
    time_format: TimeFormat,
    field_selector: Option<FieldSelector>,
    layout: Option<Arc<dyn Layout>>,
}

impl fmt::Debug for RecordBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordBuilder")
            .field("time_format", &self.time_format)
            .field("field_selector", &self.field_selector)
            .field("layout", &self.layout.is_some())
            .finish()
    }
}

impl RecordBuilder {
    pub fn new(time_format: TimeFormat, field_selector: Option<FieldSelector>) -> Self {
        Self {
            time_format,
            field_selector,
            layout: None,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: Arc<dyn Layout>) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn time_format(&self) -> &TimeFormat {
        &self.time_format
    }

    pub fn field_selector(&self) -> Option<&FieldSelector> {
        self.field_selector.as_ref()
    }

    pub fn build(&self, event: &LogEvent) -> Record {
        let mut record = Record::new(event.timestamp_millis / 1000);

        record.push(FIELD_TIME, self.time_format.format_millis(event.timestamp_millis));
        record.push(FIELD_LEVEL, event.level.to_string());
        record.push(FIELD_THREAD, event.thread_name.as_str());
        record.push(
            FIELD_LOCATION,
            location_string(event, !event.include_location),
        );
        record.push(FIELD_MESSAGE, event.message.as_str());

        if let Some(error) = &event.error {
            record.push(FIELD_THROWABLE, error.join(LINE_SEPARATOR));
        }

        if let Some(layout) = &self.layout {
            record.push(
                FIELD_LOG,
                String::from_utf8_lossy(&layout.to_bytes(event)).into_owned(),
            );
        }

        if let Some(selector) = &self.field_selector {
            for (key, value) in selector.select(&event.context) {
                record.push(key, value);
            }
        }

        record
    }
}
