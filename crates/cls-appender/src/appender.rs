// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Host-facing lifecycle: `start`, `append`, `stop`.

use crate::builder::RecordBuilder;
use crate::config::{AppenderConfig, DispatchConfig};
use crate::dispatcher::Dispatcher;
use crate::error::{AppenderError, ConfigError};
use crate::event::LogEvent;
use crate::layout::Layout;
use crate::producer::ProducerFactory;
use crate::time_format::TimeFormat;
use std::sync::Arc;
use tracing::debug;

/// Turns log events into records and hands them to the transport client.
///
/// `append` may be called concurrently from any number of threads.
#[derive(Debug)]
pub struct Appender {
    builder: RecordBuilder,
    dispatcher: Dispatcher,
}

impl Appender {
    /// Resolves `config` and prepares the appender. The producer is not
    /// created until [`Appender::start`].
    pub fn new(
        config: AppenderConfig,
        factory: impl ProducerFactory + 'static,
    ) -> Result<Self, ConfigError> {
        let resolved = config.resolve()?;
        debug!(
            "Appender configured, topicId={}, timeFormat={}, timeZone={}",
            resolved.dispatch.topic_id,
            resolved.time_format.pattern(),
            resolved.time_format.zone_id()
        );

        Ok(Self {
            builder: RecordBuilder::new(resolved.time_format, resolved.field_selector),
            dispatcher: Dispatcher::new(resolved.dispatch, Arc::new(factory)),
        })
    }

    #[must_use]
    pub fn with_layout(mut self, layout: Arc<dyn Layout>) -> Self {
        self.builder = self.builder.with_layout(layout);
        self
    }

    pub fn start(&self) -> Result<(), AppenderError> {
        self.dispatcher.start()
    }

    pub fn append(&self, event: &LogEvent) -> Result<(), AppenderError> {
        self.dispatcher.dispatch(self.builder.build(event))
    }

    pub fn stop(&self) {
        self.dispatcher.stop();
    }

    pub fn is_started(&self) -> bool {
        self.dispatcher.is_started()
    }

    pub fn dispatch_config(&self) -> &DispatchConfig {
        self.dispatcher.config()
    }

    pub fn builder(&self) -> &RecordBuilder {
        &self.builder
    }

    pub fn time_format(&self) -> &TimeFormat {
        self.builder.time_format()
    }
}
