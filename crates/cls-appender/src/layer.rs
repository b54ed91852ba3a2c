// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! `tracing_subscriber` integration.
//!
//! ```ignore
//! let appender = Arc::new(Appender::new(AppenderConfig::from_env(), factory)?);
//! appender.start()?;
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ClsLayer::new(appender.clone()))
//!     .init();
//! ```

use crate::appender::Appender;
use crate::error::AppenderError;
use crate::event::{ErrorChain, Level, Location, LogEvent};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Write};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record as SpanRecord};
use tracing::{error, Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Events whose target starts with this prefix come from the appender
/// itself and are not shipped.
const SELF_TARGET: &str = env!("CARGO_CRATE_NAME");

const MESSAGE_FIELD: &str = "message";

/// Forwards every event of the subscriber to an [`Appender`].
#[derive(Debug, Clone)]
pub struct ClsLayer {
    appender: Arc<Appender>,
    include_location: bool,
}

impl ClsLayer {
    pub fn new(appender: Arc<Appender>) -> Self {
        Self {
            appender,
            include_location: false,
        }
    }

    /// Marks events as carrying their call site, so that
    /// [`LogEvent::location`] returns it without forcing. The `location`
    /// field of the record is filled either way; the flag matters to
    /// layouts that read the event's location unforced.
    #[must_use]
    pub fn include_location(mut self, include_location: bool) -> Self {
        self.include_location = include_location;
        self
    }

    fn to_log_event<S>(&self, event: &Event<'_>, ctx: &Context<'_, S>) -> LogEvent
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let metadata = event.metadata();

        let mut context = BTreeMap::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(fields) = span.extensions().get::<SpanFields>() {
                    context.extend(fields.0.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let mut visitor = EventVisitor {
            message: String::new(),
            error: None,
            fields: &mut context,
        };
        event.record(&mut visitor);
        let EventVisitor { message, error, .. } = visitor;

        let mut log_event = LogEvent::new(
            chrono::Utc::now().timestamp_millis(),
            Level::from(*metadata.level()),
            current_thread_name(),
            message,
        )
        .with_call_site(Location::new(
            metadata.module_path(),
            metadata.file(),
            metadata.line(),
        ))
        .with_include_location(self.include_location);
        log_event.context = context;
        if let Some(error) = error {
            log_event = log_event.with_error(error);
        }
        log_event
    }
}

impl<S> Layer<S> for ClsLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = SpanFields::default();
        attrs.record(&mut SpanVisitor(&mut fields.0));
        span.extensions_mut().insert(fields);
    }

    fn on_record(&self, id: &Id, values: &SpanRecord<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanFields>() {
            Some(fields) => values.record(&mut SpanVisitor(&mut fields.0)),
            None => {
                let mut fields = SpanFields::default();
                values.record(&mut SpanVisitor(&mut fields.0));
                extensions.insert(fields);
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if event.metadata().target().starts_with(SELF_TARGET) {
            return;
        }

        let log_event = self.to_log_event(event, &ctx);
        match self.appender.append(&log_event) {
            // Events outside the started window are dropped.
            Ok(()) | Err(AppenderError::NotStarted | AppenderError::Stopped) => {}
            Err(e) => error!("Failed to append event: {e}"),
        }
    }
}

fn current_thread_name() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", thread.id()),
    }
}

/// Fields recorded on a span, kept in its extensions
#[derive(Debug, Default)]
struct SpanFields(BTreeMap<String, String>);

struct SpanVisitor<'a>(&'a mut BTreeMap<String, String>);

impl Visit for SpanVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

struct EventVisitor<'a> {
    message: String,
    error: Option<ErrorChain>,
    fields: &'a mut BTreeMap<String, String>,
}

impl Visit for EventVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message.push_str(value);
        } else {
            self.fields
                .insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        if self.error.is_none() {
            self.error = Some(ErrorChain::from_error(value));
        } else {
            self.fields
                .insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            let _ = write!(self.message, "{value:?}");
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}"));
        }
    }
}
