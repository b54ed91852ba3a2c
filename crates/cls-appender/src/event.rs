// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Host-agnostic description of one log event.

use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

/// Severity of a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Trace => write!(f, "TRACE"),
            Level::Debug => write!(f, "DEBUG"),
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
            Level::Fatal => write!(f, "FATAL"),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::TRACE => Level::Trace,
        }
    }
}

/// Call site of a log statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub module_path: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Location {
    pub fn new(
        module_path: Option<impl Into<String>>,
        file: Option<impl Into<String>>,
        line: Option<u32>,
    ) -> Self {
        Self {
            module_path: module_path.map(Into::into),
            file: file.map(Into::into),
            line,
        }
    }
}

/// Renders as `module(file:line)`, the shape of a stack frame description.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.module_path.as_deref().unwrap_or("Unknown"))?;
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}")?,
            (Some(file), None) => write!(f, "{file}")?,
            (None, _) => write!(f, "Unknown Source")?,
        }
        write!(f, ")")
    }
}

/// Ordered descriptions of an error and its causes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorChain(Vec<String>);

impl ErrorChain {
    pub fn new(frames: Vec<String>) -> Self {
        Self(frames)
    }

    /// Walks `source()` from the outermost error inward.
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut frames = vec![error.to_string()];
        let mut source = error.source();
        while let Some(cause) = source {
            frames.push(format!("Caused by: {cause}"));
            source = cause.source();
        }
        Self(frames)
    }

    pub fn frames(&self) -> &[String] {
        &self.0
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

/// One log event as seen by the record builder.
///
/// Events are read, never mutated: location forcing happens through
/// [`LogEvent::location`] with an explicit flag.
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    /// Milliseconds since the Unix epoch
    pub timestamp_millis: i64,
    pub level: Level,
    pub thread_name: String,
    /// Call site, if the host knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_site: Option<Location>,
    /// Whether the host captured the call site for this event
    #[serde(skip)]
    pub include_location: bool,
    /// Rendered message, after argument substitution
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorChain>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    pub fn new(
        timestamp_millis: i64,
        level: Level,
        thread_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp_millis,
            level,
            thread_name: thread_name.into(),
            call_site: None,
            include_location: false,
            message: message.into(),
            error: None,
            context: BTreeMap::new(),
        }
    }

    pub fn with_call_site(mut self, location: Location) -> Self {
        self.call_site = Some(location);
        self
    }

    pub fn with_include_location(mut self, include_location: bool) -> Self {
        self.include_location = include_location;
        self
    }

    pub fn with_error(mut self, error: ErrorChain) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Call site visible for this event. With `force`, the call site is
    /// returned even when the host did not enable location capture.
    pub fn location(&self, force: bool) -> Option<&Location> {
        self.call_site
            .as_ref()
            .filter(|_| self.include_location || force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[derive(Debug, thiserror::Error)]
    #[error("flush failed")]
    struct FlushFailed(#[source] Refused);

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull(#[source] FlushFailed);

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Error.to_string(), "ERROR");
        assert_eq!(Level::from(tracing::Level::WARN).to_string(), "WARN");
    }

    #[test]
    fn test_location_display() {
        let location = Location::new(Some("app::db"), Some("src/db.rs"), Some(42));
        assert_eq!(location.to_string(), "app::db(src/db.rs:42)");

        let location = Location::new(Some("app::db"), None::<String>, None);
        assert_eq!(location.to_string(), "app::db(Unknown Source)");
    }

    #[test]
    fn test_error_chain_walks_sources() {
        let error = DiskFull(FlushFailed(Refused));
        let chain = ErrorChain::from_error(&error);
        assert_eq!(
            chain.frames(),
            [
                "disk full".to_string(),
                "Caused by: flush failed".to_string(),
                "Caused by: connection refused".to_string(),
            ]
        );
    }

    #[test]
    fn test_location_is_hidden_unless_included_or_forced() {
        let event = LogEvent::new(0, Level::Info, "main", "hello").with_call_site(Location::new(
            Some("app"),
            Some("src/main.rs"),
            Some(1),
        ));

        assert!(event.location(false).is_none());
        assert!(event.location(true).is_some());
        // Forcing must not enable capture on the event itself
        assert!(!event.include_location);

        let event = event.with_include_location(true);
        assert!(event.location(false).is_some());
    }
}
