// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::fmt;

/// Structured representation of one log event destined for shipment.
///
/// Field names are unique: pushing an existing name replaces its value but
/// keeps the position of the first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    time: i64,
    contents: Vec<(String, String)>,
}

impl Record {
    /// `time` is in seconds since the Unix epoch.
    pub fn new(time: i64) -> Self {
        Self {
            time,
            contents: Vec::new(),
        }
    }

    /// Inserts or replaces a field. Returns the replaced value, if any.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.contents.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.contents.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.contents
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn contents(&self) -> &[(String, String)] {
        &self.contents
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.contents.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

struct Contents<'a>(&'a [(String, String)]);

impl Serialize for Contents<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Record", 2)?;
        state.serialize_field("time", &self.time)?;
        state.serialize_field("contents", &Contents(&self.contents))?;
        state.end()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Renders a batch for diagnostic lines.
pub(crate) fn describe(records: &[Record]) -> String {
    serde_json::to_string(records).unwrap_or_else(|e| format!("<unserializable records: {e}>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut record = Record::new(1_700_000_000);
        record.push("level", "INFO");
        record.push("thread", "main");
        record.push("message", "hello");

        assert_eq!(record.keys().collect::<Vec<_>>(), ["level", "thread", "message"]);
        assert_eq!(record.get("thread"), Some("main"));
        assert_eq!(record.time(), 1_700_000_000);
    }

    #[test]
    fn test_push_replaces_existing_field_in_place() {
        let mut record = Record::new(0);
        record.push("message", "first");
        record.push("level", "INFO");

        let replaced = record.push("message", "second");

        assert_eq!(replaced.as_deref(), Some("first"));
        assert_eq!(record.len(), 2);
        assert_eq!(record.keys().collect::<Vec<_>>(), ["message", "level"]);
        assert_eq!(record.get("message"), Some("second"));
    }

    #[test]
    fn test_serialize_preserves_field_order() {
        let mut record = Record::new(12);
        record.push("zeta", "1");
        record.push("alpha", "2");

        assert_eq!(
            record.to_string(),
            r#"{"time":12,"contents":{"zeta":"1","alpha":"2"}}"#
        );
    }

    #[test]
    fn test_describe_batch() {
        let mut record = Record::new(3);
        record.push("message", "disk full");

        assert_eq!(
            describe(&[record]),
            r#"[{"time":3,"contents":{"message":"disk full"}}]"#
        );
    }
}
