// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Human-readable timestamps for the `time` field.
//!
//! Patterns use the Joda/`SimpleDateFormat` letters users already write in
//! their logging configuration (`yyyy-MM-dd'T'HH:mm:ssZ`). They are compiled
//! once into `chrono` directives bound to a zone; the few letters chrono has
//! no directive for are rendered directly.
//!
//! | letters | meaning | chrono |
//! |---|---|---|
//! | `yyyy` / `yy` (or `Y`) | year | `%Y` / `%y` |
//! | `C` | century | `%C` |
//! | `G` | era | `AD` / `BC` |
//! | `M` `MM` `MMM` `MMMM` | month | `%-m` `%m` `%b` `%B` |
//! | `d` `dd` | day of month | `%-d` `%d` |
//! | `D` | day of year | `%j` |
//! | `H` `HH` / `h` `hh` | hour (0-23 / 1-12) | `%-H` `%H` / `%-I` `%I` |
//! | `k` `kk` / `K` `KK` | hour (1-24 / 0-11) | computed |
//! | `m` `mm` / `s` `ss` | minute / second | `%-M` `%M` / `%-S` `%S` |
//! | `S`.. | fraction of second | `%3f` `%6f` `%9f` |
//! | `a` | half day | `%p` |
//! | `E`.. `EEEE` | day of week | `%a` / `%A` |
//! | `e` / `w` / `x` | ISO weekday / week / week year | `%u` / `%V` / `%G` |
//! | `Z` `ZZ` `ZZZ` | offset / offset with colon / zone id | `%z` / `%:z` / literal |
//! | `z` | zone abbreviation, id for fixed zones | `%Z` / literal |
//! | `'text'` | literal, `''` is a quote | |

use crate::constants::{DEFAULT_TIME_FORMAT, DEFAULT_TIME_ZONE};
use crate::error::ConfigError;
use chrono::{DateTime, Datelike, FixedOffset, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq)]
enum Zone {
    Fixed { offset: FixedOffset, id: String },
    Named(Tz),
}

impl Zone {
    fn parse(id: &str) -> Result<Self, ConfigError> {
        let trimmed = id.trim();
        if matches!(trimmed, "UTC" | "GMT" | "UT" | "Z") {
            return Ok(Zone::Fixed {
                offset: utc_offset(),
                id: DEFAULT_TIME_ZONE.to_string(),
            });
        }

        if trimmed.starts_with('+') || trimmed.starts_with('-') {
            return parse_offset(trimmed)
                .map(|offset| Zone::Fixed {
                    offset,
                    id: trimmed.to_string(),
                })
                .ok_or_else(|| ConfigError::UnknownTimeZone(id.to_string()));
        }

        trimmed
            .parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| ConfigError::UnknownTimeZone(id.to_string()))
    }

    fn id(&self) -> &str {
        match self {
            Zone::Fixed { id, .. } => id,
            Zone::Named(tz) => tz.name(),
        }
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Accepts `+HH`, `+HHMM` and `+HH:MM`.
fn parse_offset(value: &str) -> Option<FixedOffset> {
    let (sign, digits) = match value.split_at(1) {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let digits: String = digits.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 18 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// One compiled element of a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    /// chrono directives and escaped literals
    Chrono(String),
    /// `k`: hour of day, 1-24
    ClockHour { width: usize },
    /// `K`: hour of half day, 0-11
    HalfDayHour { width: usize },
    /// `G`
    Era,
}

/// A compiled date pattern bound to a zone
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFormat {
    pattern: String,
    pieces: Vec<Piece>,
    zone: Zone,
}

impl TimeFormat {
    pub fn new(pattern: &str, zone: &str) -> Result<Self, ConfigError> {
        let zone = Zone::parse(zone)?;
        let pieces = compile(pattern, &zone)?;
        Ok(Self {
            pattern: pattern.to_string(),
            pieces,
            zone,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn zone_id(&self) -> &str {
        self.zone.id()
    }

    /// Formats epoch milliseconds. Out of range instants fall back to the
    /// raw millisecond value.
    pub fn format_millis(&self, millis: i64) -> String {
        let Some(instant) = DateTime::<Utc>::from_timestamp_millis(millis) else {
            return millis.to_string();
        };

        let mut out = String::new();
        let written = match &self.zone {
            Zone::Fixed { offset, .. } => {
                render(&mut out, &instant.with_timezone(offset), &self.pieces)
            }
            Zone::Named(tz) => render(&mut out, &instant.with_timezone(tz), &self.pieces),
        };
        if written.is_err() {
            return millis.to_string();
        }
        out
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_TIME_FORMAT.to_string(),
            pieces: vec![Piece::Chrono("%Y-%m-%dT%H:%M:%S%z".to_string())],
            zone: Zone::Fixed {
                offset: utc_offset(),
                id: DEFAULT_TIME_ZONE.to_string(),
            },
        }
    }
}

fn render<Z>(out: &mut String, instant: &DateTime<Z>, pieces: &[Piece]) -> fmt::Result
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    for piece in pieces {
        match piece {
            Piece::Chrono(format) => write!(out, "{}", instant.format(format))?,
            Piece::ClockHour { width } => {
                let hour = match instant.hour() {
                    0 => 24,
                    hour => hour,
                };
                write!(out, "{:0w$}", hour, w = *width)?;
            }
            Piece::HalfDayHour { width } => {
                write!(out, "{:0w$}", instant.hour() % 12, w = *width)?;
            }
            Piece::Era => out.push_str(if instant.year() > 0 { "AD" } else { "BC" }),
        }
    }
    Ok(())
}

/// Accumulates pieces, merging adjacent chrono directives
#[derive(Default)]
struct Pieces(Vec<Piece>);

impl Pieces {
    fn directive(&mut self, directive: &str) {
        match self.0.last_mut() {
            Some(Piece::Chrono(format)) => format.push_str(directive),
            _ => self.0.push(Piece::Chrono(directive.to_string())),
        }
    }

    fn literal(&mut self, c: char) {
        if c == '%' {
            self.directive("%%");
        } else {
            let mut buf = [0u8; 4];
            self.directive(c.encode_utf8(&mut buf));
        }
    }

    fn literals(&mut self, text: &str) {
        for c in text.chars() {
            self.literal(c);
        }
    }
}

fn compile(pattern: &str, zone: &Zone) -> Result<Vec<Piece>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidTimeFormat {
        pattern: pattern.to_string(),
        reason,
    };

    let chars: Vec<char> = pattern.chars().collect();
    let mut pieces = Pieces::default();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' is an escaped quote, otherwise read until the closing quote
            if chars.get(i + 1) == Some(&'\'') {
                pieces.literal('\'');
                i += 2;
                continue;
            }
            i += 1;
            loop {
                match chars.get(i) {
                    None => return Err(invalid("unterminated quoted literal".to_string())),
                    Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                        pieces.literal('\'');
                        i += 2;
                    }
                    Some('\'') => {
                        i += 1;
                        break;
                    }
                    Some(literal) => {
                        pieces.literal(*literal);
                        i += 1;
                    }
                }
            }
            continue;
        }

        if !c.is_ascii_alphabetic() {
            pieces.literal(c);
            i += 1;
            continue;
        }

        let mut count = 1;
        while chars.get(i + count) == Some(&c) {
            count += 1;
        }
        i += count;

        let directive = match (c, count) {
            ('y' | 'Y', 2) => "%y",
            ('y' | 'Y', _) => "%Y",
            ('x', _) => "%G",
            ('C', _) => "%C",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('D', _) => "%j",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('k', _) => {
                pieces.0.push(Piece::ClockHour { width: count });
                continue;
            }
            ('K', _) => {
                pieces.0.push(Piece::HalfDayHour { width: count });
                continue;
            }
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('S', 1..=3) => "%3f",
            ('S', 4..=6) => "%6f",
            ('S', _) => "%9f",
            ('a', _) => "%p",
            ('G', _) => {
                pieces.0.push(Piece::Era);
                continue;
            }
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('e', _) => "%u",
            ('w', _) => "%V",
            ('Z', 1) => "%z",
            ('Z', 2) => "%:z",
            ('Z', _) => {
                pieces.literals(zone.id());
                continue;
            }
            // Fixed zones have no abbreviation, Joda prints their id
            ('z', _) => match zone {
                Zone::Fixed { id, .. } => {
                    pieces.literals(id);
                    continue;
                }
                Zone::Named(_) => "%Z",
            },
            (other, _) => return Err(invalid(format!("unsupported pattern letter '{other}'"))),
        };
        pieces.directive(directive);
    }

    Ok(pieces.0)
}
