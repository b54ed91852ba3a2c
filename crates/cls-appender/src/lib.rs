// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! # CLS Appender
//!
//! Forwards application log events to a CLS topic as structured records
//! without blocking the emitting thread on network I/O.
//!
//! ## Overview
//!
//! ```text
//!   tracing event ──> ClsLayer ──> LogEvent
//!                                     │
//!                                     v
//!                              RecordBuilder ──> Record
//!                                                   │
//!                                                   v
//!                              Dispatcher ──submit──> Producer (batching, retries, network)
//!                                                   │
//!                                                   v
//!                              CompletionHandler (logs failures only)
//! ```
//!
//! - [`builder`]: turns one [`event::LogEvent`] into one [`record::Record`]
//! - [`dispatcher`]: submits records to the transport client and reports
//!   synchronous failures
//! - [`callback`]: one-shot completion handler run on the transport's threads
//! - [`appender`]: `start` / `append` / `stop` lifecycle for hosts
//! - [`layer`]: `tracing_subscriber::Layer` adapter
//!
//! The transport client itself is an external collaborator, described by the
//! [`producer::Producer`] trait.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod appender;
pub mod builder;
pub mod callback;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod layer;
pub mod layout;
pub mod net;
pub mod producer;
pub mod record;
pub mod time_format;

#[cfg(test)]
pub(crate) mod test_support;

pub use appender::Appender;
pub use builder::{FieldSelector, RecordBuilder};
pub use callback::CompletionHandler;
pub use config::{AppenderConfig, Credentials, DispatchConfig, ProducerSettings, ResolvedConfig};
pub use dispatcher::Dispatcher;
pub use error::{AppenderError, ConfigError, ProducerError};
pub use event::{ErrorChain, Level, Location, LogEvent};
pub use layer::ClsLayer;
pub use layout::{JsonLayout, Layout};
pub use producer::{Producer, ProducerFactory, SendResult};
pub use record::Record;
