// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::callback::CompletionHandler;
use crate::config::DispatchConfig;
use crate::error::AppenderError;
use crate::producer::{Producer, ProducerFactory};
use crate::record::{describe, Record};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error};

enum State {
    Uninitialized,
    Started(Arc<dyn Producer>),
    Stopped,
}

/// Submits records to the transport client without waiting for delivery.
///
/// Lifecycle is `Uninitialized -> Started -> Stopped`. `dispatch` only holds
/// the state lock long enough to clone the producer handle, so concurrent
/// emitters never wait on each other or on the network.
pub struct Dispatcher {
    config: Arc<DispatchConfig>,
    topic_id: Arc<str>,
    source: Arc<str>,
    factory: Arc<dyn ProducerFactory>,
    state: RwLock<State>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("started", &self.is_started())
            .finish()
    }
}

impl Dispatcher {
    pub fn new(config: DispatchConfig, factory: Arc<dyn ProducerFactory>) -> Self {
        Self {
            topic_id: Arc::from(config.topic_id.as_str()),
            source: Arc::from(config.source.as_str()),
            config: Arc::new(config),
            factory,
            state: RwLock::new(State::Uninitialized),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        matches!(
            *self.state.read().unwrap_or_else(PoisonError::into_inner),
            State::Started(_)
        )
    }

    /// Acquires the producer. Fails if already started or stopped, or if
    /// the producer cannot be created.
    ///
    /// No lock is held while the factory runs: the factory may log, and a
    /// subscriber that ships those events calls back into `dispatch`.
    pub fn start(&self) -> Result<(), AppenderError> {
        match *self.state.read().unwrap_or_else(PoisonError::into_inner) {
            State::Started(_) => return Err(AppenderError::AlreadyStarted),
            State::Stopped => return Err(AppenderError::Stopped),
            State::Uninitialized => {}
        }

        let producer = self.factory.create(&self.config)?;

        let installed = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            match *state {
                State::Uninitialized => {
                    *state = State::Started(Arc::clone(&producer));
                    Ok(())
                }
                State::Started(_) => Err(AppenderError::AlreadyStarted),
                State::Stopped => Err(AppenderError::Stopped),
            }
        };

        if let Err(e) = installed {
            // Lost the race against a concurrent start or stop.
            if let Err(close_error) = producer.close() {
                error!(
                    "Failed to close appender, topicId={}: {close_error}",
                    self.topic_id
                );
            }
            return Err(e);
        }

        debug!(
            "Dispatcher started, topicId={}, endpoint={}, source={}",
            self.topic_id, self.config.endpoint, self.source
        );
        Ok(())
    }

    /// Submits one record as a single-element batch.
    ///
    /// Submission failures are logged and swallowed; only lifecycle misuse
    /// is returned to the caller.
    pub fn dispatch(&self, record: Record) -> Result<(), AppenderError> {
        let producer = match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            State::Started(producer) => Arc::clone(producer),
            State::Uninitialized => return Err(AppenderError::NotStarted),
            State::Stopped => return Err(AppenderError::Stopped),
        };

        let records: Arc<[Record]> = Arc::from(vec![record]);
        let callback = CompletionHandler::new(
            Arc::clone(&self.topic_id),
            Arc::clone(&self.source),
            Arc::clone(&records),
        );

        if let Err(e) = producer.submit(&self.topic_id, Arc::clone(&records), callback) {
            error!(
                "Failed to send log, topicId={}, source={}, logItem={}: {e}",
                self.topic_id,
                self.source,
                describe(&records)
            );
        }
        Ok(())
    }

    /// Releases the producer once. Close failures are logged, never returned.
    pub fn stop(&self) {
        let previous = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *state, State::Stopped)
        };

        if let State::Started(producer) = previous {
            if let Err(e) = producer.close() {
                error!("Failed to close appender, topicId={}: {e}", self.topic_id);
            }
            debug!("Dispatcher stopped, topicId={}", self.topic_id);
        }
    }
}
