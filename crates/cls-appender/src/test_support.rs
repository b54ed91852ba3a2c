// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for unit tests

use crate::callback::CompletionHandler;
use crate::config::{Credentials, DispatchConfig, ProducerSettings};
use crate::error::ProducerError;
use crate::producer::Producer;
use crate::record::Record;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) fn dispatch_config() -> DispatchConfig {
    DispatchConfig {
        topic_id: "topic-1".to_string(),
        endpoint: "cls.example.com".to_string(),
        credentials: Credentials {
            access_key_id: "AKID".to_string(),
            access_key_secret: "secret".to_string(),
        },
        source: "10.0.0.7".to_string(),
        producer: ProducerSettings::default(),
    }
}

pub(crate) struct Submission {
    pub topic_id: String,
    pub records: Arc<[Record]>,
    pub callback: CompletionHandler,
}

/// Keeps every submission in memory; completion is left to the test.
#[derive(Default)]
pub(crate) struct RecordingProducer {
    pub submissions: Mutex<Vec<Submission>>,
    pub submit_error: Option<ProducerError>,
    pub close_error: Option<ProducerError>,
    pub closes: AtomicUsize,
}

impl RecordingProducer {
    pub fn failing_submit(error: ProducerError) -> Self {
        Self {
            submit_error: Some(error),
            ..Default::default()
        }
    }

    pub fn failing_close(error: ProducerError) -> Self {
        Self {
            close_error: Some(error),
            ..Default::default()
        }
    }

    pub fn take_submissions(&self) -> Vec<Submission> {
        std::mem::take(&mut *self.submissions.lock().unwrap())
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Producer for RecordingProducer {
    fn submit(
        &self,
        topic_id: &str,
        records: Arc<[Record]>,
        callback: CompletionHandler,
    ) -> Result<(), ProducerError> {
        if let Some(error) = &self.submit_error {
            return Err(error.clone());
        }
        self.submissions.lock().unwrap().push(Submission {
            topic_id: topic_id.to_string(),
            records,
            callback,
        });
        Ok(())
    }

    fn close(&self) -> Result<(), ProducerError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        match &self.close_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
