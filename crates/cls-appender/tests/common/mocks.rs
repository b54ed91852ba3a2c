// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-process transport client backed by its own tokio runtime.
//!
//! Each submission becomes a task on the mock's worker pool that waits for
//! the configured latency, decides the outcome and then runs the completion
//! handler on the worker thread, the way the real client does.

use cls_appender::{
    CompletionHandler, DispatchConfig, Producer, ProducerError, Record, SendResult,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

pub const WORKER_THREAD_NAME: &str = "mock-cls-sender";

pub type Outcome = Arc<dyn Fn(&[Record]) -> SendResult + Send + Sync>;

pub fn always_succeed() -> Outcome {
    Arc::new(|_: &[Record]| SendResult::success(1))
}

pub fn always_fail(error_code: &'static str, error_message: &'static str) -> Outcome {
    Arc::new(move |_: &[Record]| SendResult::failure(error_code, error_message, 4))
}

/// One completed submission, as observed by the transport
#[derive(Debug, Clone)]
pub struct Delivery {
    pub topic_id: String,
    pub source: String,
    pub records: Arc<[Record]>,
    pub result: SendResult,
    pub thread: Option<String>,
}

#[derive(Default)]
struct Shared {
    deliveries: Mutex<Vec<Delivery>>,
    in_flight: AtomicUsize,
}

pub struct MockTransport {
    runtime: Mutex<Option<Runtime>>,
    shared: Arc<Shared>,
    latency: Duration,
    outcome: Outcome,
    capacity: Option<usize>,
    max_block_ms: u64,
    closed: AtomicBool,
}

impl MockTransport {
    pub fn new(config: &DispatchConfig, latency: Duration, outcome: Outcome) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.producer.send_thread_count.max(1))
            .thread_name(WORKER_THREAD_NAME)
            .enable_time()
            .build()
            .expect("failed to build mock transport runtime");

        Self {
            runtime: Mutex::new(Some(runtime)),
            shared: Arc::new(Shared::default()),
            latency,
            outcome,
            capacity: None,
            max_block_ms: config.producer.max_block_ms,
            closed: AtomicBool::new(false),
        }
    }

    /// Rejects submissions once `capacity` batches are in flight.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.shared.deliveries.lock().unwrap().clone()
    }

    /// Polls until `count` deliveries completed or `timeout` elapsed.
    pub fn wait_for_deliveries(&self, count: usize, timeout: Duration) -> Vec<Delivery> {
        let deadline = Instant::now() + timeout;
        loop {
            let deliveries = self.deliveries();
            if deliveries.len() >= count || Instant::now() >= deadline {
                return deliveries;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Producer for MockTransport {
    fn submit(
        &self,
        topic_id: &str,
        records: Arc<[Record]>,
        callback: CompletionHandler,
    ) -> Result<(), ProducerError> {
        if self.is_closed() {
            return Err(ProducerError::Closed);
        }
        if let Some(capacity) = self.capacity {
            if self.shared.in_flight.load(Ordering::SeqCst) >= capacity {
                return Err(ProducerError::BufferExhausted {
                    max_block_ms: self.max_block_ms,
                });
            }
        }

        let guard = self.runtime.lock().unwrap();
        let Some(runtime) = guard.as_ref() else {
            return Err(ProducerError::Closed);
        };

        self.shared.in_flight.fetch_add(1, Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);
        let outcome = Arc::clone(&self.outcome);
        let latency = self.latency;
        let topic_id = topic_id.to_string();

        runtime.spawn(async move {
            tokio::time::sleep(latency).await;
            let result = outcome(&records);
            let delivery = Delivery {
                topic_id,
                source: callback.source().to_string(),
                records,
                result: result.clone(),
                thread: std::thread::current().name().map(str::to_string),
            };
            callback.on_completion(result);
            shared.deliveries.lock().unwrap().push(delivery);
            shared.in_flight.fetch_sub(1, Ordering::SeqCst);
        });
        Ok(())
    }

    /// Waits for in-flight batches, then stops the worker pool.
    fn close(&self) -> Result<(), ProducerError> {
        self.closed.store(true, Ordering::SeqCst);

        let deadline = Instant::now() + Duration::from_secs(5);
        while self.shared.in_flight.load(Ordering::SeqCst) > 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }

        match self.runtime.lock().unwrap().take() {
            Some(runtime) => {
                runtime.shutdown_timeout(Duration::from_secs(1));
                Ok(())
            }
            None => Err(ProducerError::Close("already closed".to_string())),
        }
    }
}

/// Factory handing out a single [`MockTransport`], reachable through the
/// returned slot once the appender has started.
pub fn mock_factory(
    latency: Duration,
    outcome: Outcome,
    capacity: Option<usize>,
) -> (
    impl Fn(&DispatchConfig) -> Result<Arc<dyn Producer>, ProducerError> + Send + Sync + 'static,
    Arc<OnceLock<Arc<MockTransport>>>,
) {
    let slot: Arc<OnceLock<Arc<MockTransport>>> = Arc::new(OnceLock::new());
    let factory_slot = Arc::clone(&slot);

    let factory = move |config: &DispatchConfig| -> Result<Arc<dyn Producer>, ProducerError> {
        let mut transport = MockTransport::new(config, latency, Arc::clone(&outcome));
        if let Some(capacity) = capacity {
            transport = transport.with_capacity(capacity);
        }
        let transport = Arc::new(transport);
        factory_slot
            .set(Arc::clone(&transport))
            .map_err(|_| ProducerError::Rejected("transport already created".to_string()))?;
        Ok(transport)
    };

    (factory, slot)
}
