// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities, mocks, and helpers for integration tests

pub mod mocks;

use cls_appender::AppenderConfig;

/// Options every appender needs, pointing at a fake endpoint
pub fn base_config() -> AppenderConfig {
    AppenderConfig {
        endpoint: Some("ap-guangzhou.cls.tencentcs.com".to_string()),
        access_key_id: Some("AKID".to_string()),
        access_key_secret: Some("secret".to_string()),
        topic_id: Some("topic-1".to_string()),
        ..Default::default()
    }
}
