/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Canonical structured field values and value-format helpers.

pub const NONE: &str = "none";
pub const REASON_SHUTDOWN: &str = "shutdown";
pub const REASON_INVALID_THREAD_NAME: &str = "invalid_thread_name";
pub const DEFAULT_WORKER_THREAD: &str = "unknown-thread";

/// Bytes of a packet payload rendered by [`format_payload_preview`].
pub const PAYLOAD_PREVIEW_LEN: usize = 16;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkerContext {
    pub block: String,
    pub worker_thread: String,
}

impl WorkerContext {
    pub fn with_current_thread(block: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            worker_thread: current_thread_name_or_default(),
        }
    }
}

pub fn thread_name_or_default(thread_name: Option<&str>) -> String {
    thread_name.unwrap_or(DEFAULT_WORKER_THREAD).to_string()
}

pub fn current_thread_name_or_default() -> String {
    thread_name_or_default(std::thread::current().name())
}

/// Hex rendering of the first few payload bytes, with a `..` suffix when cut.
pub fn format_payload_preview(payload: &[u8]) -> String {
    if payload.is_empty() {
        return NONE.to_string();
    }
    let mut out: String = payload
        .iter()
        .take(PAYLOAD_PREVIEW_LEN)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    if payload.len() > PAYLOAD_PREVIEW_LEN {
        out.push_str("..");
    }
    out
}

/// Renders a signed route code the way it is configured.
pub fn format_route_code(code: i32) -> String {
    match code {
        -1 => "stall".to_string(),
        -2 => "sink".to_string(),
        out if out >= 0 => format!("out{out}"),
        other => format!("invalid({other})"),
    }
}
