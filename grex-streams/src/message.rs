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

//! Messages carried on port message queues.

use crate::buffer::Buffer;
use serde_json::Value;

/// One discrete packet: exactly one buffer whose byte length is the packet length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketMsg {
    pub buff: Buffer,
}

impl PacketMsg {
    pub fn new(buff: Buffer) -> Self {
        Self { buff }
    }

    pub fn from_bytes(payload: Vec<u8>) -> Self {
        Self {
            buff: Buffer::from_bytes(1, payload),
        }
    }

    pub fn payload(&self) -> &[u8] {
        self.buff.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.buff.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Message queue entry.
///
/// Consumers match on the variant they expect and drop everything else.
#[derive(Clone, Debug, PartialEq)]
pub enum PortMessage {
    Packet(PacketMsg),
    Value(Value),
}

impl PortMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            PortMessage::Packet(_) => "packet",
            PortMessage::Value(_) => "value",
        }
    }
}

impl From<PacketMsg> for PortMessage {
    fn from(msg: PacketMsg) -> Self {
        PortMessage::Packet(msg)
    }
}

impl From<Value> for PortMessage {
    fn from(value: Value) -> Self {
        PortMessage::Value(value)
    }
}
