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

use grex_streams::{
    port_channel, Buffer, PacketMsg, PortItem, PortMessage, PortReceiver, PortSender, PortSet,
    Tag,
};
use std::time::{Duration, Instant};

/// A port set with every port wired to a test-side channel end.
pub struct ConnectedPorts {
    pub ports: PortSet,
    /// Feed these to drive the block's inputs.
    pub inputs: Vec<PortSender>,
    /// Drain these to observe the block's outputs.
    pub outputs: Vec<PortReceiver>,
}

pub fn connect_ports(num_inputs: usize, num_outputs: usize) -> ConnectedPorts {
    let mut ports = PortSet::new(num_inputs, num_outputs);
    let inputs = (0..num_inputs)
        .map(|index| {
            let (tx, rx) = port_channel();
            ports.connect_input(index, rx);
            tx
        })
        .collect();
    let outputs = (0..num_outputs)
        .map(|index| {
            let (tx, rx) = port_channel();
            ports.connect_output(index, tx);
            rx
        })
        .collect();
    ConnectedPorts {
        ports,
        inputs,
        outputs,
    }
}

pub fn bytes_buffer(items: &[u8]) -> Buffer {
    Buffer::from_bytes(1, items.to_vec())
}

/// Concatenated bytes of every buffer currently queued on `rx`.
///
/// Tags and messages queued alongside are dropped.
pub fn collect_bytes(rx: &PortReceiver) -> Vec<u8> {
    rx.drain()
        .into_iter()
        .filter_map(|item| match item {
            PortItem::Buffer(buffer) => Some(buffer.into_bytes()),
            _ => None,
        })
        .flatten()
        .collect()
}

pub fn collect_tags(rx: &PortReceiver) -> Vec<Tag> {
    rx.drain()
        .into_iter()
        .filter_map(|item| match item {
            PortItem::Tag(tag) => Some(tag),
            _ => None,
        })
        .collect()
}

pub fn collect_packets(rx: &PortReceiver) -> Vec<PacketMsg> {
    rx.drain()
        .into_iter()
        .filter_map(|item| match item {
            PortItem::Message(PortMessage::Packet(packet)) => Some(packet),
            _ => None,
        })
        .collect()
}

/// Waits up to `timeout` for the next packet message, skipping anything else.
pub fn recv_packet(rx: &PortReceiver, timeout: Duration) -> Option<PacketMsg> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.checked_duration_since(Instant::now())?;
        match rx.recv_timeout(remaining)? {
            PortItem::Message(PortMessage::Packet(packet)) => return Some(packet),
            _ => continue,
        }
    }
}
