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

//! Numbered block ports.
//!
//! Every port carries three independent lanes over one channel: an item stream
//! made of [`Buffer`]s, a tag stream and a message queue. A [`PortSet`] owns the
//! ports of one block and keeps the per-port consumed/produced counters that tag
//! translation is anchored on.
//!
//! Out-of-range port indices never panic: reads report an empty port and posts
//! are dropped with a warning.

use crate::buffer::Buffer;
use crate::message::PortMessage;
use crate::observability::events;
use crate::tag::Tag;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Select, Sender, TryRecvError};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{trace, warn};

const COMPONENT: &str = "port";

/// One entry on a port channel.
#[derive(Clone, Debug, PartialEq)]
pub enum PortItem {
    Buffer(Buffer),
    Tag(Tag),
    Message(PortMessage),
}

/// Upstream end of a port connection.
#[derive(Clone, Debug)]
pub struct PortSender {
    tx: Sender<PortItem>,
}

impl PortSender {
    /// Sends one item. Returns `false` when the downstream end is gone.
    pub fn send(&self, item: PortItem) -> bool {
        self.tx.send(item).is_ok()
    }

    pub fn send_buffer(&self, buffer: Buffer) -> bool {
        self.send(PortItem::Buffer(buffer))
    }

    pub fn send_tag(&self, tag: Tag) -> bool {
        self.send(PortItem::Tag(tag))
    }

    pub fn send_message(&self, message: impl Into<PortMessage>) -> bool {
        self.send(PortItem::Message(message.into()))
    }
}

/// Downstream end of a port connection.
#[derive(Debug)]
pub struct PortReceiver {
    rx: Receiver<PortItem>,
}

impl PortReceiver {
    pub fn try_recv(&self) -> Option<PortItem> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<PortItem> {
        match self.rx.recv_timeout(timeout) {
            Ok(item) => Some(item),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drains everything currently queued without waiting.
    pub fn drain(&self) -> Vec<PortItem> {
        self.rx.try_iter().collect()
    }
}

/// Creates a connected sender/receiver pair for one port edge.
pub fn port_channel() -> (PortSender, PortReceiver) {
    let (tx, rx) = unbounded();
    (PortSender { tx }, PortReceiver { rx })
}

/// Per-input negotiation knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputPortConfig {
    /// Bytes per item. Arriving buffers are counted in this size.
    pub item_size: usize,
    /// Items that must be available before the block's step runs.
    pub reserve_items: usize,
}

impl Default for InputPortConfig {
    fn default() -> Self {
        Self {
            item_size: 1,
            reserve_items: 1,
        }
    }
}

/// Per-output negotiation knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputPortConfig {
    /// Bytes per item. Posted buffers are counted in this size.
    pub item_size: usize,
    /// Size in items of buffers handed out by [`PortSet::get_output_buffer`].
    pub reserve_items: usize,
}

impl Default for OutputPortConfig {
    fn default() -> Self {
        Self {
            item_size: 1,
            reserve_items: 1,
        }
    }
}

#[derive(Debug, Default)]
struct InputPort {
    source: Option<PortReceiver>,
    buffers: VecDeque<Buffer>,
    new_tags: Vec<Tag>,
    messages: VecDeque<PortMessage>,
    consumed: u64,
    config: InputPortConfig,
}

impl InputPort {
    fn available(&self) -> usize {
        self.buffers.front().map(Buffer::len_items).unwrap_or(0)
    }

    fn queued_items(&self) -> usize {
        self.buffers.iter().map(Buffer::len_items).sum()
    }

    /// Queues `item`, counting buffer items in this port's item size.
    fn accept(&mut self, item: PortItem) {
        match item {
            PortItem::Buffer(buffer) => {
                let buffer = buffer.with_item_size(self.config.item_size);
                if !buffer.is_empty() {
                    self.buffers.push_back(buffer);
                }
            }
            PortItem::Tag(tag) => self.new_tags.push(tag),
            PortItem::Message(message) => self.messages.push_back(message),
        }
    }
}

#[derive(Debug, Default)]
struct OutputPort {
    sink: Option<PortSender>,
    produced: u64,
    config: OutputPortConfig,
}

impl OutputPort {
    fn send(&self, port: usize, item: PortItem) {
        let delivered = self.sink.as_ref().map(|sink| sink.send(item)).unwrap_or(false);
        if !delivered {
            trace!(
                event = events::PORT_OUTPUT_UNCONNECTED,
                component = COMPONENT,
                port,
                "output not connected; dropping item"
            );
        }
    }
}

/// The input and output ports of one block.
#[derive(Debug, Default)]
pub struct PortSet {
    inputs: Vec<InputPort>,
    outputs: Vec<OutputPort>,
    activity: u64,
}

impl PortSet {
    pub fn new(num_inputs: usize, num_outputs: usize) -> Self {
        let mut ports = Self::default();
        ports.resize(num_inputs, num_outputs);
        ports
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Grows or shrinks the port lists, keeping surviving ports and their state.
    pub fn resize(&mut self, num_inputs: usize, num_outputs: usize) {
        self.inputs.resize_with(num_inputs, InputPort::default);
        self.outputs.resize_with(num_outputs, OutputPort::default);
    }

    pub fn connect_input(&mut self, index: usize, source: PortReceiver) {
        match self.inputs.get_mut(index) {
            Some(port) => port.source = Some(source),
            None => warn!(
                event = events::PORT_INDEX_OUT_OF_RANGE,
                component = COMPONENT,
                port = index,
                num_inputs = self.inputs.len(),
                "cannot connect missing input"
            ),
        }
    }

    pub fn connect_output(&mut self, index: usize, sink: PortSender) {
        match self.outputs.get_mut(index) {
            Some(port) => port.sink = Some(sink),
            None => warn!(
                event = events::PORT_INDEX_OUT_OF_RANGE,
                component = COMPONENT,
                port = index,
                num_outputs = self.outputs.len(),
                "cannot connect missing output"
            ),
        }
    }

    /// Moves everything queued on the input channels into the ports.
    ///
    /// Returns the tags that became visible during this pull, grouped per input
    /// port, in arrival order. Disconnected sources are released.
    pub fn pull(&mut self) -> Vec<(usize, Vec<Tag>)> {
        let mut visible = Vec::new();
        for (index, port) in self.inputs.iter_mut().enumerate() {
            if let Some(source) = port.source.take() {
                let mut disconnected = false;
                loop {
                    match source.rx.try_recv() {
                        Ok(item) => port.accept(item),
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => {
                            disconnected = true;
                            break;
                        }
                    }
                }
                if !disconnected {
                    port.source = Some(source);
                }
            }
            if !port.new_tags.is_empty() {
                visible.push((index, std::mem::take(&mut port.new_tags)));
            }
        }
        visible
    }

    /// Waits until any connected input channel has something queued.
    ///
    /// Returns immediately for blocks without inputs. When every source has gone
    /// away nothing can arrive any more, so this sleeps for `timeout`.
    pub fn wait_for_input(&self, timeout: Duration) -> bool {
        if self.inputs.is_empty() {
            return false;
        }
        let mut select = Select::new();
        let mut connected = 0;
        for port in &self.inputs {
            if let Some(source) = port.source.as_ref() {
                select.recv(&source.rx);
                connected += 1;
            }
        }
        if connected == 0 {
            std::thread::sleep(timeout);
            return false;
        }
        select.ready_timeout(timeout).is_ok()
    }

    /// True when every input meets its reserve, or has a message pending.
    pub fn inputs_ready(&self) -> bool {
        self.inputs
            .iter()
            .all(|port| !port.messages.is_empty() || port.available() >= port.config.reserve_items)
    }

    /// Monotonic counter bumped by every consume, take, pop and post.
    pub fn activity(&self) -> u64 {
        self.activity
    }

    /// Items in the current buffer of `input`.
    pub fn available(&self, input: usize) -> usize {
        self.inputs.get(input).map(InputPort::available).unwrap_or(0)
    }

    /// Marks `items` items of `input` consumed, dropping them from the queue.
    pub fn consume(&mut self, input: usize, items: usize) {
        let Some(port) = self.inputs.get_mut(input) else {
            return;
        };
        let items = items.min(port.queued_items());
        let mut remaining = items;
        while remaining > 0 {
            let Some(front) = port.buffers.front_mut() else {
                break;
            };
            let len = front.len_items();
            if remaining >= len {
                port.buffers.pop_front();
                remaining -= len;
            } else {
                front.advance_items(remaining);
                remaining = 0;
            }
        }
        port.consumed += items as u64;
        self.activity += 1;
    }

    /// Items consumed on `input` since the port was created.
    pub fn consumed(&self, input: usize) -> u64 {
        self.inputs.get(input).map(|port| port.consumed).unwrap_or(0)
    }

    /// Items produced on `output` since the port was created.
    pub fn produced(&self, output: usize) -> u64 {
        self.outputs.get(output).map(|port| port.produced).unwrap_or(0)
    }

    /// Takes ownership of the current buffer of `input`.
    ///
    /// The items of the taken buffer count as consumed.
    pub fn take_input_buffer(&mut self, input: usize) -> Option<Buffer> {
        let port = self.inputs.get_mut(input)?;
        let buffer = port.buffers.pop_front()?;
        port.consumed += buffer.len_items() as u64;
        self.activity += 1;
        Some(buffer)
    }

    pub fn post_output_buffer(&mut self, output: usize, buffer: Buffer) {
        let Some(port) = self.outputs.get_mut(output) else {
            self.warn_missing_output(output);
            return;
        };
        let buffer = buffer.with_item_size(port.config.item_size);
        port.produced += buffer.len_items() as u64;
        port.send(output, PortItem::Buffer(buffer));
        self.activity += 1;
    }

    pub fn post_output_tag(&mut self, output: usize, tag: Tag) {
        let Some(port) = self.outputs.get(output) else {
            self.warn_missing_output(output);
            return;
        };
        port.send(output, PortItem::Tag(tag));
        self.activity += 1;
    }

    /// Non-blocking pop of the oldest pending message on `input`.
    pub fn pop_input_msg(&mut self, input: usize) -> Option<PortMessage> {
        let message = self.inputs.get_mut(input)?.messages.pop_front()?;
        self.activity += 1;
        Some(message)
    }

    pub fn post_output_msg(&mut self, output: usize, message: impl Into<PortMessage>) {
        let Some(port) = self.outputs.get(output) else {
            self.warn_missing_output(output);
            return;
        };
        port.send(output, PortItem::Message(message.into()));
        self.activity += 1;
    }

    /// Hands out a fresh buffer sized to the output's reserve.
    pub fn get_output_buffer(&self, output: usize) -> Buffer {
        let config = self.output_config(output);
        Buffer::zeroed(config.item_size, config.reserve_items.max(1))
    }

    pub fn input_config(&self, input: usize) -> InputPortConfig {
        self.inputs
            .get(input)
            .map(|port| port.config)
            .unwrap_or_default()
    }

    /// Replaces the config of `input`. Queued buffers are regrouped in the new item size.
    pub fn set_input_config(&mut self, input: usize, config: InputPortConfig) {
        if let Some(port) = self.inputs.get_mut(input) {
            port.config = config;
            let queued = std::mem::take(&mut port.buffers);
            port.buffers = queued
                .into_iter()
                .map(|buffer| buffer.with_item_size(config.item_size))
                .filter(|buffer| !buffer.is_empty())
                .collect();
        }
    }

    pub fn output_config(&self, output: usize) -> OutputPortConfig {
        self.outputs
            .get(output)
            .map(|port| port.config)
            .unwrap_or_default()
    }

    pub fn set_output_config(&mut self, output: usize, config: OutputPortConfig) {
        if let Some(port) = self.outputs.get_mut(output) {
            port.config = config;
        }
    }

    fn warn_missing_output(&self, output: usize) {
        warn!(
            event = events::PORT_INDEX_OUT_OF_RANGE,
            component = COMPONENT,
            port = output,
            num_outputs = self.outputs.len(),
            "dropping post to missing output"
        );
    }
}
