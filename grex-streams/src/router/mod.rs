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

//! Dynamic stream selector.
//!
//! Forwards each input to at most one output according to a routing table that
//! can be republished at any time through a [`RouteControl`] handle.
//!
//! ```
//! use grex_streams::port::{port_channel, PortItem, PortSet};
//! use grex_streams::{BlockNode, Buffer, StreamSelector};
//!
//! let (in_tx, in_rx) = port_channel();
//! let (out_tx, out_rx) = port_channel();
//! let mut ports = PortSet::new(1, 1);
//! ports.connect_input(0, in_rx);
//! ports.connect_output(0, out_tx);
//!
//! let selector = StreamSelector::new(1);
//! let control = selector.control();
//! let mut node = BlockNode::new(Box::new(selector), ports);
//!
//! in_tx.send_buffer(Buffer::from_bytes(1, vec![1, 2, 3]));
//! node.step();
//! // Unconfigured inputs stall.
//! assert!(out_rx.try_recv().is_none());
//!
//! control.configure(&[0]);
//! node.step();
//! assert!(matches!(out_rx.try_recv(), Some(PortItem::Buffer(_))));
//! ```

pub mod route_table;

use crate::block::Block;
use crate::observability::{events, fields};
use crate::port::PortSet;
use crate::tag::Tag;
use route_table::{RouteCode, RouteControl, RouteTable};
use std::sync::Arc;
use tracing::{debug, trace, warn};

const COMPONENT: &str = "stream_selector";
const STREAM_SELECTOR_NAME: &str = "StreamSelector";

/// N-input, M-output selector block.
///
/// Per input, on every step with at least one available item:
/// a forward route moves the current buffer to the selected output,
/// a stall leaves it pending and a sink consumes it.
///
/// The routing table is read once at the start of each step, so tags and
/// items of one step always follow the same generation.
pub struct StreamSelector {
    item_size: usize,
    control: RouteControl,
    table: Arc<RouteTable>,
}

impl StreamSelector {
    pub fn new(item_size: usize) -> Self {
        let control = RouteControl::new(RouteTable::default());
        Self {
            item_size: item_size.max(1),
            table: control.snapshot(),
            control,
        }
    }

    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Handle for publishing routing tables while the selector runs elsewhere.
    pub fn control(&self) -> RouteControl {
        self.control.clone()
    }

    pub fn set_paths(&self, paths: &[i32]) {
        self.control.configure(paths);
    }

    pub fn paths(&self) -> Vec<i32> {
        self.control.paths()
    }

    /// Adopts the published table if it changed. Returns `true` on a new generation.
    fn refresh_table(&mut self, num_outputs: usize) -> bool {
        let table = self.control.snapshot();
        if Arc::ptr_eq(&table, &self.table) {
            return false;
        }
        for (input, out) in missing_outputs(&table, num_outputs) {
            warn!(
                event = events::SELECTOR_ROUTE_OUTPUT_MISSING,
                component = COMPONENT,
                port = input,
                route = fields::format_route_code(out as i32).as_str(),
                num_outputs,
                "route names a missing output; input stalls"
            );
        }
        self.table = table;
        true
    }
}

/// Inputs of `table` forwarded to an output index at or beyond `num_outputs`.
fn missing_outputs(table: &RouteTable, num_outputs: usize) -> Vec<(usize, usize)> {
    (0..table.len())
        .filter_map(|input| match table.route(input) {
            RouteCode::Forward(out) if out >= num_outputs => Some((input, out)),
            _ => None,
        })
        .collect()
}

/// Output for `input` if it exists on this topology.
fn forward_target(route: RouteCode, input: usize, ports: &PortSet) -> Option<usize> {
    match route {
        RouteCode::Forward(out) if out < ports.num_outputs() => Some(out),
        RouteCode::Forward(out) => {
            trace!(
                event = events::SELECTOR_ROUTE_OUTPUT_MISSING,
                component = COMPONENT,
                port = input,
                num_outputs = ports.num_outputs(),
                out,
                "input stalled on missing output"
            );
            None
        }
        RouteCode::Stall | RouteCode::Sink => None,
    }
}

impl Block for StreamSelector {
    fn name(&self) -> &str {
        STREAM_SELECTOR_NAME
    }

    fn begin_step(&mut self, ports: &PortSet) {
        self.refresh_table(ports.num_outputs());
    }

    fn work(&mut self, ports: &mut PortSet) {
        for input in 0..ports.num_inputs() {
            let available = ports.available(input);
            if available == 0 {
                continue;
            }
            match self.table.route(input) {
                RouteCode::Stall => {}
                RouteCode::Sink => ports.consume(input, available),
                route @ RouteCode::Forward(_) => {
                    let Some(out) = forward_target(route, input, ports) else {
                        continue;
                    };
                    if let Some(buffer) = ports.take_input_buffer(input) {
                        ports.post_output_buffer(out, buffer);
                    }
                }
            }
        }
    }

    fn propagate_tags(&mut self, input: usize, tags: Vec<Tag>, ports: &mut PortSet) {
        let route = self.table.route(input);
        let Some(out) = forward_target(route, input, ports) else {
            trace!(
                event = events::SELECTOR_TAGS_DROPPED,
                component = COMPONENT,
                port = input,
                route = fields::format_route_code(route.code()).as_str(),
                count = tags.len(),
                "dropping tags on unrouted input"
            );
            return;
        };
        for tag in tags {
            let moved = tag.translated(ports.consumed(input), ports.produced(out));
            ports.post_output_tag(out, moved);
        }
    }

    fn notify_topology(&mut self, num_inputs: usize, num_outputs: usize, ports: &mut PortSet) {
        self.control.reset(num_inputs);
        self.table = self.control.snapshot();
        for input in 0..num_inputs {
            let mut config = ports.input_config(input);
            config.item_size = self.item_size;
            // Inputs are routed independently, so never wait for all of them.
            config.reserve_items = 0;
            ports.set_input_config(input, config);
        }
        for output in 0..num_outputs {
            let mut config = ports.output_config(output);
            config.item_size = self.item_size;
            ports.set_output_config(output, config);
        }
        debug!(
            event = events::SELECTOR_TOPOLOGY_RESET,
            component = COMPONENT,
            num_inputs,
            num_outputs,
            "routing table reset to all-stall"
        );
    }
}
