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

//! Block callbacks and the node that drives them.

use crate::port::PortSet;
use crate::tag::Tag;

/// Processing callbacks a scheduler invokes on a block.
///
/// Blocks never call each other; they only see their own [`PortSet`].
pub trait Block: Send {
    fn name(&self) -> &str;

    /// Called first in every step, before tags are delivered and before [`Block::work`].
    fn begin_step(&mut self, _ports: &PortSet) {}

    /// One processing step over whatever the ports currently hold.
    fn work(&mut self, ports: &mut PortSet);

    /// Called once per input port for each batch of newly visible tags,
    /// before the step that can first see them.
    ///
    /// The default drops the tags.
    fn propagate_tags(&mut self, _input: usize, _tags: Vec<Tag>, _ports: &mut PortSet) {}

    /// Called whenever the number of ports changes.
    fn notify_topology(&mut self, _num_inputs: usize, _num_outputs: usize, _ports: &mut PortSet) {}
}

/// A composite that hands its inner blocks to the scheduler.
pub trait HierBlock {
    fn name(&self) -> &str;

    /// Moves the inner nodes out. Later calls return an empty list.
    fn take_nodes(&mut self) -> Vec<BlockNode>;
}

/// A block together with its ports: the unit a scheduler drives.
pub struct BlockNode {
    block: Box<dyn Block>,
    ports: PortSet,
}

impl BlockNode {
    /// Pairs a block with its ports and runs the topology hook once.
    pub fn new(block: Box<dyn Block>, ports: PortSet) -> Self {
        let mut node = Self { block, ports };
        node.notify_topology();
        node
    }

    pub fn name(&self) -> &str {
        self.block.name()
    }

    pub fn ports(&self) -> &PortSet {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut PortSet {
        &mut self.ports
    }

    /// Changes the port counts and re-runs the topology hook.
    pub fn resize(&mut self, num_inputs: usize, num_outputs: usize) {
        self.ports.resize(num_inputs, num_outputs);
        self.notify_topology();
    }

    /// Plays one scheduler invocation.
    ///
    /// Opens the step on the block, pulls queued input, delivers new tags, then
    /// runs the step if every input meets its reserve. Returns `true` when the
    /// ports saw any activity.
    pub fn step(&mut self) -> bool {
        let before = self.ports.activity();
        self.block.begin_step(&self.ports);
        for (input, tags) in self.ports.pull() {
            self.block.propagate_tags(input, tags, &mut self.ports);
        }
        if self.ports.inputs_ready() {
            self.block.work(&mut self.ports);
        }
        self.ports.activity() != before
    }

    fn notify_topology(&mut self) {
        let (num_inputs, num_outputs) = (self.ports.num_inputs(), self.ports.num_outputs());
        self.block
            .notify_topology(num_inputs, num_outputs, &mut self.ports);
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, BlockNode};
    use crate::buffer::Buffer;
    use crate::port::{port_channel, PortItem, PortSet};
    use crate::tag::Tag;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<String>>>;

    /// Copies input 0 to output 0 and records every callback.
    #[derive(Default)]
    struct Passthrough {
        calls: CallLog,
    }

    impl Passthrough {
        fn record(&self, call: String) {
            self.calls.lock().expect("call log lock").push(call);
        }
    }

    impl Block for Passthrough {
        fn name(&self) -> &str {
            "passthrough"
        }

        fn begin_step(&mut self, _ports: &PortSet) {
            self.record("begin".to_string());
        }

        fn work(&mut self, ports: &mut PortSet) {
            self.record("work".to_string());
            if let Some(buffer) = ports.take_input_buffer(0) {
                ports.post_output_buffer(0, buffer);
            }
        }

        fn propagate_tags(&mut self, input: usize, tags: Vec<Tag>, _ports: &mut PortSet) {
            self.record(format!("tags:{input}:{}", tags.len()));
        }

        fn notify_topology(&mut self, num_inputs: usize, num_outputs: usize, _ports: &mut PortSet) {
            self.record(format!("topology:{num_inputs}:{num_outputs}"));
        }
    }

    #[test]
    fn step_delivers_tags_before_work_and_reports_progress() {
        let (in_tx, in_rx) = port_channel();
        let (out_tx, out_rx) = port_channel();
        let mut ports = PortSet::new(1, 1);
        ports.connect_input(0, in_rx);
        ports.connect_output(0, out_tx);
        let block = Passthrough::default();
        let calls = block.calls.clone();
        let mut node = BlockNode::new(Box::new(block), ports);

        assert!(!node.step());

        in_tx.send_buffer(Buffer::from_bytes(1, vec![1, 2, 3]));
        in_tx.send_tag(Tag::new(0, "k", json!(0)));
        assert!(node.step());

        let items = out_rx.drain();
        assert!(matches!(&items[..], [PortItem::Buffer(b)] if b.len_items() == 3));
        assert_eq!(node.ports().consumed(0), 3);
        assert_eq!(
            *calls.lock().expect("call log lock"),
            vec!["topology:1:1", "begin", "begin", "tags:0:1", "work"]
        );
    }

    #[test]
    fn step_skips_work_until_reserve_is_met() {
        let (in_tx, in_rx) = port_channel();
        let mut ports = PortSet::new(1, 0);
        ports.connect_input(0, in_rx);
        let block = Passthrough::default();
        let calls = block.calls.clone();
        let mut node = BlockNode::new(Box::new(block), ports);

        in_tx.send_tag(Tag::new(4, "k", json!(0)));
        assert!(!node.step());
        assert_eq!(node.ports().available(0), 0);
        assert_eq!(
            *calls.lock().expect("call log lock"),
            vec!["topology:1:0", "begin", "tags:0:1"]
        );
    }

    #[test]
    fn resize_reruns_topology_hook() {
        let mut node = BlockNode::new(Box::new(Passthrough::default()), PortSet::new(1, 1));

        node.resize(3, 2);

        assert_eq!(node.ports().num_inputs(), 3);
        assert_eq!(node.ports().num_outputs(), 2);
        assert_eq!(node.name(), "passthrough");
    }
}
