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

use grex_streams::{Block, BlockNode, PortReceiver, PortSender, PortSet};

/// Moves every message from input 0 to output 0 unchanged.
pub(crate) struct MessageRelay {
    name: String,
}

impl Block for MessageRelay {
    fn name(&self) -> &str {
        &self.name
    }

    fn work(&mut self, ports: &mut PortSet) {
        while let Some(message) = ports.pop_input_msg(0) {
            ports.post_output_msg(0, message);
        }
    }
}

/// Builds a node relaying packets read from one bridge into another.
pub(crate) fn relay_node(name: &str, from: PortReceiver, to: PortSender) -> BlockNode {
    let mut ports = PortSet::new(1, 1);
    ports.connect_input(0, from);
    ports.connect_output(0, to);
    BlockNode::new(
        Box::new(MessageRelay {
            name: name.to_string(),
        }),
        ports,
    )
}
