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

use grex_streams::{BlockNode, PortReceiver, PortSender, RouteControl, StreamSelector};
use integration_test_utils::{connect_ports, init_logging};

pub(crate) struct SelectorHarness {
    pub(crate) node: BlockNode,
    pub(crate) control: RouteControl,
    pub(crate) inputs: Vec<PortSender>,
    pub(crate) outputs: Vec<PortReceiver>,
}

pub(crate) fn selector_harness(num_inputs: usize, num_outputs: usize) -> SelectorHarness {
    init_logging();
    let connected = connect_ports(num_inputs, num_outputs);
    let selector = StreamSelector::new(1);
    let control = selector.control();

    SelectorHarness {
        node: BlockNode::new(Box::new(selector), connected.ports),
        control,
        inputs: connected.inputs,
        outputs: connected.outputs,
    }
}

/// Steps `node` until a step makes no progress.
#[allow(dead_code)]
pub(crate) fn step_until_idle(node: &mut BlockNode) {
    const MAX_STEPS: usize = 10_000;
    for _ in 0..MAX_STEPS {
        if !node.step() {
            return;
        }
    }
    panic!("node still busy after {MAX_STEPS} steps");
}
