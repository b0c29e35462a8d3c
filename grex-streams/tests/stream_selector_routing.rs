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

mod support;

use grex_streams::Tag;
use integration_test_utils::{bytes_buffer, collect_bytes, collect_tags};
use proptest::prelude::*;
use serde_json::json;
use support::{selector_harness, step_until_idle};

#[test]
fn forwarded_input_arrives_in_order() {
    let mut harness = selector_harness(1, 2);
    harness.control.configure(&[1]);

    for chunk in [&[1u8, 2][..], &[3], &[4, 5, 6]] {
        harness.inputs[0].send_buffer(bytes_buffer(chunk));
    }
    step_until_idle(&mut harness.node);

    assert_eq!(collect_bytes(&harness.outputs[1]), vec![1, 2, 3, 4, 5, 6]);
    assert!(collect_bytes(&harness.outputs[0]).is_empty());
    assert_eq!(harness.node.ports().consumed(0), 6);
    assert_eq!(harness.node.ports().produced(1), 6);
}

#[test]
fn stall_is_idempotent_across_many_steps() {
    let mut harness = selector_harness(2, 1);
    harness.control.configure(&[-1, -1]);
    harness.inputs[0].send_buffer(bytes_buffer(&[1, 2, 3]));
    harness.inputs[1].send_buffer(bytes_buffer(&[4]));

    for _ in 0..50 {
        harness.node.step();
    }

    assert_eq!(harness.node.ports().consumed(0), 0);
    assert_eq!(harness.node.ports().consumed(1), 0);
    assert_eq!(harness.node.ports().produced(0), 0);
    assert!(harness.outputs[0].drain().is_empty());
}

#[test]
fn rerouting_mid_stream_moves_remaining_items() {
    let mut harness = selector_harness(1, 2);
    harness.control.configure(&[0]);
    harness.inputs[0].send_buffer(bytes_buffer(&[1, 2]));
    step_until_idle(&mut harness.node);

    harness.control.configure(&[1]);
    harness.inputs[0].send_buffer(bytes_buffer(&[3, 4]));
    step_until_idle(&mut harness.node);

    assert_eq!(collect_bytes(&harness.outputs[0]), vec![1, 2]);
    assert_eq!(collect_bytes(&harness.outputs[1]), vec![3, 4]);
}

#[test]
fn tags_follow_their_input_to_the_selected_output() {
    let mut harness = selector_harness(2, 2);
    harness.control.configure(&[1, 1]);

    // Output 1 already carries 5 items from input 1.
    harness.inputs[1].send_buffer(bytes_buffer(&[0; 5]));
    step_until_idle(&mut harness.node);
    collect_bytes(&harness.outputs[1]);

    harness.inputs[0].send_buffer(bytes_buffer(&[1; 3]));
    step_until_idle(&mut harness.node);
    collect_bytes(&harness.outputs[1]);

    harness.inputs[0].send_tag(Tag::new(3, "frame", json!({"seq": 1})));
    harness.inputs[0].send_buffer(bytes_buffer(&[2; 2]));
    step_until_idle(&mut harness.node);

    let tags = collect_tags(&harness.outputs[1]);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].offset, 3 - 3 + 8);
    assert_eq!(tags[0].value, json!({"seq": 1}));
    assert!(harness.outputs[0].drain().is_empty());
}

#[test]
fn sink_and_stall_never_emit_tags() {
    let mut harness = selector_harness(2, 1);
    harness.control.configure(&[-2, -1]);

    for input in 0..2 {
        harness.inputs[input].send_buffer(bytes_buffer(&[9; 4]));
        harness.inputs[input].send_tag(Tag::new(1, "k", json!(input)));
    }
    step_until_idle(&mut harness.node);

    assert!(harness.outputs[0].drain().is_empty());
    assert_eq!(harness.node.ports().consumed(0), 4);
    assert_eq!(harness.node.ports().consumed(1), 0);
}

fn route_code() -> impl Strategy<Value = i32> {
    prop_oneof![Just(-2), Just(-1), 0i32..3]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn routed_items_match_configuration(
        routes in proptest::collection::vec(route_code(), 1..4),
        chunks in proptest::collection::vec(
            proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..16), 0..4),
            4,
        ),
    ) {
        let num_inputs = routes.len();
        let mut harness = selector_harness(num_inputs, 3);
        harness.control.configure(&routes);

        let mut expected_per_output = vec![0u64; 3];
        for (input, &route) in routes.iter().enumerate() {
            let sent: u64 = chunks[input].iter().map(|chunk| chunk.len() as u64).sum();
            for chunk in &chunks[input] {
                harness.inputs[input].send_buffer(bytes_buffer(chunk));
            }
            if route >= 0 {
                expected_per_output[route as usize] += sent;
            }
        }
        step_until_idle(&mut harness.node);

        for (input, &route) in routes.iter().enumerate() {
            let sent: u64 = chunks[input].iter().map(|chunk| chunk.len() as u64).sum();
            let consumed = harness.node.ports().consumed(input);
            if route == -1 {
                prop_assert_eq!(consumed, 0);
            } else {
                prop_assert_eq!(consumed, sent);
            }
        }
        for (output, &expected) in expected_per_output.iter().enumerate() {
            prop_assert_eq!(harness.node.ports().produced(output), expected);
            prop_assert_eq!(collect_bytes(&harness.outputs[output]).len() as u64, expected);
        }

        // An output fed by a single input sees that input's bytes in order.
        for output in 0..3 {
            let feeders: Vec<usize> = routes
                .iter()
                .enumerate()
                .filter(|&(_, &route)| route == output as i32)
                .map(|(input, _)| input)
                .collect();
            if let &[input] = feeders.as_slice() {
                let mut replay = selector_harness(1, 1);
                replay.control.configure(&[0]);
                for chunk in &chunks[input] {
                    replay.inputs[0].send_buffer(bytes_buffer(chunk));
                }
                step_until_idle(&mut replay.node);
                prop_assert_eq!(
                    collect_bytes(&replay.outputs[0]),
                    chunks[input].concat()
                );
            }
        }
    }

    #[test]
    fn tag_offsets_are_reanchored_exactly(
        consumed_before in 0usize..64,
        produced_before in 0usize..64,
        tag_offset in 0u64..256,
    ) {
        let mut harness = selector_harness(2, 1);
        harness.control.configure(&[0, 0]);

        if produced_before > 0 {
            harness.inputs[1].send_buffer(bytes_buffer(&vec![0; produced_before]));
        }
        if consumed_before > 0 {
            harness.inputs[0].send_buffer(bytes_buffer(&vec![1; consumed_before]));
        }
        step_until_idle(&mut harness.node);
        collect_bytes(&harness.outputs[0]);

        let consumed = consumed_before as u64;
        let produced = (consumed_before + produced_before) as u64;
        harness.inputs[0].send_tag(Tag::new(tag_offset, "t", json!(null)));
        step_until_idle(&mut harness.node);

        let tags = collect_tags(&harness.outputs[0]);
        prop_assert_eq!(tags.len(), 1);
        prop_assert_eq!(tags[0].offset, tag_offset + produced - consumed);
    }
}
