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

//! Route codes and the published routing table.

use crate::observability::{events, fields};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "route_table";

pub const STALL_CODE: i32 = -1;
pub const SINK_CODE: i32 = -2;

/// Decoded per-input routing decision.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RouteCode {
    /// Forward buffers and tags to this output index.
    Forward(usize),
    /// Leave items pending.
    #[default]
    Stall,
    /// Consume and discard.
    Sink,
}

impl RouteCode {
    /// Decodes a configured signed code. Codes below -2 decode as [`RouteCode::Stall`].
    pub fn from_code(code: i32) -> Self {
        match code {
            SINK_CODE => RouteCode::Sink,
            STALL_CODE => RouteCode::Stall,
            out if out >= 0 => RouteCode::Forward(out as usize),
            _ => RouteCode::Stall,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            RouteCode::Forward(out) => out as i32,
            RouteCode::Stall => STALL_CODE,
            RouteCode::Sink => SINK_CODE,
        }
    }
}

impl From<i32> for RouteCode {
    fn from(code: i32) -> Self {
        RouteCode::from_code(code)
    }
}

impl From<RouteCode> for i32 {
    fn from(route: RouteCode) -> Self {
        route.code()
    }
}

/// One immutable routing table generation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RouteTable {
    routes: Vec<RouteCode>,
}

impl RouteTable {
    /// All-stall table for `num_inputs` inputs.
    pub fn stalled(num_inputs: usize) -> Self {
        Self {
            routes: vec![RouteCode::Stall; num_inputs],
        }
    }

    pub fn from_codes(codes: &[i32]) -> Self {
        Self {
            routes: codes.iter().copied().map(RouteCode::from_code).collect(),
        }
    }

    /// Route for `input`. Inputs beyond the table stall.
    pub fn route(&self, input: usize) -> RouteCode {
        self.routes.get(input).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn codes(&self) -> Vec<i32> {
        self.routes.iter().map(|route| route.code()).collect()
    }
}

/// Cloneable handle that publishes routing tables to a running selector.
///
/// Each publish swaps in a whole table generation, so a processing step reads
/// either the previous table or the next one and never a partial update.
#[derive(Clone, Debug)]
pub struct RouteControl {
    table: Arc<ArcSwap<RouteTable>>,
}

impl RouteControl {
    pub(crate) fn new(table: RouteTable) -> Self {
        Self {
            table: Arc::new(ArcSwap::from_pointee(table)),
        }
    }

    /// Replaces the routing table with `paths`, one signed code per input.
    ///
    /// Calling it again with the same list leaves the selector unchanged.
    pub fn configure(&self, paths: &[i32]) {
        for (input, &code) in paths.iter().enumerate() {
            if code < SINK_CODE {
                warn!(
                    event = events::SELECTOR_ROUTE_CODE_INVALID,
                    component = COMPONENT,
                    port = input,
                    route = fields::format_route_code(code).as_str(),
                    "unknown route code; input will stall"
                );
            }
        }
        debug!(
            event = events::SELECTOR_CONFIGURE,
            component = COMPONENT,
            paths = ?paths,
            "publishing routing table"
        );
        self.table.store(Arc::new(RouteTable::from_codes(paths)));
    }

    /// The currently published table as signed codes.
    pub fn paths(&self) -> Vec<i32> {
        self.table.load().codes()
    }

    pub(crate) fn snapshot(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    pub(crate) fn reset(&self, num_inputs: usize) {
        self.table.store(Arc::new(RouteTable::stalled(num_inputs)));
    }
}

#[cfg(test)]
mod tests {
    use super::{RouteCode, RouteControl, RouteTable};

    #[test]
    fn route_codes_round_trip_reserved_values() {
        assert_eq!(RouteCode::from(-1), RouteCode::Stall);
        assert_eq!(RouteCode::from(-2), RouteCode::Sink);
        assert_eq!(RouteCode::from(4), RouteCode::Forward(4));
        assert_eq!(i32::from(RouteCode::Forward(4)), 4);
        assert_eq!(i32::from(RouteCode::Sink), -2);
    }

    #[test]
    fn codes_below_sink_decode_as_stall() {
        assert_eq!(RouteCode::from(-3), RouteCode::Stall);
        assert_eq!(RouteCode::from(i32::MIN), RouteCode::Stall);
    }

    #[test]
    fn inputs_beyond_table_stall() {
        let table = RouteTable::from_codes(&[0, -2]);

        assert_eq!(table.route(0), RouteCode::Forward(0));
        assert_eq!(table.route(1), RouteCode::Sink);
        assert_eq!(table.route(2), RouteCode::Stall);
    }

    #[test]
    fn configure_is_idempotent_and_visible_to_clones() {
        let control = RouteControl::new(RouteTable::stalled(3));
        let observer = control.clone();

        assert_eq!(observer.paths(), vec![-1, -1, -1]);

        control.configure(&[2, -2, 0]);
        control.configure(&[2, -2, 0]);

        assert_eq!(observer.paths(), vec![2, -2, 0]);
        assert_eq!(observer.snapshot().route(0), RouteCode::Forward(2));
    }

    #[test]
    fn reset_restores_all_stall() {
        let control = RouteControl::new(RouteTable::stalled(1));
        control.configure(&[0]);

        control.reset(4);

        assert_eq!(control.paths(), vec![-1, -1, -1, -1]);
    }
}
