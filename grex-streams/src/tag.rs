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

//! Position-addressed stream metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata attached to an item stream at an absolute item offset.
///
/// The offset counts items from the start of the stream that carries the tag.
/// Once a tag is posted downstream it is not mutated again; blocks that move a
/// tag between streams post a re-anchored copy instead (see [`Tag::translated`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub offset: u64,
    pub key: String,
    pub value: Value,
}

impl Tag {
    pub fn new(offset: u64, key: impl Into<String>, value: Value) -> Self {
        Self {
            offset,
            key: key.into(),
            value,
        }
    }

    /// Re-anchors this tag from an input stream onto an output stream.
    ///
    /// `consumed` is the number of items already consumed on the input the tag
    /// arrived on, `produced` the number of items already produced on the output
    /// it is forwarded to. The result is `offset - consumed + produced`, computed
    /// in wrapping arithmetic so the exact value is kept whenever it is
    /// representable, whatever order the terms are applied in.
    pub fn translated(&self, consumed: u64, produced: u64) -> Self {
        Self {
            offset: self.offset.wrapping_sub(consumed).wrapping_add(produced),
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}
