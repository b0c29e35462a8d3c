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

//! Owned item buffers passed between ports.

/// Contiguous run of items.
///
/// A buffer is owned by exactly one port at a time. Handing it from an input
/// port to an output port is a move, so the bytes are never copied on a forward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buffer {
    data: Vec<u8>,
    item_size: usize,
}

impl Buffer {
    /// Wraps raw bytes holding items of `item_size` bytes each.
    ///
    /// A zero `item_size` is treated as one byte per item.
    pub fn from_bytes(item_size: usize, data: Vec<u8>) -> Self {
        Self {
            data,
            item_size: item_size.max(1),
        }
    }

    /// Allocates a zeroed buffer able to hold `items` items.
    pub fn zeroed(item_size: usize, items: usize) -> Self {
        let item_size = item_size.max(1);
        Self {
            data: vec![0; item_size * items],
            item_size,
        }
    }

    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Reinterprets the same bytes as items of `item_size` bytes each.
    pub fn with_item_size(mut self, item_size: usize) -> Self {
        self.item_size = item_size.max(1);
        self
    }

    /// Length in whole items.
    pub fn len_items(&self) -> usize {
        self.data.len() / self.item_size
    }

    pub fn len_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len_items() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Shortens the buffer to its first `len` bytes. Longer lengths are a no-op.
    pub fn truncate_bytes(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Drops the first `items` items, keeping the remainder.
    pub(crate) fn advance_items(&mut self, items: usize) {
        let bytes = (items * self.item_size).min(self.data.len());
        self.data.drain(..bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
