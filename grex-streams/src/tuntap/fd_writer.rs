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

use crate::block::Block;
use crate::message::PortMessage;
use crate::observability::{events, fields};
use crate::port::PortSet;
use std::io;
use std::os::fd::{AsRawFd, OwnedFd};
use std::sync::Arc;
use tracing::{debug, trace, warn};

const COMPONENT: &str = "fd_writer";
const DATAGRAM_TO_FD_NAME: &str = "DatagramToFd";

/// Writes each packet message arriving on input 0 to a descriptor.
///
/// One packet per step, one `write` per packet. Failed and short writes are
/// logged and the packet is dropped.
pub struct DatagramToFd {
    fd: Arc<OwnedFd>,
    dev_name: String,
}

impl DatagramToFd {
    pub fn new(fd: Arc<OwnedFd>, dev_name: impl Into<String>) -> Self {
        Self {
            fd,
            dev_name: dev_name.into(),
        }
    }

    fn write_payload(&self, payload: &[u8]) {
        // SAFETY: the pointer and length describe `payload`, which outlives the call.
        let rc = unsafe {
            libc::write(
                self.fd.as_raw_fd(),
                payload.as_ptr().cast::<libc::c_void>(),
                payload.len(),
            )
        };
        if rc <= 0 {
            let err = io::Error::last_os_error();
            warn!(
                event = events::FD_WRITE_FAILED,
                component = COMPONENT,
                dev_name = self.dev_name.as_str(),
                result = rc,
                len = payload.len(),
                err = %err,
                "write to descriptor failed; packet dropped"
            );
            return;
        }
        let written = rc as usize;
        if written < payload.len() {
            warn!(
                event = events::FD_WRITE_SHORT,
                component = COMPONENT,
                dev_name = self.dev_name.as_str(),
                result = written,
                len = payload.len(),
                "short write to descriptor"
            );
            return;
        }
        debug!(
            event = events::FD_WRITE_OK,
            component = COMPONENT,
            dev_name = self.dev_name.as_str(),
            len = written,
            payload = fields::format_payload_preview(payload).as_str(),
            "packet written"
        );
    }
}

impl Block for DatagramToFd {
    fn name(&self) -> &str {
        DATAGRAM_TO_FD_NAME
    }

    fn work(&mut self, ports: &mut PortSet) {
        match ports.pop_input_msg(0) {
            None => {}
            Some(PortMessage::Packet(packet)) => self.write_payload(packet.payload()),
            Some(other) => trace!(
                event = events::MESSAGE_KIND_DISCARDED,
                component = COMPONENT,
                dev_name = self.dev_name.as_str(),
                kind = other.kind(),
                "discarding non-packet message"
            ),
        }
    }
}
