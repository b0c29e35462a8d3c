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
use crate::message::PacketMsg;
use crate::observability::{events, fields};
use crate::port::PortSet;
use std::io;
use std::os::fd::{AsRawFd, OwnedFd};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const COMPONENT: &str = "fd_reader";
const FD_TO_DATAGRAM_NAME: &str = "FdToDatagram";

/// Largest packet read in one step, in bytes.
pub const MTU: usize = 4096;

/// Readiness wait per step.
pub const POLL_TIMEOUT_MS: libc::c_int = 100;

/// Polls a descriptor and posts every read as a packet message on output 0.
pub struct FdToDatagram {
    fd: Arc<OwnedFd>,
    dev_name: String,
}

impl FdToDatagram {
    pub fn new(fd: Arc<OwnedFd>, dev_name: impl Into<String>) -> Self {
        Self {
            fd,
            dev_name: dev_name.into(),
        }
    }

    fn wait_readable(&self) -> bool {
        let mut pfd = libc::pollfd {
            fd: self.fd.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: `pfd` is a single valid pollfd for the duration of the call.
        let rc = unsafe { libc::poll(&mut pfd, 1, POLL_TIMEOUT_MS) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                warn!(
                    event = events::FD_POLL_FAILED,
                    component = COMPONENT,
                    dev_name = self.dev_name.as_str(),
                    err = %err,
                    "poll on descriptor failed"
                );
                self.back_off();
            }
            return false;
        }
        if rc == 0 {
            return false;
        }
        if pfd.revents & libc::POLLIN != 0 {
            return true;
        }
        debug!(
            event = events::FD_POLL_HANGUP,
            component = COMPONENT,
            dev_name = self.dev_name.as_str(),
            revents = pfd.revents,
            "descriptor reported an error condition"
        );
        self.back_off();
        false
    }

    // Error conditions stay raised, so pace retries at the poll interval.
    fn back_off(&self) {
        thread::sleep(Duration::from_millis(POLL_TIMEOUT_MS as u64));
    }
}

impl Block for FdToDatagram {
    fn name(&self) -> &str {
        FD_TO_DATAGRAM_NAME
    }

    fn work(&mut self, ports: &mut PortSet) {
        if !self.wait_readable() {
            return;
        }

        let mut buffer = ports.get_output_buffer(0);
        let bytes = buffer.as_bytes_mut();
        // SAFETY: the pointer and length describe `bytes`, which is exclusively borrowed.
        let rc = unsafe {
            libc::read(
                self.fd.as_raw_fd(),
                bytes.as_mut_ptr().cast::<libc::c_void>(),
                bytes.len(),
            )
        };
        if rc <= 0 {
            let err = io::Error::last_os_error();
            warn!(
                event = events::FD_READ_FAILED,
                component = COMPONENT,
                dev_name = self.dev_name.as_str(),
                result = rc,
                err = %err,
                "read from descriptor failed"
            );
            self.back_off();
            return;
        }

        buffer.truncate_bytes(rc as usize);
        debug!(
            event = events::FD_READ_OK,
            component = COMPONENT,
            dev_name = self.dev_name.as_str(),
            len = buffer.len_bytes(),
            payload = fields::format_payload_preview(buffer.as_bytes()).as_str(),
            "packet read"
        );
        ports.post_output_msg(0, PacketMsg::new(buffer));
    }

    fn notify_topology(&mut self, _num_inputs: usize, num_outputs: usize, ports: &mut PortSet) {
        for output in 0..num_outputs {
            let mut config = ports.output_config(output);
            config.item_size = 1;
            config.reserve_items = MTU;
            ports.set_output_config(output, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FdToDatagram, MTU};
    use crate::block::BlockNode;
    use crate::message::PortMessage;
    use crate::port::{port_channel, PortItem, PortReceiver, PortSet};
    use std::os::fd::OwnedFd;
    use std::os::unix::net::UnixDatagram;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn reader_node(sock: UnixDatagram) -> (BlockNode, PortReceiver) {
        let (tx, rx) = port_channel();
        let mut ports = PortSet::new(0, 1);
        ports.connect_output(0, tx);
        let reader = FdToDatagram::new(Arc::new(OwnedFd::from(sock)), "test0");
        (BlockNode::new(Box::new(reader), ports), rx)
    }

    fn packet_bytes(item: PortItem) -> Vec<u8> {
        match item {
            PortItem::Message(PortMessage::Packet(packet)) => packet.payload().to_vec(),
            other => panic!("expected packet message, got {other:?}"),
        }
    }

    #[test]
    fn output_reserve_is_one_mtu() {
        let (ours, _peer) = UnixDatagram::pair().expect("socket pair");
        let (node, _rx) = reader_node(ours);

        assert_eq!(node.ports().output_config(0).reserve_items, MTU);
    }

    #[test]
    fn each_read_becomes_one_packet() {
        let (ours, peer) = UnixDatagram::pair().expect("socket pair");
        let (mut node, rx) = reader_node(ours);

        peer.send(&[0xde, 0xad]).expect("send first");
        peer.send(&[7; 1400]).expect("send second");
        assert!(node.step());
        assert!(node.step());

        assert_eq!(packet_bytes(rx.try_recv().expect("first")), vec![0xde, 0xad]);
        assert_eq!(packet_bytes(rx.try_recv().expect("second")).len(), 1400);
    }

    #[test]
    fn idle_descriptor_times_out_without_packets() {
        let (ours, _peer) = UnixDatagram::pair().expect("socket pair");
        let (mut node, rx) = reader_node(ours);

        let start = Instant::now();
        assert!(!node.step());
        let elapsed = start.elapsed();

        assert!(rx.try_recv().is_none());
        assert!(elapsed >= Duration::from_millis(90));
        assert!(elapsed < Duration::from_millis(1000));
    }
}
