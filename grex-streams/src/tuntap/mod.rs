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

//! Duplex packet bridge over a TAP interface.
//!
//! [`TunTap`] owns one descriptor and two adapter blocks around it:
//!
//! - inbound port → [`DatagramToFd`] → descriptor
//! - descriptor → [`FdToDatagram`] → outbound port
//!
//! The descriptor is shared by `Arc`, so it is closed exactly once, after the
//! bridge and both adapter nodes are gone.

pub mod device;
mod fd_reader;
mod fd_writer;

pub use fd_reader::{FdToDatagram, MTU, POLL_TIMEOUT_MS};
pub use fd_writer::DatagramToFd;

use crate::block::{BlockNode, HierBlock};
use crate::error::BridgeError;
use crate::observability::events;
use crate::port::{port_channel, PortReceiver, PortSender, PortSet};
use std::os::fd::OwnedFd;
use std::sync::Arc;
use tracing::{debug, info, warn};

const COMPONENT: &str = "tuntap";
const TUNTAP_NAME: &str = "TunTap";

pub struct TunTap {
    dev_name: String,
    fd: Arc<OwnedFd>,
    inbound: PortSender,
    outbound: Option<PortReceiver>,
    nodes: Vec<BlockNode>,
}

impl TunTap {
    /// Allocates a TAP interface named after `dev_name` and builds the bridge on it.
    pub fn open(dev_name: &str) -> Result<Self, BridgeError> {
        let (fd, assigned) = device::allocate(dev_name).map_err(|err| {
            warn!(
                event = events::TUNTAP_ALLOCATE_FAILED,
                component = COMPONENT,
                dev_name,
                err = %err,
                "failed to allocate virtual ethernet interface"
            );
            err
        })?;
        let bridge = Self::with_device(fd, assigned);
        info!(
            event = events::TUNTAP_ALLOCATED,
            component = COMPONENT,
            dev_name = bridge.dev_name(),
            "Allocated virtual ethernet interface {0}; assign it an address, e.g. `sudo ifconfig {0} 192.168.200.1`",
            bridge.dev_name()
        );
        Ok(bridge)
    }

    /// Builds the bridge around a descriptor that is already open.
    pub fn with_device(fd: OwnedFd, dev_name: impl Into<String>) -> Self {
        let dev_name = dev_name.into();
        let fd = Arc::new(fd);

        let (inbound, writer_rx) = port_channel();
        let mut writer_ports = PortSet::new(1, 0);
        writer_ports.connect_input(0, writer_rx);
        let writer = BlockNode::new(
            Box::new(DatagramToFd::new(Arc::clone(&fd), dev_name.clone())),
            writer_ports,
        );

        let (reader_tx, outbound) = port_channel();
        let mut reader_ports = PortSet::new(0, 1);
        reader_ports.connect_output(0, reader_tx);
        let reader = BlockNode::new(
            Box::new(FdToDatagram::new(Arc::clone(&fd), dev_name.clone())),
            reader_ports,
        );

        Self {
            dev_name,
            fd,
            inbound,
            outbound: Some(outbound),
            nodes: vec![writer, reader],
        }
    }

    /// Kernel-assigned interface name.
    pub fn dev_name(&self) -> &str {
        &self.dev_name
    }

    /// Sender for packets to write to the interface.
    pub fn inbound(&self) -> PortSender {
        self.inbound.clone()
    }

    /// Receiver of packets read from the interface. Returns `None` once taken.
    pub fn take_outbound(&mut self) -> Option<PortReceiver> {
        self.outbound.take()
    }
}

impl HierBlock for TunTap {
    fn name(&self) -> &str {
        TUNTAP_NAME
    }

    fn take_nodes(&mut self) -> Vec<BlockNode> {
        std::mem::take(&mut self.nodes)
    }
}

impl Drop for TunTap {
    fn drop(&mut self) {
        debug!(
            event = events::TUNTAP_CLOSED,
            component = COMPONENT,
            dev_name = self.dev_name.as_str(),
            other_holders = Arc::strong_count(&self.fd) - 1,
            "bridge dropped"
        );
    }
}
