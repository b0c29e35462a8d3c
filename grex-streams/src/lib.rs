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

//! # grex-streams
//!
//! Stream-processing blocks for packet and sample pipelines:
//!
//! - [`StreamSelector`]: forwards, stalls or sinks each input according to a
//!   routing table that can be republished while the block runs, re-anchoring
//!   stream tags onto the selected output.
//! - [`TunTap`]: a duplex bridge between packet messages and a TAP interface
//!   (or any datagram descriptor), built from [`tuntap::DatagramToFd`] and
//!   [`tuntap::FdToDatagram`].
//!
//! Blocks only see their own [`PortSet`]. A [`BlockNode`] pairs a block with
//! its ports and plays one scheduler invocation per [`BlockNode::step`];
//! [`runtime`] drives nodes on dedicated threads.
//!
//! ## Observability
//!
//! Every diagnostic is a `tracing` event with a stable `event` field from
//! [`observability::events`]. Per-step I/O failures are logged and never
//! returned as errors; only construction can fail.
//!
//! ```no_run
//! use grex_streams::runtime::{spawn_hier_block, DEFAULT_IDLE_WAIT};
//! use grex_streams::TunTap;
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//!
//! let mut tap = TunTap::open("tap%d")?;
//! let to_iface = tap.inbound();
//! let from_iface = tap.take_outbound();
//! let shutdown = Arc::new(AtomicBool::new(false));
//! let handles = spawn_hier_block(&mut tap, shutdown, DEFAULT_IDLE_WAIT)?;
//! # drop((to_iface, from_iface, handles));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod block;
pub mod buffer;
pub mod error;
pub mod message;
pub mod observability;
pub mod port;
pub mod registry;
pub mod router;
pub mod runtime;
pub mod tag;
pub mod tuntap;

pub use block::{Block, BlockNode, HierBlock};
pub use buffer::Buffer;
pub use error::{BridgeError, FactoryError, RuntimeError};
pub use message::{PacketMsg, PortMessage};
pub use port::{port_channel, PortItem, PortReceiver, PortSender, PortSet};
pub use registry::{make_element, Element};
pub use router::route_table::{RouteCode, RouteControl, RouteTable};
pub use router::StreamSelector;
pub use tag::Tag;
pub use tuntap::TunTap;
