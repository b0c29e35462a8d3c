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

//! Construction-time failures.
//!
//! Per-step I/O failures are never surfaced as errors; they are logged where
//! they happen.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Failures allocating or wrapping a virtual network interface.
#[derive(Debug)]
pub enum BridgeError {
    /// Requested name is too long for the kernel or contains NUL.
    InvalidName { dev_name: String, reason: &'static str },
    /// The clone device could not be opened.
    Open { path: &'static str, source: io::Error },
    /// The kernel refused the interface request.
    Ioctl { dev_name: String, source: io::Error },
    /// TUN/TAP allocation is only implemented on Linux.
    UnsupportedPlatform,
}

impl Display for BridgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::InvalidName { dev_name, reason } => {
                write!(f, "invalid interface name {dev_name:?}: {reason}")
            }
            BridgeError::Open { path, source } => {
                write!(f, "tun_alloc failed: cannot open {path}: {source}")
            }
            BridgeError::Ioctl { dev_name, source } => {
                write!(f, "tun_alloc failed: TUNSETIFF for {dev_name:?}: {source}")
            }
            BridgeError::UnsupportedPlatform => {
                write!(f, "tun/tap allocation is not implemented on this OS")
            }
        }
    }
}

impl Error for BridgeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BridgeError::Open { source, .. } | BridgeError::Ioctl { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failures building an element from its registration name.
#[derive(Debug)]
pub enum FactoryError {
    UnknownElement(String),
    /// Reserved name whose element is not provided by this crate.
    NotProvided(String),
    InvalidArgs {
        name: String,
        source: serde_json::Error,
    },
    Bridge(BridgeError),
}

impl Display for FactoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FactoryError::UnknownElement(name) => write!(f, "unknown element {name:?}"),
            FactoryError::NotProvided(name) => {
                write!(f, "element {name:?} is registered but not provided")
            }
            FactoryError::InvalidArgs { name, source } => {
                write!(f, "invalid arguments for {name:?}: {source}")
            }
            FactoryError::Bridge(err) => write!(f, "failed to build bridge: {err}"),
        }
    }
}

impl Error for FactoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FactoryError::InvalidArgs { source, .. } => Some(source),
            FactoryError::Bridge(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BridgeError> for FactoryError {
    fn from(err: BridgeError) -> Self {
        FactoryError::Bridge(err)
    }
}

/// Failures starting or stopping a block thread.
#[derive(Debug)]
pub enum RuntimeError {
    Spawn { block: String, source: io::Error },
    /// The block thread panicked.
    Join { block: String },
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::Spawn { block, source } => {
                write!(f, "failed to spawn thread for block {block:?}: {source}")
            }
            RuntimeError::Join { block } => write!(f, "thread for block {block:?} panicked"),
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::Spawn { source, .. } => Some(source),
            RuntimeError::Join { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BridgeError, FactoryError};
    use std::error::Error;
    use std::io;

    #[test]
    fn bridge_error_exposes_io_source() {
        let err = BridgeError::Ioctl {
            dev_name: "tap%d".to_string(),
            source: io::Error::from_raw_os_error(libc::EPERM),
        };

        assert!(err.to_string().starts_with("tun_alloc failed"));
        assert!(err.source().is_some());
    }

    #[test]
    fn factory_error_chains_bridge_error() {
        let err = FactoryError::from(BridgeError::UnsupportedPlatform);

        let source = err.source().expect("bridge source");
        assert_eq!(
            source.to_string(),
            BridgeError::UnsupportedPlatform.to_string()
        );
    }
}
