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

//! Virtual ethernet interface allocation.

use crate::error::BridgeError;
use std::os::fd::OwnedFd;

/// Kernel interface name buffer size, including the trailing NUL.
pub const IFNAMSIZ: usize = 16;

pub(crate) const CLONE_DEVICE_PATH: &str = "/dev/net/tun";

/// Rejects names the kernel would truncate or misread.
pub fn validate_dev_name(dev_name: &str) -> Result<(), BridgeError> {
    if dev_name.len() > IFNAMSIZ - 1 {
        return Err(BridgeError::InvalidName {
            dev_name: dev_name.to_string(),
            reason: "longer than 15 bytes",
        });
    }
    if dev_name.as_bytes().contains(&0) {
        return Err(BridgeError::InvalidName {
            dev_name: dev_name.to_string(),
            reason: "contains NUL",
        });
    }
    Ok(())
}

/// Allocates a TAP interface without packet information headers.
///
/// `dev_name` may be empty or a template such as `tap%d`; the kernel picks the
/// final name, which is returned alongside the open descriptor.
#[cfg(target_os = "linux")]
pub fn allocate(dev_name: &str) -> Result<(OwnedFd, String), BridgeError> {
    use std::fs::OpenOptions;
    use std::io;
    use std::os::fd::AsRawFd;

    const IFF_TAP: libc::c_short = 0x0002;
    const IFF_NO_PI: libc::c_short = 0x1000;
    const TUNSETIFF: libc::c_ulong = 0x4004_54ca;

    /// `struct ifreq` restricted to the name and flags members.
    #[repr(C)]
    struct IfReq {
        ifr_name: [libc::c_char; IFNAMSIZ],
        ifr_flags: libc::c_short,
        _pad: [u8; 22],
    }

    validate_dev_name(dev_name)?;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(CLONE_DEVICE_PATH)
        .map_err(|source| BridgeError::Open {
            path: CLONE_DEVICE_PATH,
            source,
        })?;

    let mut req = IfReq {
        ifr_name: [0; IFNAMSIZ],
        ifr_flags: IFF_TAP | IFF_NO_PI,
        _pad: [0; 22],
    };
    for (slot, byte) in req.ifr_name.iter_mut().zip(dev_name.bytes()) {
        *slot = byte as libc::c_char;
    }

    // SAFETY: `req` is a live, correctly sized ifreq for the duration of the call.
    let rc = unsafe { libc::ioctl(file.as_raw_fd(), TUNSETIFF as _, &mut req as *mut IfReq) };
    if rc < 0 {
        return Err(BridgeError::Ioctl {
            dev_name: dev_name.to_string(),
            source: io::Error::last_os_error(),
        });
    }

    let assigned: Vec<u8> = req
        .ifr_name
        .iter()
        .take_while(|&&ch| ch != 0)
        .map(|&ch| ch as u8)
        .collect();
    Ok((
        OwnedFd::from(file),
        String::from_utf8_lossy(&assigned).into_owned(),
    ))
}

#[cfg(not(target_os = "linux"))]
pub fn allocate(dev_name: &str) -> Result<(OwnedFd, String), BridgeError> {
    validate_dev_name(dev_name)?;
    Err(BridgeError::UnsupportedPlatform)
}

#[cfg(test)]
mod tests {
    use super::{allocate, validate_dev_name};
    use crate::error::BridgeError;

    #[test]
    fn validate_accepts_templates_and_empty_names() {
        assert!(validate_dev_name("").is_ok());
        assert!(validate_dev_name("tap%d").is_ok());
        assert!(validate_dev_name("abcdefghijklmno").is_ok());
    }

    #[test]
    fn validate_rejects_long_and_nul_names() {
        assert!(matches!(
            validate_dev_name("abcdefghijklmnop"),
            Err(BridgeError::InvalidName { .. })
        ));
        assert!(matches!(
            validate_dev_name("tap\0x"),
            Err(BridgeError::InvalidName { .. })
        ));
    }

    #[test]
    fn allocate_rejects_invalid_name_before_opening_device() {
        assert!(matches!(
            allocate("this-name-is-far-too-long"),
            Err(BridgeError::InvalidName { .. })
        ));
    }

    #[cfg(not(target_os = "linux"))]
    #[test]
    fn allocate_is_unsupported_off_linux() {
        assert!(matches!(
            allocate("tap%d"),
            Err(BridgeError::UnsupportedPlatform)
        ));
    }
}
