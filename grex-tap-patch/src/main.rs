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

//! Patches two TAP interfaces together: every frame read from one is written
//! to the other.

mod config;
mod relay;

use crate::config::Config;
use crate::relay::relay_node;
use clap::Parser;
use grex_streams::runtime::{spawn_block_loop, spawn_hier_block, BlockLoopHandle};
use grex_streams::{RuntimeError, TunTap};
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command()]
struct TapPatchArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    info!("Started grex-tap-patch");

    let args = TapPatchArgs::parse();
    let config = Config::from_file(&args.config)?;
    let idle_wait = config.runtime.idle_wait();

    let mut left = TunTap::open(&config.left.dev_name)?;
    let mut right = TunTap::open(&config.right.dev_name)?;
    let left_to_right = left
        .take_outbound()
        .ok_or("left bridge outbound already taken")?;
    let right_to_left = right
        .take_outbound()
        .ok_or("right bridge outbound already taken")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let mut handles = spawn_hier_block(&mut left, Arc::clone(&shutdown), idle_wait)?;
    handles.extend(spawn_hier_block(&mut right, Arc::clone(&shutdown), idle_wait)?);
    handles.push(spawn_block_loop(
        relay_node("RelayLeftRight", left_to_right, right.inbound()),
        Arc::clone(&shutdown),
        idle_wait,
    )?);
    handles.push(spawn_block_loop(
        relay_node("RelayRightLeft", right_to_left, left.inbound()),
        Arc::clone(&shutdown),
        idle_wait,
    )?);

    info!(
        left = left.dev_name(),
        right = right.dev_name(),
        "patching interfaces; press Ctrl-C to stop"
    );
    tokio::signal::ctrl_c().await?;

    info!("Shutting down grex-tap-patch");
    shutdown.store(true, Ordering::Release);
    let joined = tokio::task::spawn_blocking(move || join_all(handles)).await?;
    joined?;
    Ok(())
}

fn join_all(handles: Vec<BlockLoopHandle>) -> Result<(), RuntimeError> {
    let mut first_err = None;
    for handle in handles {
        if let Err(err) = handle.join() {
            warn!(err = %err, "block thread did not stop cleanly");
            if first_err.is_none() {
                first_err = Some(err);
            }
        }
    }
    first_err.map_or(Ok(()), Err)
}
