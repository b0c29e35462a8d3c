//! Thread-per-node driver for block nodes.

use crate::block::{BlockNode, HierBlock};
use crate::error::RuntimeError;
use crate::observability::events;
use crate::observability::fields::{self, WorkerContext};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const BLOCK_THREAD_NAME_PREFIX: &str = "grex-";
/// Linux truncates thread names past 15 bytes.
pub const BLOCK_THREAD_NAME_MAX_LEN: usize = 15;
pub const DEFAULT_BLOCK_THREAD_NAME: &str = "grex-block";
/// Upper bound on how long an idle loop waits before re-running the step.
pub const DEFAULT_IDLE_WAIT: Duration = Duration::from_millis(50);

const COMPONENT: &str = "block_loop";

/// Handle to one running block thread.
///
/// Dropping the handle raises the shutdown flag but does not join.
pub struct BlockLoopHandle {
    block: String,
    worker_thread: String,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<BlockNode>>,
}

impl BlockLoopHandle {
    pub fn block(&self) -> &str {
        &self.block
    }

    pub fn worker_thread(&self) -> &str {
        &self.worker_thread
    }

    /// Asks the loop to exit after its current step.
    ///
    /// The flag may be shared with other loops, which stop too.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle
            .as_ref()
            .map(JoinHandle::is_finished)
            .unwrap_or(true)
    }

    /// Stops the loop, waits for it and hands the node back.
    pub fn join(mut self) -> Result<BlockNode, RuntimeError> {
        self.stop();
        let Some(join_handle) = self.join_handle.take() else {
            return Err(RuntimeError::Join {
                block: self.block.clone(),
            });
        };
        join_handle.join().map_err(|_| {
            warn!(
                event = events::RUNTIME_JOIN_FAILED,
                component = COMPONENT,
                block = self.block.as_str(),
                worker_thread = self.worker_thread.as_str(),
                "block thread panicked"
            );
            RuntimeError::Join {
                block: self.block.clone(),
            }
        })
    }
}

impl Drop for BlockLoopHandle {
    fn drop(&mut self) {
        if self.join_handle.is_some() {
            self.stop();
        }
    }
}

/// Spawns a named thread that steps `node` until `shutdown` is raised.
///
/// Between steps that made no progress the loop waits up to `idle_wait` for
/// new input, so a stalled node re-reads its configuration at that rate.
pub fn spawn_block_loop(
    node: BlockNode,
    shutdown: Arc<AtomicBool>,
    idle_wait: Duration,
) -> Result<BlockLoopHandle, RuntimeError> {
    let block = node.name().to_string();
    let worker_thread = build_block_thread_name(&block);
    debug!(
        event = events::RUNTIME_SPAWN_START,
        component = COMPONENT,
        block = block.as_str(),
        worker_thread = worker_thread.as_str(),
        "spawning block thread"
    );

    let loop_shutdown = Arc::clone(&shutdown);
    let spawned = thread::Builder::new()
        .name(worker_thread.clone())
        .spawn(move || run_block_loop(node, loop_shutdown, idle_wait));

    let join_handle = match spawned {
        Ok(join_handle) => join_handle,
        Err(source) => {
            warn!(
                event = events::RUNTIME_SPAWN_FAILED,
                component = COMPONENT,
                block = block.as_str(),
                worker_thread = worker_thread.as_str(),
                err = %source,
                "failed to spawn block thread"
            );
            return Err(RuntimeError::Spawn { block, source });
        }
    };

    info!(
        event = events::RUNTIME_SPAWN_OK,
        component = COMPONENT,
        block = block.as_str(),
        worker_thread = worker_thread.as_str(),
        "block thread started"
    );
    Ok(BlockLoopHandle {
        block,
        worker_thread,
        shutdown,
        join_handle: Some(join_handle),
    })
}

/// Spawns one loop per inner node of `hier_block`.
///
/// If a spawn fails, loops already started are stopped before returning.
pub fn spawn_hier_block(
    hier_block: &mut dyn HierBlock,
    shutdown: Arc<AtomicBool>,
    idle_wait: Duration,
) -> Result<Vec<BlockLoopHandle>, RuntimeError> {
    let mut handles = Vec::new();
    for node in hier_block.take_nodes() {
        match spawn_block_loop(node, Arc::clone(&shutdown), idle_wait) {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                shutdown.store(true, Ordering::Release);
                return Err(err);
            }
        }
    }
    Ok(handles)
}

fn run_block_loop(
    mut node: BlockNode,
    shutdown: Arc<AtomicBool>,
    idle_wait: Duration,
) -> BlockNode {
    let worker_context = WorkerContext::with_current_thread(node.name());

    while !shutdown.load(Ordering::Acquire) {
        if !node.step() {
            node.ports().wait_for_input(idle_wait);
        }
    }

    info!(
        event = events::RUNTIME_LOOP_STOPPED,
        component = COMPONENT,
        block = worker_context.block.as_str(),
        worker_thread = worker_context.worker_thread.as_str(),
        reason = fields::REASON_SHUTDOWN,
        "shutdown requested; block loop stopped"
    );
    node
}

fn build_block_thread_name(block: &str) -> String {
    let suffix_len = BLOCK_THREAD_NAME_MAX_LEN - BLOCK_THREAD_NAME_PREFIX.len();
    let suffix: String = block
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .take(suffix_len)
        .collect();

    if suffix.is_empty() {
        debug!(
            event = events::RUNTIME_THREAD_NAME_FALLBACK,
            component = COMPONENT,
            block,
            reason = fields::REASON_INVALID_THREAD_NAME,
            "block name yields no thread name suffix; using default"
        );
        DEFAULT_BLOCK_THREAD_NAME.to_string()
    } else {
        format!("{BLOCK_THREAD_NAME_PREFIX}{suffix}")
    }
}
