//! Block runtime.
//!
//! Runs every [`BlockNode`](crate::BlockNode) on its own named OS thread and
//! stops all of them through one shared shutdown flag.

mod block_loop;

pub use block_loop::{
    spawn_block_loop, spawn_hier_block, BlockLoopHandle, BLOCK_THREAD_NAME_MAX_LEN,
    BLOCK_THREAD_NAME_PREFIX, DEFAULT_BLOCK_THREAD_NAME, DEFAULT_IDLE_WAIT,
};
