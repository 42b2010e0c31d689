//! Background Tasks Module
//!
//! Contains the periodic sweep task that backs every cache instance.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at a fixed interval

mod cleanup;

pub use cleanup::{spawn_cleanup_task, spawn_local_cleanup_task, CleanupHandle};
