//! Background Tasks Module
//!
//! Contains background tasks that run while serve mode is up.
//!
//! # Tasks
//! - Cache sweep: removes expired cache entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
