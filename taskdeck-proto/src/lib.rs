//! Shared data model for `taskdeck`: tasks, collection state and the
//! durable-storage record format.

pub mod codec;
pub mod state;
pub mod task;
