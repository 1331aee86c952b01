//! Shared building blocks for the controller: task lifecycles and view epochs.

mod epoch;
mod task;

pub use epoch::{Epoch, ViewEpoch};
pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskStarted, TaskState, Tasks};
