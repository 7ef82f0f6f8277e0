mod schedule;
mod task_core;
mod tasks;

pub use schedule::next_run_after;
pub use task_core::{status::TaskStatus, traits::Executable};
pub use tasks::balance_snapshot::BalanceSnapshotTask;
