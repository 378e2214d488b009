pub mod locked_write_worker;

pub use locked_write_worker::LockedWriteWorker;
