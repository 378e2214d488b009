pub mod engine_facade;
pub mod persisted_session;
pub mod refresh_worker;
pub mod store_edit_guard;

pub use engine_facade::{EngineFacade, ScanResultsSummary};
pub use persisted_session::PersistedSession;
pub use store_edit_guard::StoreEditGuard;
