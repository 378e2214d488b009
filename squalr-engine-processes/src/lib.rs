pub mod process_enumerator;
pub mod process_info;

pub use process_enumerator::ProcessEnumerator;
pub use process_info::ProcessInfo;
