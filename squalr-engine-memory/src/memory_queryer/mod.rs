pub mod memory_protection_enum;
pub mod memory_queryer;
pub mod memory_type_enum;
pub mod proc_maps;

pub use memory_queryer::MemoryQueryer;
