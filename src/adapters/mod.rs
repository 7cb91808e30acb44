// Adapters layer: concrete implementations of the domain ports.

pub mod lunar_table;
pub mod storage;

pub use lunar_table::TableConverter;
pub use storage::LocalStorage;
