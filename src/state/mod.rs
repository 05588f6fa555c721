// Storage backends

pub mod memory_store;
