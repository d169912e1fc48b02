pub mod bounded;
pub mod memory;

pub use bounded::LruBackend;
pub use memory::MemoryBackend;
