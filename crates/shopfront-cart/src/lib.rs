pub mod error;
pub mod storage;
pub mod store;

pub use error::{CartError, StorageError};
pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::CartStore;
