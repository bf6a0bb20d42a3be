pub mod local_cache;
pub mod remote_store;

pub use local_cache::{JsonFileCache, MemoryCache, STORAGE_FILE_NAME};
pub use remote_store::HttpRemoteStore;
