pub mod persister;
pub mod snapshot;
pub mod store;

pub use persister::Persister;
pub use snapshot::{RoomSnapshot, SNAPSHOT_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, RoomStore};
