use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::GameConfig;
use crate::error::{PixelwarError, Result};
use crate::room::coordinator::{self, RoomHandle, WeakRoomHandle};
use crate::storage::{KeyValueStore, RoomStore};

const MAX_ROOM_NAME_LEN: usize = 64;

/// Room names double as storage scopes, so keep them path-safe
pub fn is_valid_room_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_ROOM_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A room the directory knows about. Only the actor's handles keep it
/// alive; the directory holds a weak reference and the actor's task.
struct RoomSlot {
    room: WeakRoomHandle,
    task: Option<JoinHandle<()>>,
}

impl RoomSlot {
    fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

/// Resolves room names to running coordinators, starting one on first lookup
/// and again after the previous one has shut down
pub struct RoomDirectory {
    rooms: DashMap<String, RoomSlot>,
    rules: GameConfig,
    storage: Arc<dyn KeyValueStore>,
}

impl RoomDirectory {
    pub fn new(rules: GameConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            rooms: DashMap::new(),
            rules,
            storage,
        }
    }

    pub fn lookup(&self, name: &str) -> Result<RoomHandle> {
        if !is_valid_room_name(name) {
            return Err(PixelwarError::InvalidRoomName(name.to_string()));
        }

        if let Some(handle) = self.rooms.get(name).and_then(|slot| slot.room.upgrade()) {
            return Ok(handle);
        }

        // Forget rooms whose actors have fully stopped
        self.rooms.retain(|_, slot| !slot.is_finished());

        let (handle, started) = match self.rooms.entry(name.to_string()) {
            Entry::Occupied(mut entry) => match entry.get().room.upgrade() {
                Some(handle) => (handle, false),
                None => {
                    let predecessor = entry.get_mut().task.take();
                    let (handle, slot) = self.start_room(name, predecessor);
                    entry.insert(slot);
                    (handle, true)
                }
            },
            Entry::Vacant(entry) => {
                let (handle, slot) = self.start_room(name, None);
                entry.insert(slot);
                (handle, true)
            }
        };

        if started {
            info!(
                "Started coordinator for room {} ({} rooms open)",
                name,
                self.room_count()
            );
        }
        Ok(handle)
    }

    pub fn default_room(&self) -> Result<RoomHandle> {
        self.lookup(&self.rules.default_room)
    }

    /// Rooms with a live or still stopping coordinator
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn start_room(
        &self,
        name: &str,
        predecessor: Option<JoinHandle<()>>,
    ) -> (RoomHandle, RoomSlot) {
        let store = RoomStore::new(Arc::clone(&self.storage), name);
        let (handle, task) = coordinator::spawn(name, &self.rules, store, predecessor);
        let slot = RoomSlot {
            room: handle.downgrade(),
            task: Some(task),
        };
        (handle, slot)
    }
}
