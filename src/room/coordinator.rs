//! Per-room actor
//!
//! Every request against a room becomes a [`Command`] on one channel and is
//! applied to the [`Room`] by a single task, in arrival order. Loading the
//! stored snapshot happens inside that task before the first command is
//! handled, so requests that arrive during the load simply wait in the queue.
//! The actor exits once its last [`RoomHandle`] is dropped.

use axum::extract::ws::Message;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::error::{PixelwarError, Result};
use crate::room::clock::TickOutcome;
use crate::room::room::{Admission, Placement, Room};
use crate::room::ticker::Ticker;
use crate::storage::{Persister, RoomSnapshot, RoomStore};
use crate::websocket::message::ServerMessage;

pub enum Command {
    Connect {
        player_id: Option<String>,
        sender: UnboundedSender<Message>,
        reply: oneshot::Sender<Result<Admission>>,
    },
    PlacePixel {
        session_id: Uuid,
        x: Option<i64>,
        y: Option<i64>,
    },
    Disconnect {
        session_id: Uuid,
    },
    Tick {
        generation: u64,
    },
    Inspect {
        reply: oneshot::Sender<RoomSnapshot>,
    },
}

/// Cheap, cloneable address of a running room
#[derive(Clone)]
pub struct RoomHandle {
    room_id: Arc<str>,
    commands: UnboundedSender<Command>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub async fn connect(
        &self,
        player_id: Option<String>,
        sender: UnboundedSender<Message>,
    ) -> Result<Admission> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Connect {
            player_id,
            sender,
            reply,
        })?;
        response.await.map_err(|_| PixelwarError::RoomUnavailable)?
    }

    pub fn place_pixel(&self, session_id: Uuid, x: Option<i64>, y: Option<i64>) -> Result<()> {
        self.send(Command::PlacePixel { session_id, x, y })
    }

    pub fn disconnect(&self, session_id: Uuid) -> Result<()> {
        self.send(Command::Disconnect { session_id })
    }

    /// Current state, after every command queued before this one
    pub async fn snapshot(&self) -> Result<RoomSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Inspect { reply })?;
        response.await.map_err(|_| PixelwarError::RoomUnavailable)
    }

    /// A reference that does not keep the room running
    pub fn downgrade(&self) -> WeakRoomHandle {
        WeakRoomHandle {
            room_id: Arc::clone(&self.room_id),
            commands: self.commands.downgrade(),
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PixelwarError::RoomUnavailable)
    }
}

#[derive(Clone)]
pub struct WeakRoomHandle {
    room_id: Arc<str>,
    commands: WeakUnboundedSender<Command>,
}

impl WeakRoomHandle {
    /// `None` once every strong handle is gone and the room has shut down
    pub fn upgrade(&self) -> Option<RoomHandle> {
        Some(RoomHandle {
            room_id: Arc::clone(&self.room_id),
            commands: self.commands.upgrade()?,
        })
    }
}

/// Start the actor for one room. The actor stops once every [`RoomHandle`]
/// is dropped. A `predecessor` is the task of an earlier actor for the same
/// room; loading waits for it so its last writes are seen.
pub fn spawn(
    room_id: &str,
    rules: &GameConfig,
    store: RoomStore,
    predecessor: Option<JoinHandle<()>>,
) -> (RoomHandle, JoinHandle<()>) {
    let (commands, rx) = mpsc::unbounded_channel();

    let coordinator = Coordinator {
        room: Room::new(room_id, rules),
        ticker: Ticker::new(),
        persister: Persister::spawn(store.clone()),
        store,
        commands: commands.downgrade(),
        predecessor,
        loaded: false,
    };
    let task = tokio::spawn(coordinator.run(rx));

    let handle = RoomHandle {
        room_id: Arc::from(room_id),
        commands,
    };
    (handle, task)
}

struct Coordinator {
    room: Room,
    ticker: Ticker,
    persister: Persister,
    store: RoomStore,
    commands: WeakUnboundedSender<Command>,
    predecessor: Option<JoinHandle<()>>,
    loaded: bool,
}

impl Coordinator {
    async fn run(mut self, mut rx: UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            if !self.loaded {
                self.activate().await;
            }
            if matches!(command, Command::Connect { .. }) && self.room.clock().is_drained() {
                self.wake();
            }

            self.handle(command).await;

            if self.room.is_abandoned() {
                self.pause().await;
            }
        }

        self.ticker.stop();
        debug!("Coordinator for room {} stopped", self.room.room_id());
    }

    /// Load the stored snapshot. A counting clock comes back drained, since
    /// nobody is connected yet; the first admission resumes it.
    async fn activate(&mut self) {
        if let Some(predecessor) = self.predecessor.take() {
            if let Err(e) = predecessor.await {
                warn!(
                    "Previous coordinator for room {} failed: {}",
                    self.room.room_id(),
                    e
                );
            }
        }

        match self.store.load_snapshot().await {
            Ok(Some(snapshot)) => match self.room.restore(snapshot) {
                Ok(()) => info!(
                    "Room {} restored ({:?}, {}s left)",
                    self.room.room_id(),
                    self.room.clock().state(),
                    self.room.clock().remaining()
                ),
                Err(e) => error!(
                    "Discarding stored snapshot for room {}: {}",
                    self.room.room_id(),
                    e
                ),
            },
            Ok(None) => debug!("No snapshot for room {}", self.room.room_id()),
            Err(e) => error!(
                "Failed to load snapshot for room {}: {}",
                self.room.room_id(),
                e
            ),
        }

        self.loaded = true;

        if self.room.clock().is_running() {
            if self.room.clock().remaining() == 0 {
                self.end_game().await;
            } else {
                self.room.clock_mut().drain();
            }
        }
    }

    /// Resume a drained clock for an arriving player
    fn wake(&mut self) {
        if self.room.clock_mut().resume() {
            info!(
                "Resuming clock in room {} at {}s",
                self.room.room_id(),
                self.room.clock().remaining()
            );
            self.ticker.start(self.commands.clone());
        }
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Connect {
                player_id,
                sender,
                reply,
            } => {
                let result = self.room.admit(Uuid::new_v4(), player_id, sender);

                match &result {
                    Ok(admission) if admission.started_clock => {
                        self.persister.persist(self.room.snapshot());
                        self.ticker.start(self.commands.clone());
                    }
                    Ok(_) => {}
                    Err(e) => info!("Rejected connection to room {}: {}", self.room.room_id(), e),
                }

                let admitted = result.as_ref().ok().map(|admission| admission.session_id);
                if reply.send(result).is_err() {
                    // The connection went away before it heard back
                    if let Some(session_id) = admitted {
                        self.room.remove_session(&session_id);
                    }
                }
            }
            Command::PlacePixel { session_id, x, y } => {
                match self.room.place_pixel(session_id, x, y, Instant::now()) {
                    Ok(Placement::Applied) => self.persister.persist(self.room.snapshot()),
                    Ok(Placement::Throttled | Placement::Unchanged) => {}
                    Err(PixelwarError::UnknownSession) => {
                        debug!("Placement from unknown session {}", session_id)
                    }
                    Err(e) => {
                        debug!("Rejected placement from {}: {}", session_id, e);
                        self.room.send_to(session_id, &ServerMessage::error(&e));
                    }
                }
            }
            Command::Disconnect { session_id } => {
                self.room.remove_session(&session_id);
            }
            Command::Tick { generation } => {
                if !self.ticker.is_running() || generation != self.ticker.generation() {
                    return;
                }

                match self.room.tick() {
                    TickOutcome::Counted {
                        checkpoint: true, ..
                    } => self.persister.persist(self.room.snapshot()),
                    TickOutcome::Expired => self.end_game().await,
                    _ => {}
                }
            }
            Command::Inspect { reply } => {
                let _ = reply.send(self.room.snapshot());
            }
        }
    }

    /// Stop the clock, announce the result and wait for the final write
    async fn end_game(&mut self) {
        self.ticker.stop();

        if self.room.finish().is_some() {
            if let Err(e) = self.persister.persist_and_wait(self.room.snapshot()).await {
                error!(
                    "Final snapshot for room {} was not saved: {}",
                    self.room.room_id(),
                    e
                );
            }
        }
    }

    /// Nobody is left in a running game: stop counting without ending it
    async fn pause(&mut self) {
        self.ticker.stop();
        self.room.clock_mut().drain();

        info!(
            "Room {} is empty, clock paused at {}s",
            self.room.room_id(),
            self.room.clock().remaining()
        );

        if let Err(e) = self.persister.persist_and_wait(self.room.snapshot()).await {
            error!(
                "Snapshot for paused room {} was not saved: {}",
                self.room.room_id(),
                e
            );
        }
    }
}
