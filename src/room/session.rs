use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Duration, Instant};

use crate::canvas::Color;

/// One live connection in a room. Never persisted.
#[derive(Debug)]
pub struct Session {
    pub player_id: String,
    pub color: Color,
    pub sender: UnboundedSender<Message>,
    pub last_placement: Option<Instant>,
}

impl Session {
    pub fn new(player_id: String, color: Color, sender: UnboundedSender<Message>) -> Self {
        Self {
            player_id,
            color,
            sender,
            last_placement: None,
        }
    }

    /// Send a message to this session
    pub fn send(&self, message: Message) -> bool {
        self.sender.send(message).is_ok()
    }

    /// Whether a placement at `now` falls inside the cooldown window
    pub fn is_cooling_down(&self, now: Instant, cooldown: Duration) -> bool {
        self.last_placement
            .is_some_and(|last| now.saturating_duration_since(last) < cooldown)
    }
}
