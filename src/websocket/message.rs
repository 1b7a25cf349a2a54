use axum::extract::ws::Message;
use serde::Serialize;
use serde_json::Value;

use crate::canvas::{Color, ScoreTable};
use crate::error::PixelwarError;

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    AssignInfo {
        room_id: String,
        player_id: String,
        color: Color,
    },
    /// Full state for a newly admitted session; `time_left` is null until
    /// the clock starts
    GameState {
        canvas_state: Vec<Vec<Option<Color>>>,
        scores: ScoreTable,
        time_left: Option<u32>,
    },
    PixelUpdate {
        x: usize,
        y: usize,
        color: Color,
        scores: ScoreTable,
    },
    TimerUpdate {
        time_left: u32,
    },
    ScoreUpdate {
        scores: ScoreTable,
    },
    GameOver {
        winner_color: Option<Color>,
        scores: ScoreTable,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn error(err: &PixelwarError) -> Self {
        ServerMessage::Error {
            message: err.to_string(),
        }
    }

    /// Serialize message to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_ws_message(&self) -> Message {
        Message::Text(self.to_json())
    }
}

/// Message types sent from client to server
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Coordinates are kept as sent; anything that is not an integer
    /// becomes `None` and fails validation in the room.
    PlacePixel { x: Option<i64>, y: Option<i64> },
}

impl ClientMessage {
    /// Parse a text frame. `Ok(None)` means a well-formed message of a type
    /// the server does not handle.
    pub fn parse(text: &str) -> Result<Option<Self>, PixelwarError> {
        let value: Value = serde_json::from_str(text).map_err(|_| PixelwarError::InvalidMessage)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(PixelwarError::InvalidMessage)?;

        match kind {
            "placePixel" => Ok(Some(ClientMessage::PlacePixel {
                x: value.get("x").and_then(Value::as_i64),
                y: value.get("y").and_then(Value::as_i64),
            })),
            _ => Ok(None),
        }
    }
}
