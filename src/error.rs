use axum::extract::ws::close_code;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixelwarError {
    #[error("room is full")]
    RoomFull,

    #[error("game has ended")]
    GameEnded,

    #[error("game is not running")]
    GameNotRunning,

    #[error("invalid coordinates")]
    InvalidCoordinates,

    #[error("invalid message format")]
    InvalidMessage,

    #[error("session is not registered")]
    UnknownSession,

    #[error("invalid room name: {0}")]
    InvalidRoomName(String),

    #[error("room is unavailable")]
    RoomUnavailable,

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, PixelwarError>;

impl PixelwarError {
    /// Close code sent when an admission is rejected
    pub fn close_code(&self) -> u16 {
        match self {
            PixelwarError::RoomFull => close_code::POLICY,
            PixelwarError::GameEnded => close_code::NORMAL,
            _ => close_code::ERROR,
        }
    }
}

impl IntoResponse for PixelwarError {
    fn into_response(self) -> Response {
        let status = match &self {
            PixelwarError::InvalidRoomName(_) => StatusCode::BAD_REQUEST,
            PixelwarError::RoomUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_close_codes() {
        assert_eq!(PixelwarError::RoomFull.close_code(), 1008);
        assert_eq!(PixelwarError::GameEnded.close_code(), 1000);
        assert_eq!(PixelwarError::RoomUnavailable.close_code(), 1011);
    }

    #[test]
    fn test_client_facing_messages() {
        assert_eq!(PixelwarError::InvalidMessage.to_string(), "invalid message format");
        assert_eq!(PixelwarError::GameNotRunning.to_string(), "game is not running");
    }
}
