use axum::extract::ws::Message;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::canvas::{assign_color, Canvas, Color, ScoreTable};
use crate::config::GameConfig;
use crate::error::{PixelwarError, Result};
use crate::room::clock::{ClockState, RoomClock, TickOutcome};
use crate::room::Session;
use crate::storage::RoomSnapshot;
use crate::websocket::message::ServerMessage;

/// A session that was let into the room
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    pub session_id: Uuid,
    pub player_id: String,
    pub color: Color,
    /// The admission brought the clock from Pending to Running
    pub started_clock: bool,
}

/// Result of a placement request that passed lifecycle and bounds checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Applied,
    /// Inside the cooldown window; dropped without a reply
    Throttled,
    /// The cell already had the session's color
    Unchanged,
}

/// Canvas, scores, clock and live sessions of one room. Only the room's
/// coordinator touches this, one command at a time.
pub struct Room {
    room_id: String,
    rules: GameConfig,
    sessions: HashMap<Uuid, Session>,
    canvas: Canvas,
    scores: ScoreTable,
    clock: RoomClock,
}

impl Room {
    pub fn new(room_id: impl Into<String>, rules: &GameConfig) -> Self {
        Self {
            room_id: room_id.into(),
            rules: rules.clone(),
            sessions: HashMap::new(),
            canvas: Canvas::new(rules.canvas_width, rules.canvas_height),
            scores: ScoreTable::new(),
            clock: RoomClock::new(rules.duration_secs, rules.checkpoint_interval_secs),
        }
    }

    /// Replace canvas, scores and clock with a stored snapshot. Live sessions
    /// are kept. Nothing changes if the snapshot is rejected.
    pub fn restore(&mut self, snapshot: RoomSnapshot) -> Result<()> {
        if snapshot.width != self.rules.canvas_width || snapshot.height != self.rules.canvas_height
        {
            return Err(PixelwarError::InvalidSnapshot(format!(
                "canvas is {}x{}, room expects {}x{}",
                snapshot.width, snapshot.height, self.rules.canvas_width, self.rules.canvas_height
            )));
        }

        let clock_state = snapshot.clock_state();
        let canvas = Canvas::from_rows(snapshot.canvas, snapshot.width, snapshot.height)?;

        let claimed = (canvas.area() - canvas.unset_count()) as u64;
        if snapshot.scores.total() != claimed {
            return Err(PixelwarError::InvalidSnapshot(format!(
                "scores add up to {} but {} cells are claimed",
                snapshot.scores.total(),
                claimed
            )));
        }

        let tally = canvas.tally();
        if let Some((color, _)) = tally
            .iter()
            .chain(snapshot.scores.iter())
            .find(|(color, _)| tally.get(color) != snapshot.scores.get(color))
        {
            return Err(PixelwarError::InvalidSnapshot(format!(
                "{} holds {} cells but scores {}",
                color,
                tally.get(color),
                snapshot.scores.get(color)
            )));
        }

        self.canvas = canvas;
        self.scores = snapshot.scores;
        self.clock
            .restore(clock_state, snapshot.remaining, snapshot.drained);
        Ok(())
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            width: self.canvas.width(),
            height: self.canvas.height(),
            canvas: self.canvas.rows(),
            scores: self.scores.clone(),
            started: self.clock.state() != ClockState::Pending,
            over: self.clock.state() == ClockState::Ended,
            remaining: self.clock.remaining(),
            drained: self.clock.is_drained(),
        }
    }

    /// Let a new connection in, or say why not
    pub fn admit(
        &mut self,
        session_id: Uuid,
        requested_player_id: Option<String>,
        sender: UnboundedSender<Message>,
    ) -> Result<Admission> {
        if self.sessions.len() >= self.rules.max_players {
            return Err(PixelwarError::RoomFull);
        }
        if self.clock.state() == ClockState::Ended {
            return Err(PixelwarError::GameEnded);
        }

        let color = assign_color(self.sessions.values().map(|session| &session.color));
        let player_id = requested_player_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.scores.register(&color);
        self.sessions.insert(
            session_id,
            Session::new(player_id.clone(), color.clone(), sender),
        );

        info!(
            "Player {} joined room {} as {}. Total players: {}",
            player_id,
            self.room_id,
            color,
            self.sessions.len()
        );

        self.send_to(
            session_id,
            &ServerMessage::AssignInfo {
                room_id: self.room_id.clone(),
                player_id: player_id.clone(),
                color: color.clone(),
            },
        );
        self.send_to(
            session_id,
            &ServerMessage::GameState {
                canvas_state: self.canvas.rows(),
                scores: self.scores.clone(),
                time_left: self.clock.time_left(),
            },
        );
        self.broadcast_scores();

        let started_clock = self.sessions.len() >= self.rules.min_players && self.start_clock();

        Ok(Admission {
            session_id,
            player_id,
            color,
            started_clock,
        })
    }

    /// Pending → Running; announces the full countdown
    pub fn start_clock(&mut self) -> bool {
        if !self.clock.start() {
            return false;
        }

        info!(
            "Game started in room {} ({}s)",
            self.room_id,
            self.clock.remaining()
        );
        self.broadcast(&ServerMessage::TimerUpdate {
            time_left: self.clock.remaining(),
        });
        true
    }

    pub fn place_pixel(
        &mut self,
        session_id: Uuid,
        x: Option<i64>,
        y: Option<i64>,
        now: Instant,
    ) -> Result<Placement> {
        if !self.clock.is_running() {
            return Err(PixelwarError::GameNotRunning);
        }

        let (x, y) = match (x, y) {
            (Some(x), Some(y)) => self.canvas.locate(x, y),
            _ => None,
        }
        .ok_or(PixelwarError::InvalidCoordinates)?;

        let cooldown = Duration::from_millis(self.rules.cooldown_ms);
        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(PixelwarError::UnknownSession)?;

        if session.is_cooling_down(now, cooldown) {
            debug!("Placement from {} dropped by cooldown", session.player_id);
            return Ok(Placement::Throttled);
        }
        if self.canvas.get(x, y) == Some(&session.color) {
            return Ok(Placement::Unchanged);
        }

        session.last_placement = Some(now);
        let color = session.color.clone();

        let previous = self.canvas.set(x, y, color.clone());
        self.scores.transfer(previous.as_ref(), &color);

        self.broadcast(&ServerMessage::PixelUpdate {
            x,
            y,
            color,
            scores: self.scores.clone(),
        });
        Ok(Placement::Applied)
    }

    /// Advance the clock one second and announce the new value
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.clock.tick();
        match outcome {
            TickOutcome::Counted { remaining, .. } => {
                self.broadcast(&ServerMessage::TimerUpdate {
                    time_left: remaining,
                });
            }
            TickOutcome::Expired => {
                self.broadcast(&ServerMessage::TimerUpdate { time_left: 0 });
            }
            TickOutcome::Idle => {}
        }
        outcome
    }

    /// End the game and announce the winner; `None` if it was already over
    pub fn finish(&mut self) -> Option<Option<Color>> {
        if !self.clock.end() {
            return None;
        }

        let winner = self.scores.winner();
        match &winner {
            Some(color) => info!("Game over in room {}, winner {}", self.room_id, color),
            None => info!("Game over in room {}, draw", self.room_id),
        }

        self.broadcast(&ServerMessage::GameOver {
            winner_color: winner.clone(),
            scores: self.scores.clone(),
        });
        Some(winner)
    }

    /// Drop a session; its score stays on the table
    pub fn remove_session(&mut self, session_id: &Uuid) -> Option<Session> {
        let session = self.sessions.remove(session_id)?;
        info!(
            "Player {} left room {}. Remaining players: {}",
            session.player_id,
            self.room_id,
            self.sessions.len()
        );
        self.broadcast_scores();
        Some(session)
    }

    /// Send to a single session, dropping it if the connection is gone
    pub fn send_to(&mut self, session_id: Uuid, message: &ServerMessage) {
        let delivered = self
            .sessions
            .get(&session_id)
            .is_some_and(|session| session.send(message.to_ws_message()));

        if !delivered && self.sessions.remove(&session_id).is_some() {
            warn!("Dropped session {} after failed delivery", session_id);
        }
    }

    /// Serialize once and deliver to every session. Sessions whose channel is
    /// closed are dropped without interrupting delivery to the rest.
    pub fn broadcast(&mut self, message: &ServerMessage) {
        let text = message.to_json();
        let mut failed_ids = Vec::new();

        for (id, session) in self.sessions.iter() {
            if !session.send(Message::Text(text.clone())) {
                failed_ids.push(*id);
            }
        }

        for id in failed_ids {
            if let Some(session) = self.sessions.remove(&id) {
                warn!(
                    "Dropped player {} from room {} after failed delivery",
                    session.player_id, self.room_id
                );
            }
        }
    }

    fn broadcast_scores(&mut self) {
        self.broadcast(&ServerMessage::ScoreUpdate {
            scores: self.scores.clone(),
        });
    }

    /// Running with nobody left to play
    pub fn is_abandoned(&self) -> bool {
        self.sessions.is_empty() && self.clock.is_running() && !self.clock.is_drained()
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn clock(&self) -> &RoomClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut RoomClock {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PALETTE;
    use rand::Rng;
    use serde_json::Value;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn rules() -> GameConfig {
        GameConfig {
            canvas_width: 10,
            canvas_height: 10,
            ..GameConfig::default()
        }
    }

    fn join(room: &mut Room) -> (Uuid, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        room.admit(id, None, tx).unwrap();
        (id, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<Message>) -> Vec<Value> {
        let mut received = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            if let Message::Text(text) = msg {
                received.push(serde_json::from_str(&text).unwrap());
            }
        }
        received
    }

    fn types(messages: &[Value]) -> Vec<&str> {
        messages
            .iter()
            .map(|msg| msg["type"].as_str().unwrap())
            .collect()
    }

    fn assert_accounting(room: &Room) {
        let unset = room.canvas().unset_count() as u64;
        assert_eq!(room.scores().total() + unset, room.canvas().area() as u64);
    }

    /// Two players in a running game, inboxes emptied
    fn running_room() -> (
        Room,
        (Uuid, UnboundedReceiver<Message>),
        (Uuid, UnboundedReceiver<Message>),
    ) {
        let mut room = Room::new("lobby", &rules());
        let mut first = join(&mut room);
        let mut second = join(&mut room);
        drain(&mut first.1);
        drain(&mut second.1);
        (room, first, second)
    }

    #[test]
    fn test_new_room() {
        let room = Room::new("lobby", &rules());
        assert_eq!(room.session_count(), 0);
        assert_eq!(room.clock().state(), ClockState::Pending);
        assert!(room.scores().is_empty());
        assert_accounting(&room);
    }

    #[test]
    fn test_admission_messages() {
        let mut room = Room::new("lobby", &rules());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let admission = room
            .admit(Uuid::new_v4(), Some("alice".to_string()), tx)
            .unwrap();

        assert_eq!(admission.player_id, "alice");
        assert_eq!(admission.color, Color::new(PALETTE[0]));
        assert!(!admission.started_clock);

        let messages = drain(&mut rx);
        assert_eq!(types(&messages), ["assignInfo", "gameState", "scoreUpdate"]);
        assert_eq!(messages[0]["roomId"], "lobby");
        assert_eq!(messages[0]["color"], PALETTE[0]);
        assert!(messages[1]["timeLeft"].is_null());
        assert_eq!(messages[1]["canvasState"].as_array().unwrap().len(), 10);
        assert_eq!(messages[2]["scores"][PALETTE[0]], 0);
    }

    #[test]
    fn test_blank_player_id_gets_generated() {
        let mut room = Room::new("lobby", &rules());
        let (tx, _rx) = mpsc::unbounded_channel();
        let admission = room.admit(Uuid::new_v4(), Some("  ".to_string()), tx).unwrap();
        assert!(Uuid::parse_str(&admission.player_id).is_ok());
    }

    #[test]
    fn test_second_admission_starts_clock() {
        let mut room = Room::new("lobby", &rules());
        let (_, mut rx1) = join(&mut room);
        drain(&mut rx1);

        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let admission = room.admit(Uuid::new_v4(), None, tx2).unwrap();
        assert!(admission.started_clock);
        assert_eq!(admission.color, Color::new(PALETTE[1]));
        assert_eq!(room.clock().state(), ClockState::Running);

        let first = drain(&mut rx1);
        assert_eq!(types(&first), ["scoreUpdate", "timerUpdate"]);
        assert_eq!(first[1]["timeLeft"], 300);

        let second = drain(&mut rx2);
        assert_eq!(
            types(&second),
            ["assignInfo", "gameState", "scoreUpdate", "timerUpdate"]
        );
        assert_eq!(second[3]["timeLeft"], 300);
    }

    #[test]
    fn test_room_full() {
        let mut room = Room::new("lobby", &rules());
        let mut inboxes = Vec::new();
        for _ in 0..8 {
            inboxes.push(join(&mut room));
        }

        let (tx, _rx) = mpsc::unbounded_channel();
        let result = room.admit(Uuid::new_v4(), None, tx);
        assert!(matches!(result, Err(PixelwarError::RoomFull)));
        assert_eq!(room.session_count(), 8);

        let colors: std::collections::HashSet<_> =
            room.scores().iter().map(|(c, _)| c.clone()).collect();
        assert_eq!(colors.len(), 8);
    }

    #[test]
    fn test_game_ended_rejects_admission() {
        let (mut room, _first, _second) = running_room();
        room.finish();

        let (tx, _rx) = mpsc::unbounded_channel();
        let result = room.admit(Uuid::new_v4(), None, tx);
        assert!(matches!(result, Err(PixelwarError::GameEnded)));
    }

    #[test]
    fn test_placement_requires_running_clock() {
        let mut room = Room::new("lobby", &rules());
        let (id, mut rx) = join(&mut room);
        drain(&mut rx);

        let result = room.place_pixel(id, Some(1), Some(1), Instant::now());
        assert!(matches!(result, Err(PixelwarError::GameNotRunning)));
        assert_eq!(room.canvas().get(1, 1), None);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_invalid_coordinates() {
        let (mut room, (id, mut rx), _second) = running_room();
        let now = Instant::now();

        for (x, y) in [(Some(10), Some(0)), (Some(0), Some(-1)), (None, Some(3))] {
            let result = room.place_pixel(id, x, y, now);
            assert!(matches!(result, Err(PixelwarError::InvalidCoordinates)));
        }
        assert_eq!(room.canvas().unset_count(), 100);
        assert!(drain(&mut rx).is_empty());

        // A rejected request does not start the cooldown
        assert_eq!(room.place_pixel(id, Some(0), Some(0), now).unwrap(), Placement::Applied);
    }

    #[test]
    fn test_placement_broadcasts_to_everyone() {
        let (mut room, (id, mut rx1), (_, mut rx2)) = running_room();

        let result = room.place_pixel(id, Some(4), Some(7), Instant::now()).unwrap();
        assert_eq!(result, Placement::Applied);
        assert_eq!(room.canvas().get(4, 7), Some(&Color::new(PALETTE[0])));

        for rx in [&mut rx1, &mut rx2] {
            let messages = drain(rx);
            assert_eq!(types(&messages), ["pixelUpdate"]);
            assert_eq!(messages[0]["x"], 4);
            assert_eq!(messages[0]["y"], 7);
            assert_eq!(messages[0]["color"], PALETTE[0]);
            assert_eq!(messages[0]["scores"][PALETTE[0]], 1);
        }
        assert_accounting(&room);
    }

    #[test]
    fn test_cooldown_drops_second_placement() {
        let (mut room, (id, mut rx), _second) = running_room();
        let start = Instant::now();

        assert_eq!(room.place_pixel(id, Some(0), Some(0), start).unwrap(), Placement::Applied);
        assert_eq!(
            room.place_pixel(id, Some(1), Some(0), start + Duration::from_millis(500)).unwrap(),
            Placement::Throttled
        );
        assert_eq!(room.canvas().get(1, 0), None);
        assert_eq!(types(&drain(&mut rx)), ["pixelUpdate"]);

        assert_eq!(
            room.place_pixel(id, Some(1), Some(0), start + Duration::from_millis(1000)).unwrap(),
            Placement::Applied
        );
    }

    #[test]
    fn test_same_color_is_a_no_op() {
        let (mut room, (id, mut rx1), (_, mut rx2)) = running_room();
        let start = Instant::now();

        room.place_pixel(id, Some(2), Some(2), start).unwrap();
        drain(&mut rx1);
        drain(&mut rx2);

        let later = start + Duration::from_secs(5);
        assert_eq!(room.place_pixel(id, Some(2), Some(2), later).unwrap(), Placement::Unchanged);
        assert_eq!(room.scores().get(&Color::new(PALETTE[0])), 1);
        assert!(drain(&mut rx1).is_empty());
        assert!(drain(&mut rx2).is_empty());
    }

    #[test]
    fn test_overwrite_moves_score() {
        let (mut room, (red, _rx1), (green, _rx2)) = running_room();
        let now = Instant::now();

        room.place_pixel(red, Some(5), Some(5), now).unwrap();
        room.place_pixel(green, Some(5), Some(5), now).unwrap();

        assert_eq!(room.scores().get(&Color::new(PALETTE[0])), 0);
        assert_eq!(room.scores().get(&Color::new(PALETTE[1])), 1);
        assert_accounting(&room);
    }

    #[test]
    fn test_accounting_holds_under_random_play() {
        let mut room = Room::new("lobby", &rules());
        let players: Vec<_> = (0..4).map(|_| join(&mut room)).collect();
        let mut rng = rand::thread_rng();
        let mut now = Instant::now();

        for _ in 0..500 {
            now += Duration::from_millis(rng.gen_range(0..1500));
            let (id, _) = &players[rng.gen_range(0..players.len())];
            let (x, y) = (rng.gen_range(-1..11), rng.gen_range(-1..11));
            let _ = room.place_pixel(*id, Some(x), Some(y), now);
            assert_accounting(&room);
        }
    }

    #[test]
    fn test_score_survives_color_reuse() {
        let (mut room, (red, _rx1), _second) = running_room();
        let start = Instant::now();

        room.place_pixel(red, Some(0), Some(0), start).unwrap();
        room.place_pixel(red, Some(1), Some(0), start + Duration::from_secs(1)).unwrap();
        room.remove_session(&red);
        assert_eq!(room.scores().get(&Color::new(PALETTE[0])), 2);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let admission = room.admit(Uuid::new_v4(), None, tx).unwrap();
        assert_eq!(admission.color, Color::new(PALETTE[0]));

        let messages = drain(&mut rx);
        assert_eq!(messages[1]["scores"][PALETTE[0]], 2);
        assert_eq!(messages[1]["timeLeft"], 300);
    }

    #[test]
    fn test_disconnect_notifies_remaining_players() {
        let (mut room, (first, _rx1), (_, mut rx2)) = running_room();

        assert!(room.remove_session(&first).is_some());
        assert!(room.remove_session(&first).is_none());
        assert_eq!(types(&drain(&mut rx2)), ["scoreUpdate"]);
        assert_eq!(room.session_count(), 1);
    }

    #[test]
    fn test_failed_delivery_drops_only_that_session() {
        let (mut room, (_, rx1), (_, mut rx2)) = running_room();
        drop(rx1);

        room.broadcast(&ServerMessage::TimerUpdate { time_left: 5 });
        assert_eq!(room.session_count(), 1);
        assert_eq!(types(&drain(&mut rx2)), ["timerUpdate"]);
    }

    #[test]
    fn test_abandoned_when_last_player_leaves() {
        let (mut room, (first, _rx1), (second, _rx2)) = running_room();
        room.remove_session(&first);
        assert!(!room.is_abandoned());
        room.remove_session(&second);
        assert!(room.is_abandoned());

        room.clock_mut().drain();
        assert!(!room.is_abandoned());
    }

    #[test]
    fn test_tick_broadcasts_time() {
        let (mut room, (_, mut rx), _second) = running_room();

        assert!(matches!(room.tick(), TickOutcome::Counted { remaining: 299, .. }));
        let messages = drain(&mut rx);
        assert_eq!(types(&messages), ["timerUpdate"]);
        assert_eq!(messages[0]["timeLeft"], 299);
    }

    #[test]
    fn test_finish_announces_winner() {
        let (mut room, (red, mut rx), _second) = running_room();
        room.place_pixel(red, Some(0), Some(0), Instant::now()).unwrap();
        drain(&mut rx);

        assert_eq!(room.finish(), Some(Some(Color::new(PALETTE[0]))));
        assert_eq!(room.finish(), None);

        let messages = drain(&mut rx);
        assert_eq!(types(&messages), ["gameOver"]);
        assert_eq!(messages[0]["winnerColor"], PALETTE[0]);
    }

    #[test]
    fn test_finish_without_placements_is_a_draw() {
        let (mut room, (_, mut rx), _second) = running_room();
        assert_eq!(room.finish(), Some(None));
        assert!(drain(&mut rx)[0]["winnerColor"].is_null());
    }

    #[test]
    fn test_snapshot_restore() {
        let (mut room, (red, _rx1), _second) = running_room();
        room.place_pixel(red, Some(3), Some(3), Instant::now()).unwrap();
        room.tick();

        let snapshot = room.snapshot();
        assert!(snapshot.started);
        assert!(!snapshot.over);
        assert_eq!(snapshot.remaining, 299);

        let mut restored = Room::new("lobby", &rules());
        restored.restore(snapshot).unwrap();
        assert_eq!(restored.canvas(), room.canvas());
        assert_eq!(restored.scores(), room.scores());
        assert_eq!(restored.clock().state(), ClockState::Running);
        assert_eq!(restored.clock().remaining(), 299);
    }

    #[test]
    fn test_restore_rejects_other_dimensions() {
        let other = Room::new("lobby", &GameConfig::default());
        let mut room = Room::new("lobby", &rules());

        let result = room.restore(other.snapshot());
        assert!(matches!(result, Err(PixelwarError::InvalidSnapshot(_))));
        assert_eq!(room.clock().state(), ClockState::Pending);
    }

    #[test]
    fn test_restore_rejects_broken_accounting() {
        let room = Room::new("lobby", &rules());
        let mut snapshot = room.snapshot();
        snapshot.scores = [(Color::new(PALETTE[0]), 3)].into_iter().collect();

        let mut target = Room::new("lobby", &rules());
        assert!(target.restore(snapshot).is_err());
    }

    #[test]
    fn test_restore_rejects_scores_credited_to_wrong_color() {
        let mut source = Room::new("lobby", &rules());
        source.canvas.set(0, 0, Color::new(PALETTE[2]));
        let mut snapshot = source.snapshot();
        snapshot.scores = [(Color::new(PALETTE[0]), 1)].into_iter().collect();

        let mut target = Room::new("lobby", &rules());
        assert!(matches!(
            target.restore(snapshot),
            Err(PixelwarError::InvalidSnapshot(_))
        ));
        assert_eq!(target.canvas().unset_count(), target.canvas().area());
    }

    #[test]
    fn test_fallback_color_beyond_palette() {
        let mut room = Room::new(
            "lobby",
            &GameConfig {
                max_players: 9,
                ..rules()
            },
        );
        let mut inboxes = Vec::new();
        for _ in 0..8 {
            inboxes.push(join(&mut room));
        }

        let (tx, _rx) = mpsc::unbounded_channel();
        let admission = room.admit(Uuid::new_v4(), None, tx).unwrap();
        assert!(!admission.color.is_palette());
        assert_eq!(room.scores().get(&admission.color), 0);
    }
}
