//! The room entity: two seats, readiness gating, and the last snapshot.

use gambit_protocol::{Color, MoveSnapshot, RoomCode};
use gambit_transport::ConnectionId;
use serde_json::Value;

use crate::{RoomError, RoomState};

/// Seats per room.
pub const MAX_PLAYERS: usize = 2;

/// One seat in a room.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// The connection holding this seat.
    pub id: ConnectionId,
    /// Assigned by join order and never changed.
    pub color: Color,
    /// The player's impostor selection, `None` until submitted.
    pub impostors: Option<Value>,
    /// Set together with `impostors`; never reset.
    pub ready: bool,
}

impl Player {
    fn seated(id: ConnectionId, color: Color) -> Self {
        Self {
            id,
            color,
            impostors: None,
            ready: false,
        }
    }
}

/// Outcome of a successful impostor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The other player has not submitted yet.
    WaitingForOpponent,
    /// Everyone is ready; the room moved to `Playing`.
    AllReady,
}

/// A point-in-time copy of a room, for callers outside the relay task.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInfo {
    pub room_code: RoomCode,
    pub state: RoomState,
    pub players: Vec<Player>,
    pub snapshot: MoveSnapshot,
}

impl RoomInfo {
    /// Number of occupied seats.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

/// A match session between at most two connections.
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    /// In join order: index 0 is white, index 1 is black.
    players: Vec<Player>,
    state: RoomState,
    snapshot: MoveSnapshot,
}

impl Room {
    /// Opens a room with `creator` in the white seat.
    pub fn new(code: RoomCode, creator: ConnectionId) -> Self {
        Self {
            code,
            players: vec![Player::seated(creator, Color::White)],
            state: RoomState::Waiting,
            snapshot: MoveSnapshot::default(),
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The last snapshot recorded by [`record_move`](Self::record_move).
    pub fn snapshot(&self) -> &MoveSnapshot {
        &self.snapshot
    }

    pub fn player(&self, id: ConnectionId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.player(id).is_some()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    /// Connection ids of every seated player, in join order.
    pub fn members(&self) -> Vec<ConnectionId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Seats `id` and moves the room from `Waiting` to `Selecting`.
    ///
    /// Returns the color assigned to the new player.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyInRoom`] if `id` already holds a seat
    /// - [`RoomError::RoomFull`] if both seats are taken
    pub fn join(&mut self, id: ConnectionId) -> Result<Color, RoomError> {
        if self.contains(id) {
            return Err(RoomError::AlreadyInRoom(id, self.code.clone()));
        }
        if self.is_full() || !self.state.is_joinable() {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        let color = if self.players.is_empty() {
            Color::White
        } else {
            Color::Black
        };
        self.players.push(Player::seated(id, color));
        self.transition_to(RoomState::Selecting)?;

        tracing::info!(
            room_code = %self.code,
            player = %id,
            %color,
            "player joined"
        );
        Ok(color)
    }

    /// Records `id`'s impostor selection and marks the player ready.
    ///
    /// When this makes every player ready the room moves to `Playing`.
    ///
    /// # Errors
    /// - [`RoomError::WrongState`] outside `Selecting`
    /// - [`RoomError::NotInRoom`] if `id` holds no seat
    /// - [`RoomError::AlreadySelected`] on a second submission
    pub fn select_impostors(
        &mut self,
        id: ConnectionId,
        impostors: Value,
    ) -> Result<Readiness, RoomError> {
        if self.state != RoomState::Selecting {
            return Err(RoomError::WrongState {
                room_code: self.code.clone(),
                state: self.state,
                expected: RoomState::Selecting,
            });
        }

        let code = &self.code;
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RoomError::NotInRoom(id, code.clone()))?;
        if player.ready {
            return Err(RoomError::AlreadySelected(id, code.clone()));
        }
        player.impostors = Some(impostors);
        player.ready = true;

        if self.players.iter().all(|p| p.ready) {
            self.transition_to(RoomState::Playing)?;
            tracing::info!(room_code = %self.code, "game started");
            Ok(Readiness::AllReady)
        } else {
            Ok(Readiness::WaitingForOpponent)
        }
    }

    /// Overwrites the stored snapshot with `snapshot`, as given.
    pub fn record_move(&mut self, snapshot: MoveSnapshot) {
        self.snapshot = snapshot;
    }

    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            room_code: self.code.clone(),
            state: self.state,
            players: self.players.clone(),
            snapshot: self.snapshot.clone(),
        }
    }

    fn transition_to(&mut self, target: RoomState) -> Result<(), RoomError> {
        if !self.state.can_transition_to(target) {
            return Err(RoomError::InvalidTransition {
                room_code: self.code.clone(),
                from: self.state,
                to: target,
            });
        }
        tracing::debug!(
            room_code = %self.code,
            from = %self.state,
            to = %target,
            "room state changed"
        );
        self.state = target;
        Ok(())
    }
}
