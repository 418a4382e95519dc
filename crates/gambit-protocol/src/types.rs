//! Event types for the relay's wire format.
//!
//! Every frame on the wire is one JSON object tagged by a `type` field:
//!
//! ```text
//! { "type": "joinRoom", "roomCode": "R1" }
//! { "type": "gameStateUpdate", "gameState": "selectImpostors" }
//! ```
//!
//! Payloads the relay never interprets (the move snapshot, `impostors`, `position`,
//! `winner`) are carried as [`serde_json::Value`] and echoed as received.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Identity and small value types
// ---------------------------------------------------------------------------

/// The key of a room, chosen by the client that creates it.
///
/// `#[serde(transparent)]` keeps it a plain JSON string on the wire.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Creates a room code from anything string-like.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for RoomCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// A player's side. Assigned by join order: the creator is always white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => f.write_str("white"),
            Self::Black => f.write_str("black"),
        }
    }
}

/// Room phase as announced to clients in `gameStateUpdate`.
///
/// Only the phases a client is told about appear here; a waiting room
/// never broadcasts its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Both seats are taken; each player picks impostors.
    SelectImpostors,
    /// Both players are ready; moves are relayed.
    Playing,
}

/// The shared match snapshot carried by `makeMove` and `moveMade`.
///
/// The relay stores the last one it saw per room and echoes each one
/// unchanged. Every field is an opaque JSON value: a `null` turn, a float
/// move count or extra `pawnMoved` keys all pass through as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSnapshot {
    #[serde(default)]
    pub board: Value,
    #[serde(default)]
    pub current_turn: Value,
    #[serde(default)]
    pub move_count: Value,
    #[serde(default)]
    pub pawn_moved: Value,
}

impl Default for MoveSnapshot {
    /// The snapshot of a room before any move: no board, white to play.
    fn default() -> Self {
        Self {
            board: Value::Null,
            current_turn: Value::from(Color::White.to_string()),
            move_count: Value::from(0),
            pawn_moved: serde_json::json!({ "white": false, "black": false }),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientEvent: client to server
// ---------------------------------------------------------------------------

/// Everything a client may send.
///
/// `tag = "type"` produces internally tagged JSON. `rename_all` turns the
/// variant names into `createRoom`, `joinRoom`, ... and `rename_all_fields`
/// turns `room_code` into `roomCode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// Open a new room under `room_code` and take the white seat.
    CreateRoom { room_code: RoomCode },

    /// Take the black seat of an existing room.
    JoinRoom { room_code: RoomCode },

    /// Submit this player's impostor selection.
    SetImpostors {
        room_code: RoomCode,
        #[serde(default)]
        impostors: Value,
    },

    /// Publish a new match snapshot.
    MakeMove {
        room_code: RoomCode,
        #[serde(rename = "move")]
        snapshot: MoveSnapshot,
    },

    /// Announce an impostor ability at `position`.
    ActivateImpostor {
        room_code: RoomCode,
        #[serde(default)]
        position: Value,
    },

    /// Announce the end of the match.
    GameOver {
        room_code: RoomCode,
        #[serde(default)]
        winner: Value,
    },
}

impl ClientEvent {
    /// The room this event addresses.
    pub fn room_code(&self) -> &RoomCode {
        match self {
            Self::CreateRoom { room_code }
            | Self::JoinRoom { room_code }
            | Self::SetImpostors { room_code, .. }
            | Self::MakeMove { room_code, .. }
            | Self::ActivateImpostor { room_code, .. }
            | Self::GameOver { room_code, .. } => room_code,
        }
    }

    /// A short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateRoom { .. } => "createRoom",
            Self::JoinRoom { .. } => "joinRoom",
            Self::SetImpostors { .. } => "setImpostors",
            Self::MakeMove { .. } => "makeMove",
            Self::ActivateImpostor { .. } => "activateImpostor",
            Self::GameOver { .. } => "gameOver",
        }
    }
}

// ---------------------------------------------------------------------------
// ServerEvent: server to client
// ---------------------------------------------------------------------------

/// Everything the server may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// To the creator: the room exists and you are white.
    RoomCreated { room_code: RoomCode, color: Color },

    /// To the joiner: you are seated, always as black.
    RoomJoined { room_code: RoomCode, color: Color },

    /// To the room: the second seat was filled.
    OpponentJoined,

    /// To the room: the phase changed.
    GameStateUpdate { game_state: GamePhase },

    /// To one player: your selection is in, the opponent's is not.
    WaitingForOpponent,

    /// To the room: the snapshot from the latest `makeMove`.
    MoveMade(MoveSnapshot),

    /// To the room: an impostor ability fired.
    ImpostorActivated { position: Value },

    /// To the room: the match is over.
    GameEnded { winner: Value },

    /// To the remaining player: the other one left; the room is gone.
    OpponentDisconnected,

    /// To one connection: the request was rejected.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    //! The browser client matches on these exact JSON shapes.

    use super::*;
    use serde_json::json;

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomCode::new("R1")).unwrap();
        assert_eq!(json, "\"R1\"");
    }

    #[test]
    fn test_color_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Color::White).unwrap(), "white");
        assert_eq!(serde_json::to_value(Color::Black).unwrap(), "black");
        assert_eq!(Color::Black.to_string(), "black");
    }

    #[test]
    fn test_game_phase_wire_names() {
        assert_eq!(
            serde_json::to_value(GamePhase::SelectImpostors).unwrap(),
            "selectImpostors"
        );
        assert_eq!(serde_json::to_value(GamePhase::Playing).unwrap(), "playing");
    }

    #[test]
    fn test_move_snapshot_default_matches_fresh_room() {
        let snap = MoveSnapshot::default();
        assert!(snap.board.is_null());
        assert_eq!(snap.current_turn, "white");
        assert_eq!(snap.move_count, 0);
        assert_eq!(snap.pawn_moved, json!({"white": false, "black": false}));
    }

    // =====================================================================
    // ClientEvent
    // =====================================================================

    #[test]
    fn test_client_event_create_room_parses() {
        let ev: ClientEvent =
            serde_json::from_str(r#"{"type":"createRoom","roomCode":"R1"}"#)
                .unwrap();
        assert_eq!(
            ev,
            ClientEvent::CreateRoom { room_code: "R1".into() }
        );
        assert_eq!(ev.room_code().as_str(), "R1");
        assert_eq!(ev.kind(), "createRoom");
    }

    #[test]
    fn test_client_event_make_move_parses_nested_move() {
        let ev: ClientEvent = serde_json::from_value(json!({
            "type": "makeMove",
            "roomCode": "R1",
            "move": {
                "board": [["wr", null], [null, "bk"]],
                "currentTurn": "black",
                "moveCount": 3,
                "pawnMoved": { "white": true, "black": false }
            }
        }))
        .unwrap();

        match ev {
            ClientEvent::MakeMove { room_code, snapshot } => {
                assert_eq!(room_code.as_str(), "R1");
                assert_eq!(snapshot.current_turn, "black");
                assert_eq!(snapshot.move_count, 3);
                assert_eq!(snapshot.pawn_moved["white"], true);
                assert_eq!(snapshot.board[1][1], "bk");
            }
            other => panic!("expected MakeMove, got {other:?}"),
        }
    }

    #[test]
    fn test_client_event_set_impostors_keeps_payload_opaque() {
        let ev: ClientEvent = serde_json::from_value(json!({
            "type": "setImpostors",
            "roomCode": "R1",
            "impostors": [{"square": "e2", "as": "queen"}]
        }))
        .unwrap();
        match ev {
            ClientEvent::SetImpostors { impostors, .. } => {
                assert_eq!(impostors[0]["as"], "queen");
            }
            other => panic!("expected SetImpostors, got {other:?}"),
        }
    }

    #[test]
    fn test_client_event_missing_opaque_payload_is_null() {
        let ev: ClientEvent = serde_json::from_str(
            r#"{"type":"gameOver","roomCode":"R1"}"#,
        )
        .unwrap();
        assert_eq!(
            ev,
            ClientEvent::GameOver {
                room_code: "R1".into(),
                winner: Value::Null
            }
        );
    }

    #[test]
    fn test_client_event_unknown_type_is_rejected() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"type":"flyToMoon","roomCode":"R1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_event_missing_room_code_is_rejected() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"type":"joinRoom"}"#);
        assert!(result.is_err());
    }

    // =====================================================================
    // ServerEvent
    // =====================================================================

    #[test]
    fn test_server_event_room_created_json_format() {
        let ev = ServerEvent::RoomCreated {
            room_code: "R1".into(),
            color: Color::White,
        };
        assert_eq!(
            serde_json::to_value(&ev).unwrap(),
            json!({"type": "roomCreated", "roomCode": "R1", "color": "white"})
        );
    }

    #[test]
    fn test_server_event_unit_variants_carry_only_type() {
        assert_eq!(
            serde_json::to_value(ServerEvent::OpponentJoined).unwrap(),
            json!({"type": "opponentJoined"})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::WaitingForOpponent).unwrap(),
            json!({"type": "waitingForOpponent"})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::OpponentDisconnected).unwrap(),
            json!({"type": "opponentDisconnected"})
        );
    }

    #[test]
    fn test_server_event_game_state_update_json_format() {
        let ev = ServerEvent::GameStateUpdate {
            game_state: GamePhase::SelectImpostors,
        };
        assert_eq!(
            serde_json::to_value(&ev).unwrap(),
            json!({"type": "gameStateUpdate", "gameState": "selectImpostors"})
        );
    }

    #[test]
    fn test_server_event_move_made_flattens_snapshot() {
        let ev = ServerEvent::MoveMade(MoveSnapshot {
            board: json!({"e4": "wp"}),
            current_turn: json!("black"),
            move_count: json!(1),
            pawn_moved: json!({"white": true, "black": false}),
        });
        assert_eq!(
            serde_json::to_value(&ev).unwrap(),
            json!({
                "type": "moveMade",
                "board": {"e4": "wp"},
                "currentTurn": "black",
                "moveCount": 1,
                "pawnMoved": {"white": true, "black": false}
            })
        );
    }

    #[test]
    fn test_move_snapshot_echoes_unusual_fields_verbatim() {
        let frame = r#"{"type":"makeMove","roomCode":"R1","move":{"board":null,"currentTurn":null,"moveCount":3.0,"pawnMoved":{"white":true,"black":false,"extra":7}}}"#;
        let ev: ClientEvent = serde_json::from_str(frame).unwrap();
        let ClientEvent::MakeMove { snapshot, .. } = ev else {
            panic!("expected MakeMove");
        };

        let echoed = serde_json::to_string(&ServerEvent::MoveMade(snapshot)).unwrap();
        assert_eq!(
            echoed,
            r#"{"type":"moveMade","board":null,"currentTurn":null,"moveCount":3.0,"pawnMoved":{"white":true,"black":false,"extra":7}}"#
        );
    }

    #[test]
    fn test_move_snapshot_missing_fields_are_null() {
        let ev: ClientEvent = serde_json::from_str(
            r#"{"type":"makeMove","roomCode":"R1","move":{}}"#,
        )
        .unwrap();
        let ClientEvent::MakeMove { snapshot, .. } = ev else {
            panic!("expected MakeMove");
        };
        assert!(snapshot.current_turn.is_null());
        assert!(snapshot.pawn_moved.is_null());
    }

    #[test]
    fn test_server_event_error_json_format() {
        let ev = ServerEvent::Error { message: "Room not found".into() };
        assert_eq!(
            serde_json::to_value(&ev).unwrap(),
            json!({"type": "error", "message": "Room not found"})
        );
    }
}
