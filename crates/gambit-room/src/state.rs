//! Room lifecycle state machine.

use std::fmt;

use gambit_protocol::GamePhase;

/// The lifecycle state of a room.
///
/// Transitions are strictly ordered, with no skipping and no going back:
///
/// ```text
/// Waiting -> Selecting -> Playing
/// ```
///
/// - **Waiting**: the creator holds the white seat; the black seat is open.
/// - **Selecting**: both seats are taken; each player submits impostors.
/// - **Playing**: both players are ready; moves are relayed.
///
/// There is no stored terminal state. A room ends by being deleted from
/// the store when either player disconnects; a relayed game-over notice
/// leaves it `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomState {
    Waiting,
    Selecting,
    Playing,
}

impl RoomState {
    /// Returns `true` if the room is accepting a second player.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns the only state reachable from this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Selecting),
            Self::Selecting => Some(Self::Playing),
            Self::Playing => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// The phase announced to clients on entering this state.
    ///
    /// `Waiting` is never announced.
    pub fn phase(self) -> Option<GamePhase> {
        match self {
            Self::Waiting => None,
            Self::Selecting => Some(GamePhase::SelectImpostors),
            Self::Playing => Some(GamePhase::Playing),
        }
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Selecting => write!(f, "selecting"),
            Self::Playing => write!(f, "playing"),
        }
    }
}
