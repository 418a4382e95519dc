//! Room store: the single owner of every open room.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use gambit_protocol::RoomCode;
use gambit_transport::ConnectionId;

use crate::{Room, RoomError};

/// In-memory mapping from room code to [`Room`].
///
/// Not thread-safe by itself: it is owned by the relay task, which is the
/// only writer. Nothing is persisted; the store starts empty.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<RoomCode, Room>,
}

impl RoomStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a room under `code` with `creator` in the white seat.
    ///
    /// # Errors
    /// Returns [`RoomError::AlreadyExists`] if the code is taken; the
    /// existing room is left untouched.
    pub fn create(
        &mut self,
        code: RoomCode,
        creator: ConnectionId,
    ) -> Result<&Room, RoomError> {
        match self.rooms.entry(code) {
            Entry::Occupied(entry) => {
                Err(RoomError::AlreadyExists(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                let room = Room::new(entry.key().clone(), creator);
                tracing::info!(room_code = %entry.key(), %creator, "room created");
                Ok(&*entry.insert(room))
            }
        }
    }

    /// Looks up a room.
    ///
    /// # Errors
    /// Returns [`RoomError::NotFound`] if no room has this code.
    pub fn get(&self, code: &RoomCode) -> Result<&Room, RoomError> {
        self.rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))
    }

    /// Looks up a room for mutation.
    ///
    /// # Errors
    /// Returns [`RoomError::NotFound`] if no room has this code.
    pub fn get_mut(&mut self, code: &RoomCode) -> Result<&mut Room, RoomError> {
        self.rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))
    }

    /// Removes a room entirely, returning it if it existed.
    pub fn delete(&mut self, code: &RoomCode) -> Option<Room> {
        let room = self.rooms.remove(code);
        if room.is_some() {
            tracing::info!(room_code = %code, "room deleted");
        }
        room
    }

    /// Codes of every room in which `id` holds a seat, sorted.
    pub fn rooms_of(&self, id: ConnectionId) -> Vec<RoomCode> {
        let mut codes: Vec<RoomCode> = self
            .rooms
            .values()
            .filter(|room| room.contains(id))
            .map(|room| room.code().clone())
            .collect();
        codes.sort();
        codes
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Returns the number of open rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if no room is open.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
