//! Room Registry
//!
//! Tracks which connections sit in which rooms. Rooms are keyed by store id
//! or order number in one flat table, so a single lookup can target either
//! grouping. A room exists only while it has members.

use std::collections::HashSet;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Deserialize;

use crate::domain::entities::{ConnectionId, RoomId};

/// What [`RoomRegistry::leave_all`] does when a connection sits in several rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveAllPolicy {
    /// Leave the first room (in scan order) that lists the connection, then stop.
    #[default]
    FirstMatch,
    /// Leave every room that lists the connection.
    EveryRoom,
}

/// Room membership table shared by every connection task.
///
/// Rooms are scanned with numeric ids (canonical `u32` array indices such as
/// `"100"`) first in ascending order, then every other id in creation order.
/// A room deleted and later recreated moves to the end of its group.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<IndexMap<RoomId, HashSet<ConnectionId>>>,
    policy: LeaveAllPolicy,
}

impl RoomRegistry {
    pub fn new(policy: LeaveAllPolicy) -> Self {
        Self {
            rooms: RwLock::new(IndexMap::new()),
            policy,
        }
    }

    /// Add a connection to a room, creating the room if needed.
    ///
    /// An empty room id is ignored. Returns `true` if the connection was not
    /// already a member.
    pub fn join(&self, room_id: &str, conn_id: &str) -> bool {
        if room_id.is_empty() {
            return false;
        }

        let added = self
            .rooms
            .write()
            .entry(room_id.to_string())
            .or_default()
            .insert(conn_id.to_string());

        if added {
            tracing::debug!(room_id = %room_id, connection_id = %conn_id, "Joined room");
        }
        added
    }

    /// Remove a connection from one room. Returns `true` if it was a member.
    pub fn leave(&self, room_id: &str, conn_id: &str) -> bool {
        let mut rooms = self.rooms.write();
        let removed = Self::remove_member(&mut rooms, room_id, conn_id);
        drop(rooms);

        if removed {
            tracing::debug!(room_id = %room_id, connection_id = %conn_id, "Left room");
        }
        removed
    }

    /// Remove a connection according to the registry's [`LeaveAllPolicy`].
    ///
    /// Returns the rooms that were left, in scan order.
    pub fn leave_all(&self, conn_id: &str) -> Vec<RoomId> {
        let limit = match self.policy {
            LeaveAllPolicy::FirstMatch => 1,
            LeaveAllPolicy::EveryRoom => usize::MAX,
        };
        let left = self.leave_rooms(conn_id, limit);

        if !left.is_empty() {
            tracing::debug!(
                connection_id = %conn_id,
                rooms = ?left,
                policy = ?self.policy,
                "Left rooms"
            );
        }
        left
    }

    /// Remove a closed connection from every room, whatever the policy.
    pub fn remove_connection(&self, conn_id: &str) -> Vec<RoomId> {
        let left = self.leave_rooms(conn_id, usize::MAX);

        if !left.is_empty() {
            tracing::debug!(connection_id = %conn_id, rooms = ?left, "Connection removed from rooms");
        }
        left
    }

    /// Current members of a room; empty if the room does not exist.
    pub fn members_of(&self, room_id: &str) -> HashSet<ConnectionId> {
        self.rooms
            .read()
            .get(room_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Union of the members of several rooms, each connection listed once.
    pub fn recipients<'a, I>(&self, room_ids: I) -> HashSet<ConnectionId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rooms = self.rooms.read();
        room_ids
            .into_iter()
            .filter_map(|room_id| rooms.get(room_id))
            .flat_map(|members| members.iter().cloned())
            .collect()
    }

    /// Rooms a connection currently sits in, in scan order.
    pub fn rooms_of(&self, conn_id: &str) -> Vec<RoomId> {
        let rooms = self.rooms.read();
        let joined: Vec<RoomId> = scan_order(&rooms)
            .filter(|(_, members)| members.contains(conn_id))
            .map(|(room_id, _)| room_id.clone())
            .collect();
        joined
    }

    pub fn contains_room(&self, room_id: &str) -> bool {
        self.rooms.read().contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }

    fn leave_rooms(&self, conn_id: &str, limit: usize) -> Vec<RoomId> {
        let mut rooms = self.rooms.write();

        let joined: Vec<RoomId> = scan_order(&rooms)
            .filter(|(_, members)| members.contains(conn_id))
            .map(|(room_id, _)| room_id.clone())
            .take(limit)
            .collect();

        for room_id in &joined {
            Self::remove_member(&mut rooms, room_id, conn_id);
        }
        joined
    }

    fn remove_member(
        rooms: &mut IndexMap<RoomId, HashSet<ConnectionId>>,
        room_id: &str,
        conn_id: &str,
    ) -> bool {
        let Some(members) = rooms.get_mut(room_id) else {
            return false;
        };
        let removed = members.remove(conn_id);
        if members.is_empty() {
            rooms.shift_remove(room_id);
        }
        removed
    }
}

/// Canonical array index: decimal, no sign or leading zeros, below `u32::MAX`.
fn array_index(room_id: &str) -> Option<u32> {
    let index: u32 = room_id.parse().ok()?;
    (index != u32::MAX && index.to_string() == room_id).then_some(index)
}

fn scan_order(
    rooms: &IndexMap<RoomId, HashSet<ConnectionId>>,
) -> impl Iterator<Item = (&RoomId, &HashSet<ConnectionId>)> {
    let mut indexed: Vec<_> = rooms
        .iter()
        .filter_map(|(room_id, members)| array_index(room_id).map(|i| (i, room_id, members)))
        .collect();
    indexed.sort_unstable_by_key(|(index, _, _)| *index);

    indexed
        .into_iter()
        .map(|(_, room_id, members)| (room_id, members))
        .chain(rooms.iter().filter(|(room_id, _)| array_index(room_id).is_none()))
}
