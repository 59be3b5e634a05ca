//! Session registry: seats 1/2, the spectator queue and nicknames

use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

use crate::game::constants::rules::NICKNAME_MAX_CHARS;
use crate::game::state::Seat;

use super::queue::SpectatorQueue;

const DEFAULT_NICKNAME: &str = "Player";

/// Role held by a joined connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player(Seat),
    Spectator,
}

impl Role {
    pub fn seat(self) -> Option<Seat> {
        match self {
            Role::Player(seat) => Some(seat),
            Role::Spectator => None,
        }
    }
}

/// Result of a join request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub role: Role,
    pub nickname: String,
    /// False when the connection had already joined
    pub newly_joined: bool,
}

/// Result of a disconnect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Seat vacated and refilled from the queue
    Promoted {
        seat: Seat,
        conn_id: Uuid,
        nickname: String,
        waited: Duration,
    },
    /// Seat vacated with nobody waiting
    SeatEmptied(Seat),
    /// Spectator left the queue
    Dequeued,
    /// Connection never joined
    Unknown,
}

/// Maps connections onto the two seats and the spectator queue.
/// A connection holds at most one role and each seat at most one connection.
#[derive(Debug, Default)]
pub struct SessionManager {
    seats: [Option<Uuid>; 2],
    queue: SpectatorQueue,
    nicknames: HashMap<Uuid, String>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat 1 if free, else seat 2, else the back of the queue
    pub fn join(&mut self, conn_id: Uuid, nickname: &str) -> JoinOutcome {
        if let Some(role) = self.role_of(&conn_id) {
            return JoinOutcome {
                role,
                nickname: self.nickname(&conn_id).to_string(),
                newly_joined: false,
            };
        }

        let nickname = sanitize_nickname(nickname);
        self.nicknames.insert(conn_id, nickname.clone());

        let role = match Seat::BOTH.into_iter().find(|s| self.seats[s.index()].is_none()) {
            Some(seat) => {
                self.seats[seat.index()] = Some(conn_id);
                Role::Player(seat)
            }
            None => {
                self.queue.enqueue(conn_id);
                Role::Spectator
            }
        };

        JoinOutcome {
            role,
            nickname,
            newly_joined: true,
        }
    }

    /// Drop a connection, backfilling its seat from the queue head
    pub fn leave(&mut self, conn_id: Uuid) -> LeaveOutcome {
        if let Some(seat) = self.seat_of(&conn_id) {
            self.seats[seat.index()] = None;
            self.nicknames.remove(&conn_id);

            return match self.queue.pop_front() {
                Some(next) => {
                    self.seats[seat.index()] = Some(next.conn_id);
                    LeaveOutcome::Promoted {
                        seat,
                        conn_id: next.conn_id,
                        nickname: self.nickname(&next.conn_id).to_string(),
                        waited: next.wait_time(),
                    }
                }
                None => LeaveOutcome::SeatEmptied(seat),
            };
        }

        if self.queue.dequeue(conn_id).is_some() {
            self.nicknames.remove(&conn_id);
            return LeaveOutcome::Dequeued;
        }

        LeaveOutcome::Unknown
    }

    pub fn seat_of(&self, conn_id: &Uuid) -> Option<Seat> {
        Seat::BOTH
            .into_iter()
            .find(|s| self.seats[s.index()].as_ref() == Some(conn_id))
    }

    pub fn role_of(&self, conn_id: &Uuid) -> Option<Role> {
        if let Some(seat) = self.seat_of(conn_id) {
            Some(Role::Player(seat))
        } else if self.queue.contains(conn_id) {
            Some(Role::Spectator)
        } else {
            None
        }
    }

    pub fn occupant(&self, seat: Seat) -> Option<Uuid> {
        self.seats[seat.index()]
    }

    pub fn both_seated(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    /// Nickname of a joined connection, empty if unknown
    pub fn nickname(&self, conn_id: &Uuid) -> &str {
        self.nicknames.get(conn_id).map(String::as_str).unwrap_or("")
    }

    /// Nickname of a seat's occupant, empty if vacant
    pub fn seat_name(&self, seat: Seat) -> &str {
        self.occupant(seat)
            .map(|id| self.nickname(&id))
            .unwrap_or("")
    }

    pub fn spectator_count(&self) -> usize {
        self.queue.len()
    }
}

/// Trim and bound a nickname; empty input gets a placeholder
pub fn sanitize_nickname(raw: &str) -> String {
    let name: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(NICKNAME_MAX_CHARS)
        .collect();
    let name = name.trim_end().to_string();

    if name.is_empty() {
        DEFAULT_NICKNAME.to_string()
    } else {
        name
    }
}
