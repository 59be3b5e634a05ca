//! Seat assignment and the spectator queue

pub mod queue;
pub mod seats;

pub use queue::SpectatorQueue;
pub use seats::{sanitize_nickname, JoinOutcome, LeaveOutcome, Role, SessionManager};
