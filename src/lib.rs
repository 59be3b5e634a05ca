//! Air Hockey Server - authoritative two-player air hockey over WebSocket
//!
//! One match runs per process. A single task owns the match state, drains
//! client input each tick, steps the physics at 60 Hz and broadcasts a state
//! snapshot to every connected viewer.

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod lobby;
pub mod util;
pub mod ws;
