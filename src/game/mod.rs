//! Game simulation modules

pub mod body;
pub mod boundary;
pub mod constants;
pub mod r#match;
pub mod phase;
pub mod physics;
pub mod simulation;
pub mod snapshot;
pub mod state;

pub use r#match::{GameMatch, MatchHandle};
pub use state::{MatchState, Phase, Seat};

use crate::ws::protocol::{ClientMsg, ServerMsg};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Event received from a WebSocket connection
#[derive(Debug, Clone)]
pub struct PlayerInput {
    pub conn_id: Uuid,
    pub event: InputEvent,
}

impl PlayerInput {
    pub fn new(conn_id: Uuid, event: InputEvent) -> Self {
        Self { conn_id, event }
    }
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Socket opened; `outbox` carries messages addressed to this connection only
    Connected { outbox: mpsc::Sender<ServerMsg> },
    Message(ClientMsg),
    Disconnected,
}
