//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Pointer location in rink coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, deserialize_with = "lenient_f32")]
    pub x: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub y: f32,
}

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Take a seat (or a queue slot) under a nickname
    Join { nickname: String },

    /// Paddle intent for a seated player
    Move {
        /// Target pointer position; absent or malformed leaves the target unchanged
        #[serde(default, deserialize_with = "lenient_position")]
        pos: Option<Position>,
        /// Spin intent, reduced to its sign; absent or malformed means 0
        #[serde(default, deserialize_with = "lenient_f32")]
        spin_direction: f32,
    },

    /// Ready for the match (or for a rematch)
    Ready,

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },
}

/// Any JSON number as f32, anything else as 0
fn lenient_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().map(|v| v as f32).unwrap_or(0.0))
}

/// A JSON object as a position, anything else as none
fn lenient_position<'de, D>(deserializer: D) -> Result<Option<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Welcome message after connection
    Welcome { conn_id: Uuid, server_time: u64 },

    /// Role assignment or promotion
    Seat {
        /// 1 or 2, 0 for spectators
        seat: u8,
        spectator: bool,
        nickname: String,
    },

    /// Per-tick world state
    State(MatchSnapshot),

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },
}

/// Kinematic state of a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Radians per second
    pub spin: f32,
    /// Radians
    pub spin_angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddleSnapshot {
    #[serde(flatten)]
    pub body: BodySnapshot,
    pub target_x: f32,
    pub target_y: f32,
    pub spin_direction: i8,
}

/// Match state broadcast every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Server tick number
    pub tick: u64,
    /// Match instance, bumped on every reset or rematch
    pub generation: u64,

    pub score1: u32,
    pub score2: u32,
    pub phase: String,

    /// Seconds left, -1 when the phase is inactive
    pub countdown: f64,
    pub ready_countdown: f64,
    pub gameover_countdown: f64,

    pub ready1: bool,
    pub ready2: bool,
    /// Seat number, 0 for none
    pub goal_scorer: u8,
    pub winner: u8,

    pub player1_name: String,
    pub player2_name: String,
    pub is_deuce: bool,
    pub player1_reach: bool,
    pub player2_reach: bool,

    pub puck: BodySnapshot,
    pub paddle1: PaddleSnapshot,
    pub paddle2: PaddleSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join() {
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"join","nickname":"puckmaster"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMsg::Join {
                nickname: "puckmaster".to_string()
            }
        );
    }

    #[test]
    fn test_parse_move_with_missing_fields() {
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"move"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMsg::Move {
                pos: None,
                spin_direction: 0.0
            }
        );

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"move","pos":{"x":120.5}}"#).unwrap();
        assert_eq!(
            msg,
            ClientMsg::Move {
                pos: Some(Position { x: 120.5, y: 0.0 }),
                spin_direction: 0.0
            }
        );
    }

    #[test]
    fn test_parse_move_with_malformed_fields() {
        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"move","pos":{"x":100,"y":200},"spin_direction":null}"#).unwrap();
        assert_eq!(
            msg,
            ClientMsg::Move {
                pos: Some(Position { x: 100.0, y: 200.0 }),
                spin_direction: 0.0
            }
        );

        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"move","pos":{"x":null,"y":200},"spin_direction":"1"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMsg::Move {
                pos: Some(Position { x: 0.0, y: 200.0 }),
                spin_direction: 0.0
            }
        );

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"move","pos":"left","spin_direction":-2.5}"#).unwrap();
        assert_eq!(
            msg,
            ClientMsg::Move {
                pos: None,
                spin_direction: -2.5
            }
        );
    }

    #[test]
    fn test_parse_ready() {
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"ready"}"#).unwrap();
        assert_eq!(msg, ClientMsg::Ready);
    }

    #[test]
    fn test_reject_unknown_type() {
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"teleport"}"#).is_err());
    }

    #[test]
    fn test_seat_wire_shape() {
        let json = serde_json::to_value(ServerMsg::Seat {
            seat: 2,
            spectator: false,
            nickname: "bob".to_string(),
        })
        .unwrap();

        assert_eq!(json["type"], "seat");
        assert_eq!(json["seat"], 2);
        assert_eq!(json["nickname"], "bob");
    }
}
