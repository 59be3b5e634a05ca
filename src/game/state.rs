//! Authoritative match state

use std::f32::consts::PI;

use super::body::{Paddle, RigidBody};
use super::constants::rink;

/// One of the two player seats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::One, Seat::Two];

    pub fn number(self) -> u8 {
        match self {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    pub fn opponent(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }
}

/// Match phase. Deadlines are match-clock seconds and belong to the
/// variant they time out, so leaving a phase cancels them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Fewer than two seated players
    WaitingPlayers,
    /// Both seats filled, waiting for both ready signals
    Ready { deadline: f64, ready: [bool; 2] },
    /// Bodies placed, play starts at `ends_at`
    Countdown { ends_at: f64 },
    Playing,
    /// Simulation frozen after a goal, win check at `resolve_at`
    Goal { scorer: Seat, resolve_at: f64 },
    /// A player just reached match point, play resumes at `resume_at`
    Reach { scorer: Seat, resume_at: f64 },
    /// Match decided, rematch needs both ready signals before `deadline`
    GameOver {
        winner: Seat,
        deadline: f64,
        rematch: [bool; 2],
    },
}

impl Phase {
    /// Wire name of the phase
    pub fn name(&self) -> &'static str {
        match self {
            Phase::WaitingPlayers => "waiting_players",
            Phase::Ready { .. } => "ready",
            Phase::Countdown { .. } => "countdown",
            Phase::Playing => "playing",
            Phase::Goal { .. } => "goal",
            Phase::Reach { .. } => "reach",
            Phase::GameOver { .. } => "gameover",
        }
    }
}

/// Which side the puck is served to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Serve {
    /// Puck on seat 1's half, paddle 1 just below it
    SeatOne,
    SeatTwo,
}

/// Full state of one match. Replaced wholesale on reset.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    /// Incremented each time the state is replaced
    pub generation: u64,
    pub phase: Phase,

    pub puck: RigidBody,
    pub paddle1: Paddle,
    pub paddle2: Paddle,

    pub score1: u32,
    pub score2: u32,
    pub is_deuce: bool,
    pub player1_reach: bool,
    pub player2_reach: bool,

    pub player1_name: String,
    pub player2_name: String,
}

impl MatchState {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            phase: Phase::WaitingPlayers,
            puck: RigidBody::puck(rink::CENTER_X, rink::CENTER_Y),
            paddle1: Paddle::new(100.0, rink::CENTER_Y, 0.0),
            paddle2: Paddle::new(700.0, rink::CENTER_Y, PI),
            score1: 0,
            score2: 0,
            is_deuce: false,
            player1_reach: false,
            player2_reach: false,
            player1_name: String::new(),
            player2_name: String::new(),
        }
    }

    /// Fresh instance with the next generation number
    pub fn successor(&self) -> Self {
        Self::new(self.generation + 1)
    }

    pub fn paddle_mut(&mut self, seat: Seat) -> &mut Paddle {
        match seat {
            Seat::One => &mut self.paddle1,
            Seat::Two => &mut self.paddle2,
        }
    }

    pub fn score(&self, seat: Seat) -> u32 {
        match seat {
            Seat::One => self.score1,
            Seat::Two => self.score2,
        }
    }

    pub fn add_point(&mut self, seat: Seat) {
        match seat {
            Seat::One => self.score1 += 1,
            Seat::Two => self.score2 += 1,
        }
    }

    pub fn reach(&self, seat: Seat) -> bool {
        match seat {
            Seat::One => self.player1_reach,
            Seat::Two => self.player2_reach,
        }
    }

    pub fn set_name(&mut self, seat: Seat, name: &str) {
        let slot = match seat {
            Seat::One => &mut self.player1_name,
            Seat::Two => &mut self.player2_name,
        };
        slot.clear();
        slot.push_str(name);
    }

    /// Put the puck on the served side and both paddles home, all at rest.
    /// The served player's paddle sits just below the puck.
    pub fn place_bodies(&mut self, serve: Serve) {
        let (puck_x, p1, p2) = match serve {
            Serve::SeatOne => (200.0, (200.0, 450.0), (700.0, 300.0)),
            Serve::SeatTwo => (600.0, (100.0, 300.0), (600.0, 450.0)),
        };

        self.puck = RigidBody::puck(puck_x, rink::CENTER_Y);
        self.paddle1 = Paddle::new(p1.0, p1.1, 0.0);
        self.paddle2 = Paddle::new(p2.0, p2.1, PI);
    }

    /// Placement after a goal: the player who conceded gets the puck
    pub fn place_after_goal(&mut self, scorer: Seat) {
        let serve = match scorer {
            Seat::One => Serve::SeatTwo,
            Seat::Two => Serve::SeatOne,
        };
        self.place_bodies(serve);
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(0)
    }
}
