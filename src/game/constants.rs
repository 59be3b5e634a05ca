//! Game constants: rink geometry, body materials, integration tuning and rules

/// Rink geometry
pub mod rink {
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;
    /// Inset of the short-edge walls
    pub const WALL_MARGIN: f32 = 15.0;
    /// Goal mouth on both short edges
    pub const GOAL_Y_MIN: f32 = 200.0;
    pub const GOAL_Y_MAX: f32 = 400.0;
    pub const CENTER_X: f32 = WIDTH / 2.0;
    pub const CENTER_Y: f32 = HEIGHT / 2.0;
}

/// Surface coefficients shared by both roles
pub mod material {
    pub const RESTITUTION: f32 = 0.9;
    pub const FRICTION: f32 = 0.3;
}

pub mod puck {
    pub const MASS: f32 = 1.0;
    pub const RADIUS: f32 = 15.0;
    /// Multiplicative velocity decay per tick
    pub const FRICTION: f32 = 0.998;
    pub const SPIN_DRAG: f32 = 0.03;
    pub const SPIN_FRICTION: f32 = 0.995;
    pub const MAGNUS_COEF: f32 = 0.13;
    /// Below these the Magnus force is skipped
    pub const MAGNUS_MIN_SPEED: f32 = 0.1;
    pub const MAGNUS_MIN_SPIN: f32 = 0.1;
}

pub mod paddle {
    use std::f32::consts::PI;

    pub const MASS: f32 = 2.5;
    pub const RADIUS: f32 = 30.0;
    pub const ACCELERATION: f32 = 7500.0;
    pub const DRAG: f32 = 2.0;
    pub const FRICTION: f32 = 0.9;
    /// Steering stops inside this distance from the target
    pub const ARRIVE_DISTANCE: f32 = 1.0;
    pub const ANGULAR_ACCELERATION: f32 = 48.0;
    pub const MAX_SPIN: f32 = 8.0 * PI;
    pub const SPIN_DRAG: f32 = 0.12;
    pub const SPIN_FRICTION: f32 = 0.97;
}

/// Match rules and phase timing (seconds)
pub mod rules {
    pub const WIN_SCORE: u32 = 5;
    /// Lead required to win once both players reach match point
    pub const DEUCE_LEAD: u32 = 2;
    pub const READY_TIMEOUT: f64 = 20.0;
    pub const GAMEOVER_TIMEOUT: f64 = 20.0;
    pub const COUNTDOWN: f64 = 3.0;
    pub const GOAL_DELAY: f64 = 3.0;
    pub const REACH_DELAY: f64 = 3.0;
    pub const NICKNAME_MAX_CHARS: usize = 12;
}
