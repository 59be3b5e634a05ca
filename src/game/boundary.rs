//! Rink walls, centre line and goal mouths

use super::body::RigidBody;
use super::constants::rink;
use super::state::Seat;

/// Boundary checks against the fixed rink
pub struct Boundary;

impl Boundary {
    /// Clamp a body inside the rink, reflecting its velocity inward scaled
    /// by restitution. The short walls are open across the goal band.
    /// With `half` set, the body is also kept on that seat's side of the
    /// centre line. Returns whether any correction happened.
    pub fn check_wall_collisions(body: &mut RigidBody, half: Option<Seat>) -> bool {
        let mut collided = false;

        // Top
        if body.y - body.radius < 0.0 {
            body.y = body.radius;
            body.vy = body.vy.abs() * body.restitution;
            collided = true;
        }

        // Bottom
        if body.y + body.radius > rink::HEIGHT {
            body.y = rink::HEIGHT - body.radius;
            body.vy = -body.vy.abs() * body.restitution;
            collided = true;
        }

        let in_goal_band = Self::in_goal_band(body.y);

        // Left
        if body.x - body.radius < rink::WALL_MARGIN && !in_goal_band {
            body.x = rink::WALL_MARGIN + body.radius;
            body.vx = body.vx.abs() * body.restitution;
            collided = true;
        }

        // Right
        if body.x + body.radius > rink::WIDTH - rink::WALL_MARGIN && !in_goal_band {
            body.x = rink::WIDTH - rink::WALL_MARGIN - body.radius;
            body.vx = -body.vx.abs() * body.restitution;
            collided = true;
        }

        if let Some(seat) = half {
            collided |= Self::confine_to_half(body, seat);
        }

        collided
    }

    /// Keep a paddle on its own side of the centre line
    pub fn confine_to_half(body: &mut RigidBody, seat: Seat) -> bool {
        match seat {
            Seat::One if body.x + body.radius > rink::CENTER_X => {
                body.x = rink::CENTER_X - body.radius;
                body.vx = -body.vx.abs() * body.restitution;
                true
            }
            Seat::Two if body.x - body.radius < rink::CENTER_X => {
                body.x = rink::CENTER_X + body.radius;
                body.vx = body.vx.abs() * body.restitution;
                true
            }
            _ => false,
        }
    }

    /// Seat that scored, if the puck has fully left the rink through a goal
    /// mouth. The left goal belongs to seat 1, so leaving left scores for 2.
    pub fn check_goal(puck: &RigidBody) -> Option<Seat> {
        if !Self::in_goal_band(puck.y) {
            return None;
        }

        if puck.x + puck.radius < 0.0 {
            Some(Seat::Two)
        } else if puck.x - puck.radius > rink::WIDTH {
            Some(Seat::One)
        } else {
            None
        }
    }

    pub fn in_goal_band(y: f32) -> bool {
        (rink::GOAL_Y_MIN..=rink::GOAL_Y_MAX).contains(&y)
    }
}
