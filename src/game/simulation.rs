//! Per-tick integration of paddles and puck

use std::f32::consts::TAU;

use super::body::{Paddle, RigidBody};
use super::boundary::Boundary;
use super::constants::{paddle as paddle_k, puck as puck_k};
use super::physics::CollisionSystem;
use super::state::{MatchState, Seat};

/// Advances bodies by one tick during play
pub struct SimulationStep;

impl SimulationStep {
    /// Integrate paddles and puck, resolve contacts and report a scorer.
    /// Does not touch score or phase.
    pub fn run(state: &mut MatchState, dt: f32) -> Option<Seat> {
        Self::update_paddle(&mut state.paddle1, Seat::One, dt);
        Self::update_paddle(&mut state.paddle2, Seat::Two, dt);
        Self::update_puck(&mut state.puck, dt);

        CollisionSystem::collide(&mut state.paddle1.body, &mut state.paddle2.body);
        CollisionSystem::collide(&mut state.puck, &mut state.paddle1.body);
        CollisionSystem::collide(&mut state.puck, &mut state.paddle2.body);

        // Positional correction may have pushed a paddle out of its area
        Boundary::check_wall_collisions(&mut state.paddle1.body, Some(Seat::One));
        Boundary::check_wall_collisions(&mut state.paddle2.body, Some(Seat::Two));

        Boundary::check_goal(&state.puck)
    }

    /// Steer toward the target, apply spin intent, decay and integrate
    pub fn update_paddle(paddle: &mut Paddle, seat: Seat, dt: f32) {
        let body = &mut paddle.body;

        let dx = paddle.target_x - body.x;
        let dy = paddle.target_y - body.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > paddle_k::ARRIVE_DISTANCE {
            body.vx += dx / dist * paddle_k::ACCELERATION * dt;
            body.vy += dy / dist * paddle_k::ACCELERATION * dt;
        }

        if paddle.spin_direction != 0 {
            body.spin += paddle_k::ANGULAR_ACCELERATION * paddle.spin_direction as f32 * dt;
        }
        decay_spin(body, paddle_k::SPIN_DRAG, paddle_k::SPIN_FRICTION, dt);
        body.spin = body.spin.clamp(-paddle_k::MAX_SPIN, paddle_k::MAX_SPIN);
        body.spin_angle = (body.spin_angle + body.spin * dt).rem_euclid(TAU);

        let speed = body.speed();
        if speed > 0.0 {
            let drag = paddle_k::DRAG * speed;
            body.vx -= body.vx / speed * drag * dt;
            body.vy -= body.vy / speed * drag * dt;
        }
        body.vx *= paddle_k::FRICTION;
        body.vy *= paddle_k::FRICTION;

        body.x += body.vx * dt;
        body.y += body.vy * dt;

        Boundary::check_wall_collisions(body, Some(seat));
    }

    /// Magnus curve, spin decay, integration and wall bounces
    pub fn update_puck(puck: &mut RigidBody, dt: f32) {
        let speed = puck.speed();
        if speed > puck_k::MAGNUS_MIN_SPEED && puck.spin.abs() > puck_k::MAGNUS_MIN_SPIN {
            // Perpendicular to velocity, to its left
            let perp_x = -puck.vy / speed;
            let perp_y = puck.vx / speed;
            let force = puck_k::MAGNUS_COEF * puck.spin * speed;
            puck.vx += perp_x * force * dt;
            puck.vy += perp_y * force * dt;
        }

        decay_spin(puck, puck_k::SPIN_DRAG, puck_k::SPIN_FRICTION, dt);

        puck.x += puck.vx * dt;
        puck.y += puck.vy * dt;
        puck.spin_angle = (puck.spin_angle + puck.spin * dt).rem_euclid(TAU);

        puck.vx *= puck_k::FRICTION;
        puck.vy *= puck_k::FRICTION;

        Boundary::check_wall_collisions(puck, None);
    }
}

/// Linear drag followed by multiplicative friction
fn decay_spin(body: &mut RigidBody, drag: f32, friction: f32, dt: f32) {
    body.spin -= body.spin * drag * dt;
    body.spin *= friction;
}
