//! Rigid bodies: the puck and the two paddles

use super::constants::{material, paddle, puck};

/// Circular rigid body
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    // Kinematics
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Angular velocity in radians per second
    pub spin: f32,
    /// Integrated orientation, kept in [0, 2π)
    pub spin_angle: f32,

    // Material (fixed per role)
    pub mass: f32,
    pub radius: f32,
    pub restitution: f32,
    pub friction: f32,
    pub is_static: bool,
}

impl RigidBody {
    pub fn new(x: f32, y: f32, mass: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            spin: 0.0,
            spin_angle: 0.0,
            mass,
            radius,
            restitution: material::RESTITUTION,
            friction: material::FRICTION,
            is_static: false,
        }
    }

    /// A puck at rest
    pub fn puck(x: f32, y: f32) -> Self {
        Self::new(x, y, puck::MASS, puck::RADIUS)
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    /// 0.5·m·r² for dynamic bodies, infinite for static geometry
    pub fn moment_of_inertia(&self) -> f32 {
        if self.is_static {
            f32::INFINITY
        } else {
            0.5 * self.mass * self.radius * self.radius
        }
    }

    /// Inverse mass, zero for static bodies
    pub fn inv_mass(&self) -> f32 {
        if self.is_static {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Apply an impulse, optionally at a world-space contact point.
    ///
    /// This is the only place collisions change velocity or spin.
    pub fn apply_impulse(&mut self, impulse_x: f32, impulse_y: f32, contact: Option<(f32, f32)>) {
        if self.is_static {
            return;
        }

        self.vx += impulse_x / self.mass;
        self.vy += impulse_y / self.mass;

        if let Some((cx, cy)) = contact {
            let rx = cx - self.x;
            let ry = cy - self.y;
            let torque = rx * impulse_y - ry * impulse_x;
            self.spin += torque / self.moment_of_inertia();
        }
    }

    /// Velocity of the material point at `(px, py)`, including spin
    pub fn velocity_at(&self, px: f32, py: f32) -> (f32, f32) {
        let rx = px - self.x;
        let ry = py - self.y;
        (self.vx - self.spin * ry, self.vy + self.spin * rx)
    }
}

/// Player-controlled paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub body: RigidBody,
    /// Last commanded pointer location, clamped to the rink
    pub target_x: f32,
    pub target_y: f32,
    /// Spin intent: -1, 0 or 1
    pub spin_direction: i8,
}

impl Paddle {
    /// Paddle at rest with its target on its own position
    pub fn new(x: f32, y: f32, spin_angle: f32) -> Self {
        let mut body = RigidBody::new(x, y, paddle::MASS, paddle::RADIUS);
        body.spin_angle = spin_angle;
        Self {
            body,
            target_x: x,
            target_y: y,
            spin_direction: 0,
        }
    }
}
