//! Circle-circle collision detection and impulse resolution

use super::body::RigidBody;

/// Floor for the centre distance, avoids dividing by zero on coincident bodies
const MIN_DISTANCE: f32 = 0.001;

/// Contact between two overlapping circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first body to the second
    pub normal_x: f32,
    pub normal_y: f32,
    /// Penetration depth
    pub overlap: f32,
    /// World-space contact point on the first body's rim
    pub contact_x: f32,
    pub contact_y: f32,
}

/// Collision system for body pairs
pub struct CollisionSystem;

impl CollisionSystem {
    /// Detect overlap between two circles
    pub fn detect_circle_circle(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);

        let collision_dist = a.radius + b.radius;
        if dist >= collision_dist {
            return None;
        }

        let normal_x = dx / dist;
        let normal_y = dy / dist;

        Some(Contact {
            normal_x,
            normal_y,
            overlap: collision_dist - dist,
            contact_x: a.x + normal_x * a.radius,
            contact_y: a.y + normal_y * a.radius,
        })
    }

    /// Resolve a contact with a sequential impulse: restitution along the
    /// normal, Coulomb-clamped friction along the tangent, then positional
    /// correction. Does nothing if the bodies are already separating.
    pub fn resolve_collision(a: &mut RigidBody, b: &mut RigidBody, contact: &Contact) {
        let Contact {
            normal_x: nx,
            normal_y: ny,
            overlap,
            contact_x: cx,
            contact_y: cy,
        } = *contact;

        let (r1x, r1y) = (cx - a.x, cy - a.y);
        let (r2x, r2y) = (cx - b.x, cy - b.y);

        let (v1x, v1y) = a.velocity_at(cx, cy);
        let (v2x, v2y) = b.velocity_at(cx, cy);
        let rel_vx = v2x - v1x;
        let rel_vy = v2y - v1y;

        let rel_v_normal = rel_vx * nx + rel_vy * ny;
        if rel_v_normal >= 0.0 {
            return;
        }

        let e = (a.restitution + b.restitution) / 2.0;

        let inv_mass_normal = effective_inv_mass(a, r1x, r1y, nx, ny)
            + effective_inv_mass(b, r2x, r2y, nx, ny);
        if inv_mass_normal <= 0.0 {
            return;
        }
        let j_normal = -(1.0 + e) * rel_v_normal / inv_mass_normal;

        // Tangent is the normal rotated by 90°
        let tx = -ny;
        let ty = nx;
        let rel_v_tangent = rel_vx * tx + rel_vy * ty;
        let mu = (a.friction + b.friction) / 2.0;

        let inv_mass_tangent = effective_inv_mass(a, r1x, r1y, tx, ty)
            + effective_inv_mass(b, r2x, r2y, tx, ty);
        let j_tangent_free = if inv_mass_tangent > 0.0 {
            -rel_v_tangent / inv_mass_tangent
        } else {
            0.0
        };

        let j_tangent_max = mu * j_normal.abs();
        let j_tangent = if j_tangent_free.abs() < j_tangent_max {
            j_tangent_free
        } else if rel_v_tangent > 0.0 {
            -j_tangent_max
        } else {
            j_tangent_max
        };

        let impulse_x = j_normal * nx + j_tangent * tx;
        let impulse_y = j_normal * ny + j_tangent * ty;

        a.apply_impulse(-impulse_x, -impulse_y, Some((cx, cy)));
        b.apply_impulse(impulse_x, impulse_y, Some((cx, cy)));

        if overlap > 0.0 {
            separate(a, b, nx, ny, overlap);
        }
    }

    /// Detect and resolve in one call, returns whether the bodies touched
    pub fn collide(a: &mut RigidBody, b: &mut RigidBody) -> bool {
        match Self::detect_circle_circle(a, b) {
            Some(contact) => {
                Self::resolve_collision(a, b, &contact);
                true
            }
            None => false,
        }
    }
}

/// 1/m + (r × d)² / I along direction d, zero for static bodies
fn effective_inv_mass(body: &RigidBody, rx: f32, ry: f32, dx: f32, dy: f32) -> f32 {
    if body.is_static {
        return 0.0;
    }
    let r_cross_d = rx * dy - ry * dx;
    1.0 / body.mass + (r_cross_d * r_cross_d) / body.moment_of_inertia()
}

/// Push bodies apart along the normal, split by inverse mass
fn separate(a: &mut RigidBody, b: &mut RigidBody, nx: f32, ny: f32, overlap: f32) {
    let inv_a = a.inv_mass();
    let inv_b = b.inv_mass();
    let total = inv_a + inv_b;
    if total <= 0.0 {
        return;
    }

    let correction_a = overlap * inv_a / total;
    let correction_b = overlap * inv_b / total;

    a.x -= nx * correction_a;
    a.y -= ny * correction_a;
    b.x += nx * correction_b;
    b.y += ny * correction_b;
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn elastic(x: f32, y: f32, vx: f32, vy: f32) -> RigidBody {
        let mut body = RigidBody::new(x, y, 1.0, 15.0).with_velocity(vx, vy);
        body.restitution = 1.0;
        body
    }

    fn distance(a: &RigidBody, b: &RigidBody) -> f32 {
        ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
    }

    #[test]
    fn test_detect_separated() {
        let a = RigidBody::puck(0.0, 0.0);
        let b = RigidBody::puck(30.0, 0.0);
        assert!(CollisionSystem::detect_circle_circle(&a, &b).is_none());
    }

    #[test]
    fn test_detect_overlap_geometry() {
        let a = RigidBody::puck(0.0, 0.0);
        let b = RigidBody::puck(0.0, 20.0);

        let contact = CollisionSystem::detect_circle_circle(&a, &b).unwrap();

        assert_approx_eq!(contact.normal_x, 0.0);
        assert_approx_eq!(contact.normal_y, 1.0);
        assert_approx_eq!(contact.overlap, 10.0);
        assert_approx_eq!(contact.contact_x, 0.0);
        assert_approx_eq!(contact.contact_y, 15.0);
    }

    #[test]
    fn test_detect_coincident_centres() {
        let a = RigidBody::puck(50.0, 50.0);
        let b = RigidBody::puck(50.0, 50.0);

        let contact = CollisionSystem::detect_circle_circle(&a, &b).unwrap();
        assert!(contact.overlap.is_finite());
        assert!(contact.normal_x.is_finite() && contact.normal_y.is_finite());
    }

    #[test]
    fn test_head_on_equal_mass_swaps_velocities() {
        let mut a = elastic(0.0, 0.0, 10.0, 0.0);
        let mut b = elastic(25.0, 0.0, -10.0, 0.0);

        assert!(CollisionSystem::collide(&mut a, &mut b));

        assert_approx_eq!(a.vx, -10.0, 1e-4);
        assert_approx_eq!(b.vx, 10.0, 1e-4);
        assert_approx_eq!(a.vy, 0.0, 1e-4);
        assert_approx_eq!(b.vy, 0.0, 1e-4);
        // Central hit imparts no torque
        assert_approx_eq!(a.spin, 0.0, 1e-6);
        assert_approx_eq!(b.spin, 0.0, 1e-6);
    }

    #[test]
    fn test_resolution_removes_overlap() {
        let mut a = RigidBody::puck(100.0, 100.0).with_velocity(40.0, 15.0);
        let mut b = RigidBody::new(118.0, 110.0, 2.5, 30.0).with_velocity(-5.0, -3.0);

        assert!(CollisionSystem::collide(&mut a, &mut b));

        assert!(distance(&a, &b) >= a.radius + b.radius - 1e-3);
    }

    #[test]
    fn test_correction_split_by_inverse_mass() {
        let mut light = RigidBody::new(0.0, 0.0, 1.0, 10.0).with_velocity(1.0, 0.0);
        let mut heavy = RigidBody::new(15.0, 0.0, 4.0, 10.0);

        assert!(CollisionSystem::collide(&mut light, &mut heavy));

        // overlap 5: light moves 4, heavy moves 1
        assert_approx_eq!(light.x, -4.0, 1e-4);
        assert_approx_eq!(heavy.x, 16.0, 1e-4);
    }

    #[test]
    fn test_separating_bodies_untouched() {
        let mut a = RigidBody::puck(0.0, 0.0).with_velocity(-5.0, 0.0);
        let mut b = RigidBody::puck(20.0, 0.0).with_velocity(5.0, 0.0);
        let (before_a, before_b) = (a.clone(), b.clone());

        assert!(CollisionSystem::collide(&mut a, &mut b));

        assert_eq!(a, before_a);
        assert_eq!(b, before_b);
    }

    #[test]
    fn test_glancing_hit_imparts_spin() {
        // Puck slides along +x and clips a resting paddle above its path
        let mut puck = RigidBody::puck(0.0, 0.0).with_velocity(300.0, 0.0);
        let mut paddle = RigidBody::new(30.0, 30.0, 2.5, 30.0);

        assert!(CollisionSystem::collide(&mut puck, &mut paddle));

        assert!(puck.spin.abs() > 0.01);
        assert!(paddle.spin.abs() > 0.01);
        // Deflected away from the paddle
        assert!(puck.vy < 0.0);
    }

    #[test]
    fn test_friction_clamped_by_coulomb_limit() {
        let mut a = RigidBody::puck(0.0, 0.0).with_velocity(1.0, 0.0).with_spin(50.0);
        let mut b = RigidBody::puck(29.0, 0.0);
        a.friction = 0.0;
        b.friction = 0.0;

        assert!(CollisionSystem::collide(&mut a, &mut b));

        // Frictionless contact cannot exchange spin
        assert_approx_eq!(a.spin, 50.0, 1e-4);
        assert_approx_eq!(b.spin, 0.0, 1e-4);
    }

    #[test]
    fn test_static_body_receives_no_impulse_or_correction() {
        let mut wall = RigidBody::new(20.0, 0.0, 1.0, 10.0);
        wall.is_static = true;
        let mut puck = RigidBody::new(0.0, 0.0, 1.0, 15.0).with_velocity(10.0, 0.0);
        puck.restitution = 1.0;
        wall.restitution = 1.0;

        assert!(CollisionSystem::collide(&mut puck, &mut wall));

        assert_eq!(wall.x, 20.0);
        assert_eq!(wall.vx, 0.0);
        assert_approx_eq!(puck.vx, -10.0, 1e-4);
        assert_approx_eq!(puck.x, -5.0, 1e-4);
    }
}
