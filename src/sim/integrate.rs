//! Fixed-timestep gravity integration

use glam::Vec2;

/// Advance one tick of semi-implicit Euler under constant downward gravity.
///
/// Velocity is updated first and the new velocity moves the position, which
/// keeps bounce energy from creeping upward the way explicit Euler does.
/// Gravity only touches the vertical axis. Horizontal velocity still carries
/// the ball sideways (there are no walls), so a kick with `vx != 0` drifts.
#[inline]
pub fn integrate(pos: &mut Vec2, vel: &mut Vec2, gravity: f32, dt: f32) {
    vel.y -= gravity * dt;
    pos.x += vel.x * dt;
    pos.y += vel.y * dt;
}
