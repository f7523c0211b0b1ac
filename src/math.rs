//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec3` / `Quat` inputs, making them straightforward to
//! unit-test.

use bevy::prelude::{Quat, Vec3};

/// Cubic ease-out curve: fast start, gentle deceleration.
///
/// `t` should be in `[0, 1]`. Returns `1 - (1 - t)^3`.
///
/// Used for the navbar label reveal animation.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Frame-rate-independent exponential approach of `current` toward `target`.
///
/// `rate` is the decay constant per second; higher values converge faster.
/// Equivalent to `lerp(target, current, e^(-rate * dt))`, so repeated calls
/// with small `dt` produce the same trajectory as fewer calls with large `dt`.
pub fn exp_decay(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    target + (current - target) * (-rate * dt).exp()
}

/// Componentwise [`exp_decay`] for positions and scales.
pub fn exp_decay_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    target + (current - target) * (-rate * dt).exp()
}

/// Spherical approach of `current` toward `target` with exponential decay.
pub fn exp_decay_quat(current: Quat, target: Quat, rate: f32, dt: f32) -> Quat {
    current.slerp(target, 1.0 - (-rate * dt).exp())
}

/// Whether an interpolation driven by [`exp_decay_vec3`] / [`exp_decay_quat`]
/// has arrived: position error and angular error both under tolerance.
pub fn has_arrived(
    pos_error: f32,
    angle_error: f32,
    pos_tolerance: f32,
    angle_tolerance: f32,
) -> bool {
    pos_error < pos_tolerance && angle_error < angle_tolerance
}

/// Normalizes an angular offset to `(-PI, PI]` so rotations take the short way.
pub fn wrap_angle(offset: f32) -> f32 {
    let two_pi = std::f32::consts::TAU;
    let wrapped = (offset + std::f32::consts::PI).rem_euclid(two_pi) - std::f32::consts::PI;
    if wrapped == -std::f32::consts::PI {
        std::f32::consts::PI
    } else {
        wrapped
    }
}

/// Opacity of a fading entity at `age` seconds into a `lifetime`-second fade.
///
/// Linear from 1.0 down to 0.0, clamped at zero past the end of life.
pub fn fade_alpha(age: f32, lifetime: f32) -> f32 {
    if lifetime <= 0.0 {
        return 0.0;
    }
    (1.0 - age / lifetime).max(0.0)
}

/// Velocity after `dt` seconds of exponential damping.
pub fn damp_velocity(velocity: Vec3, damping: f32, dt: f32) -> Vec3 {
    velocity * (-damping * dt).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ease_out_cubic ──────────────────────────────────────────────

    #[test]
    fn ease_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
    }

    #[test]
    fn ease_is_ahead_of_linear_at_midpoint() {
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    // ── exp_decay ───────────────────────────────────────────────────

    #[test]
    fn decay_moves_toward_target() {
        let next = exp_decay(0.0, 10.0, 5.0, 0.016);
        assert!(next > 0.0 && next < 10.0);
    }

    #[test]
    fn decay_at_target_stays_put() {
        assert!((exp_decay(3.0, 3.0, 5.0, 0.016) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn decay_is_framerate_independent() {
        // Two 8ms steps should land where one 16ms step lands.
        let two_steps = exp_decay(exp_decay(0.0, 1.0, 4.0, 0.008), 1.0, 4.0, 0.008);
        let one_step = exp_decay(0.0, 1.0, 4.0, 0.016);
        assert!((two_steps - one_step).abs() < 1e-5);
    }

    #[test]
    fn decay_vec3_converges() {
        let mut v = Vec3::ZERO;
        let target = Vec3::new(1.0, 2.0, 3.0);
        for _ in 0..600 {
            v = exp_decay_vec3(v, target, 8.0, 0.016);
        }
        assert!((v - target).length() < 1e-3);
    }

    #[test]
    fn decay_quat_converges() {
        let mut q = Quat::IDENTITY;
        let target = Quat::from_rotation_y(1.2);
        for _ in 0..600 {
            q = exp_decay_quat(q, target, 8.0, 0.016);
        }
        assert!(q.angle_between(target) < 1e-3);
    }

    // ── has_arrived ─────────────────────────────────────────────────

    #[test]
    fn arrival_requires_both_errors_under_tolerance() {
        assert!(has_arrived(0.01, 0.001, 0.05, 0.01));
        assert!(!has_arrived(0.1, 0.001, 0.05, 0.01));
        assert!(!has_arrived(0.01, 0.1, 0.05, 0.01));
    }

    // ── wrap_angle ──────────────────────────────────────────────────

    #[test]
    fn wrap_small_angles_unchanged() {
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-0.5) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn wrap_large_positive_angle() {
        let w = wrap_angle(3.0 * std::f32::consts::PI / 2.0);
        assert!((w + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn wrap_full_turn_is_zero() {
        assert!(wrap_angle(std::f32::consts::TAU).abs() < 1e-5);
    }

    #[test]
    fn wrap_result_in_half_open_interval() {
        for i in -20..20 {
            let w = wrap_angle(i as f32 * 0.7);
            assert!(w > -std::f32::consts::PI - 1e-6 && w <= std::f32::consts::PI + 1e-6);
        }
    }

    // ── fade_alpha ──────────────────────────────────────────────────

    #[test]
    fn fade_starts_opaque_and_ends_transparent() {
        assert_eq!(fade_alpha(0.0, 2.0), 1.0);
        assert_eq!(fade_alpha(2.0, 2.0), 0.0);
    }

    #[test]
    fn fade_clamps_past_lifetime() {
        assert_eq!(fade_alpha(5.0, 2.0), 0.0);
    }

    #[test]
    fn fade_zero_lifetime_is_transparent() {
        assert_eq!(fade_alpha(0.0, 0.0), 0.0);
    }

    // ── damp_velocity ───────────────────────────────────────────────

    #[test]
    fn damping_shrinks_velocity() {
        let v = Vec3::new(4.0, 0.0, 0.0);
        let damped = damp_velocity(v, 2.0, 0.5);
        assert!(damped.length() < v.length());
        assert!(damped.x > 0.0, "direction preserved");
    }

    #[test]
    fn zero_damping_preserves_velocity() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!((damp_velocity(v, 0.0, 1.0) - v).length() < 1e-6);
    }
}
