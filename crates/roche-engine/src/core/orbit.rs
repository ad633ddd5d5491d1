//! Keplerian orbital mechanics. Pure math, no engine state.
//!
//! Uses f64 throughout: semi-major axes reach 1e12 m and epochs grow without bound
//! under time warp.

use std::f64::consts::{PI, TAU};

use glam::{DMat3, DVec3};

use super::body::OrbitalElements;

/// Eccentricity above which Newton iteration starts from ±π (sign of M) instead of M.
const HIGH_ECC_START: f64 = 0.8;
const KEPLER_MAX_ITERATIONS: usize = 50;
const KEPLER_TOLERANCE: f64 = 1e-14;

/// Wrap an angle to [-π, π).
fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Solve Kepler's equation: E - e·sin(E) = M
/// Using Newton-Raphson iteration.
/// `mean_anomaly` in radians, returns eccentric anomaly in radians.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let m = wrap_angle(mean_anomaly);
    // From ±π on the side of M, Newton approaches the root monotonically
    let mut ea = if eccentricity < HIGH_ECC_START { m } else { PI.copysign(m) };
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (ea - eccentricity * ea.sin() - m) / (1.0 - eccentricity * ea.cos());
        ea -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    ea
}

/// Mean motion in radians per second, `None` for a degenerate orbit.
pub fn mean_motion(sma: f64, parent_gm: f64) -> Option<f64> {
    if parent_gm <= 0.0 || sma <= 0.0 {
        return None;
    }
    Some((parent_gm / (sma * sma * sma)).sqrt())
}

/// Orbital period from Kepler's third law, in seconds.
pub fn orbital_period(sma: f64, parent_gm: f64) -> Option<f64> {
    mean_motion(sma, parent_gm).map(|n| TAU / n)
}

/// Rotation from the perifocal frame (x toward periapsis) to the parent frame:
/// Rz(Ω) · Rx(i) · Rz(ω).
fn perifocal_to_parent(elements: &OrbitalElements) -> DMat3 {
    DMat3::from_rotation_z(elements.lan)
        * DMat3::from_rotation_x(elements.inc)
        * DMat3::from_rotation_z(elements.arg)
}

/// Position of a body relative to its parent at `epoch` seconds.
///
/// Returns the zero vector for roots (no parent GM or no semi-major axis)
/// without iterating.
pub fn compute_position(epoch: f64, parent_gm: f64, elements: &OrbitalElements) -> DVec3 {
    let Some(n) = mean_motion(elements.sma, parent_gm) else {
        return DVec3::ZERO;
    };
    let e = elements.ecc;
    let a = elements.sma;

    let ea = solve_kepler(elements.m0 + n * epoch, e);

    // Position in the orbital plane, origin at the focus
    let x = a * (ea.cos() - e);
    let y = a * (1.0 - e * e).sqrt() * ea.sin();

    perifocal_to_parent(elements) * DVec3::new(x, y, 0.0)
}
