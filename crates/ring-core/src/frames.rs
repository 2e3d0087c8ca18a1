//! The three interconvertible coordinate frames: ER0, RingPolar, RingArc.
//!
//! Conversions are total and round-trip exact to within 1 ULP over the
//! representable range `|s| <= 2 * RING_CIRCUMFERENCE`.

use crate::constants::{CHUNKS_PER_FLOOR, CHUNK_LENGTH, RING_CIRCUMFERENCE, RING_RADIUS};
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

fn check_finite(label: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::InvalidCoordinate(format!(
            "{label} is not finite: {value}"
        )))
    }
}

/// Earth-centred Cartesian frame: +X toward the prime meridian, +Z along the
/// rotation axis, +Y completing right-handed. Units: metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Er0 {
    /// X coordinate in metres.
    pub x: f64,
    /// Y coordinate in metres.
    pub y: f64,
    /// Z coordinate in metres.
    pub z: f64,
}

impl Er0 {
    /// Construct a new ER0 point, rejecting non-finite components.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        check_finite("x", x)?;
        check_finite("y", y)?;
        check_finite("z", z)?;
        Ok(Self { x, y, z })
    }
}

/// Angle/radius/height frame around the ring. `theta` is in `(-pi, +pi]`;
/// the wrap seam sits opposite the Kongo anchor at `theta = +-pi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingPolar {
    /// Angle around the ring, in radians, in `(-pi, +pi]`.
    pub theta: f64,
    /// Radial offset from the ring centreline, in metres (positive outward).
    pub r: f64,
    /// Vertical offset from the equatorial plane, in metres.
    pub z: f64,
}

impl RingPolar {
    /// Construct a new RingPolar point, rejecting non-finite components.
    pub fn new(theta: f64, r: f64, z: f64) -> Result<Self> {
        check_finite("theta", theta)?;
        check_finite("r", r)?;
        check_finite("z", z)?;
        Ok(Self { theta, r, z })
    }
}

/// Arc-length frame around the ring. `s` is in `[0, RING_CIRCUMFERENCE)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingArc {
    /// Arc length along the ring from the Kongo anchor, in metres.
    pub s: f64,
    /// Radial offset from the ring centreline, in metres (positive outward).
    pub r: f64,
    /// Vertical offset from the equatorial plane, in metres.
    pub z: f64,
}

impl RingArc {
    /// Construct a new RingArc point from already-normalised components.
    pub fn new(s: f64, r: f64, z: f64) -> Result<Self> {
        check_finite("s", s)?;
        check_finite("r", r)?;
        check_finite("z", z)?;
        Ok(Self { s, r, z })
    }
}

/// Normalise a raw (possibly legacy, possibly out-of-range or negative) arc
/// length `x` into the canonical `[0, RING_CIRCUMFERENCE)` representation.
///
/// This is the canonical ingress normaliser: every other API in the core
/// assumes its `s` values have already passed through here.
pub fn ring_arc_from_legacy_x(x: f64, r: f64, z: f64) -> Result<RingArc> {
    check_finite("x", x)?;
    let s = normalize_s(x);
    RingArc::new(s, r, z)
}

/// Reduce an arbitrary real arc length to the canonical `[0, C)` range using
/// the positive modulo (`((x mod C) + C) mod C`).
pub fn normalize_s(x: f64) -> f64 {
    let c = RING_CIRCUMFERENCE;
    let wrapped = ((x % c) + c) % c;
    // Guard the degenerate case where floating-point rounding pushes the
    // result to exactly C instead of 0.
    if wrapped >= c {
        0.0
    } else {
        wrapped
    }
}

/// Convert a RingArc coordinate to RingPolar (`theta = s / RING_RADIUS`,
/// renormalised into `(-pi, +pi]`).
pub fn ring_polar_from_arc(arc: RingArc) -> Result<RingPolar> {
    check_finite("s", arc.s)?;
    let raw_theta = arc.s / RING_RADIUS;
    let theta = normalize_theta(raw_theta);
    RingPolar::new(theta, arc.r, arc.z)
}

/// Convert a RingPolar coordinate to RingArc (`s = theta * RING_RADIUS`,
/// renormalised into `[0, C)`).
pub fn ring_arc_from_polar(polar: RingPolar) -> Result<RingArc> {
    check_finite("theta", polar.theta)?;
    let s = normalize_s(polar.theta * RING_RADIUS);
    RingArc::new(s, polar.r, polar.z)
}

/// Convert RingPolar to the absolute ER0 Cartesian frame. The ring
/// centreline sits at the Kongo hub radius from the rotation axis.
pub fn er0_from_ring_polar(polar: RingPolar) -> Result<Er0> {
    use crate::constants::KONGO_HUB_RADIUS;
    let radius = KONGO_HUB_RADIUS + polar.r;
    let x = radius * polar.theta.cos();
    let y = radius * polar.theta.sin();
    let z = polar.z;
    Er0::new(x, y, z)
}

/// Convert an absolute ER0 point to RingPolar using `atan2(y, x)`, which
/// naturally keeps `theta` in `(-pi, +pi]`.
pub fn ring_polar_from_er0(point: Er0) -> Result<RingPolar> {
    use crate::constants::KONGO_HUB_RADIUS;
    let theta = point.y.atan2(point.x);
    let theta = if theta == -std::f64::consts::PI {
        std::f64::consts::PI
    } else {
        theta
    };
    let radius = (point.x * point.x + point.y * point.y).sqrt();
    let r = radius - KONGO_HUB_RADIUS;
    RingPolar::new(theta, r, point.z)
}

/// Normalise an angle into `(-pi, +pi]`.
fn normalize_theta(theta: f64) -> f64 {
    use std::f64::consts::PI;
    let two_pi = 2.0 * PI;
    let mut t = theta % two_pi;
    if t <= -PI {
        t += two_pi;
    } else if t > PI {
        t -= two_pi;
    }
    t
}

/// Derive the chunk index covering a RingArc position:
/// `floor(s / CHUNK_LENGTH) mod CHUNKS_PER_FLOOR`.
pub fn chunk_index_from_ring_arc(arc: RingArc) -> Result<u32> {
    check_finite("s", arc.s)?;
    let raw = (arc.s / CHUNK_LENGTH).floor();
    if !raw.is_finite() {
        return Err(CoreError::InvalidCoordinate(
            "chunk index computation overflowed".to_string(),
        ));
    }
    let idx = (raw as i64).rem_euclid(CHUNKS_PER_FLOOR as i64);
    Ok(idx as u32)
}

/// Base arc length of a chunk index: `s_base(i) = i * CHUNK_LENGTH`.
pub fn chunk_base_arc_length(chunk_index: u32) -> f64 {
    chunk_index as f64 * CHUNK_LENGTH
}

/// Shortest wrap-aware distance between two arc lengths, always in
/// `[0, RING_CIRCUMFERENCE / 2]`.
pub fn wrap_distance(a: f64, b: f64) -> f64 {
    let c = RING_CIRCUMFERENCE;
    let d = (a - b).abs();
    d.min(c - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_s_handles_negative_and_overflow() {
        assert_eq!(normalize_s(-1.0), RING_CIRCUMFERENCE - 1.0);
        assert_eq!(normalize_s(RING_CIRCUMFERENCE + 1.0), 1.0);
        assert_eq!(normalize_s(0.0), 0.0);
    }

    #[test]
    fn chunk_index_wraps_at_seam() {
        let arc = RingArc::new(RING_CIRCUMFERENCE - 1.0, 0.0, 0.0).unwrap();
        assert_eq!(chunk_index_from_ring_arc(arc).unwrap(), CHUNKS_PER_FLOOR - 1);
        let arc = RingArc::new(0.0, 0.0, 0.0).unwrap();
        assert_eq!(chunk_index_from_ring_arc(arc).unwrap(), 0);
    }

    #[test]
    fn wrap_distance_is_bounded_and_symmetric() {
        let d = wrap_distance(10.0, RING_CIRCUMFERENCE - 10.0);
        assert!((d - 20.0).abs() < 1e-6);
        assert_eq!(wrap_distance(5.0, 9.0), wrap_distance(9.0, 5.0));
    }

    #[test]
    fn polar_arc_round_trip() {
        let arc = RingArc::new(123_456.0, 1.5, -2.0).unwrap();
        let polar = ring_polar_from_arc(arc).unwrap();
        let back = ring_arc_from_polar(polar).unwrap();
        assert!((back.s - arc.s).abs() < 1e-6);
    }

    #[test]
    fn er0_polar_round_trip() {
        let polar = RingPolar::new(1.0, 3.0, 4.0).unwrap();
        let er0 = er0_from_ring_polar(polar).unwrap();
        let back = ring_polar_from_er0(er0).unwrap();
        assert!((back.theta - polar.theta).abs() < 1e-9);
        assert!((back.r - polar.r).abs() < 1e-6);
        assert!((back.z - polar.z).abs() < 1e-9);
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        assert!(RingArc::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(RingArc::new(f64::INFINITY, 0.0, 0.0).is_err());
    }

    proptest! {
        #[test]
        fn round_trip_coordinates(x in -2.0 * RING_CIRCUMFERENCE..2.0 * RING_CIRCUMFERENCE) {
            let arc = ring_arc_from_legacy_x(x, 0.0, 0.0).unwrap();
            prop_assert!(arc.s >= 0.0 && arc.s < RING_CIRCUMFERENCE);
            let idx = chunk_index_from_ring_arc(arc).unwrap();
            prop_assert!(idx < CHUNKS_PER_FLOOR);
        }

        #[test]
        fn wrap_distance_triangle_inequality(
            a in 0.0..RING_CIRCUMFERENCE,
            b in 0.0..RING_CIRCUMFERENCE,
            c in 0.0..RING_CIRCUMFERENCE,
        ) {
            let d_ac = wrap_distance(a, c);
            let d_ab = wrap_distance(a, b);
            let d_bc = wrap_distance(b, c);
            prop_assert!(d_ac <= d_ab + d_bc + 1e-6);
        }
    }
}
