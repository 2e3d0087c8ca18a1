//! Client pose: the canonical ingress type for camera position on the ring.
//!
//! Clients may send either the modern RingArc-based fields or the legacy
//! (`ring_position`, `width_offset`) fields during migration. [`Pose::new`]
//! accepts a [`PoseRequest`] with both sets optional and normalises to a
//! single canonical representation, preferring the new fields when both are
//! present.

use crate::error::{CoreError, Result};
use crate::frames::{normalize_s, ring_polar_from_arc, RingArc};
use serde::{Deserialize, Serialize};

/// Wire-shaped pose request: both legacy and modern fields are optional so
/// the same struct can be deserialised from either a fully modern client or
/// one still sending legacy fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoseRequest {
    /// Modern arc length, in metres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arc_length: Option<f64>,
    /// Modern angle, in radians (informational; `arc_length` is authoritative
    /// when both are present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
    /// Radial offset, in metres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    /// Vertical offset, in metres.
    pub z: f64,
    /// Active floor index.
    pub active_floor: i32,
    /// Legacy raw ring position ("legacy X"), possibly negative or
    /// out-of-range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring_position: Option<f64>,
    /// Legacy width offset; superseded by `r` when both are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_offset: Option<f64>,
}

/// A canonical, normalised client pose. Every coordinate entering the core
/// beyond this point has already passed through [`Pose::from_request`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Canonical arc length, in `[0, RING_CIRCUMFERENCE)`.
    pub s: f64,
    /// Radial offset from the ring centreline, in metres.
    pub r: f64,
    /// Vertical offset, in metres.
    pub z: f64,
    /// Active floor index.
    pub floor: i32,
}

impl Pose {
    /// Normalise a wire-level request into a canonical pose.
    ///
    /// Resolution policy (per the migration design note): prefer
    /// `arc_length` when present; otherwise fall back to `ring_position`
    /// (legacy X). Likewise, prefer `r` when present; otherwise fall back
    /// to `width_offset`. Either arc-length path is normalised through
    /// [`normalize_s`], so a legacy client sending a raw negative or
    /// out-of-range X is accepted, not rejected.
    pub fn from_request(req: &PoseRequest) -> Result<Self> {
        let raw_s = req
            .arc_length
            .or(req.ring_position)
            .ok_or_else(|| CoreError::InvalidPose("no arc length or legacy position supplied".into()))?;
        let r = req.r.or(req.width_offset).unwrap_or(0.0);
        if !raw_s.is_finite() || !r.is_finite() || !req.z.is_finite() {
            return Err(CoreError::InvalidPose(
                "pose components must be finite".into(),
            ));
        }
        Ok(Self {
            s: normalize_s(raw_s),
            r,
            z: req.z,
            floor: req.active_floor,
        })
    }

    /// This pose's position as a RingArc.
    pub fn as_ring_arc(&self) -> RingArc {
        RingArc {
            s: self.s,
            r: self.r,
            z: self.z,
        }
    }

    /// This pose's position as RingPolar.
    pub fn as_ring_polar(&self) -> Result<crate::frames::RingPolar> {
        ring_polar_from_arc(self.as_ring_arc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_modern_fields_when_both_present() {
        let req = PoseRequest {
            arc_length: Some(500.0),
            ring_position: Some(-999.0),
            r: Some(1.0),
            z: 2.0,
            active_floor: 0,
            ..Default::default()
        };
        let pose = Pose::from_request(&req).unwrap();
        assert_eq!(pose.s, 500.0);
    }

    #[test]
    fn normalises_legacy_negative_x() {
        let req = PoseRequest {
            ring_position: Some(-1.0),
            r: Some(0.0),
            z: 0.0,
            active_floor: 0,
            ..Default::default()
        };
        let pose = Pose::from_request(&req).unwrap();
        assert_eq!(pose.s, crate::constants::RING_CIRCUMFERENCE - 1.0);
    }

    #[test]
    fn rejects_missing_position() {
        let req = PoseRequest {
            r: Some(0.0),
            z: 0.0,
            active_floor: 0,
            ..Default::default()
        };
        assert!(Pose::from_request(&req).is_err());
    }

    #[test]
    fn rejects_non_finite_components() {
        let req = PoseRequest {
            arc_length: Some(f64::NAN),
            r: Some(0.0),
            z: 0.0,
            active_floor: 0,
            ..Default::default()
        };
        assert!(Pose::from_request(&req).is_err());
    }

    #[test]
    fn r_zero_on_centerline_is_not_treated_as_absent() {
        let req = PoseRequest {
            arc_length: Some(500.0),
            r: Some(0.0),
            width_offset: Some(42.0),
            z: 0.0,
            active_floor: 0,
            ..Default::default()
        };
        let pose = Pose::from_request(&req).unwrap();
        assert_eq!(pose.r, 0.0);
    }

    #[test]
    fn falls_back_to_width_offset_when_r_absent() {
        let req = PoseRequest {
            arc_length: Some(500.0),
            width_offset: Some(3.5),
            z: 0.0,
            active_floor: 0,
            ..Default::default()
        };
        let pose = Pose::from_request(&req).unwrap();
        assert_eq!(pose.r, 3.5);
    }
}
