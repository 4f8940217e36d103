//! Heading deviation geometry.
//!
//! Steering stages compare where an agent is pointing with where its next
//! target lies. Both vectors are flattened onto the ground plane and normalized
//! before comparison, so the results are bounded to `[-1, 1]` regardless of
//! distances or slopes.
//!
//! # Sign convention
//!
//! The world frame is right-handed with `z` up. [`cross_deviation`] is positive
//! when the target lies to the agent's left and negative when it lies to the
//! right.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Planar vectors shorter than this are treated as having no direction.
const MIN_PLANAR_LENGTH: f32 = 2.0 * f32::EPSILON;

/// Read-only view of an agent's pose, supplied by the actor layer.
pub trait AgentPose {
    /// Centre of the agent.
    fn location(&self) -> Point3<f32>;
    /// Forward direction; need not be normalized.
    fn forward(&self) -> Vector3<f32>;
    /// Half of the bounding box length along the forward axis.
    fn half_length(&self) -> f32;
}

/// Plain pose snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Centre of the agent.
    pub location: Point3<f32>,
    /// Forward direction.
    pub forward: Vector3<f32>,
    /// Half of the bounding box length.
    pub half_length: f32,
}

impl AgentState {
    /// Create a pose snapshot.
    #[must_use]
    pub const fn new(location: Point3<f32>, forward: Vector3<f32>, half_length: f32) -> Self {
        Self {
            location,
            forward,
            half_length,
        }
    }
}

impl AgentPose for AgentState {
    fn location(&self) -> Point3<f32> {
        self.location
    }

    fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    fn half_length(&self) -> f32 {
        self.half_length
    }
}

fn planar_unit(v: Vector3<f32>) -> Option<Vector3<f32>> {
    let flat = Vector3::new(v.x, v.y, 0.0);
    let length = flat.norm();
    (length > MIN_PLANAR_LENGTH).then(|| flat / length)
}

/// Z component of `heading × direction_to_target`.
///
/// Positive means the target is to the left. Returns `0.0` when the agent has
/// no planar heading or the target coincides with it.
///
/// # Examples
///
/// ```
/// use trafficmanager_waypoint::{AgentState, Point3, Vector3, cross_deviation};
///
/// let agent = AgentState::new(Point3::origin(), Vector3::x(), 2.0);
/// assert!(cross_deviation(&agent, &Point3::new(5.0, -5.0, 0.0)) < 0.0);
/// ```
#[must_use]
pub fn cross_deviation<A: AgentPose + ?Sized>(agent: &A, target: &Point3<f32>) -> f32 {
    let Some(heading) = planar_unit(agent.forward()) else {
        return 0.0;
    };
    let Some(direction) = planar_unit(target - agent.location()) else {
        return 0.0;
    };
    heading.cross(&direction).z.clamp(-1.0, 1.0)
}

/// Dot product of the heading and the direction to the target.
///
/// `1.0` means the target is straight ahead, `-1.0` straight behind. With
/// `use_rear_reference` the direction is measured from the rear of the
/// agent's bounding box instead of its centre, which is what reversing and
/// alignment manoeuvres compare against.
#[must_use]
pub fn dot_deviation<A: AgentPose + ?Sized>(
    agent: &A,
    target: &Point3<f32>,
    use_rear_reference: bool,
) -> f32 {
    let Some(heading) = planar_unit(agent.forward()) else {
        return 0.0;
    };
    let origin = if use_rear_reference {
        agent.location() - heading * agent.half_length()
    } else {
        agent.location()
    };
    let Some(direction) = planar_unit(target - origin) else {
        return 0.0;
    };
    heading.dot(&direction).clamp(-1.0, 1.0)
}
