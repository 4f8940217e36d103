//! Waypoint identity hashing.
//!
//! A waypoint key coarsens a road position to "the same patch of lane": the
//! longitudinal offset is floored into 0.5 cm buckets before hashing, so two
//! positions in the same bucket share a key. The bucket size decides which
//! close-together positions count as the same place for collision purposes and
//! must not change.
//!
//! Fields are folded in a fixed order (road, section, lane, quantized offset),
//! each one seeding the next round of xxHash64. xxHash64 is a published,
//! platform independent algorithm, unlike `DefaultHasher`, so keys written by one
//! process can be read back by another.

use core::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::xxh64;

/// Number of quantization buckets per metre of longitudinal offset (0.5 cm each).
pub const S_BUCKETS_PER_METRE: f64 = 200.0;

/// Stable 64-bit identity of a waypoint.
///
/// Serializes as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointKey(u64);

impl WaypointKey {
    /// Wrap a previously persisted key.
    #[must_use]
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw 64-bit value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<WaypointKey> for u64 {
    fn from(key: WaypointKey) -> Self {
        key.0
    }
}

impl fmt::Display for WaypointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Quantize a longitudinal offset into its 0.5 cm bucket.
///
/// Uses `floor`, so negative offsets round toward negative infinity. The
/// float-to-int conversion saturates and maps NaN to 0, keeping the function
/// total for every input.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn quantize_s(s: f64) -> i64 {
    (s * S_BUCKETS_PER_METRE).floor() as i64
}

/// Compute the key of a road position.
///
/// # Examples
///
/// ```
/// use trafficmanager_waypoint::compute_key;
///
/// let key = compute_key(5, 2, -1, 12.345);
/// assert_eq!(key, compute_key(5, 2, -1, 12.345));
/// assert_ne!(key, compute_key(5, 2, 1, 12.345));
/// ```
#[must_use]
pub fn compute_key(road_id: u32, section_id: u32, lane_id: i32, s: f64) -> WaypointKey {
    let mut seed = 0_u64;
    seed = xxh64(&road_id.to_le_bytes(), seed);
    seed = xxh64(&section_id.to_le_bytes(), seed);
    seed = xxh64(&lane_id.to_le_bytes(), seed);
    seed = xxh64(&quantize_s(s).to_le_bytes(), seed);
    WaypointKey(seed)
}
