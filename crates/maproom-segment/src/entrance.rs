//! Entrance zones
//!
//! A doorway on the map is a registered circular zone a wand selection
//! is allowed to grow through even where a strong edge would normally
//! stop it. Locking is reported so the UI can surface which doorway a
//! room selection latched onto.

use maproom_core::Point;

/// Scale applied to a zone's radius for the post-snap proximity check
pub const POST_SNAP_RADIUS_SCALE: f64 = 1.5;

/// A doorway the wand may lock onto across a strong edge
#[derive(Debug, Clone, PartialEq)]
pub struct EntranceZone {
    pub id: String,
    pub center: Point,
    pub radius: f64,
}

impl EntranceZone {
    /// Create a new zone
    pub fn new(id: impl Into<String>, center: Point, radius: f64) -> Self {
        Self {
            id: id.into(),
            center,
            radius,
        }
    }

    /// Whether the point lies inside the zone
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.center.distance_to(p) <= self.radius
    }

    /// Whether the point lies within `scale` radii of the center
    #[inline]
    pub fn near(&self, p: Point, scale: f64) -> bool {
        self.center.distance_to(p) <= self.radius * scale
    }
}

/// First zone containing the point, if any
pub fn zone_containing(zones: &[EntranceZone], p: Point) -> Option<&EntranceZone> {
    zones.iter().find(|z| z.contains(p))
}

/// First zone the snapped contour grazes
///
/// Run after snapping: a selection can be pulled onto a doorway it never
/// grew through, and the lock state must reflect that too. Proximity is
/// tested at 1.5x the zone radius.
pub fn zone_near_contour<'a>(
    contour: &[Point],
    zones: &'a [EntranceZone],
) -> Option<&'a EntranceZone> {
    zones
        .iter()
        .find(|z| contour.iter().any(|p| z.near(*p, POST_SNAP_RADIUS_SCALE)))
}
