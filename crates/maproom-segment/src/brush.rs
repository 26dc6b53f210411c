//! Brush stamps and strokes
//!
//! A stroke is a polyline of pointer samples rasterized as overlapping
//! disc stamps. Stamps composite into a coverage mask via max, so the
//! caller can either max-merge the stroke into a working mask (add) or
//! use it as an eraser weight with `RoomMask::erase_scaled`.

use crate::error::{SegmentError, SegmentResult};
use maproom_core::RoomMask;

/// Options for brush painting
#[derive(Debug, Clone)]
pub struct BrushOptions {
    /// Stamp radius in pixels
    pub radius: f64,
    /// Fraction of the radius that is fully opaque before falloff (0-1)
    pub hardness: f64,
    /// Stamp spacing along the stroke, as a fraction of the radius
    pub spacing: f64,
}

impl Default for BrushOptions {
    fn default() -> Self {
        Self {
            radius: 8.0,
            hardness: 0.7,
            spacing: 0.25,
        }
    }
}

impl BrushOptions {
    /// Set the stamp radius (pixels)
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius.max(0.5);
        self
    }

    /// Set the hardness
    pub fn with_hardness(mut self, hardness: f64) -> Self {
        self.hardness = hardness.clamp(0.0, 1.0);
        self
    }
}

/// One pointer sample of a stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    /// Pixel-space position
    pub x: f64,
    pub y: f64,
    /// Stylus pressure, 1.0 for a mouse
    pub pressure: f64,
}

impl StrokePoint {
    /// Create a full-pressure sample
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            pressure: 1.0,
        }
    }

    /// Create a sample with pressure
    pub fn with_pressure(x: f64, y: f64, pressure: f64) -> Self {
        Self {
            x,
            y,
            pressure: pressure.clamp(0.0, 1.0),
        }
    }
}

/// Stamp one disc into the mask (max composite)
///
/// Coverage is full inside `radius * hardness`, falls off linearly to
/// zero at `radius`, and scales with pressure.
pub fn stamp_disc(mask: &mut RoomMask, center: (f64, f64), options: &BrushOptions, pressure: f64) {
    let radius = options.radius * pressure.clamp(0.1, 1.0);
    if radius <= 0.0 {
        return;
    }
    let hard = radius * options.hardness;
    let (cx, cy) = center;

    let x0 = ((cx - radius).floor().max(0.0)) as u32;
    let y0 = ((cy - radius).floor().max(0.0)) as u32;
    let x1 = ((cx + radius).ceil().min(mask.width() as f64 - 1.0)).max(0.0) as u32;
    let y1 = ((cy + radius).ceil().min(mask.height() as f64 - 1.0)).max(0.0) as u32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d > radius {
                continue;
            }
            let coverage = if d <= hard || radius - hard < 1e-9 {
                255.0
            } else {
                255.0 * (radius - d) / (radius - hard)
            };
            let coverage = coverage.round().clamp(0.0, 255.0) as u8;
            let current = mask.get_unchecked(x, y);
            mask.set_unchecked(x, y, current.max(coverage));
        }
    }
}

/// Rasterize a stroke polyline as interpolated disc stamps
///
/// # Errors
///
/// Returns [`SegmentError::InvalidParameter`] for an empty stroke.
pub fn paint_stroke(
    mask: &mut RoomMask,
    stroke: &[StrokePoint],
    options: &BrushOptions,
) -> SegmentResult<()> {
    let Some(first) = stroke.first() else {
        return Err(SegmentError::InvalidParameter("empty stroke".into()));
    };
    stamp_disc(mask, (first.x, first.y), options, first.pressure);

    let spacing = (options.radius * options.spacing).max(0.5);
    for pair in stroke.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let dist = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        let steps = (dist / spacing).ceil() as u32;
        for s in 1..=steps.max(1) {
            let t = s as f64 / steps.max(1) as f64;
            let x = a.x + (b.x - a.x) * t;
            let y = a.y + (b.y - a.y) * t;
            let pressure = a.pressure + (b.pressure - a.pressure) * t;
            stamp_disc(mask, (x, y), options, pressure);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maproom_core::Bounds;

    fn blank(w: u32, h: u32) -> RoomMask {
        RoomMask::new(w, h, Bounds::full()).unwrap()
    }

    #[test]
    fn test_stamp_covers_disc() {
        let mut mask = blank(32, 32);
        stamp_disc(&mut mask, (16.0, 16.0), &BrushOptions::default(), 1.0);
        assert_eq!(mask.get(16, 16), Some(255));
        // Just inside the radius
        assert!(mask.get(16 + 7, 16).unwrap() > 0);
        // Outside the radius
        assert_eq!(mask.get(16 + 9, 16), Some(0));
    }

    #[test]
    fn test_hardness_falloff() {
        let mut mask = blank(32, 32);
        let options = BrushOptions::default().with_radius(10.0).with_hardness(0.5);
        stamp_disc(&mut mask, (16.0, 16.0), &options, 1.0);
        // Inside the hard core
        assert_eq!(mask.get(16, 16), Some(255));
        assert_eq!(mask.get(19, 16), Some(255));
        // In the falloff ring: partial coverage
        let rim = mask.get(16 + 8, 16).unwrap();
        assert!(rim > 0 && rim < 255, "rim coverage {rim}");
    }

    #[test]
    fn test_pressure_shrinks_stamp() {
        let mut full = blank(32, 32);
        let mut light = blank(32, 32);
        let options = BrushOptions::default().with_radius(10.0);
        stamp_disc(&mut full, (16.0, 16.0), &options, 1.0);
        stamp_disc(&mut light, (16.0, 16.0), &options, 0.4);
        assert!(light.coverage_count() < full.coverage_count());
    }

    #[test]
    fn test_stroke_is_continuous() {
        let mut mask = blank(64, 32);
        let stroke = [
            StrokePoint::new(8.0, 16.0),
            StrokePoint::new(56.0, 16.0),
        ];
        paint_stroke(&mut mask, &stroke, &BrushOptions::default()).unwrap();
        // Every column along the stroke line is covered; widely spaced
        // samples must not leave gaps between stamps
        for x in 8..=56u32 {
            assert!(mask.get(x, 16).unwrap() > 0, "gap at column {x}");
        }
    }

    #[test]
    fn test_empty_stroke_rejected() {
        let mut mask = blank(8, 8);
        assert!(paint_stroke(&mut mask, &[], &BrushOptions::default()).is_err());
    }

    #[test]
    fn test_single_point_stroke_stamps_once() {
        let mut mask = blank(32, 32);
        paint_stroke(
            &mut mask,
            &[StrokePoint::new(16.0, 16.0)],
            &BrushOptions::default(),
        )
        .unwrap();
        assert!(mask.coverage_count() > 0);
    }
}
