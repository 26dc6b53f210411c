//! The segmentation provider seam
//!
//! Tools talk to segmentation through this capability trait so a
//! synchronous in-process implementation and an offloaded one are
//! interchangeable. `LocalProvider` is the synchronous fallback and the
//! reference semantics.

use crate::error::SessionResult;
use maproom_core::{Bounds, FloatMap, GrayMap, Point, RoomMask};
use maproom_filter::build_edge_map;
use maproom_segment::{
    EdgeWandParams, RefineOptions, WandOptions, WandResult, magic_wand, magic_wand_with_edges,
};
use maproom_trace::{CostPyramid, build_cost_pyramid};
use maproom_vector::rasterize_polygon;

/// Capability object for segmentation operations
pub trait SegmentationProvider {
    /// Wand selection; edge-aware when `edge` is given
    fn magic_wand_select(
        &self,
        layers: &[&[u8]],
        width: u32,
        height: u32,
        seed: (u32, u32),
        options: &WandOptions,
        edge: Option<&EdgeWandParams<'_>>,
    ) -> SessionResult<WandResult>;

    /// Re-grow a mask boundary against an energy field
    fn refine_boundary_to_edges(
        &self,
        mask: &RoomMask,
        energy: &FloatMap,
        options: &RefineOptions,
    ) -> SessionResult<RoomMask>;

    /// Multi-scale edge energy of a grayscale image
    fn edge_energy_multi_scale(&self, gray: &GrayMap, depth: u32) -> SessionResult<CostPyramid>;

    /// Rasterize a freehand path into a filled mask
    fn rasterize_freehand_path(
        &self,
        points: &[Point],
        width: u32,
        height: u32,
        bounds: Bounds,
    ) -> SessionResult<RoomMask>;

    /// Close interior holes
    fn fill_mask_interior(&self, mask: &RoomMask) -> RoomMask;

    /// Disc dilation by a pixel radius
    fn dilate_mask(&self, mask: &RoomMask, radius: u32) -> SessionResult<RoomMask>;

    /// Gaussian feather
    fn feather_mask(&self, mask: &RoomMask, sigma: f32) -> SessionResult<RoomMask>;

    /// Max-composite `overlay` into `base`
    fn composite_max(&self, base: &mut RoomMask, overlay: &RoomMask) -> SessionResult<()>;
}

/// Synchronous in-process provider
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProvider;

impl SegmentationProvider for LocalProvider {
    fn magic_wand_select(
        &self,
        layers: &[&[u8]],
        width: u32,
        height: u32,
        seed: (u32, u32),
        options: &WandOptions,
        edge: Option<&EdgeWandParams<'_>>,
    ) -> SessionResult<WandResult> {
        let result = match edge {
            Some(edge) => magic_wand_with_edges(layers, width, height, seed, options, edge)?,
            None => magic_wand(layers, width, height, seed, options)?,
        };
        Ok(result)
    }

    fn refine_boundary_to_edges(
        &self,
        mask: &RoomMask,
        energy: &FloatMap,
        options: &RefineOptions,
    ) -> SessionResult<RoomMask> {
        Ok(maproom_segment::refine_boundary_to_edges(mask, energy, options)?)
    }

    fn edge_energy_multi_scale(&self, gray: &GrayMap, depth: u32) -> SessionResult<CostPyramid> {
        let edges = build_edge_map(gray)?;
        let energy = maproom_filter::normalize(edges.magnitudes());
        Ok(build_cost_pyramid(&energy, depth)?)
    }

    fn rasterize_freehand_path(
        &self,
        points: &[Point],
        width: u32,
        height: u32,
        bounds: Bounds,
    ) -> SessionResult<RoomMask> {
        let mask = rasterize_polygon(points, width, height, bounds)?;
        Ok(maproom_segment::fill_mask_interior(&mask))
    }

    fn fill_mask_interior(&self, mask: &RoomMask) -> RoomMask {
        maproom_segment::fill_mask_interior(mask)
    }

    fn dilate_mask(&self, mask: &RoomMask, radius: u32) -> SessionResult<RoomMask> {
        Ok(maproom_segment::dilate_mask(mask, radius)?)
    }

    fn feather_mask(&self, mask: &RoomMask, sigma: f32) -> SessionResult<RoomMask> {
        Ok(maproom_segment::feather_mask(mask, sigma)?)
    }

    fn composite_max(&self, base: &mut RoomMask, overlay: &RoomMask) -> SessionResult<()> {
        base.composite_max(overlay)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_freehand_fills_interior() {
        let provider = LocalProvider;
        let square = [
            Point::new(0.2, 0.2),
            Point::new(0.8, 0.2),
            Point::new(0.8, 0.8),
            Point::new(0.2, 0.8),
        ];
        let mask = provider
            .rasterize_freehand_path(&square, 20, 20, Bounds::full())
            .unwrap();
        assert!(mask.get(10, 10).unwrap() > 0);
    }

    #[test]
    fn test_edge_energy_pyramid_depth() {
        let provider = LocalProvider;
        let mut gray = GrayMap::new(64, 64).unwrap();
        for y in 0..64 {
            for x in 32..64 {
                gray.set_unchecked(x, y, 255);
            }
        }
        let pyramid = provider.edge_energy_multi_scale(&gray, 3).unwrap();
        assert_eq!(pyramid.levels().len(), 3);
        assert!(pyramid.finest().data().max_value() > 0.0);
    }

    #[test]
    fn test_wand_select_plain() {
        let provider = LocalProvider;
        let rgba = vec![100u8; 8 * 8 * 4];
        let result = provider
            .magic_wand_select(&[&rgba], 8, 8, (4, 4), &WandOptions::default(), None)
            .unwrap();
        assert_eq!(result.accepted, 64);
    }
}
