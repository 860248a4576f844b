//! Region masks: layout regions filled with their type colour.
//!
//! Regions are painted one type at a time in [`RegionKind::ALL`] order, so
//! where regions of different types overlap the later type wins. Within a
//! type, document order applies.

use image::{Rgb, RgbImage};
use tracing::debug;

use super::draw;
use crate::classes::region_color;
use crate::page::{LayoutRegion, RegionKind};

/// Paint typed layout regions into a `width` x `height` mask.
///
/// Regions with fewer than two points are skipped.
pub fn rasterize_regions(width: u32, height: u32, regions: &[LayoutRegion]) -> RgbImage {
    let mut image = RgbImage::new(width, height);
    let mut drawn = 0usize;

    for kind in RegionKind::ALL {
        let color = Rgb(region_color(kind));
        for region in regions.iter().filter(|r| r.kind == kind) {
            if region.coords.len() < 2 {
                continue;
            }
            draw::fill_polygon(&mut image, &region.coords, color);
            drawn += 1;
        }
    }

    debug!(drawn, total = regions.len(), "region mask");
    image
}
