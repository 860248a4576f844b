use super::model::{PageDocument, Point};

/// The geometry of one text line, as consumed by the mask rasterizer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineGeometry {
    pub baseline: Vec<Point>,
    pub outline: Vec<Point>,
}

impl LineGeometry {
    /// Vertical extent of the outline (max y minus min y).
    ///
    /// Returns `None` for an empty outline so callers can leave the line out
    /// of line-height statistics.
    pub fn outline_height(&self) -> Option<f64> {
        let mut ys = self.outline.iter().map(|p| p.y);
        let first = ys.next()?;
        let (min, max) = ys.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Some(max - min)
    }
}

/// Flattens a document into per-line geometry, preserving document order.
///
/// A document without regions or lines yields an empty vector.
pub fn line_geometries(document: &PageDocument) -> Vec<LineGeometry> {
    document
        .text_lines()
        .map(|line| LineGeometry {
            baseline: line.baseline.clone(),
            outline: line.coords.clone(),
        })
        .collect()
}
