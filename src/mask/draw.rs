//! Drawing primitives on top of `imageproc`.
//!
//! All shapes go through [`to_pixel`], which rounds half up, so a shape and
//! its translate by whole pixels cover the same pixel pattern.

use image::Luma;
use imageproc::drawing::{
    draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut, Canvas,
};
use imageproc::point::Point as PixelPoint;

use crate::page::Point;

pub(crate) const INK: Luma<u8> = Luma([255]);

/// Coordinates and radii are clamped to this magnitude before drawing so
/// that integer edge arithmetic cannot overflow.
const COORD_LIMIT: f64 = 1_000_000.0;

/// Vertex count of the polygon standing in for a round cap or join.
const CAP_VERTICES: usize = 16;

/// Stroke an open polyline with round caps and joins.
///
/// A horizontal stroke of thickness `t` covers exactly `t` pixel rows.
pub(crate) fn stroke_polyline<C: Canvas>(
    canvas: &mut C,
    points: &[Point],
    thickness: u32,
    color: C::Pixel,
) {
    match points {
        [] => {}
        [single] => fill_round_cap(canvas, *single, half_width(thickness), color),
        _ if thickness <= 1 => {
            for pair in points.windows(2) {
                draw_line_segment_mut(canvas, to_f32(pair[0]), to_f32(pair[1]), color);
            }
        }
        _ => {
            let half = half_width(thickness);
            for pair in points.windows(2) {
                stroke_segment(canvas, pair[0], pair[1], half, color);
            }
            for point in points {
                fill_round_cap(canvas, *point, half, color);
            }
        }
    }
}

/// Fill a closed polygon.
///
/// Polygons with fewer than three distinct vertices are drawn as a hairline.
pub(crate) fn fill_polygon<C: Canvas>(canvas: &mut C, points: &[Point], color: C::Pixel) {
    let mut vertices: Vec<PixelPoint<i32>> = points.iter().map(|p| to_pixel(*p)).collect();
    vertices.dedup();
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    if vertices.len() >= 3 {
        draw_polygon_mut(canvas, &vertices, color);
    } else {
        let mut closed = points.to_vec();
        if let Some(first) = points.first() {
            closed.push(*first);
        }
        stroke_polyline(canvas, &closed, 1, color);
    }
}

/// Fill a disc of the given radius (truncated to whole pixels).
pub(crate) fn fill_disc<C: Canvas>(canvas: &mut C, center: Point, radius: f64, color: C::Pixel) {
    let center = to_pixel(center);
    let radius = radius.clamp(0.0, COORD_LIMIT) as i32;
    draw_filled_circle_mut(canvas, (center.x, center.y), radius, color);
}

/// Fill a round cap of the stroke's exact half-width.
///
/// Drawn as a polygon so it is rounded the same way as the segment quads
/// it joins.
fn fill_round_cap<C: Canvas>(canvas: &mut C, center: Point, half: f64, color: C::Pixel) {
    let outline: Vec<Point> = (0..CAP_VERTICES)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / CAP_VERTICES as f64;
            Point::new(center.x + half * angle.cos(), center.y + half * angle.sin())
        })
        .collect();
    fill_polygon(canvas, &outline, color);
}

fn stroke_segment<C: Canvas>(canvas: &mut C, from: Point, to: Point, half: f64, color: C::Pixel) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return;
    }

    let (nx, ny) = (-dy / length * half, dx / length * half);
    let corners = [
        Point::new(from.x + nx, from.y + ny),
        Point::new(to.x + nx, to.y + ny),
        Point::new(to.x - nx, to.y - ny),
        Point::new(from.x - nx, from.y - ny),
    ];
    fill_polygon(canvas, &corners, color);
}

fn half_width(thickness: u32) -> f64 {
    (thickness.saturating_sub(1) as f64 / 2.0).min(COORD_LIMIT)
}

fn clamp(value: f64) -> f64 {
    value.clamp(-COORD_LIMIT, COORD_LIMIT)
}

/// Round to the nearest pixel, halves up.
fn round_half_up(value: f64) -> i32 {
    (clamp(value) + 0.5).floor() as i32
}

fn to_pixel(point: Point) -> PixelPoint<i32> {
    PixelPoint::new(round_half_up(point.x), round_half_up(point.y))
}

fn to_f32(point: Point) -> (f32, f32) {
    (clamp(point.x) as f32, clamp(point.y) as f32)
}
