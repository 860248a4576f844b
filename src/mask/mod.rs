//! Label mask rasterization.
//!
//! A mask has the same pixel size as its source image and one RGB component
//! per drawn channel: baselines in red, filled line outlines in green and
//! baseline endpoints in blue. Channels are drawn independently, so a pixel
//! can belong to several of them at once.
//!
//! Stroke and marker sizes scale with the page: the baseline stroke is a
//! fraction of the page's typical line height (estimated with
//! [`robust_stats`](crate::stats::robust_stats)), and the endpoint markers
//! scale with canvas height relative to [`REFERENCE_HEIGHT`].
//!
//! In [`MaskMode::Regions`] the mask instead holds layout regions painted
//! with their type colour (see [`rasterize_regions`]).

mod draw;
mod regions;

pub use regions::rasterize_regions;

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classes::{Channel, ChannelSet};
use crate::page::LineGeometry;
use crate::stats::{robust_stats, RobustStats};

/// Canvas height the default endpoint diameter is calibrated against.
pub const REFERENCE_HEIGHT: f64 = 1100.0;

/// Baseline strokes are never thinner than this fraction of canvas height.
pub const MIN_THICKNESS_FRACTION: f64 = 0.002;

/// What a label mask encodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MaskMode {
    /// Text-line channels: baselines, line outlines, endpoints.
    #[default]
    Lines,
    /// Layout regions filled with their type colour.
    Regions,
}

/// Drawing options for one mask.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskOptions {
    pub draw_baselines: bool,
    pub draw_lines: bool,
    pub draw_endpoints: bool,
    /// Baseline thickness as a fraction of the mean line height.
    pub baseline_thickness_fraction: f64,
    /// Endpoint marker diameter at [`REFERENCE_HEIGHT`].
    pub endpoint_diameter: u32,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            draw_baselines: true,
            draw_lines: false,
            draw_endpoints: false,
            baseline_thickness_fraction: 0.2,
            endpoint_diameter: 20,
        }
    }
}

impl MaskOptions {
    pub fn channels(&self) -> ChannelSet {
        ChannelSet {
            baselines: self.draw_baselines,
            lines: self.draw_lines,
            endpoints: self.draw_endpoints,
        }
    }
}

/// A rendered mask plus the values used to draw it.
#[derive(Clone, Debug)]
pub struct Mask {
    pub image: RgbImage,
    /// Line-height statistics, when baselines were drawn from outlines.
    pub line_height: Option<RobustStats>,
    /// Baseline stroke thickness in pixels, when baselines were drawn.
    pub baseline_thickness: Option<u32>,
    /// Endpoint marker radius in pixels, when endpoints were drawn.
    pub endpoint_radius: Option<u32>,
    /// Lines whose endpoint markers were skipped (baseline with < 2 points).
    pub skipped_endpoints: usize,
}

/// Rasterize line geometry into a `width` x `height` mask.
///
/// A page without lines produces an all-zero mask whatever the options.
pub fn rasterize(width: u32, height: u32, lines: &[LineGeometry], opts: &MaskOptions) -> Mask {
    let mut mask = Mask {
        image: RgbImage::new(width, height),
        line_height: None,
        baseline_thickness: None,
        endpoint_radius: None,
        skipped_endpoints: 0,
    };

    if lines.is_empty() {
        return mask;
    }

    if opts.draw_baselines {
        let heights: Vec<f64> = lines.iter().filter_map(LineGeometry::outline_height).collect();
        let stats = robust_stats(&heights);
        if let Some(stats) = &stats {
            debug!(
                retained = stats.retained,
                total = stats.total,
                mean = stats.mean,
                median = stats.median,
                "line height statistics"
            );
        }

        let thickness =
            baseline_thickness(height, stats.as_ref(), opts.baseline_thickness_fraction);
        let mut buffer = GrayImage::new(width, height);
        for line in lines {
            draw::stroke_polyline(&mut buffer, &line.baseline, thickness, draw::INK);
        }
        composite(&mut mask.image, &buffer, Channel::Baselines);

        mask.line_height = stats;
        mask.baseline_thickness = Some(thickness);
    }

    if opts.draw_lines {
        let mut buffer = GrayImage::new(width, height);
        for line in lines.iter().filter(|line| !line.outline.is_empty()) {
            draw::fill_polygon(&mut buffer, &line.outline, draw::INK);
        }
        composite(&mut mask.image, &buffer, Channel::Lines);
    }

    if opts.draw_endpoints {
        let radius = endpoint_radius(height, opts.endpoint_diameter);
        let mut buffer = GrayImage::new(width, height);
        for (index, line) in lines.iter().enumerate() {
            match (line.baseline.first(), line.baseline.last()) {
                (Some(start), Some(end)) if line.baseline.len() >= 2 => {
                    draw::fill_disc(&mut buffer, *start, radius as f64, draw::INK);
                    draw::fill_disc(&mut buffer, *end, radius as f64, draw::INK);
                }
                _ => {
                    warn!(
                        line = index,
                        baseline_len = line.baseline.len(),
                        "skipping endpoints of a baseline with fewer than 2 points"
                    );
                    mask.skipped_endpoints += 1;
                }
            }
        }
        composite(&mut mask.image, &buffer, Channel::Endpoints);
        mask.endpoint_radius = Some(radius);
    }

    mask
}

/// Absolute baseline stroke thickness in whole pixels (at least 1).
///
/// `max(canvas_height * 0.002, fraction * mean_line_height)`, truncated.
/// Without line-height statistics only the canvas floor applies.
pub fn baseline_thickness(canvas_height: u32, line_height: Option<&RobustStats>, fraction: f64) -> u32 {
    let floor = canvas_height as f64 * MIN_THICKNESS_FRACTION;
    let relative = line_height.map_or(0.0, |stats| fraction * stats.mean);
    (floor.max(relative) as u32).max(1)
}

/// Endpoint marker radius in whole pixels for a canvas of the given height.
pub fn endpoint_radius(canvas_height: u32, diameter: u32) -> u32 {
    (diameter as f64 / 2.0 * (canvas_height as f64 / REFERENCE_HEIGHT)) as u32
}

fn composite(target: &mut RgbImage, buffer: &GrayImage, channel: Channel) {
    let component = channel.component();
    for (pixel, value) in target.pixels_mut().zip(buffer.pixels()) {
        pixel[component] = value[0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Point;

    fn line(baseline: &[(f64, f64)], outline: &[(f64, f64)]) -> LineGeometry {
        LineGeometry {
            baseline: baseline.iter().copied().map(Point::from).collect(),
            outline: outline.iter().copied().map(Point::from).collect(),
        }
    }

    fn all_on() -> MaskOptions {
        MaskOptions {
            draw_baselines: true,
            draw_lines: true,
            draw_endpoints: true,
            ..Default::default()
        }
    }

    fn component_is_empty(image: &RgbImage, component: usize) -> bool {
        image.pixels().all(|p| p[component] == 0)
    }

    #[test]
    fn no_lines_gives_blank_mask() {
        let mask = rasterize(37, 23, &[], &all_on());
        assert_eq!(mask.image.dimensions(), (37, 23));
        assert!(mask.image.pixels().all(|p| p.0 == [0, 0, 0]));
        assert_eq!(mask.baseline_thickness, None);
    }

    #[test]
    fn two_baselines_stroke_red_channel_only() {
        let lines = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)], &[(0.0, 0.0), (10.0, 0.0), (10.0, 20.0), (0.0, 20.0)]),
            line(&[(0.0, 20.0), (10.0, 20.0)], &[(0.0, 10.0), (10.0, 10.0), (10.0, 30.0), (0.0, 30.0)]),
        ];
        let mask = rasterize(100, 100, &lines, &MaskOptions::default());

        assert_eq!(mask.baseline_thickness, Some(4));
        assert!(component_is_empty(&mask.image, 1));
        assert!(component_is_empty(&mask.image, 2));

        let red_rows: Vec<u32> = (0..100)
            .filter(|y| mask.image.get_pixel(5, *y)[0] == 255)
            .collect();
        assert_eq!(red_rows, vec![0, 1, 2, 19, 20, 21, 22]);
        assert_eq!(mask.image.get_pixel(50, 20)[0], 0);
    }

    #[test]
    fn thickness_never_drops_below_canvas_floor() {
        let lines = vec![line(&[(0.0, 500.0), (900.0, 500.0)], &[(0.0, 499.0), (900.0, 501.0)])];
        let mask = rasterize(1000, 2000, &lines, &MaskOptions::default());
        assert_eq!(mask.baseline_thickness, Some(4));
    }

    #[test]
    fn missing_outlines_fall_back_to_floor() {
        assert_eq!(baseline_thickness(1000, None, 0.2), 2);
        assert_eq!(baseline_thickness(10, None, 0.2), 1);
    }

    #[test]
    fn short_baseline_skips_endpoints_and_keeps_going() {
        let lines = vec![
            line(&[(50.0, 50.0)], &[]),
            line(&[(10.0, 80.0), (90.0, 80.0)], &[]),
        ];
        let opts = MaskOptions {
            draw_baselines: false,
            draw_endpoints: true,
            ..Default::default()
        };
        let mask = rasterize(100, 1100, &lines, &opts);

        assert_eq!(mask.endpoint_radius, Some(10));
        assert_eq!(mask.skipped_endpoints, 1);
        assert_eq!(mask.image.get_pixel(50, 50)[2], 0);
        assert_eq!(mask.image.get_pixel(10, 80)[2], 255);
        assert_eq!(mask.image.get_pixel(90, 80)[2], 255);
        assert!(component_is_empty(&mask.image, 0));
    }

    #[test]
    fn endpoint_radius_scales_with_height() {
        assert_eq!(endpoint_radius(1100, 20), 10);
        assert_eq!(endpoint_radius(2200, 20), 20);
        assert_eq!(endpoint_radius(100, 20), 0);
    }

    #[test]
    fn overlapping_channels_accumulate() {
        let lines = vec![line(
            &[(10.0, 30.0), (90.0, 30.0)],
            &[(5.0, 10.0), (95.0, 10.0), (95.0, 35.0), (5.0, 35.0)],
        )];
        let mask = rasterize(100, 1100, &lines, &all_on());

        assert_eq!(mask.baseline_thickness, Some(5));
        assert_eq!(mask.image.get_pixel(50, 30).0, [255, 255, 0]);
        assert_eq!(mask.image.get_pixel(10, 30).0, [255, 255, 255]);
        assert_eq!(mask.image.get_pixel(50, 20).0, [0, 255, 0]);
        assert_eq!(mask.image.get_pixel(50, 60).0, [0, 0, 0]);
    }

    #[test]
    fn lines_channel_fills_outline() {
        let lines = vec![line(&[], &[(20.0, 20.0), (60.0, 20.0), (60.0, 40.0), (20.0, 40.0)])];
        let opts = MaskOptions {
            draw_baselines: false,
            draw_lines: true,
            ..Default::default()
        };
        let mask = rasterize(80, 80, &lines, &opts);
        assert_eq!(mask.image.get_pixel(40, 30).0, [0, 255, 0]);
        assert_eq!(mask.image.get_pixel(10, 10).0, [0, 0, 0]);
    }
}
