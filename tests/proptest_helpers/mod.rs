#![allow(dead_code)]

use pagemask::mask::MaskOptions;
use pagemask::page::{LayoutRegion, LineGeometry, Point, RegionKind};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Points that may fall outside a 100 x 80 canvas.
pub fn arb_point() -> BoxedStrategy<Point> {
    (-50.0f64..150.0, -50.0f64..150.0)
        .prop_map(|(x, y)| Point::new(x, y))
        .boxed()
}

/// Lines with possibly degenerate baselines (0 or 1 point) and outlines.
pub fn arb_lines(max_lines: usize) -> BoxedStrategy<Vec<LineGeometry>> {
    proptest::collection::vec(
        (
            proptest::collection::vec(arb_point(), 0..6),
            proptest::collection::vec(arb_point(), 0..8),
        )
            .prop_map(|(baseline, outline)| LineGeometry { baseline, outline }),
        0..=max_lines,
    )
    .boxed()
}

pub fn arb_mask_options() -> BoxedStrategy<MaskOptions> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        0.0f64..1.0,
        1u32..60,
    )
        .prop_map(
            |(draw_baselines, draw_lines, draw_endpoints, thickness_fraction, endpoint_diameter)| {
                MaskOptions {
                    draw_baselines,
                    draw_lines,
                    draw_endpoints,
                    baseline_thickness_fraction: thickness_fraction,
                    endpoint_diameter,
                }
            },
        )
        .boxed()
}

/// Typed regions with possibly degenerate coordinate lists.
pub fn arb_regions(max_regions: usize) -> BoxedStrategy<Vec<LayoutRegion>> {
    proptest::collection::vec(
        (
            proptest::sample::select(RegionKind::ALL.to_vec()),
            proptest::collection::vec(arb_point(), 0..8),
        )
            .prop_map(|(kind, coords)| LayoutRegion {
                kind,
                id: None,
                coords,
            }),
        0..=max_regions,
    )
    .boxed()
}
