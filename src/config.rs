//! Dataset build configuration.
//!
//! A [`BuildConfig`] can come from defaults, from a YAML file, or from both
//! with CLI flags layered on top:
//!
//! ```yaml
//! target_pixel_budget: 1000000
//! multilabel: true
//! draw_lines: true
//! baseline_thickness_fraction: 0.25
//! naming: relative-path
//! ```
//!
//! Region masks resize by longest side instead of pixel count:
//!
//! ```yaml
//! mask_mode: regions
//! max_dimension: 2048
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::{NamingScheme, ResizeTarget};
use crate::error::PagemaskError;
use crate::mask::{MaskMode, MaskOptions};

/// All recognized build options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Pixel count of the resized outputs; `None` keeps the source size.
    pub target_pixel_budget: Option<u64>,
    /// Longest output side in pixels; outputs are never enlarged.
    pub max_dimension: Option<u32>,
    pub mask_mode: MaskMode,
    /// Append per-component presence bits to each class row.
    pub multilabel: bool,
    pub draw_baselines: bool,
    pub draw_lines: bool,
    /// Baseline thickness as a fraction of the mean line height.
    #[serde(alias = "baseline_thickness")]
    pub baseline_thickness_fraction: f64,
    pub draw_endpoints: bool,
    /// Endpoint marker diameter in pixels at the reference canvas height.
    pub endpoint_diameter: u32,
    pub naming: NamingScheme,
}

impl Default for BuildConfig {
    fn default() -> Self {
        let mask = MaskOptions::default();
        Self {
            target_pixel_budget: None,
            max_dimension: None,
            mask_mode: MaskMode::default(),
            multilabel: false,
            draw_baselines: mask.draw_baselines,
            draw_lines: mask.draw_lines,
            baseline_thickness_fraction: mask.baseline_thickness_fraction,
            draw_endpoints: mask.draw_endpoints,
            endpoint_diameter: mask.endpoint_diameter,
            naming: NamingScheme::default(),
        }
    }
}

impl BuildConfig {
    /// Load a config from a YAML file; missing keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, PagemaskError> {
        let raw = fs::read_to_string(path).map_err(PagemaskError::Io)?;
        serde_yaml::from_str(&raw).map_err(|source| PagemaskError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The mask drawing options described by this config.
    pub fn mask_options(&self) -> MaskOptions {
        MaskOptions {
            draw_baselines: self.draw_baselines,
            draw_lines: self.draw_lines,
            draw_endpoints: self.draw_endpoints,
            baseline_thickness_fraction: self.baseline_thickness_fraction,
            endpoint_diameter: self.endpoint_diameter,
        }
    }

    /// How outputs are resized, if at all.
    pub fn resize_target(&self) -> Option<ResizeTarget> {
        match (self.target_pixel_budget, self.max_dimension) {
            (Some(budget), _) => Some(ResizeTarget::PixelBudget(budget)),
            (None, Some(side)) => Some(ResizeTarget::LongestSide(side)),
            (None, None) => None,
        }
    }

    /// Reject option values that cannot produce a meaningful mask.
    pub fn validate(&self) -> Result<(), PagemaskError> {
        let fraction = self.baseline_thickness_fraction;
        if !(fraction.is_finite() && fraction >= 0.0) {
            return Err(PagemaskError::InvalidOptions {
                message: format!(
                    "baseline thickness fraction must be finite and non-negative (got {fraction})"
                ),
            });
        }

        if self.endpoint_diameter == 0 {
            return Err(PagemaskError::InvalidOptions {
                message: "endpoint diameter must be greater than 0".to_string(),
            });
        }

        if self.target_pixel_budget == Some(0) {
            return Err(PagemaskError::InvalidOptions {
                message: "target pixel budget must be greater than 0".to_string(),
            });
        }

        if self.max_dimension == Some(0) {
            return Err(PagemaskError::InvalidOptions {
                message: "max dimension must be greater than 0".to_string(),
            });
        }

        if self.target_pixel_budget.is_some() && self.max_dimension.is_some() {
            return Err(PagemaskError::InvalidOptions {
                message: "set either a target pixel budget or a max dimension, not both"
                    .to_string(),
            });
        }

        Ok(())
    }
}
