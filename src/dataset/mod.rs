//! Training set generation.
//!
//! Walks an input tree of page images, each with a companion PAGE XML file
//! in a sibling `page/` directory (`scans/0001.jpg` pairs with
//! `scans/page/0001.xml`), and writes:
//!
//! - `images/{name}.jpg`: the source image, resized to the pixel budget or
//!   the longest-side limit
//! - `labels/{name}.png`: the label mask (text-line channels or typed
//!   regions), resized with nearest-neighbour
//! - `gt/{name}.xml`: a copy of the PAGE file
//! - `classes.txt`: the class table for the enabled channels
//! - `set_data.csv`: the headerless (image, label) manifest
//!
//! Images are processed one at a time. A failing image (missing PAGE file,
//! unreadable image, output name already taken) is recorded in the
//! [`BuildReport`] and the build moves on to the next one. An image that
//! fails part-way through writing leaves none of its outputs behind.

mod naming;
mod report;
pub mod resize;

pub use naming::{output_basename, NamingScheme};
pub use report::{BuildReport, ImageFailure};
pub use resize::{
    longest_side_dimensions, save_resized, target_dimensions, Interpolation, ResizeTarget,
};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::classes::{class_table, region_class_table};
use crate::config::BuildConfig;
use crate::error::PagemaskError;
use crate::manifest::{write_manifest, ManifestEntry};
use crate::mask::{rasterize, rasterize_regions, MaskMode, MaskOptions};
use crate::page::{line_geometries, read_page_xml};

pub const IMAGES_DIR: &str = "images";
pub const LABELS_DIR: &str = "labels";
pub const GT_DIR: &str = "gt";
pub const CLASSES_FILE: &str = "classes.txt";
pub const MANIFEST_FILE: &str = "set_data.csv";

const PAGE_DIR: &str = "page";
const PAGE_EXTENSION: &str = "xml";
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "tif", "tiff"];

/// Build a training set from `input` into `output`.
///
/// Returns an error only for problems that affect the whole build (bad
/// options, unreadable input root, unwritable output root). Per-image
/// problems are collected in the returned report.
pub fn build_dataset(
    input: &Path,
    output: &Path,
    config: &BuildConfig,
) -> Result<BuildReport, PagemaskError> {
    config.validate()?;

    if !input.is_dir() {
        return Err(PagemaskError::InputLayoutInvalid {
            path: input.to_path_buf(),
            message: "input must be a directory".to_string(),
        });
    }

    let images = discover_images(input)?;
    let layout = OutputLayout::create(output)?;
    let opts = config.mask_options();
    info!(
        images = images.len(),
        input = %input.display(),
        output = %layout.root.display(),
        "building dataset"
    );

    let mut used_names: HashMap<String, PathBuf> = HashMap::new();
    let mut entries = Vec::with_capacity(images.len());
    let mut failures = Vec::new();

    for image_path in &images {
        let name = output_basename(image_path, input, config.naming);
        let result = match used_names.get(&name) {
            Some(first) => Err(PagemaskError::DuplicateOutputName {
                name: name.clone(),
                image: image_path.clone(),
                first: first.clone(),
            }),
            None => process_image(image_path, &name, &layout, config, &opts),
        };

        match result {
            Ok(entry) => {
                used_names.insert(name, image_path.clone());
                entries.push(entry);
            }
            Err(err) => {
                warn!(image = %image_path.display(), error = %err, "skipping image");
                failures.push(ImageFailure {
                    image: image_path.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    let classes = match config.mask_mode {
        MaskMode::Lines => class_table(opts.channels(), config.multilabel),
        MaskMode::Regions => region_class_table(config.multilabel),
    };
    let classes_path = layout.root.join(CLASSES_FILE);
    classes.write(&classes_path)?;

    let manifest_path = layout.root.join(MANIFEST_FILE);
    write_manifest(&manifest_path, &entries)?;

    info!(
        written = entries.len(),
        failed = failures.len(),
        classes = classes.len(),
        "dataset build finished"
    );

    Ok(BuildReport {
        images_found: images.len(),
        entries,
        failures,
        classes,
        manifest_path,
        classes_path,
    })
}

/// Find every image under `root`, sorted by relative path.
///
/// `page/` directories are not searched.
pub fn discover_images(root: &Path) -> Result<Vec<PathBuf>, PagemaskError> {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == PAGE_DIR)
        });

    let mut images = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| PagemaskError::InputLayoutInvalid {
            path: root.to_path_buf(),
            message: format!("failed while traversing input directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            images.push(entry.into_path());
        }
    }

    images.sort_by_cached_key(|path| rel_string(root, path));
    Ok(images)
}

/// Where the PAGE file for `image` is expected: `page/{stem}.xml` next to it.
pub fn companion_page_path(image: &Path) -> PathBuf {
    let dir = image.parent().unwrap_or_else(|| Path::new(""));
    let mut file_name = image.file_stem().unwrap_or_default().to_os_string();
    file_name.push(".");
    file_name.push(PAGE_EXTENSION);
    dir.join(PAGE_DIR).join(file_name)
}

/// Locate the PAGE file for `image`, failing if it does not exist.
pub fn find_companion(image: &Path) -> Result<PathBuf, PagemaskError> {
    let expected = companion_page_path(image);
    if expected.is_file() {
        Ok(expected)
    } else {
        Err(PagemaskError::CompanionNotFound {
            image: image.to_path_buf(),
            expected,
        })
    }
}

#[derive(Clone, Debug)]
struct OutputLayout {
    root: PathBuf,
    images_dir: PathBuf,
    labels_dir: PathBuf,
    gt_dir: PathBuf,
}

impl OutputLayout {
    fn create(output: &Path) -> Result<Self, PagemaskError> {
        fs::create_dir_all(output).map_err(PagemaskError::Io)?;
        let root = fs::canonicalize(output).map_err(PagemaskError::Io)?;

        let layout = Self {
            images_dir: root.join(IMAGES_DIR),
            labels_dir: root.join(LABELS_DIR),
            gt_dir: root.join(GT_DIR),
            root,
        };
        for dir in [&layout.images_dir, &layout.labels_dir, &layout.gt_dir] {
            fs::create_dir_all(dir).map_err(PagemaskError::Io)?;
        }
        Ok(layout)
    }
}

fn process_image(
    image_path: &Path,
    name: &str,
    layout: &OutputLayout,
    config: &BuildConfig,
    opts: &MaskOptions,
) -> Result<ManifestEntry, PagemaskError> {
    let page_path = find_companion(image_path)?;
    let document = read_page_xml(&page_path)?;

    let source = image::open(image_path)
        .map_err(|source| PagemaskError::ImageDecode {
            path: image_path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let (width, height) = source.dimensions();

    let label = match config.mask_mode {
        MaskMode::Lines => {
            let lines = line_geometries(&document);
            let mask = rasterize(width, height, &lines, opts);
            debug!(
                image = %image_path.display(),
                lines = lines.len(),
                thickness = ?mask.baseline_thickness,
                radius = ?mask.endpoint_radius,
                skipped_endpoints = mask.skipped_endpoints,
                "rasterized mask"
            );
            mask.image
        }
        MaskMode::Regions => rasterize_regions(width, height, &document.layout),
    };

    let outputs = ImageOutputs::new(layout, name);
    if let Err(err) = outputs.write(&source, &label, &page_path, config) {
        outputs.remove_written();
        return Err(err);
    }

    Ok(ManifestEntry::new(outputs.image, outputs.label))
}

/// The three files written for one input image.
struct ImageOutputs {
    image: PathBuf,
    label: PathBuf,
    gt: PathBuf,
}

impl ImageOutputs {
    fn new(layout: &OutputLayout, name: &str) -> Self {
        Self {
            image: layout.images_dir.join(format!("{name}.jpg")),
            label: layout.labels_dir.join(format!("{name}.png")),
            gt: layout.gt_dir.join(format!("{name}.{PAGE_EXTENSION}")),
        }
    }

    fn write(
        &self,
        source: &RgbImage,
        label: &RgbImage,
        page_path: &Path,
        config: &BuildConfig,
    ) -> Result<(), PagemaskError> {
        let target = config.resize_target();
        save_resized(
            source,
            &self.image,
            target,
            Interpolation::Linear,
            ImageFormat::Jpeg,
        )?;
        save_resized(
            label,
            &self.label,
            target,
            Interpolation::Nearest,
            ImageFormat::Png,
        )?;
        fs::copy(page_path, &self.gt).map_err(PagemaskError::Io)?;
        Ok(())
    }

    /// Delete whichever outputs were already written.
    fn remove_written(&self) {
        for path in [&self.image, &self.label, &self.gt] {
            if path.is_file() {
                if let Err(err) = fs::remove_file(path) {
                    warn!(path = %path.display(), error = %err, "could not remove partial output");
                }
            }
        }
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn companion_lives_in_sibling_page_dir() {
        assert_eq!(
            companion_page_path(Path::new("/in/EPFL_set/0001.jpg")),
            PathBuf::from("/in/EPFL_set/page/0001.xml")
        );
        assert_eq!(
            companion_page_path(Path::new("scan.v2.tif")),
            PathBuf::from("page/scan.v2.xml")
        );
    }

    #[test]
    fn missing_companion_is_reported() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let image = temp.path().join("a.jpg");
        fs::write(&image, b"not really a jpeg").expect("write image");

        let err = find_companion(&image).unwrap_err();
        assert!(matches!(err, PagemaskError::CompanionNotFound { .. }));
    }

    #[test]
    fn discovery_skips_page_dirs_and_other_files() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = temp.path();
        for rel in [
            "B_set/2.JPG",
            "A_set/1.png",
            "A_set/notes.txt",
            "A_set/page/1.xml",
            "A_set/page/stray.jpg",
            "C_set/deep/3.tiff",
        ] {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
            fs::write(&path, b"").expect("write file");
        }

        let images = discover_images(root).expect("discover");
        let rels: Vec<String> = images.iter().map(|p| rel_string(root, p)).collect();
        assert_eq!(rels, vec!["A_set/1.png", "B_set/2.JPG", "C_set/deep/3.tiff"]);
    }
}
