#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

/// A text line for fixture PAGE files.
pub struct FixtureLine {
    pub baseline: Vec<(i32, i32)>,
    pub outline: Vec<(i32, i32)>,
}

impl FixtureLine {
    pub fn new(baseline: &[(i32, i32)], outline: &[(i32, i32)]) -> Self {
        Self {
            baseline: baseline.to_vec(),
            outline: outline.to_vec(),
        }
    }
}

/// The two-line page used by the end-to-end checks: baselines at y=0 and
/// y=20, outlines 20 px high.
pub fn two_line_page() -> Vec<FixtureLine> {
    vec![
        FixtureLine::new(&[(0, 0), (10, 0)], &[(0, 0), (10, 0), (10, 20), (0, 20)]),
        FixtureLine::new(&[(0, 20), (10, 20)], &[(0, 10), (10, 10), (10, 30), (0, 30)]),
    ]
}

fn points_attr(points: &[(i32, i32)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn page_xml(image_name: &str, width: u32, height: u32, lines: &[FixtureLine]) -> String {
    let mut xml = String::new();
    writeln!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>").unwrap();
    writeln!(
        xml,
        "<PcGts xmlns=\"http://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15\">"
    )
    .unwrap();
    writeln!(
        xml,
        "  <Page imageFilename=\"{image_name}\" imageWidth=\"{width}\" imageHeight=\"{height}\">"
    )
    .unwrap();
    if !lines.is_empty() {
        writeln!(xml, "    <TextRegion id=\"r0\">").unwrap();
        for (i, line) in lines.iter().enumerate() {
            writeln!(xml, "      <TextLine id=\"r0l{i}\">").unwrap();
            if !line.outline.is_empty() {
                writeln!(xml, "        <Coords points=\"{}\"/>", points_attr(&line.outline))
                    .unwrap();
            }
            if !line.baseline.is_empty() {
                writeln!(
                    xml,
                    "        <Baseline points=\"{}\"/>",
                    points_attr(&line.baseline)
                )
                .unwrap();
            }
            writeln!(xml, "      </TextLine>").unwrap();
        }
        writeln!(xml, "    </TextRegion>").unwrap();
    }
    writeln!(xml, "  </Page>").unwrap();
    writeln!(xml, "</PcGts>").unwrap();
    xml
}

/// Write a solid grey image; the format follows the extension.
pub fn write_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    RgbImage::from_pixel(width, height, Rgb([200, 200, 200]))
        .save(path)
        .expect("write image");
}

/// Write the companion PAGE file of `image` (`page/{stem}.xml`).
pub fn write_page(image: &Path, width: u32, height: u32, lines: &[FixtureLine]) -> PathBuf {
    let dir = image.parent().expect("image parent").join("page");
    fs::create_dir_all(&dir).expect("create page dir");

    let stem = image.file_stem().expect("image stem").to_string_lossy();
    let name = image.file_name().expect("image name").to_string_lossy();
    let path = dir.join(format!("{stem}.xml"));
    fs::write(&path, page_xml(&name, width, height, lines)).expect("write page xml");
    path
}

/// Write an image together with its PAGE file.
pub fn write_document(image: &Path, width: u32, height: u32, lines: &[FixtureLine]) -> PathBuf {
    write_image(image, width, height);
    write_page(image, width, height, lines)
}
