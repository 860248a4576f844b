//! PAGE XML reader.
//!
//! Reads the subset of the PAGE content schema needed to draw masks:
//! `PcGts/Page`, the `Coords` of every typed region (nested regions
//! included), and the `Coords`/`Baseline` of each `TextLine` directly inside
//! a `TextRegion`.
//!
//! Elements are matched by local name, so every published PAGE namespace
//! (2010 through 2019) is accepted. Point lists may be given either as a
//! `points="x,y x,y ..."` attribute or as `<Point x=".." y=".."/>` children.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::model::{LayoutRegion, PageDocument, Point, RegionKind, TextLine, TextRegion};
use crate::error::PagemaskError;

/// Read and parse a PAGE XML file.
pub fn read_page_xml(path: &Path) -> Result<PageDocument, PagemaskError> {
    let xml = fs::read_to_string(path).map_err(PagemaskError::Io)?;
    parse_page_xml_str(&xml, path)
}

/// Parse PAGE XML from a UTF-8 string.
pub fn from_page_xml_str(xml: &str) -> Result<PageDocument, PagemaskError> {
    parse_page_xml_str(xml, Path::new("<memory>"))
}

/// Parse PAGE XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_page_xml_slice(bytes: &[u8]) -> Result<PageDocument, PagemaskError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| PagemaskError::PageXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_page_xml_str(xml)
}

fn parse_page_xml_str(xml: &str, path: &Path) -> Result<PageDocument, PagemaskError> {
    let document =
        roxmltree::Document::parse(xml).map_err(|source| PagemaskError::PageXmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

    let root = document.root_element();
    let page = if is_element_named(root, "Page") {
        root
    } else {
        child_element(root, "Page").ok_or_else(|| PagemaskError::PageXmlParse {
            path: path.to_path_buf(),
            message: format!("missing <Page> in <{}>", root.tag_name().name()),
        })?
    };

    let image_filename = page.attribute("imageFilename").map(ToOwned::to_owned);
    let image_width = parse_optional_u32(page, "imageWidth", path)?;
    let image_height = parse_optional_u32(page, "imageHeight", path)?;

    let mut regions = Vec::new();
    let mut layout = Vec::new();
    for node in page.descendants().filter(|node| node.is_element()) {
        let Some(kind) = RegionKind::from_element_name(node.tag_name().name()) else {
            continue;
        };
        layout.push(LayoutRegion {
            kind,
            id: node.attribute("id").map(ToOwned::to_owned),
            coords: parse_point_list(node, "Coords", path)?,
        });
        if kind != RegionKind::Text {
            continue;
        }

        let mut lines = Vec::new();
        for line in node
            .children()
            .filter(|child| is_element_named(*child, "TextLine"))
        {
            lines.push(TextLine {
                id: line.attribute("id").map(ToOwned::to_owned),
                coords: parse_point_list(line, "Coords", path)?,
                baseline: parse_point_list(line, "Baseline", path)?,
            });
        }

        regions.push(TextRegion {
            id: node.attribute("id").map(ToOwned::to_owned),
            lines,
        });
    }

    Ok(PageDocument {
        image_filename,
        image_width,
        image_height,
        regions,
        layout,
    })
}

/// Parses the point list of the `tag` child of `node`.
///
/// A missing child yields an empty list.
fn parse_point_list(node: Node<'_, '_>, tag: &str, path: &Path) -> Result<Vec<Point>, PagemaskError> {
    let Some(element) = child_element(node, tag) else {
        return Ok(Vec::new());
    };

    if let Some(raw) = element.attribute("points") {
        return parse_points_attr(raw, tag, path);
    }

    element
        .children()
        .filter(|child| is_element_named(*child, "Point"))
        .map(|point| {
            let x = parse_required_f64_attr(point, "x", path, tag)?;
            let y = parse_required_f64_attr(point, "y", path, tag)?;
            Ok(Point::new(x, y))
        })
        .collect()
}

/// Fuzz-only entrypoint for `points="x,y x,y ..."` attribute parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_points_attr(input: &str) -> Result<(), PagemaskError> {
    let _ = parse_points_attr(input, "Coords", Path::new("<fuzz>"))?;
    Ok(())
}

fn parse_points_attr(raw: &str, tag: &str, path: &Path) -> Result<Vec<Point>, PagemaskError> {
    raw.split_whitespace()
        .map(|pair| {
            let parsed = pair
                .split_once(',')
                .and_then(|(x, y)| Some(Point::new(x.parse().ok()?, y.parse().ok()?)))
                .filter(Point::is_finite);
            parsed.ok_or_else(|| PagemaskError::PageXmlParse {
                path: path.to_path_buf(),
                message: format!("invalid point '{pair}' in <{tag}>; expected 'x,y'"),
            })
        })
        .collect()
}

fn parse_required_f64_attr(
    node: Node<'_, '_>,
    attr: &str,
    path: &Path,
    context: &str,
) -> Result<f64, PagemaskError> {
    let raw = node
        .attribute(attr)
        .ok_or_else(|| PagemaskError::PageXmlParse {
            path: path.to_path_buf(),
            message: format!("missing '{attr}' on <Point> in <{context}>"),
        })?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| PagemaskError::PageXmlParse {
            path: path.to_path_buf(),
            message: format!(
                "invalid '{attr}' value '{raw}' on <Point> in <{context}>; expected a number"
            ),
        })
}

fn parse_optional_u32(
    node: Node<'_, '_>,
    attr: &str,
    path: &Path,
) -> Result<Option<u32>, PagemaskError> {
    node.attribute(attr)
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| PagemaskError::PageXmlParse {
                    path: path.to_path_buf(),
                    message: format!("invalid '{attr}' value '{raw}' on <Page>; expected u32"),
                })
        })
        .transpose()
}

fn is_element_named(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_element_named(*child, tag))
}
