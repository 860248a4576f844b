//! PAGE XML layout documents.
//!
//! This module holds the in-memory model of a parsed PAGE document
//! (text regions containing text lines, each with an outline polygon and a
//! baseline polyline, plus the typed layout regions with their outlines),
//! the PAGE XML reader that produces it, and the flattening step that turns
//! a document into per-line geometry for rasterization.
//!
//! # Example
//!
//! ```
//! use pagemask::page::{from_page_xml_str, line_geometries};
//!
//! let xml = r#"<PcGts><Page imageFilename="a.jpg" imageWidth="100" imageHeight="50">
//!   <TextRegion id="r1">
//!     <TextLine id="l1">
//!       <Coords points="0,0 10,0 10,8 0,8"/>
//!       <Baseline points="0,6 10,6"/>
//!     </TextLine>
//!   </TextRegion>
//! </Page></PcGts>"#;
//!
//! let document = from_page_xml_str(xml).unwrap();
//! let lines = line_geometries(&document);
//! assert_eq!(lines.len(), 1);
//! assert_eq!(lines[0].baseline.len(), 2);
//! ```

mod geometry;
pub mod io_page_xml;
mod model;

pub use geometry::{line_geometries, LineGeometry};
pub use io_page_xml::{from_page_xml_slice, from_page_xml_str, read_page_xml};
pub use model::{LayoutRegion, PageDocument, Point, RegionKind, TextLine, TextRegion};
