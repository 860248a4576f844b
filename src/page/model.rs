//! Core PAGE document types.

/// A point in image pixel space.
///
/// PAGE files store integer coordinates, but some producers emit decimals,
/// so points are kept as `f64` and rounded only when drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A parsed PAGE document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageDocument {
    /// `Page@imageFilename`, when present.
    pub image_filename: Option<String>,
    /// `Page@imageWidth`, when present.
    pub image_width: Option<u32>,
    /// `Page@imageHeight`, when present.
    pub image_height: Option<u32>,
    /// Text regions in document order.
    pub regions: Vec<TextRegion>,
    /// Every typed layout region (text, table, graphic, ...) with its
    /// outline, in document order.
    pub layout: Vec<LayoutRegion>,
}

impl PageDocument {
    /// Iterates over every text line, region order first, then line order.
    pub fn text_lines(&self) -> impl Iterator<Item = &TextLine> {
        self.regions.iter().flat_map(|region| region.lines.iter())
    }

    /// Total number of text lines across all regions.
    pub fn line_count(&self) -> usize {
        self.regions.iter().map(|region| region.lines.len()).sum()
    }
}

/// A `TextRegion` and the lines directly inside it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextRegion {
    pub id: Option<String>,
    pub lines: Vec<TextLine>,
}

/// The PAGE region element types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionKind {
    Noise,
    Unknown,
    Text,
    Table,
    Graphic,
    Image,
    Advert,
    Separator,
    Music,
    Chem,
    Maths,
    Chart,
    LineDrawing,
}

impl RegionKind {
    pub const ALL: [RegionKind; 13] = [
        RegionKind::Noise,
        RegionKind::Unknown,
        RegionKind::Text,
        RegionKind::Table,
        RegionKind::Graphic,
        RegionKind::Image,
        RegionKind::Advert,
        RegionKind::Separator,
        RegionKind::Music,
        RegionKind::Chem,
        RegionKind::Maths,
        RegionKind::Chart,
        RegionKind::LineDrawing,
    ];

    /// The PAGE element name, e.g. `TableRegion`.
    pub const fn element_name(self) -> &'static str {
        match self {
            RegionKind::Noise => "NoiseRegion",
            RegionKind::Unknown => "UnknownRegion",
            RegionKind::Text => "TextRegion",
            RegionKind::Table => "TableRegion",
            RegionKind::Graphic => "GraphicRegion",
            RegionKind::Image => "ImageRegion",
            RegionKind::Advert => "AdvertRegion",
            RegionKind::Separator => "SeparatorRegion",
            RegionKind::Music => "MusicRegion",
            RegionKind::Chem => "ChemRegion",
            RegionKind::Maths => "MathsRegion",
            RegionKind::Chart => "ChartRegion",
            RegionKind::LineDrawing => "LineDrawingRegion",
        }
    }

    pub fn from_element_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.element_name() == name)
    }
}

/// A layout region of any type with its outline polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutRegion {
    pub kind: RegionKind,
    pub id: Option<String>,
    /// Outline polygon (`Coords`); may be empty.
    pub coords: Vec<Point>,
}

/// A `TextLine` with its outline polygon and baseline polyline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLine {
    pub id: Option<String>,
    /// Outline polygon (`Coords`); may be empty.
    pub coords: Vec<Point>,
    /// Baseline polyline (`Baseline`); may be empty.
    pub baseline: Vec<Point>,
}
