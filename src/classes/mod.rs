//! Class table derivation.
//!
//! Each drawable channel paints into its own RGB component, so a pixel
//! covered by several channels carries the sum of their colors. The class
//! table lists every color a mask can contain: background, then each enabled
//! channel alone, then every combination of enabled channels by increasing
//! size. Row order is what training code uses as label indices, so it is
//! fixed and depends only on which channels are enabled.
//!
//! Region masks use a second, fixed palette: one flat color per group of
//! PAGE region types (see [`region_color`]).

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PagemaskError;
use crate::page::RegionKind;

/// A drawable mask channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Baselines,
    Lines,
    Endpoints,
}

impl Channel {
    /// All channels, in class-table order.
    pub const ALL: [Channel; 3] = [Channel::Baselines, Channel::Lines, Channel::Endpoints];

    /// The color this channel is drawn with.
    pub const fn color(self) -> [u8; 3] {
        match self {
            Channel::Baselines => [255, 0, 0],
            Channel::Lines => [0, 255, 0],
            Channel::Endpoints => [0, 0, 255],
        }
    }

    /// Index of the RGB component holding this channel (the color's largest component).
    pub fn component(self) -> usize {
        let color = self.color();
        (0..color.len()).fold(0, |best, i| if color[i] > color[best] { i } else { best })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Channel::Baselines => "baselines",
            Channel::Lines => "lines",
            Channel::Endpoints => "endpoints",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which channels are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelSet {
    pub baselines: bool,
    pub lines: bool,
    pub endpoints: bool,
}

impl ChannelSet {
    pub fn contains(&self, channel: Channel) -> bool {
        match channel {
            Channel::Baselines => self.baselines,
            Channel::Lines => self.lines,
            Channel::Endpoints => self.endpoints,
        }
    }

    /// Enabled channels in [`Channel::ALL`] order.
    pub fn enabled(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|channel| self.contains(*channel))
            .collect()
    }
}

/// Fill color of a region type in region masks.
pub const fn region_color(kind: RegionKind) -> [u8; 3] {
    match kind {
        RegionKind::Noise | RegionKind::Unknown => [0, 0, 0],
        RegionKind::Text => [128, 128, 128],
        RegionKind::Table => [255, 0, 0],
        RegionKind::Graphic | RegionKind::Image | RegionKind::Advert => [255, 0, 255],
        RegionKind::Separator => [0, 255, 0],
        RegionKind::Music
        | RegionKind::Chem
        | RegionKind::Maths
        | RegionKind::Chart
        | RegionKind::LineDrawing => [0, 0, 255],
    }
}

/// One row of the class table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassRow {
    /// Channels combined in this class; empty for background and for
    /// region-mask classes.
    pub channels: Vec<Channel>,
    pub color: [u8; 3],
    /// Per-component presence flags, when multilabel encoding is on.
    pub multilabel: Option<[u8; 3]>,
}

impl ClassRow {
    fn from_channels(channels: Vec<Channel>, multilabel: bool) -> Self {
        let color = channels.iter().fold([0u8; 3], |mut acc, channel| {
            for (slot, value) in acc.iter_mut().zip(channel.color()) {
                *slot = slot.saturating_add(value);
            }
            acc
        });
        Self::with_color(channels, color, multilabel)
    }

    fn with_color(channels: Vec<Channel>, color: [u8; 3], multilabel: bool) -> Self {
        let multilabel = multilabel.then(|| color.map(|c| u8::from(c > 0)));
        Self {
            channels,
            color,
            multilabel,
        }
    }

    /// The integer columns written to `classes.txt`.
    pub fn values(&self) -> Vec<u8> {
        let mut values = self.color.to_vec();
        if let Some(bits) = self.multilabel {
            values.extend_from_slice(&bits);
        }
        values
    }
}

/// Ordered class table; row 0 is always background.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassTable {
    pub rows: Vec<ClassRow>,
}

impl ClassTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain colors of every row.
    pub fn colors(&self) -> Vec<[u8; 3]> {
        self.rows.iter().map(|row| row.color).collect()
    }

    /// Write the table as whitespace-separated integer rows.
    pub fn write(&self, path: &Path) -> Result<(), PagemaskError> {
        fs::write(path, self.to_string()).map_err(PagemaskError::Io)
    }
}

impl fmt::Display for ClassTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line: Vec<String> = row.values().iter().map(u8::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Build the class table for a set of enabled channels.
pub fn class_table(channels: ChannelSet, multilabel: bool) -> ClassTable {
    let enabled = channels.enabled();

    let mut combinations: Vec<Vec<usize>> = (1u32..(1 << enabled.len()))
        .map(|mask| {
            (0..enabled.len())
                .filter(|i| mask & (1 << i) != 0)
                .collect()
        })
        .collect();
    combinations.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let mut rows = Vec::with_capacity(combinations.len() + 1);
    rows.push(ClassRow::from_channels(Vec::new(), multilabel));
    rows.extend(combinations.into_iter().map(|indices| {
        ClassRow::from_channels(indices.into_iter().map(|i| enabled[i]).collect(), multilabel)
    }));

    ClassTable { rows }
}

/// Build the class table of region masks: background, then each distinct
/// region color in [`RegionKind::ALL`] order.
pub fn region_class_table(multilabel: bool) -> ClassTable {
    let mut colors: Vec<[u8; 3]> = vec![[0, 0, 0]];
    for color in RegionKind::ALL.into_iter().map(region_color) {
        if !colors.contains(&color) {
            colors.push(color);
        }
    }

    ClassTable {
        rows: colors
            .into_iter()
            .map(|color| ClassRow::with_color(Vec::new(), color, multilabel))
            .collect(),
    }
}
