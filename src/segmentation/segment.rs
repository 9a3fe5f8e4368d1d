//! Segments: label identities that own zones and are the unit of merging

use crate::segmentation::zone::ZoneId;
use std::collections::BTreeSet;

/// Stable index of a segment in the region graph's segment arena
pub type SegmentId = usize;

/// A group of zones sharing one label
///
/// A segment with no zones is dead: it has been absorbed by a neighbour, or
/// its only zone was retired by a split.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    /// Label written to the raster for every pixel of the segment
    pub label: u32,
    pub(crate) zones: BTreeSet<ZoneId>,
    pub(crate) neighbours: BTreeSet<SegmentId>,
    pub(crate) area: usize,
}

impl Segment {
    /// Create a segment owning a single zone of `area` pixels
    pub fn singleton(label: u32, zone: ZoneId, area: usize) -> Self {
        Self {
            label,
            zones: BTreeSet::from([zone]),
            neighbours: BTreeSet::new(),
            area,
        }
    }

    /// Zones owned by the segment
    pub const fn zones(&self) -> &BTreeSet<ZoneId> {
        &self.zones
    }

    /// Adjacent segments
    pub const fn neighbours(&self) -> &BTreeSet<SegmentId> {
        &self.neighbours
    }

    /// Pixel count over all owned zones; zero once dead
    pub const fn area(&self) -> usize {
        self.area
    }

    /// Whether the segment still owns any zone
    pub fn is_live(&self) -> bool {
        !self.zones.is_empty()
    }

    /// Drop every zone and neighbour, marking the segment dead
    pub(crate) fn clear(&mut self) {
        self.zones.clear();
        self.neighbours.clear();
        self.area = 0;
        self.label = 0;
    }
}
