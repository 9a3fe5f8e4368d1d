//! Rectangular zones of the raster and their directional adjacency

use crate::io::error::{Result, SegmentationError};
use crate::segmentation::segment::SegmentId;
use std::collections::BTreeSet;

/// Stable index of a zone in the region graph's zone arena
pub type ZoneId = usize;

/// Half-open axis-aligned pixel rectangle `[x_from, x_to) x [y_from, y_to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge (inclusive)
    pub x_from: usize,
    /// Right edge (exclusive)
    pub x_to: usize,
    /// Top edge (inclusive)
    pub y_from: usize,
    /// Bottom edge (exclusive)
    pub y_to: usize,
}

impl Rect {
    /// Create a rectangle covering at least one pixel
    ///
    /// # Errors
    ///
    /// Returns [`SegmentationError::InvalidZone`] if the width or height is not positive
    pub const fn new(x_from: usize, x_to: usize, y_from: usize, y_to: usize) -> Result<Self> {
        if x_to <= x_from || y_to <= y_from {
            return Err(SegmentationError::InvalidZone {
                x_from,
                x_to,
                y_from,
                y_to,
            });
        }
        Ok(Self {
            x_from,
            x_to,
            y_from,
            y_to,
        })
    }

    /// Width in pixels
    pub const fn width(&self) -> usize {
        self.x_to - self.x_from
    }

    /// Height in pixels
    pub const fn height(&self) -> usize {
        self.y_to - self.y_from
    }

    /// Number of pixels covered
    pub const fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Whether pixel (x, y) lies inside
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x_from && x < self.x_to && y >= self.y_from && y < self.y_to
    }

    /// Whether the horizontal spans share at least one column
    pub const fn overlaps_columns(&self, other: &Self) -> bool {
        self.x_from < other.x_to && other.x_from < self.x_to
    }

    /// Whether the vertical spans share at least one row
    pub const fn overlaps_rows(&self, other: &Self) -> bool {
        self.y_from < other.y_to && other.y_from < self.y_to
    }

    /// Whether `other` shares a stretch of this rectangle's `side` edge
    pub const fn touches(&self, side: Side, other: &Self) -> bool {
        match side {
            Side::North => other.y_to == self.y_from && self.overlaps_columns(other),
            Side::South => other.y_from == self.y_to && self.overlaps_columns(other),
            Side::West => other.x_to == self.x_from && self.overlaps_rows(other),
            Side::East => other.x_from == self.x_to && self.overlaps_rows(other),
        }
    }

    /// Split at the floored midpoint into `[NW, NE, SW, SE]`
    ///
    /// # Errors
    ///
    /// Returns [`SegmentationError::InvalidZone`] if a quadrant would be empty,
    /// which happens whenever the width or height is 1
    pub fn quadrants(&self) -> Result<[Self; 4]> {
        let x_mid = self.x_from + self.width() / 2;
        let y_mid = self.y_from + self.height() / 2;

        let nw = Self::new(self.x_from, x_mid, self.y_from, y_mid)?;
        let ne = Self::new(x_mid, self.x_to, self.y_from, y_mid)?;
        let sw = Self::new(self.x_from, x_mid, y_mid, self.y_to)?;
        let se = Self::new(x_mid, self.x_to, y_mid, self.y_to)?;
        Ok([nw, ne, sw, se])
    }
}

/// One of the four edges of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Top edge
    North,
    /// Bottom edge
    South,
    /// Right edge
    East,
    /// Left edge
    West,
}

impl Side {
    /// All sides in a fixed order
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// The facing side of a neighbour across this edge
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

/// A rectangle of the raster owned by one segment
///
/// Each directional set holds the zones whose rectangles touch that edge.
/// The region graph keeps these sets symmetric: `b` is in `a`'s north set
/// exactly when `a` is in `b`'s south set.
#[derive(Debug, Clone)]
pub struct Zone {
    /// Pixels covered by the zone
    pub rect: Rect,
    /// Owning segment
    pub segment: SegmentId,
    north: BTreeSet<ZoneId>,
    south: BTreeSet<ZoneId>,
    east: BTreeSet<ZoneId>,
    west: BTreeSet<ZoneId>,
}

impl Zone {
    /// Create a zone with no neighbours
    pub const fn new(rect: Rect, segment: SegmentId) -> Self {
        Self {
            rect,
            segment,
            north: BTreeSet::new(),
            south: BTreeSet::new(),
            east: BTreeSet::new(),
            west: BTreeSet::new(),
        }
    }

    /// Number of pixels covered
    pub const fn area(&self) -> usize {
        self.rect.area()
    }

    /// Neighbours across one edge
    pub const fn adjacent(&self, side: Side) -> &BTreeSet<ZoneId> {
        match side {
            Side::North => &self.north,
            Side::South => &self.south,
            Side::East => &self.east,
            Side::West => &self.west,
        }
    }

    pub(crate) const fn adjacent_mut(&mut self, side: Side) -> &mut BTreeSet<ZoneId> {
        match side {
            Side::North => &mut self.north,
            Side::South => &mut self.south,
            Side::East => &mut self.east,
            Side::West => &mut self.west,
        }
    }

    /// Neighbours across every edge, possibly with repeats
    pub fn all_adjacent(&self) -> impl Iterator<Item = ZoneId> + '_ {
        Side::ALL
            .into_iter()
            .flat_map(move |side| self.adjacent(side).iter().copied())
    }
}
