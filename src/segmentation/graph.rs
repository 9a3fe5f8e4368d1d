//! Arena-backed zone and segment graph
//!
//! Zones and segments live in two arenas addressed by stable indices, so
//! adjacency and ownership are plain index sets rather than cross references.
//! A split retires its parent zone (and the parent's singleton segment) and
//! appends four children; a merge empties the absorbed segment in place.
//! Nothing is ever removed from an arena, so indices handed out stay valid
//! for the lifetime of the graph.

use crate::io::error::{Result, SegmentationError};
use crate::segmentation::raster::LabelRaster;
use crate::segmentation::segment::{Segment, SegmentId};
use crate::segmentation::zone::{Rect, Side, Zone, ZoneId};
use bitvec::prelude::*;

/// Label of the whole-raster root zone; the first split reuses it for NW
pub const FIRST_LABEL: u32 = 1;

/// Zones, segments and the adjacency between them for one segmentation run
#[derive(Debug, Clone)]
pub struct RegionGraph {
    width: usize,
    height: usize,
    zones: Vec<Zone>,
    segments: Vec<Segment>,
    retired: BitVec,
    next_label: u32,
}

impl RegionGraph {
    /// Create a graph holding a single zone spanning the whole raster
    ///
    /// # Errors
    ///
    /// Returns an error if either extent is zero
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let rect = Rect::new(0, width, 0, height)?;
        Ok(Self {
            width,
            height,
            zones: vec![Zone::new(rect, 0)],
            segments: vec![Segment::singleton(FIRST_LABEL, 0, rect.area())],
            retired: bitvec![0; 1],
            next_label: FIRST_LABEL,
        })
    }

    /// Raster width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Raster height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Zone by index, including retired zones
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id)
    }

    /// Segment by index, including dead segments
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id)
    }

    /// Whether a zone exists and has not been retired by a split
    pub fn is_live_zone(&self, id: ZoneId) -> bool {
        self.retired.get(id).is_some_and(|retired| !*retired)
    }

    /// Whether a segment exists and still owns zones
    pub fn is_live_segment(&self, id: SegmentId) -> bool {
        self.segments.get(id).is_some_and(Segment::is_live)
    }

    /// Indices of every zone not retired by a split, ascending
    pub fn live_zones(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.retired.iter_zeros()
    }

    /// Indices of every segment that still owns zones, ascending
    pub fn live_segments(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.is_live())
            .map(|(id, _)| id)
    }

    /// Number of zones not retired by a split
    pub fn live_zone_count(&self) -> usize {
        self.retired.count_zeros()
    }

    /// Number of segments that still own zones
    pub fn live_segment_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_live()).count()
    }

    /// Rectangles of every zone owned by a segment
    pub fn segment_rects(&self, id: SegmentId) -> impl Iterator<Item = &Rect> + Clone + '_ {
        self.segments
            .get(id)
            .into_iter()
            .flat_map(|segment| segment.zones.iter())
            .filter_map(|&zone| self.zones.get(zone))
            .map(|zone| &zone.rect)
    }

    /// Replace a live zone by its four quadrants
    ///
    /// Each quadrant gets a fresh singleton segment with the next label. Every
    /// neighbour of the parent is reattached to whichever children on that
    /// side it touches, and the children are linked across the split lines.
    /// Returns the children as `[NW, NE, SW, SE]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone is not live or is 1 pixel wide or tall
    pub fn split_zone(&mut self, id: ZoneId) -> Result<[ZoneId; 4]> {
        if !self.is_live_zone(id) {
            return Err(SegmentationError::UnknownIndex {
                arena: "live zone",
                index: id,
            });
        }
        let (quadrants, parent_segment, parent_adjacency) = {
            let parent = self
                .zones
                .get_mut(id)
                .ok_or(SegmentationError::UnknownIndex {
                    arena: "zone",
                    index: id,
                })?;
            let quadrants = parent.rect.quadrants()?;
            let adjacency = Side::ALL.map(|side| (side, std::mem::take(parent.adjacent_mut(side))));
            (quadrants, parent.segment, adjacency)
        };

        let first = self.zones.len();
        for (offset, rect) in quadrants.into_iter().enumerate() {
            let zone_id = first + offset;
            let label = self.next_label + offset as u32;
            self.segments
                .push(Segment::singleton(label, zone_id, rect.area()));
            self.zones.push(Zone::new(rect, self.segments.len() - 1));
            self.retired.push(false);
        }
        self.next_label += 4;

        let children = [first, first + 1, first + 2, first + 3];
        let [nw, ne, sw, se] = children;

        for (side, neighbours) in parent_adjacency {
            let facing = match side {
                Side::North => [nw, ne],
                Side::South => [sw, se],
                Side::West => [nw, sw],
                Side::East => [ne, se],
            };
            for neighbour in neighbours {
                if let Some(zone) = self.zones.get_mut(neighbour) {
                    zone.adjacent_mut(side.opposite()).remove(&id);
                }
                for child in facing {
                    if self.rects_touch(child, side, neighbour) {
                        self.link(child, side, neighbour);
                    }
                }
            }
        }

        self.link(nw, Side::East, ne);
        self.link(nw, Side::South, sw);
        self.link(ne, Side::South, se);
        self.link(sw, Side::East, se);

        self.retired.set(id, true);
        if let Some(segment) = self.segments.get_mut(parent_segment) {
            segment.clear();
        }

        Ok(children)
    }

    /// Derive segment adjacency from zone adjacency
    ///
    /// Every live zone registers the foreign segments of its neighbours with
    /// its own segment. Zone adjacency is symmetric, so the result is too.
    pub fn consolidate_adjacency(&mut self) {
        let live: Vec<ZoneId> = self.live_zones().collect();
        for zone_id in live {
            let Some(zone) = self.zones.get(zone_id) else {
                continue;
            };
            let owner = zone.segment;
            let foreign: Vec<SegmentId> = zone
                .all_adjacent()
                .filter_map(|neighbour| self.zones.get(neighbour))
                .map(|neighbour| neighbour.segment)
                .filter(|&segment| segment != owner)
                .collect();
            if let Some(segment) = self.segments.get_mut(owner) {
                segment.neighbours.extend(foreign);
            }
        }
    }

    /// Absorb segment `from` into segment `into`
    ///
    /// All zones of `from` change owner, every neighbour of `from` is rewired
    /// to `into` (never to itself), and `from` is left dead.
    ///
    /// # Errors
    ///
    /// Returns an error if either segment is not live or both are the same
    pub fn merge_segments(&mut self, into: SegmentId, from: SegmentId) -> Result<()> {
        if into == from || !self.is_live_segment(into) {
            return Err(SegmentationError::UnknownIndex {
                arena: "absorbing segment",
                index: into,
            });
        }
        let absorbed = self
            .segments
            .get_mut(from)
            .filter(|segment| segment.is_live())
            .map(std::mem::take)
            .ok_or(SegmentationError::UnknownIndex {
                arena: "absorbed segment",
                index: from,
            })?;

        for &zone in &absorbed.zones {
            if let Some(zone) = self.zones.get_mut(zone) {
                zone.segment = into;
            }
        }

        for &neighbour in &absorbed.neighbours {
            if let Some(segment) = self.segments.get_mut(neighbour) {
                segment.neighbours.remove(&from);
                if neighbour != into {
                    segment.neighbours.insert(into);
                }
            }
        }

        if let Some(target) = self.segments.get_mut(into) {
            target.area += absorbed.area;
            target.zones.extend(absorbed.zones);
            target
                .neighbours
                .extend(absorbed.neighbours.into_iter().filter(|&n| n != into));
            target.neighbours.remove(&from);
        }

        Ok(())
    }

    /// Change the label a live segment paints with
    pub(crate) fn relabel(&mut self, id: SegmentId, label: u32) -> bool {
        match self.segments.get_mut(id) {
            Some(segment) if segment.label != label => {
                segment.label = label;
                true
            }
            _ => false,
        }
    }

    /// Paint every pixel of every live zone with its owner's label
    pub fn paint_live_zones(&self, raster: &mut LabelRaster) {
        for id in self.live_zones() {
            if let Some(zone) = self.zones.get(id) {
                let label = self.segments.get(zone.segment).map_or(0, |s| s.label);
                raster.fill(&zone.rect, label);
            }
        }
    }

    /// Paint every zone of one segment with its label
    pub fn paint_segment(&self, id: SegmentId, raster: &mut LabelRaster) {
        let Some(segment) = self.segments.get(id) else {
            return;
        };
        for rect in self.segment_rects(id) {
            raster.fill(rect, segment.label);
        }
    }

    /// Whether live zones tile the raster with no gap and no overlap
    pub fn covers_raster_exactly(&self) -> bool {
        let mut covered: BitVec = bitvec![0; self.width * self.height];
        for id in self.live_zones() {
            let Some(zone) = self.zones.get(id) else {
                return false;
            };
            for y in zone.rect.y_from..zone.rect.y_to {
                for x in zone.rect.x_from..zone.rect.x_to {
                    let index = y * self.width + x;
                    match covered.get(index).map(|bit| *bit) {
                        Some(false) => covered.set(index, true),
                        _ => return false,
                    }
                }
            }
        }
        covered.all()
    }

    /// Whether every directional zone link has its mirror on the facing side
    pub fn zone_adjacency_is_symmetric(&self) -> bool {
        self.live_zones().all(|id| {
            self.zones.get(id).is_some_and(|zone| {
                Side::ALL.into_iter().all(|side| {
                    zone.adjacent(side).iter().all(|&other| {
                        self.zones
                            .get(other)
                            .is_some_and(|o| o.adjacent(side.opposite()).contains(&id))
                    })
                })
            })
        })
    }

    /// Whether zone adjacency lists exactly the live zones that share an edge
    pub fn zone_adjacency_matches_geometry(&self) -> bool {
        let live: Vec<(ZoneId, &Zone)> = self
            .live_zones()
            .filter_map(|id| self.zones.get(id).map(|zone| (id, zone)))
            .collect();
        live.iter().all(|&(id, zone)| {
            Side::ALL.into_iter().all(|side| {
                let expected = live
                    .iter()
                    .filter(|&&(other, candidate)| {
                        other != id && zone.rect.touches(side, &candidate.rect)
                    })
                    .map(|&(other, _)| other);
                expected.eq(zone.adjacent(side).iter().copied())
            })
        })
    }

    /// Whether segment neighbourhood is mutual
    pub fn segment_adjacency_is_symmetric(&self) -> bool {
        self.segments.iter().enumerate().all(|(id, segment)| {
            segment.neighbours.iter().all(|&other| {
                other != id
                    && self
                        .segments
                        .get(other)
                        .is_some_and(|o| o.neighbours.contains(&id))
            })
        })
    }

    /// Whether every live zone belongs to exactly the segment that lists it
    pub fn ownership_is_consistent(&self) -> bool {
        let zones_listed: usize = self.segments.iter().map(|s| s.zones.len()).sum();
        zones_listed == self.live_zone_count()
            && self.segments.iter().enumerate().all(|(id, segment)| {
                segment.zones.iter().all(|&zone| {
                    self.is_live_zone(zone) && self.zones.get(zone).is_some_and(|z| z.segment == id)
                }) && segment.area == self.segment_rects(id).map(Rect::area).sum::<usize>()
            })
    }

    fn rects_touch(&self, a: ZoneId, side: Side, b: ZoneId) -> bool {
        match (self.zones.get(a), self.zones.get(b)) {
            (Some(a), Some(b)) => a.rect.touches(side, &b.rect),
            _ => false,
        }
    }

    fn link(&mut self, a: ZoneId, side: Side, b: ZoneId) {
        if let Some(zone) = self.zones.get_mut(a) {
            zone.adjacent_mut(side).insert(b);
        }
        if let Some(zone) = self.zones.get_mut(b) {
            zone.adjacent_mut(side.opposite()).insert(a);
        }
    }
}
