//! Spatial index over the reference set.
//!
//! Reference points live in an R-tree keyed by `(easting, northing)`. Each
//! entry remembers its position in the loaded sequence so that equally close
//! points resolve to the first one loaded.

use pointfix_core::Point;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::error::MatchError;

/// A reference position stored in the R-tree.
#[derive(Clone, Debug)]
struct IndexedPoint {
    position: [f64; 2],
    /// Index of the point in the loaded sequence.
    index: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let de = self.position[0] - point[0];
        let dn = self.position[1] - point[1];
        de * de + dn * dn
    }
}

/// Best reference point for a query position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Position of the selected point in the loaded sequence.
    pub index: usize,
    /// Planar distance from the query.
    pub distance: f64,
    /// Other reference points at exactly the same distance.
    pub ties: usize,
}

/// Immutable, spatially indexed reference points for one batch run.
pub struct ReferenceSet {
    points: Vec<Point>,
    tree: RTree<IndexedPoint>,
}

impl ReferenceSet {
    /// Index `points` in load order. Fails on a non-finite easting/northing.
    pub fn build(points: Vec<Point>) -> Result<Self, MatchError> {
        if let Some((index, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !p.has_finite_position())
        {
            return Err(MatchError::InvalidCoordinate {
                index,
                name: p.name.clone(),
            });
        }

        let indexed: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(index, p)| IndexedPoint {
                position: p.position(),
                index,
            })
            .collect();

        log::debug!("indexed {} reference points", indexed.len());

        Ok(Self {
            points,
            tree: RTree::bulk_load(indexed),
        })
    }

    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            tree: RTree::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    /// Closest reference point to `query`, first-loaded on exact ties.
    ///
    /// With `max_distance`, points farther than the radius are ignored.
    pub fn closest(&self, query: [f64; 2], max_distance: Option<f64>) -> Option<Candidate> {
        let mut iter = self.tree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_d2) = iter.next()?;

        if let Some(max) = max_distance {
            if best_d2 > max * max {
                return None;
            }
        }

        let mut index = first.index;
        let mut ties = 0;
        for (item, d2) in iter {
            if d2 > best_d2 {
                break;
            }
            ties += 1;
            index = index.min(item.index);
        }

        Some(Candidate {
            index,
            distance: best_d2.sqrt(),
            ties,
        })
    }
}

impl Default for ReferenceSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for ReferenceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceSet")
            .field("size", &self.points.len())
            .finish()
    }
}
