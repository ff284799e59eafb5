use std::collections::BTreeMap;

use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::{error::MatrixError, waypoint::Waypoint};

pub type Distance = f64;

/// Directional road distances in meters between waypoints, keyed by waypoint id.
///
/// Stored as a flat row-major vector: the distance from `from` to `to` lives at
/// `from * len + to`. The diagonal is always `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FlatDistanceMatrix", into = "FlatDistanceMatrix")]
pub struct DistanceMatrix {
    ids: Vec<String>,
    index: FxHashMap<String, usize>,
    distances: Vec<Distance>,
}

#[derive(Serialize, Deserialize)]
struct FlatDistanceMatrix {
    ids: Vec<String>,
    distances: Vec<Distance>,
}

impl TryFrom<FlatDistanceMatrix> for DistanceMatrix {
    type Error = MatrixError;

    fn try_from(flat: FlatDistanceMatrix) -> Result<Self, Self::Error> {
        let mut matrix = DistanceMatrix::with_ids(flat.ids)?;
        if flat.distances.len() != matrix.distances.len() {
            return Err(MatrixError::InvalidMatrix(format!(
                "expected {} distances, found {}",
                matrix.distances.len(),
                flat.distances.len()
            )));
        }

        for (offset, distance) in flat.distances.iter().enumerate() {
            let (from, to) = (offset / matrix.len(), offset % matrix.len());
            if from != to {
                ensure_valid_distance(&matrix.ids, from, to, *distance)?;
            }
        }

        matrix.distances = flat.distances;
        for i in 0..matrix.len() {
            matrix.set(i, i, 0.0);
        }

        Ok(matrix)
    }
}

impl From<DistanceMatrix> for FlatDistanceMatrix {
    fn from(matrix: DistanceMatrix) -> Self {
        FlatDistanceMatrix {
            ids: matrix.ids,
            distances: matrix.distances,
        }
    }
}

/// Distances between one new waypoint and a set of existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementalResult {
    pub source_id: String,
    /// new waypoint -> existing waypoint
    pub outbound: FxHashMap<String, Distance>,
    /// existing waypoint -> new waypoint
    pub inbound: FxHashMap<String, Distance>,
}

impl IncrementalResult {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            outbound: FxHashMap::default(),
            inbound: FxHashMap::default(),
        }
    }
}

impl DistanceMatrix {
    /// Zero-filled matrix over `ids`, rejecting duplicates.
    pub fn with_ids(ids: Vec<String>) -> Result<Self, MatrixError> {
        let mut index = FxHashMap::default();
        index.reserve(ids.len());

        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(MatrixError::DuplicateWaypointId(id.clone()));
            }
        }

        let len = ids.len();
        Ok(Self {
            ids,
            index,
            distances: vec![0.0; len * len],
        })
    }

    pub fn for_waypoints(waypoints: &[Waypoint]) -> Result<Self, MatrixError> {
        Self::with_ids(waypoints.iter().map(|waypoint| waypoint.id.clone()).collect())
    }

    /// Builds a matrix from explicit rows, `rows[i][j]` being the distance from
    /// `ids[i]` to `ids[j]`. Diagonal values are ignored.
    pub fn from_rows(ids: Vec<String>, rows: Vec<Vec<Distance>>) -> Result<Self, MatrixError> {
        let mut matrix = Self::with_ids(ids)?;
        let len = matrix.len();

        if rows.len() != len || rows.iter().any(|row| row.len() != len) {
            return Err(MatrixError::InvalidMatrix(format!(
                "expected a {len}x{len} matrix"
            )));
        }

        for (i, row) in rows.into_iter().enumerate() {
            for (j, distance) in row.into_iter().enumerate() {
                if i != j {
                    ensure_valid_distance(&matrix.ids, i, j, distance)?;
                    matrix.set(i, j, distance);
                }
            }
        }

        Ok(matrix)
    }

    #[inline(always)]
    fn offset(&self, from: usize, to: usize) -> usize {
        from * self.ids.len() + to
    }

    /// Distance by position. Panics if either index is out of bounds.
    #[inline(always)]
    pub fn distance(&self, from: usize, to: usize) -> Distance {
        self.distances[self.offset(from, to)]
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, from: usize, to: usize, distance: Distance) {
        let offset = self.offset(from, to);
        self.distances[offset] = distance;
    }

    pub fn get(&self, from: &str, to: &str) -> Option<Distance> {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        Some(self.distance(from, to))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Outgoing distances of `id`, including the zero self distance.
    pub fn row(&self, id: &str) -> Option<impl Iterator<Item = (&str, Distance)> + '_> {
        let from = self.index_of(id)?;
        Some(
            self.ids
                .iter()
                .enumerate()
                .map(move |(to, to_id)| (to_id.as_str(), self.distance(from, to))),
        )
    }

    /// Nested `from -> to -> distance` form, without the diagonal.
    pub fn to_nested(&self) -> BTreeMap<String, BTreeMap<String, Distance>> {
        self.ids
            .iter()
            .enumerate()
            .map(|(from, from_id)| {
                let row = self
                    .ids
                    .iter()
                    .enumerate()
                    .filter(|(to, _)| *to != from)
                    .map(|(to, to_id)| (to_id.clone(), self.distance(from, to)))
                    .collect();
                (from_id.clone(), row)
            })
            .collect()
    }

    /// Merges the row and column computed for a single waypoint. The waypoint is
    /// appended when it is not part of the matrix yet, otherwise its row and
    /// column are replaced.
    pub fn apply_incremental(&mut self, result: &IncrementalResult) -> Result<(), MatrixError> {
        for id in &self.ids {
            if *id == result.source_id {
                continue;
            }

            if !result.outbound.contains_key(id) || !result.inbound.contains_key(id) {
                return Err(MatrixError::IncompleteIncrementalResult {
                    missing: id.clone(),
                });
            }
        }

        let source = match self.index_of(&result.source_id) {
            Some(source) => source,
            None => self.push_id(result.source_id.clone()),
        };

        for other in 0..self.len() {
            if other == source {
                continue;
            }

            let id = &self.ids[other];
            let (outbound, inbound) = (result.outbound[id], result.inbound[id]);
            self.set(source, other, outbound);
            self.set(other, source, inbound);
        }

        Ok(())
    }

    fn push_id(&mut self, id: String) -> usize {
        let old_len = self.len();
        let new_len = old_len + 1;
        let mut distances = vec![0.0; new_len * new_len];

        for from in 0..old_len {
            let old_row = &self.distances[from * old_len..(from + 1) * old_len];
            distances[from * new_len..from * new_len + old_len].copy_from_slice(old_row);
        }

        self.distances = distances;
        self.index.insert(id.clone(), old_len);
        self.ids.push(id);

        old_len
    }

    /// Whether the matrix covers exactly `waypoints`, in the same order.
    pub(crate) fn matches_waypoints(&self, waypoints: &[Waypoint]) -> bool {
        self.ids.len() == waypoints.len()
            && self
                .ids
                .iter()
                .zip(waypoints)
                .all(|(id, waypoint)| *id == waypoint.id)
    }
}

/// Distances are non-negative numbers. NaN is rejected as well.
fn ensure_valid_distance(
    ids: &[String],
    from: usize,
    to: usize,
    distance: Distance,
) -> Result<(), MatrixError> {
    if distance >= 0.0 {
        return Ok(());
    }

    Err(MatrixError::InvalidMatrix(format!(
        "distance from {} to {} is {}",
        ids[from], ids[to], distance
    )))
}

pub(crate) fn ensure_unique_ids<'a>(
    waypoints: impl IntoIterator<Item = &'a Waypoint>,
) -> Result<(), MatrixError> {
    let mut seen = FxHashSet::default();
    for waypoint in waypoints {
        if !seen.insert(waypoint.id.as_str()) {
            return Err(MatrixError::DuplicateWaypointId(waypoint.id.clone()));
        }
    }

    Ok(())
}
