//! Exact nearest-neighbour index over a flat vector matrix.
//!
//! Vectors live row-major in one `Vec<f32>`; row `i` belongs to `chunks[i]`.
//! Every mutation keeps `vectors.len() == chunks.len() * dimensions`.

use std::cmp::Ordering;

use pitlane_core::{Chunk, RetrievalResult};
use rayon::prelude::*;

use crate::error::IndexError;

#[derive(Debug, Clone)]
pub struct VectorIndex {
    dimensions: usize,
    vectors: Vec<f32>,
    chunks: Vec<Chunk>,
}

impl VectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vectors: Vec::new(),
            chunks: Vec::new(),
        }
    }

    /// Rebuild from a flat matrix and its aligned chunk store.
    pub(crate) fn from_parts(
        dimensions: usize,
        vectors: Vec<f32>,
        chunks: Vec<Chunk>,
    ) -> Result<Self, IndexError> {
        if dimensions == 0 && !chunks.is_empty() {
            return Err(IndexError::Corrupt("zero dimension with stored entries".into()));
        }
        if vectors.len() != chunks.len() * dimensions {
            return Err(IndexError::Corrupt(format!(
                "{} vector values cannot back {} chunks of dimension {}",
                vectors.len(),
                chunks.len(),
                dimensions
            )));
        }
        Ok(Self {
            dimensions,
            vectors,
            chunks,
        })
    }

    /// Append one entry. Empty and wrongly sized vectors are rejected.
    pub fn push(&mut self, vector: &[f32], chunk: Chunk) -> Result<(), IndexError> {
        if vector.is_empty() {
            return Err(IndexError::EmptyVector);
        }
        if vector.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        self.vectors.extend_from_slice(vector);
        self.chunks.push(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub(crate) fn raw_vectors(&self) -> &[f32] {
        &self.vectors
    }

    /// Up to `k` entries ordered by ascending squared L2 distance.
    ///
    /// Equal distances keep insertion order. An empty index yields an empty
    /// result rather than an error.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievalResult>, IndexError> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let distances: Vec<f32> = self
            .vectors
            .par_chunks_exact(self.dimensions)
            .map(|row| squared_l2(row, query))
            .collect();

        let by_distance =
            |a: &usize, b: &usize| -> Ordering { distances[*a].total_cmp(&distances[*b]).then(a.cmp(b)) };

        let mut order: Vec<usize> = (0..distances.len()).collect();
        let k = k.min(order.len());
        if k < order.len() {
            order.select_nth_unstable_by(k - 1, by_distance);
            order.truncate(k);
        }
        order.sort_unstable_by(by_distance);

        Ok(order
            .into_iter()
            .map(|i| RetrievalResult {
                chunk: self.chunks[i].clone(),
                score: distances[i],
            })
            .collect())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
