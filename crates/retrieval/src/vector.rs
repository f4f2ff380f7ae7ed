//! A flat nearest-neighbour index over squared Euclidean distance.
//!
//! Exhaustive search: every query is compared against every stored vector.
//! Documents uploaded for Q&A are small, so there is nothing to gain from an
//! approximate structure.

use riskcast_core::error::RetrievalError;
use serde::Serialize;

/// A search hit: position of the stored vector and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl FlatL2Index {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    /// Build an index from vectors that must all share the first one's
    /// dimension.
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Result<Self, RetrievalError> {
        let dimension = vectors.first().map(Vec::len).ok_or(RetrievalError::EmptyIndex)?;
        let mut index = Self::new(dimension);
        for v in vectors {
            index.add(v)?;
        }
        Ok(index)
    }

    pub fn add(&mut self, vector: Vec<f32>) -> Result<(), RetrievalError> {
        self.check_dimension(&vector)?;
        self.vectors.push(vector);
        Ok(())
    }

    /// The `k` nearest vectors in ascending distance; equal distances keep
    /// insertion order. Asking for more than the index holds returns all.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, RetrievalError> {
        if self.vectors.is_empty() {
            return Err(RetrievalError::EmptyIndex);
        }
        self.check_dimension(query)?;

        let mut hits: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, v)| Neighbor {
                index,
                distance: squared_l2(v, query),
            })
            .collect();
        // Stable sort keeps insertion order for ties.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        Ok(hits)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), RetrievalError> {
        if vector.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}
