// src/vector_field.rs
//
// Per-atom vector storage, structure-of-arrays layout (x, y, z kept in
// separate contiguous arrays so the field kernels stream through memory).

use std::ops::Range;

/// Three parallel per-atom arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl VectorField {
    /// Create a field of `n` zero vectors.
    pub fn zeros(n: usize) -> Self {
        Self {
            x: vec![0.0; n],
            y: vec![0.0; n],
            z: vec![0.0; n],
        }
    }

    /// Create a field of `n` copies of `v`.
    pub fn uniform(n: usize, v: [f64; 3]) -> Self {
        Self {
            x: vec![v[0]; n],
            y: vec![v[1]; n],
            z: vec![v[2]; n],
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> [f64; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }

    #[inline]
    pub fn set(&mut self, i: usize, v: [f64; 3]) {
        self.x[i] = v[0];
        self.y[i] = v[1];
        self.z[i] = v[2];
    }

    /// Mutable view over the atoms in `range`.
    ///
    /// Panics if the range is out of bounds.
    pub fn range_mut(&mut self, range: Range<usize>) -> FieldChunk<'_> {
        FieldChunk {
            start: range.start,
            x: &mut self.x[range.clone()],
            y: &mut self.y[range.clone()],
            z: &mut self.z[range],
        }
    }

    /// Split into disjoint consecutive views of at most `size` atoms each.
    pub fn chunks_mut(&mut self, size: usize) -> impl Iterator<Item = FieldChunk<'_>> {
        self.x
            .chunks_mut(size)
            .zip(self.y.chunks_mut(size))
            .zip(self.z.chunks_mut(size))
            .enumerate()
            .map(move |(k, ((x, y), z))| FieldChunk {
                start: k * size,
                x,
                y,
                z,
            })
    }
}

/// Mutable view over the field values of atoms `[start, start + len)`.
///
/// Local index `i` in `x`/`y`/`z` corresponds to global atom `start + i`.
#[derive(Debug)]
pub struct FieldChunk<'a> {
    start: usize,
    pub x: &'a mut [f64],
    pub y: &'a mut [f64],
    pub z: &'a mut [f64],
}

impl<'a> FieldChunk<'a> {
    /// Global index of the first atom in the view.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Global atom indices covered by the view.
    #[inline]
    pub fn atoms(&self) -> Range<usize> {
        self.start..self.start + self.x.len()
    }

    pub fn fill(&mut self, v: f64) {
        self.x.fill(v);
        self.y.fill(v);
        self.z.fill(v);
    }

    /// Add `h` to local slot `i`.
    #[inline]
    pub fn add(&mut self, i: usize, h: [f64; 3]) {
        self.x[i] += h[0];
        self.y[i] += h[1];
        self.z[i] += h[2];
    }

    /// Add the same vector to every atom in the view.
    pub fn add_uniform(&mut self, h: [f64; 3]) {
        self.x.iter_mut().for_each(|v| *v += h[0]);
        self.y.iter_mut().for_each(|v| *v += h[1]);
        self.z.iter_mut().for_each(|v| *v += h[2]);
    }
}
