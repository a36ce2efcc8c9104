// src/atoms.rs
//
// Atom ensemble and interaction topology consumed by the field kernels.
//
// Everything here is populated before a run (by a loader or by `lattice`)
// and only read during field evaluation. Spins are rewritten by the
// integrator between field calls.

use std::ops::Range;

use crate::effective_field::exchange::ExchangeTable;
use crate::params::Material;
use crate::vector_field::VectorField;

/// Per-atom state.
#[derive(Debug, Clone)]
pub struct AtomEnsemble {
    /// Unit spin directions.
    pub spin: VectorField,
    /// Positions (Angstrom).
    pub coord: VectorField,
    /// Index into the material table.
    pub material: Vec<usize>,
    pub surface: Vec<bool>,
}

impl AtomEnsemble {
    /// `n` atoms at the origin, spins along +z, material 0, bulk.
    pub fn new(n: usize) -> Self {
        Self {
            spin: VectorField::uniform(n, [0.0, 0.0, 1.0]),
            coord: VectorField::zeros(n),
            material: vec![0; n],
            surface: vec![false; n],
        }
    }

    pub fn len(&self) -> usize {
        self.material.len()
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_empty()
    }

    #[inline]
    pub fn spin(&self, atom: usize) -> [f64; 3] {
        self.spin.get(atom)
    }
}

/// CSR adjacency: the neighbours of `atom` are
/// `neighbour[offsets[atom]..offsets[atom + 1]]`, each entry paired with an
/// interaction id into the exchange table.
#[derive(Debug, Clone, Default)]
pub struct NeighbourList {
    pub offsets: Vec<usize>,
    pub neighbour: Vec<usize>,
    pub interaction: Vec<usize>,
}

impl NeighbourList {
    /// Build from per-atom lists of `(neighbour, interaction id)`.
    pub fn from_adjacency(adjacency: &[Vec<(usize, usize)>]) -> Self {
        let mut offsets = Vec::with_capacity(adjacency.len() + 1);
        let total: usize = adjacency.iter().map(Vec::len).sum();
        let mut neighbour = Vec::with_capacity(total);
        let mut interaction = Vec::with_capacity(total);

        offsets.push(0);
        for list in adjacency {
            for &(j, id) in list {
                neighbour.push(j);
                interaction.push(id);
            }
            offsets.push(neighbour.len());
        }

        Self {
            offsets,
            neighbour,
            interaction,
        }
    }

    /// An adjacency with `n` atoms and no bonds.
    pub fn empty(n: usize) -> Self {
        Self {
            offsets: vec![0; n + 1],
            neighbour: Vec::new(),
            interaction: Vec::new(),
        }
    }

    /// Number of atoms described.
    pub fn n_atoms(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Slice of the neighbour arrays belonging to `atom`.
    #[inline]
    pub fn range(&self, atom: usize) -> Range<usize> {
        self.offsets[atom]..self.offsets[atom + 1]
    }
}

/// Pre-normalised nearest-neighbour bond directions e_ij for the Neel
/// surface anisotropy, CSR layout like `NeighbourList`.
#[derive(Debug, Clone, Default)]
pub struct SurfaceBonds {
    pub offsets: Vec<usize>,
    pub eij: Vec<[f64; 3]>,
}

impl SurfaceBonds {
    pub fn from_bonds(bonds: &[Vec<[f64; 3]>]) -> Self {
        let mut offsets = Vec::with_capacity(bonds.len() + 1);
        let mut eij = Vec::new();
        offsets.push(0);
        for list in bonds {
            eij.extend_from_slice(list);
            offsets.push(eij.len());
        }
        Self { offsets, eij }
    }

    pub fn n_atoms(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[inline]
    pub fn bonds(&self, atom: usize) -> &[[f64; 3]] {
        &self.eij[self.offsets[atom]..self.offsets[atom + 1]]
    }
}

/// Everything the kernels read about the simulated system.
#[derive(Debug, Clone)]
pub struct SpinSystem {
    pub atoms: AtomEnsemble,
    pub neighbours: NeighbourList,
    pub exchange: ExchangeTable,
    pub surface_bonds: SurfaceBonds,
    pub materials: Vec<Material>,
}

impl SpinSystem {
    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn material_of(&self, atom: usize) -> &Material {
        &self.materials[self.atoms.material[atom]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csr_ranges_follow_adjacency_order() {
        let adj = vec![vec![(1, 0), (2, 1)], vec![], vec![(0, 1)]];
        let nl = NeighbourList::from_adjacency(&adj);
        assert_eq!(nl.n_atoms(), 3);
        assert_eq!(nl.range(0), 0..2);
        assert_eq!(nl.range(1), 2..2);
        assert_eq!(nl.range(2), 2..3);
        assert_eq!(nl.neighbour, vec![1, 2, 0]);
        assert_eq!(nl.interaction, vec![0, 1, 1]);
    }

    #[test]
    fn surface_bonds_slice_per_atom() {
        let sb = SurfaceBonds::from_bonds(&[vec![], vec![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]]);
        assert!(sb.bonds(0).is_empty());
        assert_eq!(sb.bonds(1).len(), 2);
        assert_eq!(sb.bonds(1)[1], [1.0, 0.0, 0.0]);
    }
}
