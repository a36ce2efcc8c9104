// src/lattice.rs
//
// Simple-cubic test lattice with open boundaries.
//
// Produces the same topology a structure loader would: nearest-neighbour
// CSR list (all bonds use interaction id 0), surface flags (any atom with
// fewer than six neighbours) and the unit bond vectors e_ij used by the
// Neel surface anisotropy.

use serde::{Deserialize, Serialize};

use crate::atoms::{AtomEnsemble, NeighbourList, SpinSystem, SurfaceBonds};
use crate::effective_field::exchange::ExchangeTable;
use crate::error::ConfigError;
use crate::params::Material;

const BULK_COORDINATION: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleCubic {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    /// Lattice constant (Angstrom).
    pub a: f64,
}

impl SimpleCubic {
    pub fn new(nx: usize, ny: usize, nz: usize, a: f64) -> Result<Self, ConfigError> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(ConfigError::invalid(
                "lattice",
                format!("extent must be non-zero, got {nx}x{ny}x{nz}"),
            ));
        }
        if !(a > 0.0) {
            return Err(ConfigError::invalid("lattice.a", format!("must be positive, got {a}")));
        }
        Ok(Self { nx, ny, nz, a })
    }

    pub fn n_atoms(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Flat index of site (i, j, k); x runs fastest.
    #[inline]
    pub fn idx(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.nx && j < self.ny && k < self.nz);
        (k * self.ny + j) * self.nx + i
    }

    /// Sample extent (Angstrom), as used for the thin-film demag volume.
    pub fn dimensions(&self) -> [f64; 3] {
        [
            self.nx as f64 * self.a,
            self.ny as f64 * self.a,
            self.nz as f64 * self.a,
        ]
    }

    /// Build the full system. Spins start along +z, every atom uses material 0.
    pub fn build_system(&self, exchange: ExchangeTable, materials: Vec<Material>) -> SpinSystem {
        let n = self.n_atoms();
        let mut atoms = AtomEnsemble::new(n);
        let mut adjacency: Vec<Vec<(usize, usize)>> =
            vec![Vec::with_capacity(BULK_COORDINATION); n];
        let mut bonds: Vec<Vec<[f64; 3]>> = vec![Vec::with_capacity(BULK_COORDINATION); n];

        let dirs: [[isize; 3]; 6] = [
            [1, 0, 0],
            [-1, 0, 0],
            [0, 1, 0],
            [0, -1, 0],
            [0, 0, 1],
            [0, 0, -1],
        ];

        for k in 0..self.nz {
            for j in 0..self.ny {
                for i in 0..self.nx {
                    let atom = self.idx(i, j, k);
                    atoms.coord.set(
                        atom,
                        [i as f64 * self.a, j as f64 * self.a, k as f64 * self.a],
                    );

                    for d in &dirs {
                        let Some((ni, nj, nk)) = self.offset(i, j, k, *d) else {
                            continue;
                        };
                        adjacency[atom].push((self.idx(ni, nj, nk), 0));
                        bonds[atom].push([d[0] as f64, d[1] as f64, d[2] as f64]);
                    }

                    atoms.surface[atom] = adjacency[atom].len() < BULK_COORDINATION;
                }
            }
        }

        SpinSystem {
            atoms,
            neighbours: NeighbourList::from_adjacency(&adjacency),
            exchange,
            surface_bonds: SurfaceBonds::from_bonds(&bonds),
            materials,
        }
    }

    fn offset(&self, i: usize, j: usize, k: usize, d: [isize; 3]) -> Option<(usize, usize, usize)> {
        let ni = i.checked_add_signed(d[0]).filter(|&v| v < self.nx)?;
        let nj = j.checked_add_signed(d[1]).filter(|&v| v < self.ny)?;
        let nk = k.checked_add_signed(d[2]).filter(|&v| v < self.nz)?;
        Some((ni, nj, nk))
    }
}
