// src/effective_field/exchange.rs
//
// Heisenberg exchange over the CSR neighbour list:
//   H_i -= sum_j J_ij · S_j
//
// Three coupling representations, fixed for the lifetime of a run. The
// representation is matched once, outside the atom loop; each arm runs a
// monomorphised copy of the same accumulation loop, so the neighbour loop
// itself never branches on the representation.

use crate::atoms::{AtomEnsemble, NeighbourList};
use crate::error::ConfigError;
use crate::vec3::{mat_vec, scale};
use crate::vector_field::FieldChunk;

/// Representation tag, as stored by structure loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeKind {
    Isotropic,
    Vector,
    Tensor,
}

impl ExchangeKind {
    /// Coefficients per interaction in the flat layout.
    pub fn stride(self) -> usize {
        match self {
            ExchangeKind::Isotropic => 1,
            ExchangeKind::Vector => 3,
            ExchangeKind::Tensor => 9,
        }
    }
}

impl TryFrom<u8> for ExchangeKind {
    type Error = ConfigError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(ExchangeKind::Isotropic),
            1 => Ok(ExchangeKind::Vector),
            2 => Ok(ExchangeKind::Tensor),
            _ => Err(ConfigError::UnknownTag {
                kind: "exchange",
                tag,
            }),
        }
    }
}

/// Exchange coefficients indexed by interaction id (field units, T).
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeTable {
    Isotropic(Vec<f64>),
    Vector(Vec<[f64; 3]>),
    Tensor(Vec<[[f64; 3]; 3]>),
}

impl ExchangeTable {
    pub fn kind(&self) -> ExchangeKind {
        match self {
            ExchangeTable::Isotropic(_) => ExchangeKind::Isotropic,
            ExchangeTable::Vector(_) => ExchangeKind::Vector,
            ExchangeTable::Tensor(_) => ExchangeKind::Tensor,
        }
    }

    /// Number of interaction types.
    pub fn len(&self) -> usize {
        match self {
            ExchangeTable::Isotropic(j) => j.len(),
            ExchangeTable::Vector(j) => j.len(),
            ExchangeTable::Tensor(j) => j.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build from a flat coefficient list: 1, 3 or 9 (row-major) values per
    /// interaction depending on `kind`.
    pub fn from_flat(kind: ExchangeKind, coeffs: &[f64]) -> Result<Self, ConfigError> {
        let stride = kind.stride();
        if coeffs.len() % stride != 0 {
            return Err(ConfigError::Inconsistent(format!(
                "{} exchange coefficients is not a multiple of {stride}",
                coeffs.len()
            )));
        }
        let table = match kind {
            ExchangeKind::Isotropic => ExchangeTable::Isotropic(coeffs.to_vec()),
            ExchangeKind::Vector => {
                ExchangeTable::Vector(coeffs.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
            }
            ExchangeKind::Tensor => ExchangeTable::Tensor(
                coeffs
                    .chunks_exact(9)
                    .map(|c| [[c[0], c[1], c[2]], [c[3], c[4], c[5]], [c[6], c[7], c[8]]])
                    .collect(),
            ),
        };
        Ok(table)
    }
}

/// Add the exchange field for every atom in `out`.
pub fn add_exchange_field(
    atoms: &AtomEnsemble,
    neighbours: &NeighbourList,
    table: &ExchangeTable,
    out: &mut FieldChunk,
) {
    log::trace!("add_exchange_field has been called");

    match table {
        ExchangeTable::Isotropic(j) => {
            accumulate(atoms, neighbours, out, |iid, s| scale(s, j[iid]))
        }
        ExchangeTable::Vector(j) => accumulate(atoms, neighbours, out, |iid, s| {
            let jv = j[iid];
            [jv[0] * s[0], jv[1] * s[1], jv[2] * s[2]]
        }),
        ExchangeTable::Tensor(j) => {
            accumulate(atoms, neighbours, out, |iid, s| mat_vec(&j[iid], s))
        }
    }
}

#[inline(always)]
fn accumulate<F>(
    atoms: &AtomEnsemble,
    neighbours: &NeighbourList,
    out: &mut FieldChunk,
    coupling: F,
) where
    F: Fn(usize, [f64; 3]) -> [f64; 3],
{
    let spin = &atoms.spin;
    for (i, atom) in out.atoms().enumerate() {
        let mut h = [0.0; 3];
        for nn in neighbours.range(atom) {
            let j = neighbours.neighbour[nn];
            let js = coupling(neighbours.interaction[nn], [spin.x[j], spin.y[j], spin.z[j]]);
            h[0] -= js[0];
            h[1] -= js[1];
            h[2] -= js[2];
        }
        out.add(i, h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_field::VectorField;

    fn pair() -> (AtomEnsemble, NeighbourList) {
        let mut atoms = AtomEnsemble::new(2);
        atoms.spin.set(0, [1.0, 0.0, 0.0]);
        atoms.spin.set(1, [0.0, 0.6, 0.8]);
        let nl = NeighbourList::from_adjacency(&[vec![(1, 0)], vec![(0, 0)]]);
        (atoms, nl)
    }

    #[test]
    fn vector_exchange_couples_components_independently() {
        let (atoms, nl) = pair();
        let table = ExchangeTable::Vector(vec![[1.0, 2.0, 3.0]]);
        let mut h = VectorField::zeros(2);
        add_exchange_field(&atoms, &nl, &table, &mut h.range_mut(0..2));
        let h0 = h.get(0);
        assert_eq!(h0[0], 0.0);
        assert!((h0[1] + 1.2).abs() < 1e-14, "h_y = {}", h0[1]);
        assert!((h0[2] + 2.4).abs() < 1e-14, "h_z = {}", h0[2]);
        assert_eq!(h.get(1), [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn tensor_exchange_uses_off_diagonal_terms() {
        let (atoms, nl) = pair();
        // Antisymmetric (DMI-like) part only.
        let table =
            ExchangeTable::Tensor(vec![[[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]]);
        let mut h = VectorField::zeros(2);
        add_exchange_field(&atoms, &nl, &table, &mut h.range_mut(0..2));
        // atom 1 sees S_0 = x: J·S = (0, -1, 0)
        assert_eq!(h.get(1), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn accumulates_on_top_of_existing_field() {
        let (atoms, nl) = pair();
        let table = ExchangeTable::Isotropic(vec![2.0]);
        let mut h = VectorField::uniform(2, [1.0, 1.0, 1.0]);
        add_exchange_field(&atoms, &nl, &table, &mut h.range_mut(1..2));
        assert_eq!(h.get(0), [1.0, 1.0, 1.0]);
        assert_eq!(h.get(1), [-1.0, 1.0, 1.0]);
    }

    #[test]
    fn flat_tables_decode_row_major() {
        let flat = [1., 2., 3., 4., 5., 6., 7., 8., 9.];
        let t = ExchangeTable::from_flat(ExchangeKind::Tensor, &flat).unwrap();
        assert_eq!(t, ExchangeTable::Tensor(vec![[[1., 2., 3.], [4., 5., 6.], [7., 8., 9.]]]));
        assert!(ExchangeTable::from_flat(ExchangeKind::Vector, &[1.0, 2.0]).is_err());
        assert!(ExchangeKind::try_from(3).is_err());
        assert_eq!(ExchangeKind::try_from(1).unwrap(), ExchangeKind::Vector);
    }
}
