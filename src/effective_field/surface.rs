// src/effective_field/surface.rs
//
// Neel pair surface anisotropy, evaluated only on surface atoms:
//   H_i -= 2 Ks sum_j (S_i · e_ij) e_ij
// where e_ij are the unit vectors to the atom's nearest neighbours.
// Bulk atoms are skipped, not written.

use crate::atoms::{AtomEnsemble, SurfaceBonds};
use crate::params::Material;
use crate::vec3::dot;
use crate::vector_field::FieldChunk;

pub fn add_surface_anisotropy_field(
    atoms: &AtomEnsemble,
    materials: &[Material],
    bonds: &SurfaceBonds,
    out: &mut FieldChunk,
) {
    log::trace!("add_surface_anisotropy_field has been called");

    for (i, atom) in out.atoms().enumerate() {
        if !atoms.surface[atom] {
            continue;
        }
        // factor two from differentiating (S·e)^2
        let ks2 = 2.0 * materials[atoms.material[atom]].k_surface;
        let s = atoms.spin(atom);

        let mut h = [0.0; 3];
        for e in bonds.bonds(atom) {
            let s_dot_e = dot(s, *e);
            h[0] -= ks2 * s_dot_e * e[0];
            h[1] -= ks2 * s_dot_e * e[1];
            h[2] -= ks2 * s_dot_e * e[2];
        }
        out.add(i, h);
    }
}
