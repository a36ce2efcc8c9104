// src/effective_field/anisotropy.rs
//
// On-site anisotropy fields (negative gradient of the anisotropy energy).
//
// Uniaxial, scalar form (easy axis fixed along z):
//   H_z -= 2 K S_z
// Uniaxial, tensor form:
//   H -= 2 K · S
// Cubic, E = -0.5 Kc (Sx^4 + Sy^4 + Sz^4):
//   H_a -= 2 Kc S_a^3    for a in {x, y, z}

use crate::atoms::AtomEnsemble;
use crate::config::UniaxialKind;
use crate::params::Material;
use crate::vec3::mat_vec;
use crate::vector_field::FieldChunk;

/// Add the uniaxial anisotropy field in the selected representation.
pub fn add_uniaxial_anisotropy_field(
    atoms: &AtomEnsemble,
    materials: &[Material],
    kind: UniaxialKind,
    out: &mut FieldChunk,
) {
    log::trace!("add_uniaxial_anisotropy_field has been called");

    let spin = &atoms.spin;
    match kind {
        UniaxialKind::Scalar => {
            for (i, atom) in out.atoms().enumerate() {
                let k = materials[atoms.material[atom]].k_uniaxial;
                out.z[i] -= 2.0 * k * spin.z[atom];
            }
        }
        UniaxialKind::Tensor => {
            for (i, atom) in out.atoms().enumerate() {
                let k = &materials[atoms.material[atom]].k_tensor;
                let ks = mat_vec(k, spin.get(atom));
                out.add(i, [-2.0 * ks[0], -2.0 * ks[1], -2.0 * ks[2]]);
            }
        }
    }
}

/// Add the cubic anisotropy field.
pub fn add_cubic_anisotropy_field(
    atoms: &AtomEnsemble,
    materials: &[Material],
    out: &mut FieldChunk,
) {
    log::trace!("add_cubic_anisotropy_field has been called");

    let spin = &atoms.spin;
    for (i, atom) in out.atoms().enumerate() {
        let kc2 = 2.0 * materials[atoms.material[atom]].k_cubic;

        let sx = spin.x[atom];
        out.x[i] -= kc2 * sx * sx * sx;

        let sy = spin.y[atom];
        out.y[i] -= kc2 * sy * sy * sy;

        let sz = spin.z[atom];
        out.z[i] -= kc2 * sz * sz * sz;
    }
}
