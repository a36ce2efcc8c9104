// src/effective_field/dipolar.rs
//
// Dipolar field. The long-range sum is solved elsewhere; this only adds the
// pre-computed per-atom values.

use crate::vector_field::{FieldChunk, VectorField};

pub fn add_dipolar_field(dipolar: &VectorField, out: &mut FieldChunk) {
    log::trace!("add_dipolar_field has been called");

    let r = out.atoms();
    for (o, d) in out.x.iter_mut().zip(&dipolar.x[r.clone()]) {
        *o += d;
    }
    for (o, d) in out.y.iter_mut().zip(&dipolar.y[r.clone()]) {
        *o += d;
    }
    for (o, d) in out.z.iter_mut().zip(&dipolar.z[r]) {
        *o += d;
    }
}
