// src/effective_field/thermal.rs
//
// Langevin thermal field: independent Gaussian components with per-atom width
//   sigma_i = sqrt(T_i) * H_th_sigma(material_i)
//
// Fresh samples are drawn on every call. Draw order is fixed so that a seeded
// generator reproduces the field exactly: all x components of the range, then
// all y, then all z.

use rand::Rng;

use crate::atoms::AtomEnsemble;
use crate::params::Material;
use crate::random::gaussian;
use crate::vector_field::FieldChunk;

/// Add thermal noise at the uniform temperature `temperature`.
pub fn add_thermal_field<R: Rng + ?Sized>(
    atoms: &AtomEnsemble,
    materials: &[Material],
    temperature: f64,
    rng: &mut R,
    out: &mut FieldChunk,
) {
    log::trace!("add_thermal_field has been called");

    // unroll sigma per material
    let sigma_mat: Vec<f64> = materials.iter().map(|m| m.thermal_sigma(temperature)).collect();
    add_scaled_noise(rng, out, |atom| sigma_mat[atoms.material[atom]]);
}

/// Add `sigma(atom) * N(0, 1)` to every component of every atom in `out`.
///
/// `sigma` is called with the global atom index, once per drawn sample.
pub(crate) fn add_scaled_noise<R, F>(rng: &mut R, out: &mut FieldChunk, sigma: F)
where
    R: Rng + ?Sized,
    F: Fn(usize) -> f64,
{
    let start = out.start();
    for component in [&mut *out.x, &mut *out.y, &mut *out.z] {
        for (i, h) in component.iter_mut().enumerate() {
            *h += sigma(start + i) * gaussian(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_field::VectorField;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_temperature_adds_nothing_but_consumes_samples() {
        let atoms = AtomEnsemble::new(3);
        let mats = vec![Material {
            h_th_sigma: 1.0,
            ..Material::default()
        }];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut h = VectorField::uniform(3, [1.0, 2.0, 3.0]);
        add_thermal_field(&atoms, &mats, 0.0, &mut rng, &mut h.range_mut(0..3));
        assert_eq!(h, VectorField::uniform(3, [1.0, 2.0, 3.0]));

        let mut fresh = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..9 {
            gaussian(&mut fresh);
        }
        assert_eq!(gaussian(&mut rng), gaussian(&mut fresh));
    }

    #[test]
    fn width_follows_material_of_each_atom() {
        let mut atoms = AtomEnsemble::new(2);
        atoms.material[1] = 1;
        let mats = vec![
            Material {
                h_th_sigma: 1.0,
                ..Material::default()
            },
            Material {
                h_th_sigma: 0.0,
                ..Material::default()
            },
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut h = VectorField::zeros(2);
        add_thermal_field(&atoms, &mats, 300.0, &mut rng, &mut h.range_mut(0..2));
        assert_ne!(h.get(0), [0.0; 3]);
        assert_eq!(h.get(1), [0.0; 3]);
    }

    #[test]
    fn noise_adds_onto_existing_field_of_a_range_view() {
        let mut atoms = AtomEnsemble::new(4);
        atoms.material[3] = 1;
        let mats = vec![
            Material {
                h_th_sigma: 0.5,
                ..Material::default()
            },
            Material {
                h_th_sigma: 2.0,
                ..Material::default()
            },
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut reference = rng.clone();
        let mut h = VectorField::uniform(4, [1.0, -1.0, 0.5]);
        add_thermal_field(&atoms, &mats, 16.0, &mut rng, &mut h.range_mut(2..4));

        // x for atoms 2 and 3, then y, then z.
        let g: Vec<f64> = (0..6).map(|_| gaussian(&mut reference)).collect();
        let sigma = [2.0, 8.0];
        let base = [1.0, -1.0, 0.5];
        for (k, atom) in [2usize, 3].into_iter().enumerate() {
            let got = h.get(atom);
            for c in 0..3 {
                assert_eq!(got[c], base[c] + sigma[k] * g[2 * c + k], "atom {atom} axis {c}");
            }
        }
        assert_eq!(h.get(0), base);
        assert_eq!(h.get(1), base);
    }
}
