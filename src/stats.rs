// src/stats.rs
//
// Magnetisation statistics needed by the thin-film demag correction.

use crate::atoms::SpinSystem;

/// Source of the total magnetic moment of the system.
pub trait MagnetisationStats: Sync {
    /// Total moment sum_i mu_s,i S_i (J/T) per axis.
    fn total_moment(&self, system: &SpinSystem) -> [f64; 3];
}

/// Sums the moments directly from the current spins.
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentSum;

impl MagnetisationStats for MomentSum {
    fn total_moment(&self, system: &SpinSystem) -> [f64; 3] {
        let atoms = &system.atoms;
        let mut m = [0.0; 3];
        for atom in 0..atoms.len() {
            let mu_s = system.material_of(atom).mu_s;
            m[0] += mu_s * atoms.spin.x[atom];
            m[1] += mu_s * atoms.spin.y[atom];
            m[2] += mu_s * atoms.spin.z[atom];
        }
        m
    }
}

/// A moment computed once and shared (e.g. across parallel partitions of
/// the same timestep).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMoment(pub [f64; 3]);

impl MagnetisationStats for FixedMoment {
    fn total_moment(&self, _system: &SpinSystem) -> [f64; 3] {
        self.0
    }
}

/// Mean reduced magnetisation (1/N) sum_i S_i.
pub fn mean_magnetisation(system: &SpinSystem) -> [f64; 3] {
    let s = &system.atoms.spin;
    let n = s.len();
    if n == 0 {
        return [0.0; 3];
    }
    let inv = 1.0 / n as f64;
    [
        s.x.iter().sum::<f64>() * inv,
        s.y.iter().sum::<f64>() * inv,
        s.z.iter().sum::<f64>() * inv,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effective_field::exchange::ExchangeTable;
    use crate::lattice::SimpleCubic;
    use crate::params::Material;

    #[test]
    fn moment_sum_weights_by_material_moment() {
        let lat = SimpleCubic::new(2, 1, 1, 1.0).unwrap();
        let mats = vec![
            Material {
                mu_s: 2.0,
                ..Material::default()
            },
            Material {
                mu_s: 3.0,
                ..Material::default()
            },
        ];
        let mut sys = lat.build_system(ExchangeTable::Isotropic(vec![0.0]), mats);
        sys.atoms.material[1] = 1;
        sys.atoms.spin.set(1, [1.0, 0.0, 0.0]);

        assert_eq!(MomentSum.total_moment(&sys), [3.0, 0.0, 2.0]);
        assert_eq!(mean_magnetisation(&sys), [0.5, 0.0, 0.5]);
        assert_eq!(FixedMoment([1.0, 2.0, 3.0]).total_moment(&sys), [1.0, 2.0, 3.0]);
    }
}
