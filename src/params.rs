// src/params.rs
//
// Physical constants and per-material coefficients.
//
// Field-unit convention: every coefficient that enters a field kernel
// (exchange J_ij, anisotropy K, Kc, Ks) is stored already divided by the
// atomic moment mu_s, so kernels produce fields in Tesla directly.

use serde::{Deserialize, Serialize};

/// Vacuum permeability (T m / A).
pub const MU0: f64 = 4.0e-7 * std::f64::consts::PI;

/// Boltzmann constant (J / K).
pub const K_B: f64 = 1.380_649e-23;

/// Bohr magneton (J / T).
pub const MU_B: f64 = 9.274_010_078_3e-24;

/// Electron gyromagnetic ratio (rad / (s T)).
pub const GAMMA_E: f64 = 1.760_859_630_23e11;

/// Read-only material record, indexed by an atom's material id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub name: String,
    /// Atomic moment (J/T). Only used for magnetisation statistics.
    pub mu_s: f64,
    /// Uniaxial anisotropy constant (scalar form, easy axis z).
    pub k_uniaxial: f64,
    /// Uniaxial anisotropy tensor (tensor form).
    pub k_tensor: [[f64; 3]; 3],
    /// Cubic anisotropy constant.
    pub k_cubic: f64,
    /// Neel surface anisotropy constant.
    pub k_surface: f64,
    /// Langevin thermal field width at T = 1 K.
    pub h_th_sigma: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "material".to_string(),
            mu_s: 1.5 * MU_B,
            k_uniaxial: 0.0,
            k_tensor: [[0.0; 3]; 3],
            k_cubic: 0.0,
            k_surface: 0.0,
            h_th_sigma: 0.0,
        }
    }
}

impl Material {
    /// Thermal noise width at temperature `t`: sqrt(T) * H_th_sigma.
    #[inline]
    pub fn thermal_sigma(&self, temperature: f64) -> f64 {
        temperature.sqrt() * self.h_th_sigma
    }
}

/// Width of the Langevin thermal field per sqrt(K):
///   sigma = sqrt( 2 alpha k_B / (gamma mu_s dt) )
pub fn thermal_field_sigma(alpha: f64, mu_s: f64, dt: f64) -> f64 {
    (2.0 * alpha * K_B / (GAMMA_E * mu_s * dt)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thermal_sigma_scales_with_sqrt_temperature() {
        let mat = Material {
            h_th_sigma: 0.5,
            ..Material::default()
        };
        assert!((mat.thermal_sigma(4.0) - 1.0).abs() < 1e-15);
        assert_eq!(mat.thermal_sigma(0.0), 0.0);
    }

    #[test]
    fn langevin_width_matches_closed_form() {
        let mu_s = 1.5 * MU_B;
        let s = thermal_field_sigma(0.1, mu_s, 1e-15);
        let expected = (2.0 * 0.1 * K_B / (GAMMA_E * mu_s * 1e-15)).sqrt();
        assert!((s - expected).abs() <= 1e-12 * expected);
        // Quadrupling dt halves the width.
        let s4 = thermal_field_sigma(0.1, mu_s, 4e-15);
        assert!((s / s4 - 2.0).abs() < 1e-12);
    }
}
