// src/effective_field/zeeman.rs
//
// Uniform applied field, plus the optional thin-film demagnetising
// correction B_d = -mu0 N_a M_a / V (shape anisotropy of a film, using the
// instantaneous total moment of the sample).

use crate::atoms::SpinSystem;
use crate::config::AppliedFieldConfig;
use crate::params::MU0;
use crate::stats::MagnetisationStats;
use crate::vec3::scale;
use crate::vector_field::FieldChunk;

/// Add H_applied * direction to every atom in `out`, and the thin-film
/// correction when enabled.
pub fn add_applied_field(
    cfg: &AppliedFieldConfig,
    system: &SpinSystem,
    stats: &dyn MagnetisationStats,
    out: &mut FieldChunk,
) {
    log::trace!("add_applied_field has been called");

    out.add_uniform(scale(cfg.direction, cfg.strength));

    if cfg.thin_film_demag {
        let moment = stats.total_moment(system);
        out.add_uniform(thin_film_demag_field(cfg, moment));
    }
}

/// -mu0 N_a M_a / V for a total moment `moment` (J/T).
pub fn thin_film_demag_field(cfg: &AppliedFieldConfig, moment: [f64; 3]) -> [f64; 3] {
    let pre = -MU0 / cfg.volume();
    [
        pre * cfg.demag_factor[0] * moment[0],
        pre * cfg.demag_factor[1] * moment[1],
        pre * cfg.demag_factor[2] * moment[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn film_correction_opposes_perpendicular_moment() {
        let cfg = AppliedFieldConfig {
            thin_film_demag: true,
            demag_factor: [0.0, 0.0, 1.0],
            system_dimensions: [100.0, 100.0, 10.0],
            ..AppliedFieldConfig::default()
        };
        let v = 1.0e5 * 1.0e-30;
        let m = [1.0e-20, 0.0, 2.0e-20];
        let b = thin_film_demag_field(&cfg, m);
        assert_eq!(b[0], 0.0);
        assert_eq!(b[1], 0.0);
        let expected = -MU0 * 2.0e-20 / v;
        assert!((b[2] - expected).abs() <= 1e-12 * expected.abs(), "b_z = {}", b[2]);
    }
}
