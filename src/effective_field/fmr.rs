// src/effective_field/fmr.rs
//
// Ferromagnetic-resonance drive: a spatially uniform field
//   H(t) = amplitude * direction * sin(2 pi f t)

use std::f64::consts::PI;

use crate::config::FmrConfig;
use crate::vec3::scale;
use crate::vector_field::FieldChunk;

/// Drive field at real time `t` (s).
pub fn fmr_field(cfg: &FmrConfig, t: f64) -> [f64; 3] {
    let phase = (2.0 * PI * t * cfg.frequency).sin();
    scale(cfg.direction, cfg.amplitude * phase)
}

pub fn add_fmr_field(cfg: &FmrConfig, t: f64, out: &mut FieldChunk) {
    log::trace!("add_fmr_field has been called");
    out.add_uniform(fmr_field(cfg, t));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_period_gives_full_amplitude() {
        let cfg = FmrConfig::default();
        let quarter = 0.25 / cfg.frequency;
        let h = fmr_field(&cfg, quarter);
        assert!((h[0] - cfg.amplitude).abs() < 1e-15);
        assert_eq!(h[1], 0.0);
        assert_eq!(fmr_field(&cfg, 0.0), [0.0, 0.0, 0.0]);

        let half = fmr_field(&cfg, 0.5 / cfg.frequency);
        assert!(half[0].abs() < 1e-15);
    }
}
