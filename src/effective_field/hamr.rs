// src/effective_field/hamr.rs
//
// Heat-assisted magnetic recording: a moving write head heats a Gaussian spot
//   T(x, y) = Tmin + (Tmax - Tmin) exp(-r^2 / fwhm^2),  r measured from the head
// and applies a write field inside a box offset from the head. The write
// field polarity alternates every `oscillation_wavelength` of head travel,
// writing a bit pattern as the head moves.
//
// With the laser off the whole sample sits at the global temperature and no
// write field is applied. This kernel replaces the generic thermal + applied
// pair; it does not add to them.

use rand::Rng;

use crate::atoms::SpinSystem;
use crate::config::FieldConfig;
use crate::effective_field::thermal::{add_scaled_noise, add_thermal_field};
use crate::state::SimState;
use crate::vec3::scale;
use crate::vector_field::FieldChunk;

/// Head temperature and write-field profile for one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HamrProfile {
    head: [f64; 2],
    t_min: f64,
    delta_t: f64,
    fwhm2: f64,
    window_min: [f64; 2],
    window_max: [f64; 2],
    write_field: [f64; 3],
}

impl HamrProfile {
    pub fn new(cfg: &FieldConfig, state: &SimState) -> Self {
        let head = state.head.position;
        let h = &cfg.hamr;
        let polarity = write_polarity(head[0], h.oscillation_wavelength);
        Self {
            head,
            t_min: state.head.t_min,
            delta_t: state.head.t_max - state.head.t_min,
            fwhm2: h.fwhm * h.fwhm,
            window_min: [head[0] + h.field_bounds_min[0], head[1] + h.field_bounds_min[1]],
            window_max: [head[0] + h.field_bounds_max[0], head[1] + h.field_bounds_max[1]],
            write_field: scale(cfg.applied.direction, cfg.applied.strength * polarity),
        }
    }

    /// Local temperature (K) at (x, y).
    #[inline]
    pub fn temperature_at(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.head[0];
        let dy = y - self.head[1];
        self.t_min + self.delta_t * (-(dx * dx + dy * dy) / self.fwhm2).exp()
    }

    /// Whether (x, y) lies in the write-field box (bounds inclusive).
    #[inline]
    pub fn in_write_window(&self, x: f64, y: f64) -> bool {
        x >= self.window_min[0]
            && x <= self.window_max[0]
            && y >= self.window_min[1]
            && y <= self.window_max[1]
    }

    pub fn write_field(&self) -> [f64; 3] {
        self.write_field
    }
}

/// +1 or -1 depending on which half-period of the oscillation the head is in.
pub fn write_polarity(head_x: f64, wavelength: f64) -> f64 {
    let cycle = (head_x / wavelength).floor() as i64;
    (2 * cycle.rem_euclid(2) - 1) as f64
}

pub fn add_hamr_field<R: Rng + ?Sized>(
    system: &SpinSystem,
    cfg: &FieldConfig,
    state: &SimState,
    rng: &mut R,
    out: &mut FieldChunk,
) {
    log::trace!("add_hamr_field has been called");

    let atoms = &system.atoms;
    let coord = &atoms.coord;

    if !state.head.laser_on {
        add_thermal_field(atoms, &system.materials, state.temperature, rng, out);
        return;
    }

    let profile = HamrProfile::new(cfg, state);
    add_scaled_noise(rng, out, |atom| {
        let t = profile.temperature_at(coord.x[atom], coord.y[atom]);
        system.material_of(atom).thermal_sigma(t)
    });

    let hw = profile.write_field();
    for (i, atom) in out.atoms().enumerate() {
        if profile.in_write_window(coord.x[atom], coord.y[atom]) {
            out.add(i, hw);
        }
    }
}
