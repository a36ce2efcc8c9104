// src/state.rs
//
// Time-dependent scalar state read by the external-field kernels.
// The integrator advances it between field evaluations; the kernels only read it.

use serde::{Deserialize, Serialize};

/// Moving HAMR write head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadState {
    /// Head centre (x, y) in Angstrom.
    pub position: [f64; 2],
    /// Temperature far from the head (K).
    pub t_min: f64,
    /// Peak temperature under the head (K).
    pub t_max: f64,
    pub laser_on: bool,
}

impl HeadState {
    /// Move the head along x by `speed * dt` (Angstrom).
    pub fn advance(&mut self, speed: f64, dt: f64) {
        self.position[0] += speed * dt;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    /// Current temperature (K).
    pub temperature: f64,
    /// Equilibration temperature (K).
    pub equilibration_temperature: f64,
    /// Integer time step counter; real time is `time * dt`.
    pub time: u64,
    pub head: HeadState,
}

impl SimState {
    /// Real elapsed time in seconds.
    #[inline]
    pub fn real_time(&self, dt: f64) -> f64 {
        self.time as f64 * dt
    }
}
