// src/effective_field/mod.rs
//
// Per-atom effective field, split into two accumulators:
//   spin field     : exchange, uniaxial / cubic / surface anisotropy
//   external field : thermal, applied (+ thin-film demag), HAMR, FMR, dipolar
//
// Each aggregator zeroes its accumulator over the requested atom range and
// then lets every enabled kernel ADD its contribution. Kernels read only the
// shared, immutable `FieldContext` and write only inside the range, so
// disjoint ranges may be evaluated concurrently (see `crate::parallel`).
pub mod anisotropy;
pub mod dipolar;
pub mod exchange;
pub mod fmr;
pub mod hamr;
pub mod surface;
pub mod thermal;
pub mod zeeman;

use std::ops::Range;

use rand::Rng;

use crate::atoms::SpinSystem;
use crate::config::{FieldConfig, Program};
use crate::error::ConfigError;
use crate::state::SimState;
use crate::stats::MagnetisationStats;
use crate::vector_field::{FieldChunk, VectorField};

/// Everything a field evaluation reads, for one timestep.
///
/// Built by the integrator before each call; never mutated by the kernels.
#[derive(Clone, Copy)]
pub struct FieldContext<'a> {
    pub system: &'a SpinSystem,
    pub config: &'a FieldConfig,
    pub state: &'a SimState,
    /// Externally computed dipolar field, required when dipolar is enabled.
    pub dipolar: Option<&'a VectorField>,
    pub stats: &'a dyn MagnetisationStats,
}

impl<'a> FieldContext<'a> {
    /// Consistency checks between configuration, tables and topology.
    ///
    /// The kernels assume all of this holds and do not re-check it; run once
    /// before the first timestep.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()?;

        let sys = self.system;
        let atoms = &sys.atoms;
        let n = atoms.len();
        let terms = &self.config.terms;

        for (name, len) in [
            ("spin", atoms.spin.len()),
            ("coord", atoms.coord.len()),
            ("surface", atoms.surface.len()),
        ] {
            if len != n {
                return Err(ConfigError::Inconsistent(format!(
                    "{name} array has {len} entries for {n} atoms"
                )));
            }
        }

        if let Some(&bad) = atoms.material.iter().find(|&&m| m >= sys.materials.len()) {
            return Err(ConfigError::Inconsistent(format!(
                "material id {bad} outside table of {}",
                sys.materials.len()
            )));
        }

        if terms.exchange {
            let nl = &sys.neighbours;
            if nl.n_atoms() != n {
                return Err(ConfigError::Inconsistent(format!(
                    "neighbour list describes {} atoms, system has {n}",
                    nl.n_atoms()
                )));
            }
            if nl.interaction.len() != nl.neighbour.len() {
                return Err(ConfigError::Inconsistent(format!(
                    "{} interaction ids for {} neighbour entries",
                    nl.interaction.len(),
                    nl.neighbour.len()
                )));
            }
            check_offsets("neighbour list", &nl.offsets, nl.neighbour.len())?;
            if let Some(&bad) = nl.neighbour.iter().find(|&&j| j >= n) {
                return Err(ConfigError::Inconsistent(format!(
                    "neighbour index {bad} out of range"
                )));
            }
            if let Some(&bad) = nl.interaction.iter().find(|&&id| id >= sys.exchange.len()) {
                return Err(ConfigError::Inconsistent(format!(
                    "interaction id {bad} outside {:?} exchange table of {}",
                    sys.exchange.kind(),
                    sys.exchange.len()
                )));
            }
        }

        if terms.surface_anisotropy {
            let sb = &sys.surface_bonds;
            if sb.n_atoms() != n {
                return Err(ConfigError::Inconsistent(format!(
                    "surface bond table describes {} atoms, system has {n}",
                    sb.n_atoms()
                )));
            }
            check_offsets("surface bond table", &sb.offsets, sb.eij.len())?;
        }

        if terms.dipolar {
            match self.dipolar {
                Some(d) if d.len() == n => {}
                Some(d) => {
                    return Err(ConfigError::Inconsistent(format!(
                        "dipolar field has {} entries for {n} atoms",
                        d.len()
                    )))
                }
                None => {
                    return Err(ConfigError::Inconsistent(
                        "dipolar enabled but no dipolar field supplied".into(),
                    ))
                }
            }
        }

        let state = self.state;
        if !(state.temperature >= 0.0) {
            return Err(ConfigError::invalid(
                "temperature",
                format!("must be non-negative, got {}", state.temperature),
            ));
        }
        if self.config.program == Program::Hamr {
            let head = &state.head;
            if !(head.t_min >= 0.0) {
                return Err(ConfigError::invalid(
                    "head.t_min",
                    format!("must be non-negative, got {}", head.t_min),
                ));
            }
            if head.t_max < head.t_min {
                return Err(ConfigError::invalid("head.t_max", "below head.t_min"));
            }
        }

        Ok(())
    }
}

/// CSR offsets must start at 0, never decrease and end at the entry count.
fn check_offsets(name: &str, offsets: &[usize], entries: usize) -> Result<(), ConfigError> {
    if offsets.first().is_some_and(|&o| o != 0) {
        return Err(ConfigError::Inconsistent(format!("{name} offsets do not start at 0")));
    }
    if let Some(w) = offsets.windows(2).position(|w| w[1] < w[0]) {
        return Err(ConfigError::Inconsistent(format!(
            "{name} offsets decrease after atom {w}"
        )));
    }
    let last = offsets.last().copied().unwrap_or(0);
    if last != entries {
        return Err(ConfigError::Inconsistent(format!(
            "{name} offsets end at {last}, table has {entries} entries"
        )));
    }
    Ok(())
}

/// Zero `spin_field` over `range` and accumulate the spin-dependent terms.
pub fn calculate_spin_fields(
    ctx: &FieldContext,
    spin_field: &mut VectorField,
    range: Range<usize>,
) {
    let mut out = spin_field.range_mut(range);
    calculate_spin_fields_chunk(ctx, &mut out);
}

/// Zero `external_field` over `range` and accumulate the external terms.
pub fn calculate_external_fields<R: Rng + ?Sized>(
    ctx: &FieldContext,
    external_field: &mut VectorField,
    range: Range<usize>,
    rng: &mut R,
) {
    let mut out = external_field.range_mut(range);
    calculate_external_fields_chunk(ctx, &mut out, rng);
}

/// Both aggregators over the same range.
pub fn calculate_fields<R: Rng + ?Sized>(
    ctx: &FieldContext,
    spin_field: &mut VectorField,
    external_field: &mut VectorField,
    range: Range<usize>,
    rng: &mut R,
) {
    calculate_spin_fields(ctx, spin_field, range.clone());
    calculate_external_fields(ctx, external_field, range, rng);
}

pub fn calculate_spin_fields_chunk(ctx: &FieldContext, out: &mut FieldChunk) {
    log::trace!("calculate_spin_fields has been called for atoms {:?}", out.atoms());

    let sys = ctx.system;
    let terms = &ctx.config.terms;

    out.fill(0.0);

    if terms.exchange {
        exchange::add_exchange_field(&sys.atoms, &sys.neighbours, &sys.exchange, out);
    }
    if let Some(kind) = terms.uniaxial_anisotropy {
        anisotropy::add_uniaxial_anisotropy_field(&sys.atoms, &sys.materials, kind, out);
    }
    if terms.cubic_anisotropy {
        anisotropy::add_cubic_anisotropy_field(&sys.atoms, &sys.materials, out);
    }
    if terms.surface_anisotropy {
        surface::add_surface_anisotropy_field(&sys.atoms, &sys.materials, &sys.surface_bonds, out);
    }
}

pub fn calculate_external_fields_chunk<R: Rng + ?Sized>(
    ctx: &FieldContext,
    out: &mut FieldChunk,
    rng: &mut R,
) {
    log::trace!("calculate_external_fields has been called for atoms {:?}", out.atoms());

    let sys = ctx.system;
    let cfg = ctx.config;
    let terms = &cfg.terms;

    out.fill(0.0);

    match cfg.program {
        Program::Hamr => hamr::add_hamr_field(sys, cfg, ctx.state, rng, out),
        Program::Dynamics => {
            if terms.thermal {
                let t = ctx.state.temperature;
                thermal::add_thermal_field(&sys.atoms, &sys.materials, t, rng, out);
            }
            if terms.applied {
                zeeman::add_applied_field(&cfg.applied, sys, ctx.stats, out);
            }
        }
    }

    if terms.fmr {
        fmr::add_fmr_field(&cfg.fmr, ctx.state.real_time(cfg.dt), out);
    }
    if terms.dipolar {
        if let Some(d) = ctx.dipolar {
            dipolar::add_dipolar_field(d, out);
        }
    }
}

/// Total effective field on `atom` (spin + external).
#[inline]
pub fn total_field(
    spin_field: &VectorField,
    external_field: &VectorField,
    atom: usize,
) -> [f64; 3] {
    let s = spin_field.get(atom);
    let e = external_field.get(atom);
    [s[0] + e[0], s[1] + e[1], s[2] + e[2]]
}
