// src/config.rs
//
// Run-lifetime field configuration. Set once before the run, read (never
// written) by the kernels. Serialised to/from JSON so every run directory
// records exactly which contributions were active.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::ConfigError;
use crate::lattice::SimpleCubic;
use crate::params::Material;
use crate::vec3::norm;

/// Simulation program. Only HAMR changes how the external field is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    #[default]
    Dynamics,
    Hamr,
}

impl Program {
    /// Legacy numeric id of the HAMR program.
    pub const HAMR_ID: u32 = 7;

    pub fn from_id(id: u32) -> Self {
        if id == Self::HAMR_ID {
            Program::Hamr
        } else {
            Program::Dynamics
        }
    }
}

/// Representation of the uniaxial anisotropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniaxialKind {
    /// K along z only: H_z -= 2 K S_z.
    Scalar,
    /// Full 3x3 K: H -= 2 K · S.
    Tensor,
}

impl TryFrom<u8> for UniaxialKind {
    type Error = ConfigError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(UniaxialKind::Scalar),
            1 => Ok(UniaxialKind::Tensor),
            _ => Err(ConfigError::UnknownTag {
                kind: "anisotropy",
                tag,
            }),
        }
    }
}

/// Which contributions are summed into the fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTerms {
    pub exchange: bool,
    pub uniaxial_anisotropy: Option<UniaxialKind>,
    pub cubic_anisotropy: bool,
    pub surface_anisotropy: bool,
    pub thermal: bool,
    pub applied: bool,
    pub fmr: bool,
    pub dipolar: bool,
}

impl Default for FieldTerms {
    fn default() -> Self {
        Self {
            exchange: true,
            ..Self::none()
        }
    }
}

impl FieldTerms {
    /// Every contribution switched off.
    pub const fn none() -> Self {
        Self {
            exchange: false,
            uniaxial_anisotropy: None,
            cubic_anisotropy: false,
            surface_anisotropy: false,
            thermal: false,
            applied: false,
            fmr: false,
            dipolar: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppliedFieldConfig {
    /// Magnitude (T).
    pub strength: f64,
    /// Unit direction.
    pub direction: [f64; 3],
    /// Add the uniform thin-film demagnetising correction -mu0 N M / V.
    pub thin_film_demag: bool,
    pub demag_factor: [f64; 3],
    /// Sample extent (Angstrom) used for the volume.
    pub system_dimensions: [f64; 3],
}

impl Default for AppliedFieldConfig {
    fn default() -> Self {
        Self {
            strength: 0.0,
            direction: [0.0, 0.0, 1.0],
            thin_film_demag: false,
            demag_factor: [0.0, 0.0, 1.0],
            system_dimensions: [0.0; 3],
        }
    }
}

impl AppliedFieldConfig {
    /// Sample volume in m^3.
    pub fn volume(&self) -> f64 {
        self.system_dimensions.iter().product::<f64>() * 1.0e-30
    }

    /// Use `dims` as the sample extent unless one was set explicitly.
    pub fn default_dimensions(&mut self, dims: [f64; 3]) {
        if self.system_dimensions == [0.0; 3] {
            self.system_dimensions = dims;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FmrConfig {
    /// Drive frequency (Hz).
    pub frequency: f64,
    /// Drive amplitude (T).
    pub amplitude: f64,
    pub direction: [f64; 3],
}

impl Default for FmrConfig {
    fn default() -> Self {
        Self {
            frequency: 20.0e9,
            amplitude: 0.001,
            direction: [1.0, 0.0, 0.0],
        }
    }
}

/// Write-head geometry. All lengths in Angstrom, relative to the head centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HamrConfig {
    /// Width of the Gaussian heat spot.
    pub fwhm: f64,
    pub field_bounds_min: [f64; 2],
    pub field_bounds_max: [f64; 2],
    /// Head travel over which the write field polarity flips.
    pub oscillation_wavelength: f64,
}

impl Default for HamrConfig {
    fn default() -> Self {
        Self {
            fwhm: 200.0,
            field_bounds_min: [-400.0, -250.0],
            field_bounds_max: [-100.0, 250.0],
            oscillation_wavelength: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub program: Program,
    pub terms: FieldTerms,
    pub applied: AppliedFieldConfig,
    pub fmr: FmrConfig,
    pub hamr: HamrConfig,
    /// Integrator timestep (s).
    pub dt: f64,
    /// Base seed for the thermal noise streams.
    pub seed: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            program: Program::Dynamics,
            terms: FieldTerms::default(),
            applied: AppliedFieldConfig::default(),
            fmr: FmrConfig::default(),
            hamr: HamrConfig::default(),
            dt: 1.0e-15,
            seed: 42,
        }
    }
}

impl FieldConfig {
    /// Read and validate.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let cfg = Self::read_json_file(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read without validating, for callers that still fill in fields
    /// (e.g. the sample extent) before calling `validate`.
    pub fn read_json_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Check the parameters that would otherwise lead to divisions by zero
    /// or meaningless fields inside the kernels.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(ConfigError::invalid("dt", format!("must be positive, got {}", self.dt)));
        }

        let uses_applied = self.terms.applied || self.program == Program::Hamr;
        if uses_applied {
            warn_if_not_unit("applied.direction", self.applied.direction);
        }
        if self.terms.applied && self.applied.thin_film_demag && !(self.applied.volume() > 0.0) {
            return Err(ConfigError::invalid(
                "applied.system_dimensions",
                "thin-film demag needs a positive sample volume",
            ));
        }

        if self.terms.fmr {
            if !(self.fmr.frequency > 0.0) {
                return Err(ConfigError::invalid(
                    "fmr.frequency",
                    format!("must be positive, got {}", self.fmr.frequency),
                ));
            }
            warn_if_not_unit("fmr.direction", self.fmr.direction);
        }

        if self.program == Program::Hamr {
            let h = &self.hamr;
            if !(h.fwhm > 0.0) {
                return Err(ConfigError::invalid(
                    "hamr.fwhm",
                    format!("must be positive, got {}", h.fwhm),
                ));
            }
            if !(h.oscillation_wavelength > 0.0) {
                return Err(ConfigError::invalid(
                    "hamr.oscillation_wavelength",
                    format!("must be positive, got {}", h.oscillation_wavelength),
                ));
            }
            if h.field_bounds_min[0] > h.field_bounds_max[0]
                || h.field_bounds_min[1] > h.field_bounds_max[1]
            {
                return Err(ConfigError::invalid(
                    "hamr.field_bounds_min",
                    "exceeds field_bounds_max",
                ));
            }
        }

        Ok(())
    }
}

fn warn_if_not_unit(name: &str, v: [f64; 3]) {
    let n = norm(v);
    if (n - 1.0).abs() > 1e-6 {
        log::warn!("{name} is not a unit vector (|v| = {n}); field magnitude will be scaled by it");
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericsConfig {
    pub steps: usize,
    pub output_stride: usize,
    /// Gilbert damping used to derive the thermal width.
    pub alpha: f64,
    /// HAMR head speed (Angstrom / s).
    pub head_speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub binary: String,
    pub run_id: String,
    pub timestamp_unix: Option<u64>,
}

/// Everything needed to reproduce a driver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub lattice: SimpleCubic,
    pub materials: Vec<Material>,
    pub fields: FieldConfig,
    pub numerics: NumericsConfig,
    pub run: RunInfo,
}

impl RunConfig {
    pub fn write_to_dir(&self, out_dir: &Path) -> Result<(), ConfigError> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_program_id_seven_is_hamr() {
        assert_eq!(Program::from_id(7), Program::Hamr);
        assert_eq!(Program::from_id(0), Program::Dynamics);
        assert_eq!(Program::from_id(12), Program::Dynamics);
    }

    #[test]
    fn unknown_anisotropy_tag_is_rejected() {
        assert_eq!(UniaxialKind::try_from(1).unwrap(), UniaxialKind::Tensor);
        let err = UniaxialKind::try_from(4).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTag { tag: 4, .. }));
    }

    #[test]
    fn thin_film_demag_without_volume_fails_validation() {
        let mut cfg = FieldConfig::default();
        cfg.terms.applied = true;
        cfg.applied.thin_film_demag = true;
        assert!(cfg.validate().is_err());

        cfg.applied.system_dimensions = [10.0, 10.0, 5.0];
        assert!(cfg.validate().is_ok());
        assert!((cfg.applied.volume() - 500.0e-30).abs() < 1e-40);
    }

    #[test]
    fn hamr_requires_positive_width() {
        let mut cfg = FieldConfig {
            program: Program::Hamr,
            ..FieldConfig::default()
        };
        assert!(cfg.validate().is_ok());
        cfg.hamr.fwhm = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: FieldConfig =
            serde_json::from_str(r#"{ "program": "hamr", "terms": { "fmr": true } }"#).unwrap();
        assert_eq!(cfg.program, Program::Hamr);
        assert!(cfg.terms.fmr);
        assert!(cfg.terms.exchange);
        assert!(!cfg.terms.thermal);
        assert_eq!(cfg.fmr, FmrConfig::default());
        assert_eq!(cfg.hamr.fwhm, 200.0);
    }

    #[test]
    fn explicit_sample_extent_is_kept() {
        let mut applied = AppliedFieldConfig::default();
        applied.default_dimensions([30.0, 30.0, 6.0]);
        assert_eq!(applied.system_dimensions, [30.0, 30.0, 6.0]);

        applied.system_dimensions = [100.0, 50.0, 5.0];
        applied.default_dimensions([30.0, 30.0, 6.0]);
        assert_eq!(applied.system_dimensions, [100.0, 50.0, 5.0]);
    }
}
