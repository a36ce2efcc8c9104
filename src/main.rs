// src/main.rs
//
// Exploratory driver: builds a simple-cubic film, evaluates the effective
// field over a sequence of timesteps (spins frozen, no integrator) and
// writes the average spin / external field per output step.
//
// Useful for checking field wiring, the FMR drive waveform and the HAMR
// head sweep without running full dynamics.
//
// Examples:
//
//   cargo run --release -- fmr steps=2000 stride=10
//       -> uniform film, FMR drive only; field_trace.csv shows the sine.
//
//   cargo run --release -- hamr nx=64 ny=32 nz=2 temp=300 tmax=700 speed=1e12
//       -> heated head sweeping along x over a thermal film.
//
//   cargo run --release -- config=fields.json out=runs run=test1
//       -> field configuration read from JSON (validated before use).
//
// Output (per run directory):
//   runs/<run_id>/
//     ├── config.json
//     └── field_trace.csv

use std::env;
use std::error::Error;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use asd_sim::config::{
    FieldConfig, FieldTerms, NumericsConfig, Program, RunConfig, RunInfo, UniaxialKind,
};
use asd_sim::effective_field::exchange::ExchangeTable;
use asd_sim::effective_field::hamr::HamrProfile;
use asd_sim::effective_field::FieldContext;
use asd_sim::lattice::SimpleCubic;
use asd_sim::parallel::compute_fields_parallel;
use asd_sim::params::{thermal_field_sigma, Material, MU_B};
use asd_sim::random::PartitionStreams;
use asd_sim::state::{HeadState, SimState};
use asd_sim::stats::{mean_magnetisation, MomentSum};
use asd_sim::vector_field::VectorField;

fn print_usage() {
    eprintln!(
        r#"Usage:
  cargo run -- [fmr|hamr|thermal|applied|cubic|surface|uniaxial]
             [nx=N] [ny=N] [nz=N] [a=VAL]
             [steps=N] [stride=N] [eqsteps=N] [dt=VAL]
             [temp=VAL] [teq=VAL] [tmax=VAL] [speed=VAL] [field=VAL]
             [partitions=N] [seed=N] [config=FILE.json]
             [out=DIR] [run=RUN_ID]

Notes:
  - Spins are frozen along +z; only the fields are evaluated.
  - config=FILE replaces the field configuration built from flags; it is
    validated once the lattice is known. applied.system_dimensions left
    at zero in the file defaults to the lattice extent.
  - eqsteps are run at teq before switching to temp.
"#
    );
}

fn parse<T: std::str::FromStr>(key: &str, val: &str) -> Result<T, Box<dyn Error>> {
    val.parse::<T>()
        .map_err(|_| format!("could not parse {key}={val}").into())
}

fn default_run_id(cfg: &FieldConfig) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0));
    let prog = match cfg.program {
        Program::Dynamics => "dynamics",
        Program::Hamr => "hamr",
    };
    format!("{}{:03}_{}", now.as_secs(), now.subsec_millis(), prog)
}

fn unique_run_dir(out_root: &Path, run_id: &str) -> PathBuf {
    let mut dir = out_root.join(run_id);
    if !dir.exists() {
        return dir;
    }
    for k in 1..1000 {
        let cand = out_root.join(format!("{}_{}", run_id, k));
        if !cand.exists() {
            dir = cand;
            break;
        }
    }
    dir
}

fn mean(f: &VectorField) -> [f64; 3] {
    let inv = 1.0 / f.len().max(1) as f64;
    [
        f.x.iter().sum::<f64>() * inv,
        f.y.iter().sum::<f64>() * inv,
        f.z.iter().sum::<f64>() * inv,
    ]
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut nx = 32usize;
    let mut ny = 32usize;
    let mut nz = 4usize;
    let mut a = 3.0_f64; // Angstrom
    let mut steps = 1000usize;
    let mut stride = 10usize;
    let mut eq_steps = 0usize;
    let mut temperature = 0.0_f64;
    let mut t_eq = 0.0_f64;
    let mut t_max = 0.0_f64;
    let mut head_speed = 1.0e12_f64; // Angstrom / s (= 100 m/s)
    let mut field = 0.5_f64; // T
    let mut partitions = rayon::current_num_threads();
    let mut config_path: Option<PathBuf> = None;
    let mut out_root = PathBuf::from("runs");
    let mut run_id: Option<String> = None;

    let mut cfg = FieldConfig {
        terms: FieldTerms {
            exchange: true,
            ..FieldTerms::none()
        },
        ..FieldConfig::default()
    };

    for arg in env::args().skip(1) {
        if arg == "-h" || arg == "--help" || arg == "help" {
            print_usage();
            return Ok(());
        }
        match arg.as_str() {
            "fmr" => cfg.terms.fmr = true,
            "hamr" => cfg.program = Program::Hamr,
            "thermal" => cfg.terms.thermal = true,
            "applied" => cfg.terms.applied = true,
            "cubic" => cfg.terms.cubic_anisotropy = true,
            "surface" => cfg.terms.surface_anisotropy = true,
            "uniaxial" => cfg.terms.uniaxial_anisotropy = Some(UniaxialKind::Scalar),
            _ => {
                let Some((key, val)) = arg.split_once('=') else {
                    print_usage();
                    return Err(format!("unrecognised argument `{arg}`").into());
                };
                match key {
                    "nx" => nx = parse(key, val)?,
                    "ny" => ny = parse(key, val)?,
                    "nz" => nz = parse(key, val)?,
                    "a" => a = parse(key, val)?,
                    "steps" => steps = parse(key, val)?,
                    "stride" => stride = parse::<usize>(key, val)?.max(1),
                    "eqsteps" => eq_steps = parse(key, val)?,
                    "dt" => cfg.dt = parse(key, val)?,
                    "temp" => temperature = parse(key, val)?,
                    "teq" => t_eq = parse(key, val)?,
                    "tmax" => t_max = parse(key, val)?,
                    "speed" => head_speed = parse(key, val)?,
                    "field" => field = parse(key, val)?,
                    "partitions" => partitions = parse::<usize>(key, val)?.max(1),
                    "seed" => cfg.seed = parse(key, val)?,
                    "config" => config_path = Some(PathBuf::from(val)),
                    "out" => out_root = PathBuf::from(val),
                    "run" => run_id = Some(val.to_string()),
                    _ => {
                        print_usage();
                        return Err(format!("unknown key `{key}`").into());
                    }
                }
            }
        }
    }

    if let Some(path) = &config_path {
        log::info!("reading field configuration from {}", path.display());
        cfg = FieldConfig::read_json_file(path)?;
    } else {
        cfg.applied.strength = field;
    }

    let lattice = SimpleCubic::new(nx, ny, nz, a)?;
    cfg.applied.default_dimensions(lattice.dimensions());

    // Co-like parameters in field units (T).
    let alpha = 0.1;
    let mu_s = 1.72 * MU_B;
    let material = Material {
        name: "Co".to_string(),
        mu_s,
        k_uniaxial: 4.64e-24 / mu_s,
        k_tensor: [[0.0; 3], [0.0; 3], [0.0, 0.0, 4.64e-24 / mu_s]],
        k_cubic: 0.0,
        k_surface: 1.0e-23 / mu_s,
        h_th_sigma: thermal_field_sigma(alpha, mu_s, cfg.dt),
    };
    let j_ij = 11.2e-21 / mu_s;
    let system = lattice.build_system(ExchangeTable::Isotropic(vec![j_ij]), vec![material]);
    log::info!(
        "{} atoms ({}x{}x{}), {} surface, {} partitions",
        system.n_atoms(),
        nx,
        ny,
        nz,
        system.atoms.surface.iter().filter(|&&s| s).count(),
        partitions
    );

    // Start the head half a wavelength before the sample so it sweeps across it.
    let mut state = SimState {
        temperature: if eq_steps > 0 { t_eq } else { temperature },
        equilibration_temperature: t_eq,
        time: 0,
        head: HeadState {
            position: [-0.5 * cfg.hamr.oscillation_wavelength, 0.5 * lattice.dimensions()[1]],
            t_min: temperature,
            t_max: t_max.max(temperature),
            laser_on: cfg.program == Program::Hamr,
        },
    };

    {
        let ctx = FieldContext {
            system: &system,
            config: &cfg,
            state: &state,
            dipolar: None,
            stats: &MomentSum,
        };
        ctx.validate()?;
    }

    let run_cfg = RunConfig {
        lattice,
        materials: system.materials.clone(),
        fields: cfg,
        numerics: NumericsConfig {
            steps,
            output_stride: stride,
            alpha,
            head_speed,
        },
        run: RunInfo {
            binary: "asd_sim".to_string(),
            run_id: run_id.clone().unwrap_or_else(|| default_run_id(&cfg)),
            timestamp_unix: SystemTime::now().duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs()),
        },
    };

    let out_dir = unique_run_dir(&out_root, &run_cfg.run.run_id);
    create_dir_all(&out_dir)?;
    run_cfg.write_to_dir(&out_dir)?;

    let trace_path = out_dir.join("field_trace.csv");
    let mut trace = BufWriter::new(File::create(&trace_path)?);
    writeln!(
        trace,
        "step,t_s,temperature,head_x,mx,my,mz,\
         h_spin_x,h_spin_y,h_spin_z,h_ext_x,h_ext_y,h_ext_z,t_head"
    )?;

    let n = system.n_atoms();
    let mut spin_field = VectorField::zeros(n);
    let mut external_field = VectorField::zeros(n);
    let mut streams = PartitionStreams::new(cfg.seed, partitions);

    for step in 0..=steps {
        if step == eq_steps && eq_steps > 0 {
            log::info!("equilibration done, switching to T = {temperature} K");
            state.temperature = temperature;
        }
        state.time = step as u64;

        let ctx = FieldContext {
            system: &system,
            config: &cfg,
            state: &state,
            dipolar: None,
            stats: &MomentSum,
        };
        compute_fields_parallel(&ctx, &mut spin_field, &mut external_field, &mut streams);

        if step % stride == 0 {
            let m = mean_magnetisation(&system);
            let hs = mean(&spin_field);
            let he = mean(&external_field);
            let t_head = HamrProfile::new(&cfg, &state)
                .temperature_at(state.head.position[0], state.head.position[1]);
            writeln!(
                trace,
                "{},{:.6e},{},{},{},{},{},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e},{}",
                step,
                state.real_time(cfg.dt),
                state.temperature,
                state.head.position[0],
                m[0],
                m[1],
                m[2],
                hs[0],
                hs[1],
                hs[2],
                he[0],
                he[1],
                he[2],
                t_head
            )?;
        }

        if cfg.program == Program::Hamr {
            state.head.advance(head_speed, cfg.dt);
        }
    }
    trace.flush()?;

    log::info!("wrote {}", trace_path.display());
    Ok(())
}
