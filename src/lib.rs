// src/lib.rs

pub mod atoms;
pub mod config;
pub mod effective_field;
pub mod error;
pub mod lattice;
pub mod parallel;
pub mod params;
pub mod random;
pub mod state;
pub mod stats;
pub mod vec3;
pub mod vector_field;
