// src/lib.rs - Library root for doctor-groq

pub mod cli;
pub mod core;
pub mod infra;
pub mod provider;
pub mod util;
