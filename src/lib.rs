//! eqsynth - Five-band Graphic Equalizer Engine
//!
//! One gain vector (dB per band) drives three derivations:
//! 1. Filtered audio - IIR cascade of peaking biquads, or a linear-phase FIR kernel
//! 2. Frequency response - magnitude in dB on a 512-point log grid
//! 3. Transfer function - H(z) rendered as plain text and LaTeX
//!
//! # Architecture
//!
//! - `dsp`: band table, filter design and application, response evaluation
//! - `transfer`: polynomial and rational-function algebra for H(z)
//! - `engine`: audio buffers and the WAV codec
//! - `service`: upload/process facade over a track store
//! - `cli`: command-line front end

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod service;
pub mod transfer;

pub use error::{EqError, Result};
