//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use tracing::info;

use crate::dsp::{apply_fir_gains, apply_iir, evaluate_response, FilterKind, GainVector, EQ_BANDS};
use crate::engine::{read_wav, write_wav};
use crate::error::Result;
use crate::transfer::synthesize;

/// Print the band table.
pub fn list_bands(json: bool) -> Result<()> {
    println!("{}", render_bands(json)?);
    Ok(())
}

/// Band table as aligned text or a JSON array
pub fn render_bands(json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&EQ_BANDS)?);
    }

    let mut out = format!("{:<12} {:>10} {:>5}", "Band", "Center Hz", "Q");
    for band in &EQ_BANDS {
        out.push_str(&format!(
            "\n{:<12} {:>10} {:>5}",
            band.name, band.center_frequency, band.q
        ));
    }
    Ok(out)
}

/// Equalize a WAV file and write the result as 16-bit PCM.
pub fn process_file(input: &Path, output: &Path, gains: Vec<f64>, filter: FilterKind) -> Result<()> {
    let gains = GainVector::new(gains)?;
    info!("Processing {} with {} filter", input.display(), filter);

    let mut track = read_wav(input)?;
    track.normalize_peak();

    let processed = match filter {
        FilterKind::Iir => apply_iir(&track, &gains)?,
        FilterKind::Fir => apply_fir_gains(&track, &gains)?,
    };
    write_wav(&processed, output)?;

    println!(
        "Wrote {} ({} frames, {} channel(s), {} Hz)",
        output.display(),
        processed.num_frames(),
        processed.num_channels(),
        processed.sample_rate()
    );
    Ok(())
}

/// Print the magnitude response curve as JSON.
pub fn print_response(sample_rate: u32, gains: Vec<f64>, filter: FilterKind) -> Result<()> {
    let gains = GainVector::new(gains)?;
    let response = evaluate_response(&gains, sample_rate, filter)?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// Print the transfer function in plain text or LaTeX.
pub fn print_transfer(sample_rate: u32, gains: Vec<f64>, filter: FilterKind, latex: bool) -> Result<()> {
    let gains = GainVector::new(gains)?;
    let transfer = synthesize(&gains, sample_rate, filter)?;
    if latex {
        println!("{}", transfer.latex);
    } else {
        println!("H(z) =\n{}", transfer.text);
    }
    Ok(())
}
