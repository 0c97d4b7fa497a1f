//! WAV codec
//!
//! Decodes uploaded or on-disk WAV audio into an [`AudioBuffer`] at its native
//! sample rate, and encodes buffers back to 16-bit PCM WAV, either as bytes, a
//! file, or a `data:` URI for embedding in JSON responses.

use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use crate::engine::buffer::AudioBuffer;
use crate::error::{EqError, Result};

/// Prefix of every encoded data URI
pub const DATA_URI_PREFIX: &str = "data:audio/wav;base64,";

/// Full-scale value for 16-bit output
const PCM16_SCALE: f32 = 32767.0;

/// Decode an in-memory WAV file
///
/// Integer samples are scaled into [-1, 1) by their bit depth; float samples
/// are taken as-is. The sample rate and channel count of the file are kept.
///
/// # Errors
/// * `InvalidAudio` - the bytes are not a readable WAV file
/// * `UnsupportedFormat` - an integer bit depth other than 8, 16, 24 or 32
/// * `EmptyAudio` - the file holds no frames
pub fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer> {
    let reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| EqError::invalid_audio(format!("Failed to parse WAV data: {}", e), e))?;
    decode(reader)
}

/// Read a WAV file from disk
pub fn read_wav(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(EqError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let reader = WavReader::open(path)
        .map_err(|e| EqError::invalid_audio(format!("Failed to open WAV file: {}", e), e))?;
    decode(reader)
}

fn decode<R: std::io::Read>(reader: WavReader<R>) -> Result<AudioBuffer> {
    let spec = reader.spec();
    let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    if samples.is_empty() {
        return Err(EqError::EmptyAudio);
    }

    let buffer = AudioBuffer::from_interleaved(samples, spec.channels as usize, spec.sample_rate)?;
    debug!(
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        frames = buffer.num_frames(),
        "Decoded WAV"
    );
    Ok(buffer)
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let read_error = |e: hound::Error| {
        EqError::invalid_audio(
            format!("Failed to read {}-bit samples: {}", bits_per_sample, e),
            e,
        )
    };

    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(read_error),
        SampleFormat::Int => {
            let divisor = match bits_per_sample {
                8 => 128.0,
                16 => 32768.0,
                24 => 8388608.0,
                32 => 2147483648.0,
                _ => {
                    return Err(EqError::UnsupportedFormat {
                        format: format!("{}-bit integer audio", bits_per_sample),
                    })
                }
            };
            // hound widens every integer depth to i32 losslessly
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f64 / divisor) as f32))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_error)
        }
    }
}

/// Encode a buffer as 16-bit PCM WAV bytes
///
/// Samples are clamped to [-1, 1] before scaling, so out-of-range input
/// saturates instead of wrapping.
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let writer = WavWriter::new(Cursor::new(&mut bytes), pcm16_spec(buffer)?)
            .map_err(write_error)?;
        write_pcm16(writer, buffer)?;
    }
    debug!(bytes = bytes.len(), frames = buffer.num_frames(), "Encoded WAV");
    Ok(bytes)
}

/// Write a buffer to disk as 16-bit PCM WAV
pub fn write_wav(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let writer = WavWriter::create(path, pcm16_spec(buffer)?).map_err(write_error)?;
    write_pcm16(writer, buffer)
}

/// `data:audio/wav;base64,...` for a buffer
pub fn encode_data_uri(buffer: &AudioBuffer) -> Result<String> {
    let bytes = encode_wav(buffer)?;
    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(bytes)))
}

fn pcm16_spec(buffer: &AudioBuffer) -> Result<WavSpec> {
    let channels = u16::try_from(buffer.num_channels()).map_err(|_| EqError::UnsupportedFormat {
        format: format!("{}-channel audio", buffer.num_channels()),
    })?;
    Ok(WavSpec {
        channels,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    })
}

fn write_pcm16<W>(mut writer: WavWriter<W>, buffer: &AudioBuffer) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    for &sample in buffer.samples() {
        let scaled = (sample.clamp(-1.0, 1.0) * PCM16_SCALE) as i16;
        writer.write_sample(scaled).map_err(write_error)?;
    }
    writer.finalize().map_err(write_error)
}

fn write_error(e: hound::Error) -> EqError {
    match e {
        hound::Error::IoError(io) => EqError::Io(io),
        other => EqError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            other.to_string(),
        )),
    }
}
