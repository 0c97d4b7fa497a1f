//! Audio Engine Module
//!
//! Sample containers and the WAV boundary:
//! - Audio buffer management and peak normalization
//! - WAV decoding and encoding

pub mod buffer;
pub mod codec;

pub use buffer::AudioBuffer;
pub use codec::{decode_wav, encode_data_uri, encode_wav, read_wav, write_wav, DATA_URI_PREFIX};
