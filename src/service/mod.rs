//! Equalizer service
//!
//! The request/response surface around the DSP core: upload a WAV file once,
//! then re-process it with any number of gain settings. Payload types use the
//! camelCase JSON field names a browser front end expects.

pub mod store;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::dsp::{apply_fir_gains, apply_iir, evaluate_response, FilterKind, GainVector};
use crate::engine::{decode_wav, encode_data_uri};
use crate::error::{EqError, Result};
use crate::transfer::synthesize;

pub use store::{InMemoryTrackStore, TrackStore};

const UPLOAD_MESSAGE: &str = "Audio uploaded successfully.";
const PROCESS_MESSAGE: &str = "Equalization applied.";

/// Reply to an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub audio_id: String,
    pub sample_rate: u32,
    /// Flat response curve, for the initial plot
    pub frequency: Vec<f64>,
    pub magnitude: Vec<f64>,
    /// Normalized upload as a WAV data URI
    pub original_audio: String,
    pub message: String,
}

/// Parameters for one processing pass
///
/// Gains and filter type are kept raw so that validation happens in a fixed
/// order inside [`Equalizer::process`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub audio_id: String,
    pub gains: Vec<f64>,
    #[serde(default = "default_filter_type")]
    pub filter_type: String,
}

fn default_filter_type() -> String {
    FilterKind::default().as_str().to_string()
}

/// Reply to a processing pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub processed_audio: String,
    pub frequency: Vec<f64>,
    pub magnitude: Vec<f64>,
    pub transfer_function: String,
    pub transfer_function_latex: String,
    pub message: String,
}

/// JSON error body for a failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&EqError> for ErrorResponse {
    fn from(err: &EqError) -> Self {
        Self {
            error: err.to_string(),
            code: err.error_code().to_string(),
        }
    }
}

/// Upload-and-process front end over a [`TrackStore`]
pub struct Equalizer<S: TrackStore = InMemoryTrackStore> {
    store: S,
}

impl Equalizer<InMemoryTrackStore> {
    /// Service with a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(InMemoryTrackStore::new())
    }
}

impl<S: TrackStore> Equalizer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decode and normalize an uploaded WAV file and store it under a new id
    pub fn upload(&self, wav_bytes: &[u8]) -> Result<UploadResponse> {
        let mut track = decode_wav(wav_bytes)?;
        track.normalize_peak();

        let sample_rate = track.sample_rate();
        let response = evaluate_response(&GainVector::flat(), sample_rate, FilterKind::Iir)?;
        let original_audio = encode_data_uri(&track)?;

        let audio_id = Uuid::new_v4().simple().to_string();
        info!(
            audio_id = %audio_id,
            sample_rate,
            channels = track.num_channels(),
            duration_secs = track.duration_secs(),
            "Stored uploaded track"
        );
        self.store.insert(audio_id.clone(), track);

        Ok(UploadResponse {
            audio_id,
            sample_rate,
            frequency: response.frequencies,
            magnitude: response.magnitude_db,
            original_audio,
            message: UPLOAD_MESSAGE.to_string(),
        })
    }

    /// Equalize a stored track, returning the audio, response curve and
    /// transfer function
    ///
    /// # Errors
    /// Checked in this order:
    /// * `TrackNotFound` - no track under `audio_id`
    /// * `GainCountMismatch` - not exactly one gain per band
    /// * `UnsupportedFilterKind` - filter type other than IIR or FIR
    pub fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse> {
        let track = self
            .store
            .get(&request.audio_id)
            .ok_or_else(|| EqError::TrackNotFound {
                id: request.audio_id.clone(),
            })?;
        let gains = GainVector::new(request.gains.clone())?;
        let kind: FilterKind = request.filter_type.parse()?;

        let processed = match kind {
            FilterKind::Iir => apply_iir(&track, &gains)?,
            FilterKind::Fir => apply_fir_gains(&track, &gains)?,
        };
        let sample_rate = track.sample_rate();
        let response = evaluate_response(&gains, sample_rate, kind)?;
        let transfer = synthesize(&gains, sample_rate, kind)?;

        info!(
            audio_id = %request.audio_id,
            filter = %kind,
            gains = ?gains.as_slice(),
            "Processed track"
        );

        Ok(ProcessResponse {
            processed_audio: encode_data_uri(&processed)?,
            frequency: response.frequencies,
            magnitude: response.magnitude_db,
            transfer_function: transfer.text,
            transfer_function_latex: transfer.latex,
            message: PROCESS_MESSAGE.to_string(),
        })
    }
}
