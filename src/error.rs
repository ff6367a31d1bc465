use rubato::ResamplerConstructionError;
use thiserror::Error;

use crate::signature::FrequencyBand;

/// Errors raised while generating, encoding or decoding signatures.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("invalid magic number {found:#010x} at offset {offset} (expected {expected:#010x})")]
    InvalidMagic { offset: usize, expected: u32, found: u32 },

    #[error("signature data truncated at offset {offset}: {needed} more bytes required")]
    Truncated { offset: usize, needed: usize },

    #[error("unknown sample rate id {0}")]
    UnknownSampleRateId(u32),

    #[error("unsupported sample rate {0} Hz")]
    UnsupportedSampleRate(u32),

    #[error("unknown frequency band id {0}")]
    UnknownFrequencyBand(i64),

    #[error("checksum mismatch: header holds {expected:#010x}, data hashes to {computed:#010x}")]
    ChecksumMismatch { expected: u32, computed: u32 },

    #[error("peaks of band {band} are out of order: fft pass {found} follows {previous}")]
    UnorderedPeaks { band: FrequencyBand, previous: u32, found: u32 },

    #[error("band {0} cannot be encoded")]
    UnencodableBand(FrequencyBand),

    #[error("signature does not fit the 32-bit format fields ({length})")]
    ContentTooLarge { length: usize },

    #[error("degenerate peak interpolation at bin {bin} of fft pass {fft_pass_number} (curvature {curvature})")]
    DegeneratePeak { bin: usize, fft_pass_number: u32, curvature: f64 },

    #[error("missing signature data URI prefix")]
    MissingUriPrefix,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Errors raised when (re)configuring the audio front-end.
#[derive(Debug, Error)]
pub enum ResetError {
    #[error("sample rate is too low, required min. {min} Hz")]
    SampleRateTooLow { min: u32 },

    #[error("at least one channel is required")]
    NoChannels,

    #[error("cannot resample: {0}")]
    CannotResample(#[from] ResamplerConstructionError),
}
