//! Pure Rust generator and codec for Shazam audio signatures.
//!
//! Audio is reduced to 16 kHz mono, split into 128-sample blocks and
//! analysed with overlapping 2048-point FFTs; the spectral peaks that stand
//! out in both time and frequency form a [`Signature`], which encodes into
//! the compact binary format (and `data:` URI) the recognition service
//! expects.
//!
//! ```no_run
//! use rusty_shazam::{Configuration, Fingerprinter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let samples: Vec<i16> = Vec::new();
//! let mut fingerprinter = Fingerprinter::new(&Configuration::preset_streaming());
//! fingerprinter.start(44100, 2)?;
//! fingerprinter.consume(&samples);
//! fingerprinter.finish();
//!
//! while let Some(signature) = fingerprinter.next_signature()? {
//!     println!("{}", signature.encode_to_uri()?);
//! }
//! # Ok(())
//! # }
//! ```

mod audio_processor;
pub mod codec;
mod error;
mod fft;
mod fingerprinter;
mod ring_buffer;
mod signature;
mod signature_generator;
mod stages;
mod utils;

pub use audio_processor::AudioProcessor;
pub use codec::{RawSignatureHeader, DATA_URI_PREFIX};
pub use error::{ResetError, SignatureError};
pub use fft::FftEngine;
pub use fingerprinter::{Configuration, Fingerprinter};
pub use signature::{FrequencyBand, FrequencyPeak, SampleRate, Signature};
pub use signature_generator::{SignatureGenerator, SAMPLE_RATE};
pub use stages::AudioConsumer;
pub use utils::samples_from_s16le;
