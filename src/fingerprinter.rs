use crate::audio_processor::AudioProcessor;
use crate::error::{ResetError, SignatureError};
use crate::signature::Signature;
use crate::signature_generator::{SignatureGenerator, BLOCK_SIZE, SAMPLE_RATE};
use crate::stages::AudioConsumer;

/// Longest audio span the recognition service accepts in one signature.
const DEFAULT_MAX_SIGNATURE_SECONDS: f32 = 8.0;

/// Structure containing configuration for a [Fingerprinter].
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    max_signature_samples: Option<usize>,
}

impl Configuration {
    /// Limits how many samples a single signature may cover; `None` lets a
    /// signature take everything that has been fed.
    pub fn with_max_signature_samples(mut self, max_signature_samples: Option<usize>) -> Self {
        self.max_signature_samples = max_signature_samples;
        self
    }

    /// Limits the duration of a single signature.
    pub fn with_max_signature_duration(self, seconds: f32) -> Self {
        let samples = (seconds.max(0.0) * self.sample_rate() as f32) as usize;
        self.with_max_signature_samples(Some(samples))
    }

    /// Splits audio into signatures of at most eight seconds each.
    pub fn preset_streaming() -> Self {
        Self::default().with_max_signature_duration(DEFAULT_MAX_SIGNATURE_SECONDS)
    }

    pub fn max_signature_samples(&self) -> Option<usize> {
        self.max_signature_samples
    }

    /// Target sample rate for signature generation.
    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATE.hz()
    }

    /// A duration of a single analysis block.
    pub fn block_duration_in_seconds(&self) -> f32 {
        BLOCK_SIZE as f32 / self.sample_rate() as f32
    }
}

/// Calculates signatures for audio in any supported input format.
pub struct Fingerprinter {
    processor: AudioProcessor<SignatureGenerator>,
}

impl Fingerprinter {
    /// Creates a new [Fingerprinter] with the given [Configuration].
    pub fn new(config: &Configuration) -> Self {
        let generator = SignatureGenerator::new(config);
        Self {
            processor: AudioProcessor::new(config.sample_rate(), generator),
        }
    }

    /// Resets the internal state to allow for a new stream.
    pub fn start(&mut self, sample_rate: u32, channels: u32) -> Result<(), ResetError> {
        self.processor.reset(sample_rate, channels)
    }

    /// Adds a new chunk of interleaved samples.
    pub fn consume(&mut self, data: &[i16]) {
        self.processor.consume(data)
    }

    /// Flushes internal buffers so every consumed sample reaches the generator.
    pub fn finish(&mut self) {
        self.processor.flush();
    }

    /// Returns the next signature over the audio consumed so far, see
    /// [`SignatureGenerator::next_signature`].
    pub fn next_signature(&mut self) -> Result<Option<Signature>, SignatureError> {
        self.processor.consumer_mut().next_signature()
    }

    pub fn generator(&self) -> &SignatureGenerator {
        self.processor.consumer()
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(&Configuration::default())
    }
}
