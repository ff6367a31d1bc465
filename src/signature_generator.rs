use log::{debug, trace};

use crate::error::SignatureError;
use crate::fft::{FftEngine, Spectrum, SPECTRUM_SIZE, WINDOW_SIZE};
use crate::fingerprinter::Configuration;
use crate::ring_buffer::RingBuffer;
use crate::signature::{FrequencyBand, FrequencyPeak, SampleRate, Signature};
use crate::stages::AudioConsumer;

/// Rate of the audio the generator expects.
pub const SAMPLE_RATE: SampleRate = SampleRate::Hz16000;

/// Samples consumed per FFT pass.
pub(crate) const BLOCK_SIZE: usize = 128;

const SPECTRUM_HISTORY: usize = 256;
/// Spectra a frame waits for before it is searched for peaks.
const PEAK_DELAY: usize = 46;
const SPREAD_REFERENCE_OFFSET: isize = -49;
const MIN_PEAK_POWER: f64 = 1.0 / 64.0;
const FIRST_PEAK_BIN: usize = 10;
const LAST_PEAK_BIN: usize = 1014;

/// Older spread frames each new frame is folded into.
const SPREAD_FRAME_OFFSETS: [isize; 3] = [-1, -3, -6];
/// Bins of the reference spread frame a peak must exceed.
const NEIGHBOR_BIN_OFFSETS: [isize; 8] = [-10, -7, -4, -3, 1, 2, 5, 8];
/// Spread frames, relative to the write cursor, a peak must exceed one bin below.
const NEIGHBOR_FRAME_OFFSETS: [isize; 14] = [-53, -45, 165, 172, 179, 186, 193, 200, 214, 221, 228, 235, 242, 249];

const MAGNITUDE_SCALE: f64 = 1477.3;
const MAGNITUDE_OFFSET: f64 = 6144.0;

/// Converts 16 kHz mono samples into signatures.
///
/// Samples are buffered by [`feed`](Self::feed); every call to
/// [`next_signature`](Self::next_signature) analyses all whole 128-sample
/// blocks buffered so far (or fewer when a per-signature limit is configured)
/// and returns the peaks found in them.
pub struct SignatureGenerator {
    fft: FftEngine,
    max_signature_samples: Option<usize>,

    pending: Vec<i16>,
    samples_consumed: u64,

    samples: RingBuffer<i16>,
    fft_outputs: RingBuffer<Spectrum>,
    spread_fft_outputs: RingBuffer<Option<Spectrum>>,
    next_signature: Signature,
}

impl SignatureGenerator {
    pub fn new(config: &Configuration) -> Self {
        Self {
            fft: FftEngine::new(WINDOW_SIZE),
            max_signature_samples: config.max_signature_samples(),
            pending: Vec::new(),
            samples_consumed: 0,
            samples: RingBuffer::new(WINDOW_SIZE, 0),
            fft_outputs: RingBuffer::from_fn(SPECTRUM_HISTORY, empty_spectrum),
            spread_fft_outputs: RingBuffer::from_fn(SPECTRUM_HISTORY, || None),
            next_signature: Signature::new(SAMPLE_RATE, 0),
        }
    }

    /// Computes a single signature over every whole block of `samples`.
    pub fn make_signature(samples: &[i16]) -> Result<Signature, SignatureError> {
        let mut generator = Self::new(&Configuration::default());
        generator.feed(samples);
        Ok(generator.next_signature()?.unwrap_or_else(|| Signature::new(SAMPLE_RATE, 0)))
    }

    /// Queues samples for the next signature.
    pub fn feed(&mut self, samples: &[i16]) {
        self.pending.extend_from_slice(samples);
    }

    /// Samples fed but not yet analysed.
    pub fn pending_samples(&self) -> usize {
        self.pending.len()
    }

    /// Samples analysed into signatures so far.
    pub fn samples_consumed(&self) -> u64 {
        self.samples_consumed
    }

    /// Returns the next signature, or `None` while fewer than 128 samples are pending.
    ///
    /// The analysis state starts over after each call, so every signature is
    /// independent of the ones before it.
    pub fn next_signature(&mut self) -> Result<Option<Signature>, SignatureError> {
        if self.pending.len() < BLOCK_SIZE {
            return Ok(None);
        }

        let mut blocks = self.pending.len() / BLOCK_SIZE;
        if let Some(max_samples) = self.max_signature_samples {
            blocks = blocks.min((max_samples / BLOCK_SIZE).max(1));
        }
        let count = blocks * BLOCK_SIZE;

        let pending = std::mem::take(&mut self.pending);
        let result = pending[..count]
            .chunks_exact(BLOCK_SIZE)
            .try_for_each(|block| self.process_block(block));
        self.pending = pending;
        self.pending.drain(..count);
        self.samples_consumed += count as u64;

        let mut signature = self.reset_analysis();
        result?;

        signature.number_samples = sample_count(count)?;
        debug!(
            "signature of {} samples ({} blocks): {} peaks, {} samples still pending",
            count,
            blocks,
            signature.peak_count(),
            self.pending.len()
        );
        Ok(Some(signature))
    }

    /// Clears the analysis buffers and hands back the signature built so far.
    fn reset_analysis(&mut self) -> Signature {
        self.samples = RingBuffer::new(WINDOW_SIZE, 0);
        self.fft_outputs = RingBuffer::from_fn(SPECTRUM_HISTORY, empty_spectrum);
        self.spread_fft_outputs = RingBuffer::from_fn(SPECTRUM_HISTORY, || None);
        std::mem::replace(&mut self.next_signature, Signature::new(SAMPLE_RATE, 0))
    }

    fn process_block(&mut self, block: &[i16]) -> Result<(), SignatureError> {
        self.do_fft(block);
        self.do_peak_spreading();
        if self.spread_fft_outputs.written() >= PEAK_DELAY {
            self.do_peak_recognition()?;
        }
        Ok(())
    }

    fn do_fft(&mut self, block: &[i16]) {
        for &sample in block {
            self.samples.append(sample);
        }

        let spectrum = self
            .fft
            .power_spectrum(self.samples.iter_chronological().map(|&sample| f64::from(sample)));
        self.fft_outputs.append(spectrum);
    }

    /// Spreads the newest spectrum over neighbouring bins, then folds it into
    /// the spread frames that precede it.
    fn do_peak_spreading(&mut self) {
        let mut spread = self.fft_outputs.get(-1).clone();

        for position in 0..SPECTRUM_SIZE {
            if position < SPECTRUM_SIZE - 2 {
                spread[position] = spread[position..position + 3]
                    .iter()
                    .copied()
                    .fold(f64::NEG_INFINITY, f64::max);
            }

            let mut max_value = spread[position];
            for offset in SPREAD_FRAME_OFFSETS {
                if let Some(former) = self.spread_fft_outputs.get_mut(offset) {
                    former[position] = former[position].max(max_value);
                    max_value = former[position];
                }
            }
        }

        self.spread_fft_outputs.append(Some(spread));
    }

    fn do_peak_recognition(&mut self) -> Result<(), SignatureError> {
        let fft_pass_number = u32::try_from(self.spread_fft_outputs.written() - PEAK_DELAY).unwrap_or(u32::MAX);
        let fft_minus_46 = self.fft_outputs.get(-(PEAK_DELAY as isize));
        let spread_minus_49 = self.spread_fft_outputs.get(SPREAD_REFERENCE_OFFSET).as_deref();

        for bin in FIRST_PEAK_BIN..=LAST_PEAK_BIN {
            let power = fft_minus_46[bin];
            if power < MIN_PEAK_POWER || spread_minus_49.is_some_and(|spread| power < spread[bin - 1]) {
                continue;
            }

            let max_neighbor_in_spread_minus_49 = spread_minus_49.map_or(0.0, |spread| {
                NEIGHBOR_BIN_OFFSETS
                    .iter()
                    .map(|&offset| spread[(bin as isize + offset) as usize])
                    .fold(0.0, f64::max)
            });
            if power <= max_neighbor_in_spread_minus_49 {
                continue;
            }

            let max_neighbor_in_other_frames = NEIGHBOR_FRAME_OFFSETS
                .iter()
                .filter_map(|&offset| self.spread_fft_outputs.get(offset).as_deref())
                .map(|spread| spread[bin - 1])
                .fold(max_neighbor_in_spread_minus_49, f64::max);
            if power <= max_neighbor_in_other_frames {
                continue;
            }

            let peak_magnitude = log_magnitude(power);
            let peak_magnitude_before = log_magnitude(fft_minus_46[bin - 1]);
            let peak_magnitude_after = log_magnitude(fft_minus_46[bin + 1]);

            let variation = interpolate_peak(
                bin,
                fft_pass_number,
                peak_magnitude_before,
                peak_magnitude,
                peak_magnitude_after,
            )?;

            let corrected_peak_frequency_bin = bin as f64 * 64.0 + variation;
            let frequency_hz = corrected_peak_frequency_bin * f64::from(SAMPLE_RATE.hz()) / (2.0 * 1024.0 * 64.0);
            let Some(band) = FrequencyBand::from_frequency(frequency_hz) else {
                continue;
            };

            trace!("peak at pass {} bin {} ({:.1} Hz) in band {}", fft_pass_number, bin, frequency_hz, band);
            self.next_signature.push_peak(
                band,
                FrequencyPeak::new(
                    fft_pass_number,
                    peak_magnitude.round() as u16,
                    corrected_peak_frequency_bin.round() as u16,
                    SAMPLE_RATE.hz(),
                ),
            );
        }

        Ok(())
    }
}

impl AudioConsumer for SignatureGenerator {
    fn reset(&mut self) {
        self.pending.clear();
        self.samples_consumed = 0;
        self.reset_analysis();
    }

    fn consume(&mut self, data: &[i16]) {
        self.feed(data);
    }
}

fn empty_spectrum() -> Spectrum {
    vec![0.0; SPECTRUM_SIZE].into_boxed_slice()
}

/// Sub-bin offset of a peak, in 1/64 bin units, from a parabola through the
/// log magnitudes of the peak bin and its two neighbours.
fn interpolate_peak(
    bin: usize,
    fft_pass_number: u32,
    before: f64,
    peak: f64,
    after: f64,
) -> Result<f64, SignatureError> {
    let curvature = peak * 2.0 - before - after;
    if curvature <= 0.0 {
        return Err(SignatureError::DegeneratePeak { bin, fft_pass_number, curvature });
    }
    Ok((after - before) * 32.0 / curvature)
}

/// Sample counts are stored as 32-bit values.
fn sample_count(count: usize) -> Result<u32, SignatureError> {
    u32::try_from(count).map_err(|_| SignatureError::ContentTooLarge { length: count })
}

fn log_magnitude(power: f64) -> f64 {
    power.max(MIN_PEAK_POWER).ln() * MAGNITUDE_SCALE + MAGNITUDE_OFFSET
}
