use log::{debug, warn};
use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};

use crate::error::ResetError;
use crate::stages::AudioConsumer;

const MIN_SAMPLE_RATE: u32 = 1000;
const MAX_BUFFER_SIZE: usize = 1024 * 32;
const RESAMPLER_CHUNK_SIZE: usize = 1024;

/// Down-mixes interleaved audio to mono and converts it to the target rate
/// before handing it to the next stage.
pub struct AudioProcessor<C: AudioConsumer<i16>> {
    buffer: Box<[i16]>,
    buffer_offset: usize,
    input: Vec<f64>,
    output: Vec<i16>,
    channels: u32,
    consumer: C,
    target_sample_rate: u32,
    resampler: Option<SincFixedIn<f64>>,
    resample_ratio: f64,
    input_frames: u64,
    output_frames: u64,
}

impl<C: AudioConsumer<i16>> AudioProcessor<C> {
    pub fn new(target_sample_rate: u32, consumer: C) -> Self {
        Self {
            buffer: vec![0; MAX_BUFFER_SIZE].into_boxed_slice(),
            buffer_offset: 0,
            input: Vec::new(),
            output: Vec::new(),
            channels: 0,
            consumer,
            target_sample_rate,
            resampler: None,
            resample_ratio: 1.0,
            input_frames: 0,
            output_frames: 0,
        }
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    pub fn consumer_mut(&mut self) -> &mut C {
        &mut self.consumer
    }

    pub fn into_consumer(self) -> C {
        self.consumer
    }

    fn load(&mut self, input: &[i16], channels: usize) -> usize {
        debug_assert!(self.buffer_offset <= self.buffer.len());

        let available_samples = input.len() / channels;
        let consumed = available_samples.min(self.available_space());
        let input = &input[..consumed * channels];

        match channels {
            1 => {
                for sample in input.iter().copied() {
                    self.push_sample(sample);
                }
            }
            2 => {
                for sample in input.chunks_exact(2) {
                    self.push_sample(((i32::from(sample[0]) + i32::from(sample[1])) / 2) as i16);
                }
            }
            _ => {
                for sample in input.chunks_exact(channels) {
                    let sum: i32 = sample.iter().copied().map(i32::from).sum();
                    self.push_sample((sum / channels as i32) as i16);
                }
            }
        }

        consumed * channels
    }

    fn resample(&mut self, flush: bool) {
        let Some(resampler) = self.resampler.as_mut() else {
            self.consumer.consume(&self.buffer[..self.buffer_offset]);
            self.buffer_offset = 0;
            return;
        };

        self.input
            .extend(self.buffer[..self.buffer_offset].iter().map(|&sample| f64::from(sample)));
        self.input_frames += self.buffer_offset as u64;
        self.buffer_offset = 0;

        let expected_frames = (self.input_frames as f64 * self.resample_ratio).round() as u64;
        loop {
            let required_input = resampler.input_frames_next();
            if self.input.len() < required_input {
                if !flush || self.input.is_empty() {
                    break;
                }
                self.input.resize(required_input, 0.0);
            }

            let mut frames = match resampler.process(&[&self.input[..required_input]], None) {
                Ok(frames) => frames,
                Err(e) => {
                    warn!("dropping {} samples that could not be resampled: {}", self.input.len(), e);
                    self.input.clear();
                    break;
                }
            };
            self.input.drain(..required_input);

            let Some(channel) = frames.pop() else {
                break;
            };
            let remaining = usize::try_from(expected_frames.saturating_sub(self.output_frames)).unwrap_or(usize::MAX);
            let count = channel.len().min(remaining);

            self.output.clear();
            self.output.extend(channel[..count].iter().map(|&sample| to_i16(sample)));
            self.output_frames += count as u64;
            self.consumer.consume(&self.output);
        }
    }

    fn available_space(&self) -> usize {
        self.buffer.len() - self.buffer_offset
    }

    #[inline]
    fn push_sample(&mut self, value: i16) {
        self.buffer[self.buffer_offset] = value;
        self.buffer_offset += 1;
    }

    /// Prepares for a new stream with the given input format.
    pub fn reset(&mut self, sample_rate: u32, channels: u32) -> Result<(), ResetError> {
        if channels == 0 {
            return Err(ResetError::NoChannels);
        }

        if sample_rate <= MIN_SAMPLE_RATE {
            return Err(ResetError::SampleRateTooLow { min: MIN_SAMPLE_RATE });
        }

        self.channels = channels;
        self.clear();
        self.consumer.reset();

        if self.target_sample_rate != sample_rate {
            self.resample_ratio = f64::from(self.target_sample_rate) / f64::from(sample_rate);
            self.resampler = Some(SincFixedIn::new(
                self.resample_ratio,
                1.0,
                SincInterpolationParameters {
                    sinc_len: 16,
                    f_cutoff: 0.8,
                    oversampling_factor: 128,
                    interpolation: SincInterpolationType::Nearest,
                    window: WindowFunction::Blackman,
                },
                RESAMPLER_CHUNK_SIZE,
                1,
            )?);
            debug!("resampling {} Hz x{} to {} Hz", sample_rate, channels, self.target_sample_rate);
        } else {
            self.resample_ratio = 1.0;
            self.resampler = None;
        }

        Ok(())
    }

    /// Pushes buffered audio through, zero-padding the last resampler chunk.
    pub fn flush(&mut self) {
        if self.buffer_offset > 0 || !self.input.is_empty() {
            self.resample(true);
        }
    }

    fn clear(&mut self) {
        self.buffer_offset = 0;
        self.input.clear();
        self.input_frames = 0;
        self.output_frames = 0;
        if let Some(resampler) = self.resampler.as_mut() {
            resampler.reset();
        }
    }
}

impl<C: AudioConsumer<i16>> AudioConsumer for AudioProcessor<C> {
    fn reset(&mut self) {
        self.clear();
        self.consumer.reset();
    }

    fn consume(&mut self, data: &[i16]) {
        let channels = self.channels as usize;
        if channels == 0 {
            warn!("ignoring {} samples received before the stream format was set", data.len());
            return;
        }
        if data.len() % channels != 0 {
            warn!("dropping {} trailing samples of an incomplete frame", data.len() % channels);
        }

        let data = &data[..data.len() - data.len() % channels];
        let mut index = 0;
        while index < data.len() {
            index += self.load(&data[index..], channels);
            if self.buffer.len() == self.buffer_offset {
                // Full buffer
                self.resample(false);
            }
        }
    }
}

fn to_i16(sample: f64) -> i16 {
    sample.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}
