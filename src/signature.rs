use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::error::SignatureError;

/// Sample rates the signature format can describe, keyed by their wire id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleRate {
    Hz8000 = 1,
    Hz11025 = 2,
    Hz16000 = 3,
    Hz32000 = 4,
    Hz44100 = 5,
    Hz48000 = 6,
}

impl SampleRate {
    const ALL: [SampleRate; 6] = [
        SampleRate::Hz8000,
        SampleRate::Hz11025,
        SampleRate::Hz16000,
        SampleRate::Hz32000,
        SampleRate::Hz44100,
        SampleRate::Hz48000,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn hz(self) -> u32 {
        match self {
            SampleRate::Hz8000 => 8000,
            SampleRate::Hz11025 => 11025,
            SampleRate::Hz16000 => 16000,
            SampleRate::Hz32000 => 32000,
            SampleRate::Hz44100 => 44100,
            SampleRate::Hz48000 => 48000,
        }
    }

    pub fn from_id(id: u32) -> Result<Self, SignatureError> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.id() == id)
            .ok_or(SignatureError::UnknownSampleRateId(id))
    }

    pub fn from_hz(hz: u32) -> Result<Self, SignatureError> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.hz() == hz)
            .ok_or(SignatureError::UnsupportedSampleRate(hz))
    }
}

/// Frequency ranges peaks are grouped by.
///
/// The sub-250 Hz band exists in the format but peaks are never emitted into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrequencyBand {
    Hz0To250 = -1,
    Hz250To520 = 0,
    Hz520To1450 = 1,
    Hz1450To3500 = 2,
    Hz3500To5500 = 3,
}

impl FrequencyBand {
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i64) -> Result<Self, SignatureError> {
        match id {
            -1 => Ok(FrequencyBand::Hz0To250),
            0 => Ok(FrequencyBand::Hz250To520),
            1 => Ok(FrequencyBand::Hz520To1450),
            2 => Ok(FrequencyBand::Hz1450To3500),
            3 => Ok(FrequencyBand::Hz3500To5500),
            _ => Err(SignatureError::UnknownFrequencyBand(id)),
        }
    }

    /// Classifies a peak frequency. Each range excludes its lower edge and
    /// includes its upper one; anything at or below 250 Hz or above 5500 Hz
    /// is not classified.
    pub fn from_frequency(frequency_hz: f64) -> Option<Self> {
        if frequency_hz <= 250.0 {
            None
        } else if frequency_hz <= 520.0 {
            Some(FrequencyBand::Hz250To520)
        } else if frequency_hz <= 1450.0 {
            Some(FrequencyBand::Hz520To1450)
        } else if frequency_hz <= 3500.0 {
            Some(FrequencyBand::Hz1450To3500)
        } else if frequency_hz <= 5500.0 {
            Some(FrequencyBand::Hz3500To5500)
        } else {
            None
        }
    }
}

impl Display for FrequencyBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (low, high) = match self {
            FrequencyBand::Hz0To250 => (0, 250),
            FrequencyBand::Hz250To520 => (250, 520),
            FrequencyBand::Hz520To1450 => (520, 1450),
            FrequencyBand::Hz1450To3500 => (1450, 3500),
            FrequencyBand::Hz3500To5500 => (3500, 5500),
        };
        write!(f, "{}-{} Hz", low, high)
    }
}

/// A single spectral peak in fixed-point form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyPeak {
    /// Index of the FFT pass (one per 128 samples) the peak was found in.
    pub fft_pass_number: u32,
    /// Log-scaled magnitude, `ln(power) * 1477.3 + 6144`.
    pub peak_magnitude: u16,
    /// Frequency bin multiplied by 64 with the interpolated fraction added.
    pub corrected_peak_frequency_bin: u16,
    pub sample_rate_hz: u32,
}

impl FrequencyPeak {
    pub fn new(fft_pass_number: u32, peak_magnitude: u16, corrected_peak_frequency_bin: u16, sample_rate_hz: u32) -> Self {
        Self {
            fft_pass_number,
            peak_magnitude,
            corrected_peak_frequency_bin,
            sample_rate_hz,
        }
    }

    pub fn frequency_hz(&self) -> f64 {
        f64::from(self.corrected_peak_frequency_bin) * (f64::from(self.sample_rate_hz) / 2.0 / 1024.0 / 64.0)
    }

    pub fn amplitude_pcm(&self) -> f64 {
        let power = f64::exp((f64::from(self.peak_magnitude) - 6144.0) / 1477.3) * f64::from(1 << 17) / 2.0;
        power.sqrt() / 1024.0
    }

    /// Position of the peak from the start of the signature.
    pub fn seconds(&self) -> f64 {
        f64::from(self.fft_pass_number) * 128.0 / f64::from(self.sample_rate_hz)
    }
}

/// One fingerprint: peaks found in a span of audio, grouped by band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub sample_rate: SampleRate,
    pub number_samples: u32,
    pub peaks_by_band: BTreeMap<FrequencyBand, Vec<FrequencyPeak>>,
}

impl Signature {
    pub fn new(sample_rate: SampleRate, number_samples: u32) -> Self {
        Self {
            sample_rate,
            number_samples,
            peaks_by_band: BTreeMap::new(),
        }
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate.hz()
    }

    /// Appends a peak to the end of its band.
    pub fn push_peak(&mut self, band: FrequencyBand, peak: FrequencyPeak) {
        self.peaks_by_band.entry(band).or_default().push(peak);
    }

    pub fn peaks(&self, band: FrequencyBand) -> &[FrequencyPeak] {
        self.peaks_by_band.get(&band).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn peak_count(&self) -> usize {
        self.peaks_by_band.values().map(Vec::len).sum()
    }

    pub fn duration_seconds(&self) -> f64 {
        f64::from(self.number_samples) / f64::from(self.sample_rate_hz())
    }

    /// Duration in whole milliseconds, as sent alongside the signature URI.
    pub fn samplems(&self) -> u32 {
        (self.duration_seconds() * 1000.0).round() as u32
    }

    pub fn encode_to_binary(&self) -> Result<Vec<u8>, SignatureError> {
        crate::codec::encode(self)
    }

    pub fn encode_to_uri(&self) -> Result<String, SignatureError> {
        crate::codec::encode_to_uri(self)
    }

    pub fn decode_from_binary(data: &[u8]) -> Result<Self, SignatureError> {
        crate::codec::decode(data)
    }

    pub fn decode_from_uri(uri: &str) -> Result<Self, SignatureError> {
        crate::codec::decode_from_uri(uri)
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_eq_float;
    use crate::signature::{FrequencyBand, FrequencyPeak, SampleRate, Signature};

    #[test]
    fn band_boundaries() {
        assert_eq!(FrequencyBand::from_frequency(100.0), None);
        assert_eq!(FrequencyBand::from_frequency(250.0), None);
        assert_eq!(FrequencyBand::from_frequency(250.001), Some(FrequencyBand::Hz250To520));
        assert_eq!(FrequencyBand::from_frequency(520.0), Some(FrequencyBand::Hz250To520));
        assert_eq!(FrequencyBand::from_frequency(520.001), Some(FrequencyBand::Hz520To1450));
        assert_eq!(FrequencyBand::from_frequency(1450.0), Some(FrequencyBand::Hz520To1450));
        assert_eq!(FrequencyBand::from_frequency(3500.0), Some(FrequencyBand::Hz1450To3500));
        assert_eq!(FrequencyBand::from_frequency(3500.001), Some(FrequencyBand::Hz3500To5500));
        assert_eq!(FrequencyBand::from_frequency(5500.0), Some(FrequencyBand::Hz3500To5500));
        assert_eq!(FrequencyBand::from_frequency(5500.001), None);
    }

    #[test]
    fn band_ids() {
        for id in -1..=3 {
            assert_eq!(FrequencyBand::from_id(id).unwrap().id() as i64, id);
        }
        assert!(FrequencyBand::from_id(4).is_err());
        assert!(FrequencyBand::from_id(-2).is_err());
    }

    #[test]
    fn sample_rate_ids() {
        assert_eq!(SampleRate::from_hz(16000).unwrap().id(), 3);
        assert_eq!(SampleRate::from_id(5).unwrap().hz(), 44100);
        assert!(SampleRate::from_id(0).is_err());
        assert!(SampleRate::from_id(7).is_err());
        assert!(SampleRate::from_hz(22050).is_err());
    }

    #[test]
    fn derived_peak_values() {
        let peak = FrequencyPeak::new(250, 6144, 8192, 16000);
        assert_eq_float!(peak.seconds(), 2.0);
        assert_eq_float!(peak.frequency_hz(), 1000.0);
        assert_eq_float!(peak.amplitude_pcm(), f64::sqrt(65536.0) / 1024.0);
    }

    #[test]
    fn peaks_are_grouped_by_band() {
        let mut signature = Signature::new(SampleRate::Hz16000, 16000);
        signature.push_peak(FrequencyBand::Hz3500To5500, FrequencyPeak::new(3, 100, 200, 16000));
        signature.push_peak(FrequencyBand::Hz250To520, FrequencyPeak::new(1, 100, 200, 16000));
        signature.push_peak(FrequencyBand::Hz250To520, FrequencyPeak::new(2, 100, 200, 16000));

        assert_eq!(signature.peaks(FrequencyBand::Hz250To520).len(), 2);
        assert!(signature.peaks(FrequencyBand::Hz520To1450).is_empty());
        assert_eq!(signature.peak_count(), 3);
        assert_eq!(signature.samplems(), 1000);
        assert_eq!(
            signature.peaks_by_band.keys().copied().collect::<Vec<_>>(),
            [FrequencyBand::Hz250To520, FrequencyBand::Hz3500To5500]
        );
    }
}
