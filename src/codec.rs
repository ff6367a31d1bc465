//! Binary layout of a signature.
//!
//! All integers are little-endian. A 48-byte header is followed by an inner
//! envelope (tag + length) and one tag-length-value block per frequency band:
//!
//! ```text
//!  0  magic1            4   0xCAFE2580
//!  4  crc32(bytes[8..]) 4
//!  8  size minus header 4
//! 12  magic2            4   0x94119C00
//! 16  reserved          12
//! 28  sample rate id    4   id << 27
//! 32  reserved          8
//! 40  sample count      4   samples + rate * 0.24
//! 44  fixed value       4   (15 << 19) + 0x40000
//! 48  inner tag         4   0x40000000
//! 52  content length    4
//! 56  band blocks...
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::SignatureError;
use crate::signature::{FrequencyBand, FrequencyPeak, SampleRate, Signature};

const MAGIC_1: u32 = 0xCAFE_2580;
const MAGIC_2: u32 = 0x9411_9C00;
const FIXED_VALUE: u32 = (15 << 19) + 0x40000;
const INNER_TAG: u32 = 0x4000_0000;
const BAND_TAG_BASE: i64 = 0x6003_0040;

const HEADER_SIZE: usize = 48;
const ENVELOPE_SIZE: usize = 8;
const SAMPLE_RATE_ID_SHIFT: u32 = 27;
/// Marker introducing an absolute 32-bit FFT pass number.
const FFT_PASS_ESCAPE: u8 = 0xFF;

/// Prefix of the text form of a signature.
pub const DATA_URI_PREFIX: &str = "data:audio/vnd.shazam.sig;base64,";

/// The fixed 48-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSignatureHeader {
    pub magic1: u32,
    pub crc32: u32,
    pub size_minus_header: u32,
    pub magic2: u32,
    pub shifted_sample_rate_id: u32,
    pub number_samples_plus_divided_sample_rate: u32,
    pub fixed_value: u32,
}

impl RawSignatureHeader {
    fn new(signature: &Signature, size_minus_header: u32) -> Result<Self, SignatureError> {
        let offset = sample_count_offset(signature.sample_rate);
        let number_samples_plus_divided_sample_rate =
            signature
                .number_samples
                .checked_add(offset)
                .ok_or_else(|| SignatureError::ContentTooLarge {
                    length: (signature.number_samples as usize).saturating_add(offset as usize),
                })?;

        Ok(Self {
            magic1: MAGIC_1,
            crc32: 0,
            size_minus_header,
            magic2: MAGIC_2,
            shifted_sample_rate_id: signature.sample_rate.id() << SAMPLE_RATE_ID_SHIFT,
            number_samples_plus_divided_sample_rate,
            fixed_value: FIXED_VALUE,
        })
    }

    fn write(&self, output: &mut Vec<u8>) {
        let fields = [
            self.magic1,
            self.crc32,
            self.size_minus_header,
            self.magic2,
            0,
            0,
            0,
            self.shifted_sample_rate_id,
            0,
            0,
            self.number_samples_plus_divided_sample_rate,
            self.fixed_value,
        ];
        output.extend(fields.iter().flat_map(|field| field.to_le_bytes()));
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, SignatureError> {
        let magic1 = reader.read_magic(MAGIC_1)?;
        let crc32 = reader.read_u32()?;
        let size_minus_header = reader.read_u32()?;
        let magic2 = reader.read_magic(MAGIC_2)?;
        reader.skip(12)?;
        let shifted_sample_rate_id = reader.read_u32()?;
        reader.skip(8)?;
        let number_samples_plus_divided_sample_rate = reader.read_u32()?;
        let fixed_value = reader.read_u32()?;

        Ok(Self {
            magic1,
            crc32,
            size_minus_header,
            magic2,
            shifted_sample_rate_id,
            number_samples_plus_divided_sample_rate,
            fixed_value,
        })
    }

    /// Reads the header at the start of `data`, checking both magic numbers only.
    pub fn parse(data: &[u8]) -> Result<Self, SignatureError> {
        Self::read(&mut Reader::new(data))
    }

    pub fn sample_rate(&self) -> Result<SampleRate, SignatureError> {
        SampleRate::from_id(self.shifted_sample_rate_id >> SAMPLE_RATE_ID_SHIFT)
    }

    pub fn number_samples(&self) -> Result<u32, SignatureError> {
        let offset = sample_count_offset(self.sample_rate()?);
        Ok(self.number_samples_plus_divided_sample_rate.saturating_sub(offset))
    }
}

/// `round(sample_rate * 0.24)`, added to the sample count on the wire.
fn sample_count_offset(sample_rate: SampleRate) -> u32 {
    (f64::from(sample_rate.hz()) * 0.24).round() as u32
}

/// Standard IEEE CRC-32 (reflected 0xEDB88320, all-ones init and final xor).
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Number of zero bytes needed to align `length` to 4 bytes.
fn padding_len(length: usize) -> usize {
    (length as isize).wrapping_neg().rem_euclid(4) as usize
}

/// Serializes the peaks of one band: an offset byte relative to the previous
/// pass, then magnitude and bin, both stored minus one.
fn encode_peaks(band: FrequencyBand, peaks: &[FrequencyPeak]) -> Result<Vec<u8>, SignatureError> {
    let mut output = Vec::with_capacity(peaks.len() * 5);
    let mut fft_pass_number = 0;

    for peak in peaks {
        if peak.fft_pass_number < fft_pass_number {
            return Err(SignatureError::UnorderedPeaks {
                band,
                previous: fft_pass_number,
                found: peak.fft_pass_number,
            });
        }

        if peak.fft_pass_number - fft_pass_number >= u32::from(FFT_PASS_ESCAPE) {
            output.push(FFT_PASS_ESCAPE);
            output.extend(peak.fft_pass_number.to_le_bytes());
            fft_pass_number = peak.fft_pass_number;
        }

        output.push((peak.fft_pass_number - fft_pass_number) as u8);
        output.extend(peak.peak_magnitude.wrapping_sub(1).to_le_bytes());
        output.extend(peak.corrected_peak_frequency_bin.wrapping_sub(1).to_le_bytes());
        fft_pass_number = peak.fft_pass_number;
    }

    Ok(output)
}

/// Lengths are stored as signed 32-bit integers.
fn len_to_u32(length: usize) -> Result<u32, SignatureError> {
    u32::try_from(length)
        .ok()
        .filter(|&length| length <= i32::MAX as u32)
        .ok_or(SignatureError::ContentTooLarge { length })
}

/// Encodes `signature` into its binary form.
pub fn encode(signature: &Signature) -> Result<Vec<u8>, SignatureError> {
    let mut contents = Vec::new();

    for (&band, peaks) in &signature.peaks_by_band {
        if band == FrequencyBand::Hz0To250 {
            return Err(SignatureError::UnencodableBand(band));
        }

        let peaks_buffer = encode_peaks(band, peaks)?;
        let tag = (BAND_TAG_BASE + i64::from(band.id())) as u32;
        contents.extend(tag.to_le_bytes());
        contents.extend(len_to_u32(peaks_buffer.len())?.to_le_bytes());
        contents.extend_from_slice(&peaks_buffer);
        contents.resize(contents.len() + padding_len(peaks_buffer.len()), 0);
    }

    let content_size = len_to_u32(contents.len() + ENVELOPE_SIZE)?;
    let mut header = RawSignatureHeader::new(signature, content_size)?;

    let mut output = Vec::with_capacity(HEADER_SIZE + ENVELOPE_SIZE + contents.len());
    header.write(&mut output);
    output.extend(INNER_TAG.to_le_bytes());
    output.extend(content_size.to_le_bytes());
    output.extend_from_slice(&contents);

    header.crc32 = crc32(&output[8..]);
    output[4..8].copy_from_slice(&header.crc32.to_le_bytes());

    debug_assert_eq!(output.len(), HEADER_SIZE + content_size as usize);
    Ok(output)
}

/// Encodes `signature` as a `data:` URI.
pub fn encode_to_uri(signature: &Signature) -> Result<String, SignatureError> {
    let binary = encode(signature)?;
    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(binary)))
}

/// Parses the binary form of a signature.
pub fn decode(data: &[u8]) -> Result<Signature, SignatureError> {
    let mut reader = Reader::new(data);
    let header = RawSignatureHeader::read(&mut reader)?;

    let computed = crc32(&data[8..]);
    if computed != header.crc32 {
        return Err(SignatureError::ChecksumMismatch {
            expected: header.crc32,
            computed,
        });
    }

    let available = data.len() - HEADER_SIZE;
    if (header.size_minus_header as usize) > available {
        return Err(SignatureError::Truncated {
            offset: data.len(),
            needed: header.size_minus_header as usize - available,
        });
    }

    let sample_rate = header.sample_rate()?;
    let mut signature = Signature::new(sample_rate, header.number_samples()?);

    reader.read_magic(INNER_TAG)?;
    let _content_size = reader.read_u32()?;

    while !reader.is_empty() {
        let band_id = i64::from(reader.read_u32()?) - BAND_TAG_BASE;
        let band = match FrequencyBand::from_id(band_id)? {
            FrequencyBand::Hz0To250 => return Err(SignatureError::UnknownFrequencyBand(band_id)),
            band => band,
        };
        let peaks_size = reader.read_u32()? as usize;
        let peaks_offset = reader.offset();
        let peaks_data = reader.take(peaks_size)?;
        reader.skip(padding_len(peaks_size))?;

        let peaks = decode_peaks(peaks_data, peaks_offset, sample_rate)?;
        signature.peaks_by_band.entry(band).or_default().extend(peaks);
    }

    Ok(signature)
}

fn decode_peaks(data: &[u8], base_offset: usize, sample_rate: SampleRate) -> Result<Vec<FrequencyPeak>, SignatureError> {
    let mut reader = Reader::with_base_offset(data, base_offset);
    let mut peaks = Vec::with_capacity(data.len() / 5);
    let mut fft_pass_number: u32 = 0;

    while !reader.is_empty() {
        let fft_pass_offset = reader.read_u8()?;
        if fft_pass_offset == FFT_PASS_ESCAPE {
            fft_pass_number = reader.read_u32()?;
            continue;
        }
        fft_pass_number = fft_pass_number.wrapping_add(u32::from(fft_pass_offset));

        let peak_magnitude = reader.read_u16()?;
        let corrected_peak_frequency_bin = reader.read_u16()?;
        peaks.push(FrequencyPeak::new(
            fft_pass_number,
            peak_magnitude,
            corrected_peak_frequency_bin,
            sample_rate.hz(),
        ));
    }

    Ok(peaks)
}

/// Extracts the binary form carried by a `data:` URI.
pub fn binary_from_uri(uri: &str) -> Result<Vec<u8>, SignatureError> {
    let payload = uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or(SignatureError::MissingUriPrefix)?;
    Ok(STANDARD.decode(payload.trim_end())?)
}

/// Parses a signature from its `data:` URI form.
pub fn decode_from_uri(uri: &str) -> Result<Signature, SignatureError> {
    decode(&binary_from_uri(uri)?)
}

/// Bounds-checked little-endian cursor over a byte slice.
struct Reader<'a> {
    data: &'a [u8],
    position: usize,
    base_offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self::with_base_offset(data, 0)
    }

    fn with_base_offset(data: &'a [u8], base_offset: usize) -> Self {
        Self {
            data,
            position: 0,
            base_offset,
        }
    }

    fn offset(&self) -> usize {
        self.base_offset + self.position
    }

    fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], SignatureError> {
        let remaining = self.data.len() - self.position;
        if count > remaining {
            return Err(SignatureError::Truncated {
                offset: self.offset(),
                needed: count - remaining,
            });
        }
        let bytes = &self.data[self.position..][..count];
        self.position += count;
        Ok(bytes)
    }

    fn skip(&mut self, count: usize) -> Result<(), SignatureError> {
        self.take(count).map(|_| ())
    }

    fn read_u8(&mut self) -> Result<u8, SignatureError> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, SignatureError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, SignatureError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_magic(&mut self, expected: u32) -> Result<u32, SignatureError> {
        let offset = self.offset();
        let found = self.read_u32()?;
        if found != expected {
            return Err(SignatureError::InvalidMagic { offset, expected, found });
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(fft_pass_number: u32, peak_magnitude: u16, corrected_peak_frequency_bin: u16) -> FrequencyPeak {
        FrequencyPeak::new(fft_pass_number, peak_magnitude, corrected_peak_frequency_bin, 16000)
    }

    fn sample_signature() -> Signature {
        let mut signature = Signature::new(SampleRate::Hz16000, 48000);
        for p in [peak(3, 10000, 3000), peak(3, 11000, 3100), peak(40, 9000, 2900), peak(700, 12000, 3300)] {
            signature.push_peak(FrequencyBand::Hz250To520, p);
        }
        for p in [peak(12, 8000, 9000), peak(260, 8100, 9100)] {
            signature.push_peak(FrequencyBand::Hz520To1450, p);
        }
        signature.push_peak(FrequencyBand::Hz3500To5500, peak(99, 7000, 50000));
        signature
    }

    fn u32_at(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn crc32_known_vectors() {
        assert_eq!(crc32(&[]), 0x0000_0000);
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn padding() {
        assert_eq!(padding_len(0), 0);
        assert_eq!(padding_len(1), 3);
        assert_eq!(padding_len(5), 3);
        assert_eq!(padding_len(6), 2);
        assert_eq!(padding_len(7), 1);
        assert_eq!(padding_len(8), 0);
    }

    #[test]
    fn empty_signature_layout() {
        let signature = Signature::new(SampleRate::Hz16000, 128);
        let data = encode(&signature).unwrap();

        assert_eq!(data.len(), HEADER_SIZE + ENVELOPE_SIZE);
        assert_eq!(u32_at(&data, 0), 0xCAFE_2580);
        assert_eq!(u32_at(&data, 4), crc32(&data[8..]));
        assert_eq!(u32_at(&data, 8), 8);
        assert_eq!(u32_at(&data, 12), 0x9411_9C00);
        assert!(data[16..28].iter().all(|&b| b == 0));
        assert_eq!(u32_at(&data, 28), 3 << 27);
        assert!(data[32..40].iter().all(|&b| b == 0));
        assert_eq!(u32_at(&data, 40), 128 + 3840);
        assert_eq!(u32_at(&data, 44), (15 << 19) + 0x40000);
        assert_eq!(u32_at(&data, 48), 0x4000_0000);
        assert_eq!(u32_at(&data, 52), 8);
    }

    #[test]
    fn band_block_layout() {
        let mut signature = Signature::new(SampleRate::Hz16000, 0);
        signature.push_peak(FrequencyBand::Hz1450To3500, peak(5, 0x1234, 0x5678));
        signature.push_peak(FrequencyBand::Hz1450To3500, peak(300, 0x0100, 0x0200));
        let data = encode(&signature).unwrap();

        let expected_peaks = [
            0x05, 0x33, 0x12, 0x77, 0x56, // relative pass, magnitude - 1, bin - 1
            0xFF, 0x2C, 0x01, 0x00, 0x00, // escape with absolute pass 300
            0x00, 0xFF, 0x00, 0xFF, 0x01,
        ];
        assert_eq!(u32_at(&data, 56), 0x6003_0042);
        assert_eq!(u32_at(&data, 60), expected_peaks.len() as u32);
        assert_eq!(&data[64..64 + expected_peaks.len()], &expected_peaks);
        assert_eq!(&data[64 + expected_peaks.len()..], &[0]);
        assert_eq!(data.len() % 4, 0);
        assert_eq!(u32_at(&data, 8) as usize, data.len() - HEADER_SIZE);
        assert_eq!(u32_at(&data, 52), u32_at(&data, 8));
    }

    #[test]
    fn pass_offset_escape_boundary() {
        let mut signature = Signature::new(SampleRate::Hz16000, 0);
        for fft_pass_number in [10, 264, 519] {
            signature.push_peak(FrequencyBand::Hz520To1450, peak(fft_pass_number, 0x0201, 0x0403));
        }
        let data = encode(&signature).unwrap();

        let expected_peaks = [
            0x0A, 0x00, 0x02, 0x02, 0x04, // offset 10
            0xFE, 0x00, 0x02, 0x02, 0x04, // offset 254 still fits a byte
            0xFF, 0x07, 0x02, 0x00, 0x00, // offset 255 needs the absolute pass 519
            0x00, 0x00, 0x02, 0x02, 0x04,
        ];
        assert_eq!(u32_at(&data, 60), expected_peaks.len() as u32);
        assert_eq!(&data[64..], &expected_peaks);

        let decoded = decode(&data).unwrap();
        let passes = decoded
            .peaks(FrequencyBand::Hz520To1450)
            .iter()
            .map(|peak| peak.fft_pass_number)
            .collect::<Vec<_>>();
        assert_eq!(passes, [10, 264, 519]);
    }

    #[test]
    fn lowest_band_is_rejected_on_decode() {
        let mut signature = Signature::new(SampleRate::Hz16000, 0);
        signature.push_peak(FrequencyBand::Hz250To520, peak(1, 1, 1));
        let mut data = encode(&signature).unwrap();
        data[56..60].copy_from_slice(&0x6003_003Fu32.to_le_bytes());
        let crc = crc32(&data[8..]);
        data[4..8].copy_from_slice(&crc.to_le_bytes());
        assert!(matches!(decode(&data), Err(SignatureError::UnknownFrequencyBand(-1))));
    }

    #[test]
    fn sample_count_overflow_is_rejected() {
        let signature = Signature::new(SampleRate::Hz48000, u32::MAX - 100);
        assert!(matches!(
            encode(&signature),
            Err(SignatureError::ContentTooLarge { length }) if length == u32::MAX as usize - 100 + 11520
        ));
        assert!(encode(&Signature::new(SampleRate::Hz48000, u32::MAX - 11520)).is_ok());
    }

    #[test]
    fn round_trip_keeps_layout_and_applies_wire_bias() {
        let signature = sample_signature();
        let decoded = decode(&encode(&signature).unwrap()).unwrap();

        assert_eq!(decoded.sample_rate, signature.sample_rate);
        assert_eq!(decoded.number_samples, signature.number_samples);
        assert_eq!(
            decoded.peaks_by_band.keys().collect::<Vec<_>>(),
            signature.peaks_by_band.keys().collect::<Vec<_>>()
        );

        for (band, peaks) in &signature.peaks_by_band {
            let decoded_peaks = decoded.peaks(*band);
            assert_eq!(decoded_peaks.len(), peaks.len());
            for (original, decoded) in peaks.iter().zip(decoded_peaks) {
                assert_eq!(decoded.fft_pass_number, original.fft_pass_number);
                assert_eq!(decoded.peak_magnitude, original.peak_magnitude - 1);
                assert_eq!(decoded.corrected_peak_frequency_bin, original.corrected_peak_frequency_bin - 1);
                assert_eq!(decoded.sample_rate_hz, 16000);
            }
        }
    }

    #[test]
    fn reencoding_decoded_bytes_is_stable_up_to_bias() {
        let signature = sample_signature();
        let mut decoded = decode(&encode(&signature).unwrap()).unwrap();
        for peaks in decoded.peaks_by_band.values_mut() {
            for peak in peaks {
                peak.peak_magnitude += 1;
                peak.corrected_peak_frequency_bin += 1;
            }
        }
        assert_eq!(decoded, signature);
        assert_eq!(encode(&decoded).unwrap(), encode(&signature).unwrap());
    }

    #[test]
    fn sample_count_for_every_rate() {
        for (rate, offset) in [
            (SampleRate::Hz8000, 1920),
            (SampleRate::Hz11025, 2646),
            (SampleRate::Hz16000, 3840),
            (SampleRate::Hz32000, 7680),
            (SampleRate::Hz44100, 10584),
            (SampleRate::Hz48000, 11520),
        ] {
            let data = encode(&Signature::new(rate, 1000)).unwrap();
            assert_eq!(u32_at(&data, 40), 1000 + offset);
            assert_eq!(u32_at(&data, 28) >> 27, rate.id());
            let decoded = decode(&data).unwrap();
            assert_eq!(decoded.sample_rate, rate);
            assert_eq!(decoded.number_samples, 1000);
        }
    }

    #[test]
    fn header_fields() {
        let data = encode(&sample_signature()).unwrap();
        let header = RawSignatureHeader::parse(&data).unwrap();
        assert_eq!(header.crc32, crc32(&data[8..]));
        assert_eq!(header.size_minus_header as usize, data.len() - HEADER_SIZE);
        assert_eq!(header.sample_rate().unwrap(), SampleRate::Hz16000);
        assert_eq!(header.number_samples().unwrap(), 48000);
        assert_eq!(header.fixed_value, FIXED_VALUE);
    }

    #[test]
    fn uri_form() {
        let signature = sample_signature();
        let uri = encode_to_uri(&signature).unwrap();
        assert!(uri.starts_with("data:audio/vnd.shazam.sig;base64,"));

        let binary = STANDARD.decode(&uri[DATA_URI_PREFIX.len()..]).unwrap();
        assert_eq!(binary, encode(&signature).unwrap());
        assert_eq!(decode_from_uri(&uri).unwrap(), decode(&binary).unwrap());
    }

    #[test]
    fn unordered_peaks_are_rejected() {
        let mut signature = Signature::new(SampleRate::Hz16000, 0);
        signature.push_peak(FrequencyBand::Hz520To1450, peak(10, 1, 1));
        signature.push_peak(FrequencyBand::Hz520To1450, peak(9, 1, 1));
        assert!(matches!(
            encode(&signature),
            Err(SignatureError::UnorderedPeaks { previous: 10, found: 9, .. })
        ));
    }

    #[test]
    fn lowest_band_is_not_encodable() {
        let mut signature = Signature::new(SampleRate::Hz16000, 0);
        signature.push_peak(FrequencyBand::Hz0To250, peak(1, 1, 1));
        assert!(matches!(encode(&signature), Err(SignatureError::UnencodableBand(FrequencyBand::Hz0To250))));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut data = encode(&sample_signature()).unwrap();
        data[0] ^= 0x01;
        assert!(matches!(
            decode(&data),
            Err(SignatureError::InvalidMagic { offset: 0, expected: 0xCAFE_2580, .. })
        ));
    }

    #[test]
    fn truncated_data_is_rejected() {
        let data = encode(&sample_signature()).unwrap();
        assert!(matches!(decode(&data[..20]), Err(SignatureError::Truncated { .. })));

        // Cut inside a band block, with the checksum patched to match.
        let mut cut = data[..data.len() - 6].to_vec();
        let crc = crc32(&cut[8..]);
        cut[4..8].copy_from_slice(&crc.to_le_bytes());
        assert!(matches!(decode(&cut), Err(SignatureError::Truncated { .. })));
    }

    #[test]
    fn corrupted_payload_fails_checksum() {
        let mut data = encode(&sample_signature()).unwrap();
        let last = data.len() - 1;
        data[last] ^= 0x40;
        assert!(matches!(decode(&data), Err(SignatureError::ChecksumMismatch { .. })));
    }

    #[test]
    fn unknown_sample_rate_id_is_rejected() {
        let mut data = encode(&Signature::new(SampleRate::Hz16000, 0)).unwrap();
        data[28..32].copy_from_slice(&(7u32 << 27).to_le_bytes());
        let crc = crc32(&data[8..]);
        data[4..8].copy_from_slice(&crc.to_le_bytes());
        assert!(matches!(decode(&data), Err(SignatureError::UnknownSampleRateId(7))));
    }

    #[test]
    fn missing_uri_prefix_is_rejected() {
        assert!(matches!(decode_from_uri("data:text/plain;base64,AAAA"), Err(SignatureError::MissingUriPrefix)));
        assert!(matches!(
            decode_from_uri("data:audio/vnd.shazam.sig;base64,***"),
            Err(SignatureError::Base64(_))
        ));
    }
}
