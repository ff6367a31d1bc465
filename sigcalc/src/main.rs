use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use log::{debug, info};
use serde::Serialize;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use rusty_shazam::{samples_from_s16le, Configuration, Fingerprinter, Signature};

/// Generate Shazam signatures from audio files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the input format name (only `s16le` raw PCM is supported)
    #[arg(short, long)]
    format: Option<String>,

    /// Set the sample rate of raw input audio
    #[arg(short, long)]
    rate: Option<u32>,

    /// Set the number of channels in raw input audio
    #[arg(short, long)]
    channels: Option<u32>,

    /// Restrict the duration of the processed input audio in seconds (0 for no limit)
    #[arg(short, long, default_value_t = 10)]
    length: u32,

    /// Split the input audio into signatures of at most this many seconds
    #[arg(short = 'C', long)]
    chunk: Option<f32>,

    /// Output UNIX timestamps for each signature
    #[arg(short = 'T', long)]
    ts: bool,

    /// Print recognition request bodies in JSON format
    #[arg(short, long)]
    json: bool,

    /// Print the output in text format
    #[arg(short, long)]
    text: bool,

    /// Print just the signature URIs
    #[arg(short, long)]
    plain: bool,

    /// Time zone reported in JSON request bodies
    #[arg(long, default_value = "Europe/Paris")]
    timezone: String,

    /// File to analyze
    file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Plain,
}

impl OutputFormat {
    fn from_args(args: &Args) -> anyhow::Result<Self> {
        match (args.text, args.json, args.plain) {
            (_, false, false) => Ok(OutputFormat::Text),
            (false, true, false) => Ok(OutputFormat::Json),
            (false, false, true) => Ok(OutputFormat::Plain),
            _ => bail!("only one of --text, --json and --plain can be used"),
        }
    }
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    timezone: &'a str,
    signature: SignaturePayload,
    timestamp: i64,
    context: Empty,
    geolocation: Empty,
}

#[derive(Serialize)]
struct SignaturePayload {
    uri: String,
    samplems: u32,
}

#[derive(Serialize)]
struct Empty {}

/// Forwards interleaved samples until the configured duration is reached.
struct LimitedInput<'a> {
    fingerprinter: &'a mut Fingerprinter,
    channels: usize,
    remaining_frames: Option<u64>,
}

impl<'a> LimitedInput<'a> {
    fn start(fingerprinter: &'a mut Fingerprinter, sample_rate: u32, channels: u32, length: u32) -> anyhow::Result<Self> {
        fingerprinter
            .start(sample_rate, channels)
            .context("initializing fingerprinter")?;
        debug!("input: {} Hz, {} channels", sample_rate, channels);

        Ok(Self {
            fingerprinter,
            channels: channels as usize,
            remaining_frames: (length > 0).then(|| u64::from(length) * u64::from(sample_rate)),
        })
    }

    /// Returns `false` once no more input is wanted.
    fn consume(&mut self, samples: &[i16]) -> bool {
        let samples = match self.remaining_frames {
            Some(remaining) => {
                let frames = (samples.len() / self.channels).min(usize::try_from(remaining).unwrap_or(usize::MAX));
                self.remaining_frames = Some(remaining - frames as u64);
                &samples[..frames * self.channels]
            }
            None => samples,
        };
        self.fingerprinter.consume(samples);
        self.remaining_frames != Some(0)
    }
}

fn read_raw(path: &Path, args: &Args, fingerprinter: &mut Fingerprinter) -> anyhow::Result<()> {
    let sample_rate = args.rate.context("raw input requires --rate")?;
    let channels = args.channels.unwrap_or(1);

    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut input = LimitedInput::start(fingerprinter, sample_rate, channels, args.length)?;
    input.consume(&samples_from_s16le(&data));
    Ok(())
}

fn decode_file(path: &Path, length: u32, fingerprinter: &mut Fingerprinter) -> anyhow::Result<()> {
    let src = std::fs::File::open(path).context("failed to open file")?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .context("unsupported format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("no supported audio tracks")?;

    let dec_opts: DecoderOptions = Default::default();

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .context("unsupported codec")?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.context("missing sample rate")?;
    let channels = track.codec_params.channels.context("missing audio channels")?.count() as u32;
    let mut input = LimitedInput::start(fingerprinter, sample_rate, channels, length)?;

    let mut sample_buf = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(_) => break,
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buf) => {
                if sample_buf.is_none() {
                    let spec = *audio_buf.spec();
                    let duration = audio_buf.capacity() as u64;
                    sample_buf = Some(SampleBuffer::<i16>::new(duration, spec));
                }

                if let Some(buf) = &mut sample_buf {
                    buf.copy_interleaved_ref(audio_buf);
                    if !input.consume(buf.samples()) {
                        break;
                    }
                }
            }
            Err(Error::DecodeError(e)) => debug!("skipping undecodable packet: {}", e),
            Err(_) => break,
        }
    }

    Ok(())
}

fn print_signature(
    signature: &Signature,
    format: OutputFormat,
    args: &Args,
    timestamp_ms: i64,
    first: bool,
) -> anyhow::Result<()> {
    let uri = signature.encode_to_uri().context("encoding signature")?;

    match format {
        OutputFormat::Text => {
            if !first {
                println!();
            }
            if args.ts {
                println!("TIMESTAMP={:.2}", timestamp_ms as f64 / 1000.0);
            }
            println!("DURATION={:.2}", signature.duration_seconds());
            println!("SIGNATURE={}", uri);
        }
        OutputFormat::Plain => println!("{}", uri),
        OutputFormat::Json => {
            let request = RecognizeRequest {
                timezone: &args.timezone,
                signature: SignaturePayload {
                    uri,
                    samplems: signature.samplems(),
                },
                timestamp: timestamp_ms,
                context: Empty {},
                geolocation: Empty {},
            };
            println!("{}", serde_json::to_string(&request)?);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let output_format = OutputFormat::from_args(&args)?;

    let mut config = Configuration::default();
    if let Some(chunk) = args.chunk {
        if chunk <= 0.0 {
            bail!("chunk duration must be positive");
        }
        config = config.with_max_signature_duration(chunk);
    }

    let mut fingerprinter = Fingerprinter::new(&config);
    let started_at = Utc::now().timestamp_millis();

    match args.format.as_deref() {
        Some("s16le") => read_raw(&args.file, &args, &mut fingerprinter)?,
        Some(other) => bail!("unsupported input format: {}", other),
        None => decode_file(&args.file, args.length, &mut fingerprinter)
            .with_context(|| format!("decoding {}", args.file.display()))?,
    }
    fingerprinter.finish();

    let mut offset_ms = 0;
    let mut count = 0;
    while let Some(signature) = fingerprinter.next_signature().context("generating signature")? {
        print_signature(&signature, output_format, &args, started_at + offset_ms, count == 0)?;
        offset_ms += i64::from(signature.samplems());
        count += 1;
    }

    if count == 0 {
        bail!("not enough audio to generate a signature");
    }
    info!("generated {} signatures", count);

    Ok(())
}
