use std::path::Path;

use anyhow::Context;

use rusty_shazam::{codec, RawSignatureHeader, Signature, DATA_URI_PREFIX};

use crate::utils::TimeExt;

mod utils;

/// Loads the binary form of a signature from a `data:` URI given directly, or
/// from a file holding either the URI or the binary form.
fn load_binary(arg: &str) -> anyhow::Result<Vec<u8>> {
    if arg.starts_with(DATA_URI_PREFIX) {
        return codec::binary_from_uri(arg).context("invalid signature URI");
    }

    let path = Path::new(arg);
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if data.starts_with(DATA_URI_PREFIX.as_bytes()) {
        let uri = std::str::from_utf8(&data).context("signature URI is not valid UTF-8")?;
        return codec::binary_from_uri(uri.trim()).context("invalid signature URI");
    }

    Ok(data)
}

fn dump(arg: &str) -> anyhow::Result<()> {
    let binary = load_binary(arg)?;
    let header = RawSignatureHeader::parse(&binary)?;
    let signature = Signature::decode_from_binary(&binary).context("invalid signature")?;

    println!("crc32:           {:#010x}", header.crc32);
    println!("size:            {} bytes", header.size_minus_header);
    println!("sample rate:     {} Hz", signature.sample_rate_hz());
    println!("samples:         {}", signature.number_samples);
    println!("duration:        {}", signature.duration_seconds().display_time());
    println!("peaks:           {}", signature.peak_count());

    for (band, peaks) in &signature.peaks_by_band {
        println!();
        println!("[{}] {} peaks", band, peaks.len());
        for peak in peaks {
            println!(
                "{} | pass {:>5} | {:>8.2} Hz | amplitude {:>10.4} | magnitude {:>5}",
                peak.seconds().display_time(),
                peak.fft_pass_number,
                peak.frequency_hz(),
                peak.amplitude_pcm(),
                peak.peak_magnitude,
            );
        }
    }

    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<_> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: sigdump <signature URI or file>...");
        return Ok(());
    }

    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            println!();
        }
        log::debug!("dumping {}", arg);
        dump(arg).with_context(|| format!("cannot dump {}", arg))?;
    }

    Ok(())
}
