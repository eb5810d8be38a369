use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use zrle::{
    EncodeError, EncodeStats, Encoder, EncoderConfig, PixelBuffer, PixelFormat,
    QuantizationVariant, TileMode, WaveletLevel,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Rgb888,
    Rgb565,
    Rgb555,
    Bgr233,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Quantization {
    Mask,
    Nonlinear,
}

#[derive(Parser, Debug)]
#[command(about = "Encodes an image file to a ZRLE tile stream", long_about = None)]
#[command(version)]
struct Args {
    /// The input image.
    #[arg(short, long)]
    input: PathBuf,

    /// The output tile stream.
    #[arg(short, long)]
    output: PathBuf,

    /// The wire pixel format.
    #[arg(short, long, value_enum, default_value_t = Format::Rgb888)]
    format: Format,

    /// Wavelet pre-filter level, 0 disables it.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=3), conflicts_with = "quality")]
    level: Option<u8>,

    /// Quality hint from 0 (smallest) to 9 (lossless), mapped to a wavelet level.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=9))]
    quality: Option<u8>,

    /// How wavelet coefficients are quantized.
    #[arg(long, value_enum, default_value_t = Quantization::Nonlinear)]
    quantization: Quantization,

    /// The side of a tile, in pixels.
    #[arg(short, long, default_value_t = 64)]
    tile_size: usize,

    /// Send pixels most significant byte first.
    #[arg(short, long)]
    big_endian: bool,
}

impl Args {
    fn config(&self) -> Result<EncoderConfig, EncodeError> {
        let wavelet_level = match (self.level, self.quality) {
            (Some(level), _) => WaveletLevel::new(level)?,
            (None, Some(quality)) => WaveletLevel::from_quality(quality),
            (None, None) => WaveletLevel::DISABLED,
        };
        let quantization = match self.quantization {
            Quantization::Mask => QuantizationVariant::Mask,
            Quantization::Nonlinear => QuantizationVariant::NonlinearTable,
        };

        Ok(EncoderConfig {
            wavelet_level,
            quantization,
            tile_width: self.tile_size,
            tile_height: self.tile_size,
            ..EncoderConfig::default()
        })
    }

    fn format(&self) -> PixelFormat {
        let format = match self.format {
            Format::Rgb888 => PixelFormat::rgb888(),
            Format::Rgb565 => PixelFormat::rgb565(),
            Format::Rgb555 => PixelFormat::rgb555(),
            Format::Bgr233 => PixelFormat::bgr233(),
        };
        format.with_big_endian(self.big_endian)
    }
}

fn print_stats(stats: &EncodeStats, pixels: usize) {
    println!(
        "Encoded {} tiles into {} bytes ({:.3} bytes per pixel)",
        stats.tiles,
        stats.bytes,
        stats.bytes as f64 / pixels as f64
    );
    for mode in TileMode::ALL {
        println!("  {:?}: {}", mode, stats.count(mode));
    }
    if stats.transformed_tiles > 0 {
        println!("  wavelet: {}", stats.transformed_tiles);
    }
}

fn main() {
    let args = Args::parse();

    let encoder = match args.config().and_then(|config| Encoder::new(config, args.format())) {
        Ok(e) => e,
        Err(e) => {
            println!("Invalid options: {}", e);
            process::exit(1)
        }
    };

    let image = match image::open(&args.input) {
        Ok(i) => i.to_rgba8(),
        Err(e) => {
            println!("Cannot read image: {}", e);
            process::exit(1)
        }
    };
    let (width, height) = (image.width() as usize, image.height() as usize);

    let buffer = match PixelBuffer::packed(image.as_raw(), width, height, PixelFormat::rgbx8888()) {
        Ok(b) => b,
        Err(e) => {
            println!("Cannot encode image: {}", e);
            process::exit(1)
        }
    };

    let file = match File::create(&args.output) {
        Ok(f) => f,
        Err(e) => {
            println!("Cannot create output file: {}", e);
            process::exit(1)
        }
    };

    println!("Encoding {}x{} image as {:?}...", width, height, args.format);
    let mut writer = BufWriter::new(file);
    let result = encoder
        .encode_rect(&buffer, buffer.bounds(), &mut writer)
        .and_then(|stats| {
            writer.flush()?;
            Ok(stats)
        });

    match result {
        Ok(stats) => print_stats(&stats, width * height),
        Err(e) => {
            println!("Cannot encode image: {e}");
            process::exit(1)
        }
    }
}
