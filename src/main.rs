use clap::{Parser, ValueEnum};
use conetrace::color_mask::extract_cone_mask;
use conetrace::draw::{mask_debug_image, AnnotateSink};
use conetrace::{imread, ConeDetector, DetectorConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "conetrace")]
#[command(about = "conetrace - detect yellow and blue track cones in an image", long_about = None)]
struct Cli {
    /// Input image path
    image: PathBuf,

    /// JSON detector config (missing fields keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Save a copy of the image with detections drawn on it
    #[arg(long)]
    annotate: Option<PathBuf>,

    /// Save the yellow/blue/white masks as one RGB image
    #[arg(long)]
    mask_debug: Option<PathBuf>,

    /// Apply Gaussian blur before edge detection
    #[arg(long)]
    blur: bool,

    /// Hysteresis low threshold
    #[arg(long)]
    low: Option<f32>,

    /// Hysteresis high threshold
    #[arg(long)]
    high: Option<f32>,

    /// Process the colour channels one after another
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    /// JSON array of {x, y, width, height, label}
    Json,
    /// Plain text, one line per cone: label x y width height
    Text,
    /// TSV format: label\tx\ty\twidth\theight
    Tsv,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    };
    if cli.blur {
        config.canny.apply_gaussian_blur = true;
    }
    if let Some(low) = cli.low {
        config.canny.low_threshold = low;
    }
    if let Some(high) = cli.high {
        config.canny.high_threshold = high;
    }
    if cli.sequential {
        config.parallel_channels = false;
    }

    let detector = ConeDetector::new(config);

    // Load image
    let img = imread(&cli.image)?;

    if let Some(path) = &cli.mask_debug {
        mask_debug_image(&extract_cone_mask(&img)).save(path)?;
    }

    // Run detection
    let output = match &cli.annotate {
        Some(path) => detector.detect_with_sink(&img, &mut AnnotateSink::new(path))?,
        None => detector.run(&img),
    };
    log::info!("{} cones in {:.2} ms", output.len(), output.elapse * 1000.0);

    // Output results
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output.cones)?);
        }
        OutputFormat::Text => {
            for cone in &output.cones {
                let b = cone.bounding_box;
                println!("{} {} {} {} {}", cone.label, b.x, b.y, b.width, b.height);
            }
        }
        OutputFormat::Tsv => {
            for cone in &output.cones {
                let b = cone.bounding_box;
                println!("{}\t{}\t{}\t{}\t{}", cone.label, b.x, b.y, b.width, b.height);
            }
        }
    }

    Ok(())
}
