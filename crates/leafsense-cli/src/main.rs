//! leafsense – diagnose one leaf photo from the command line.
//!
//! Prints the structured diagnosis as pretty JSON on stdout; pipeline
//! failures come out as `{"error": "..."}` on stderr with a nonzero exit,
//! so the output is machine-readable either way.

use anyhow::Result;
use clap::Parser;
use leafsense_detect::OrtYolo;
use leafsense_diagnose::{CannedAdvisor, DiagnoseConfig, Diagnoser, Diagnosis};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "leafsense", about = "Crop leaf disease diagnosis")]
struct Args {
    /// Leaf photo to diagnose (png or jpeg)
    image: PathBuf,

    /// Path to the detection model (ONNX)
    #[arg(long)]
    model: PathBuf,

    /// Minimum class score for a detection
    #[arg(long, default_value_t = leafsense_detect::DEFAULT_CONF_THRESHOLD)]
    confidence: f32,

    /// IoU threshold for duplicate-box suppression
    #[arg(long, default_value_t = leafsense_detect::DEFAULT_IOU_THRESHOLD)]
    iou: f32,
}

fn run(args: &Args) -> Result<Diagnosis> {
    let img = leafsense_preprocess::load_image(&args.image)?;
    log::info!(
        "loaded {} ({}x{})",
        args.image.display(),
        img.width(),
        img.height()
    );

    let detector = OrtYolo::new(&args.model.to_string_lossy())?;
    let config = DiagnoseConfig {
        confidence_threshold: args.confidence,
        iou_threshold: args.iou,
        ..DiagnoseConfig::default()
    };
    let mut diagnoser = Diagnoser::with_config(detector, CannedAdvisor, config);

    Ok(diagnoser.diagnose(&img)?)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(diagnosis) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&diagnosis).expect("diagnosis serializes")
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::json!({ "error": e.to_string() })
            );
            ExitCode::FAILURE
        }
    }
}
