mod actuator;
mod capture;
mod control;
mod display;
mod landmarks;
mod pipeline;

use actuator::{ActuatorChannel, SerialActuator};
use anyhow::{Context, Result};
use capture::{CaptureSource, WebcamCapture};
use clap::Parser;
use display::{Headless, PreviewSurface, PreviewWindow};
use landmarks::LandmarkSource;
use pipeline::{LoopSettings, Session};
use std::time::Duration;

/// Pause after the detector is ready before the first frame
const WARMUP: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive a servo from the thumb/index pinch seen by a webcam", long_about = None)]
struct Args {
    /// Serial port of the servo controller (e.g. /dev/ttyUSB0 or COM4)
    #[arg(short, long)]
    serial_port: String,

    /// Input webcam device index
    #[arg(short, long, default_value_t = 0)]
    camera: u32,

    /// Capture resolution width
    #[arg(long, default_value_t = 1280)]
    capture_width: u32,

    /// Capture resolution height
    #[arg(long, default_value_t = 720)]
    capture_height: u32,

    /// Path to the hand landmark model (ONNX file)
    #[arg(short, long, default_value = "models/hand_landmark.onnx")]
    model: String,

    /// Minimum hand presence confidence
    #[arg(long, default_value_t = 0.7)]
    min_confidence: f32,

    /// Do not mirror the camera image
    #[arg(long)]
    no_mirror: bool,

    /// Run without a preview window (exit by gesture only)
    #[arg(long)]
    headless: bool,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("pinch-servo starting");

    // The servo link is the one resource the session cannot run without
    let actuator = match SerialActuator::open(&args.serial_port) {
        Ok(actuator) => actuator,
        Err(e) => {
            tracing::error!("Serial port error: {}", e);
            return Err(e).context("Failed to initialize servo controller");
        }
    };

    let mut detector = landmarks::create_default_detector(&args.model, args.min_confidence)
        .context("Failed to load hand landmark model")?;

    let capture = WebcamCapture::new(args.camera, args.capture_width, args.capture_height)
        .context("Failed to initialize webcam capture")?;

    let settings = LoopSettings {
        mirror: !args.no_mirror,
        target_fps: Some(args.fps),
    };

    std::thread::sleep(WARMUP);

    let reason = if args.headless {
        tracing::info!("Running headless, no preview window");
        run_session(capture, Headless, actuator, detector.as_mut(), settings)
    } else {
        let (width, height) = capture.resolution();
        let preview = match PreviewWindow::new(width, height) {
            Ok(preview) => preview,
            Err(e) => {
                Session::new(capture, Headless, actuator).release();
                return Err(e);
            }
        };
        tracing::info!("Press ESC in the preview window to stop");
        run_session(capture, preview, actuator, detector.as_mut(), settings)
    };

    tracing::info!("Session ended: {:?}", reason);
    Ok(())
}

fn run_session<C, P, A>(
    capture: C,
    preview: P,
    actuator: A,
    detector: &mut dyn LandmarkSource,
    settings: LoopSettings,
) -> pipeline::ExitReason
where
    C: CaptureSource,
    P: PreviewSurface,
    A: ActuatorChannel,
{
    let mut session = Session::new(capture, preview, actuator);
    pipeline::run(&mut session, detector, settings)
}
