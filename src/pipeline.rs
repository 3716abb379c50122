use crate::actuator::ActuatorChannel;
use crate::capture::CaptureSource;
use crate::control::{ControlState, Transmission};
use crate::display::{overlay, PreviewSurface};
use crate::landmarks::LandmarkSource;
use image::imageops;
use std::time::{Duration, Instant};

/// Frames between timing reports
const STATS_INTERVAL: u64 = 30;

/// Why the frame loop stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// Index and middle fingertips held together
    PinchGesture,
    /// Abort key pressed or preview window closed
    AbortKey,
    /// Capture device stopped delivering frames
    CaptureClosed,
}

#[derive(Clone, Copy, Debug)]
pub struct LoopSettings {
    /// Flip frames horizontally so the preview behaves like a mirror
    pub mirror: bool,
    /// Upper bound on processed frames per second
    pub target_fps: Option<u32>,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            mirror: true,
            target_fps: None,
        }
    }
}

/// Resources owned for the lifetime of one control session
///
/// Teardown runs exactly once, either through [`Session::release`] or when
/// the session is dropped, in the order capture, preview, actuator.
pub struct Session<C, P, A>
where
    C: CaptureSource,
    P: PreviewSurface,
    A: ActuatorChannel,
{
    capture: C,
    preview: P,
    actuator: A,
    released: bool,
}

impl<C, P, A> Session<C, P, A>
where
    C: CaptureSource,
    P: PreviewSurface,
    A: ActuatorChannel,
{
    pub fn new(capture: C, preview: P, actuator: A) -> Self {
        Self {
            capture,
            preview,
            actuator,
            released: false,
        }
    }

    #[cfg(test)]
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    #[cfg(test)]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Release capture device, preview surface and actuator in that order
    ///
    /// Failures are logged and do not stop the remaining steps.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        tracing::info!("Cleaning up...");

        if let Err(e) = self.capture.release() {
            tracing::warn!("Failed to release capture device: {:#}", e);
        }
        self.preview.close();
        if let Err(e) = self.actuator.close() {
            tracing::error!("Failed to close serial port: {}", e);
        }
    }
}

impl<C, P, A> Drop for Session<C, P, A>
where
    C: CaptureSource,
    P: PreviewSurface,
    A: ActuatorChannel,
{
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Default)]
struct FrameStats {
    frame_count: u64,
    dropped_frames: u64,
    failed_writes: u64,
    total_capture_time: Duration,
    total_detect_time: Duration,
    total_preview_time: Duration,
}

impl FrameStats {
    fn report(&self) {
        let frames = self.frame_count as f64;
        let avg_capture_ms = self.total_capture_time.as_secs_f64() * 1000.0 / frames;
        let avg_detect_ms = self.total_detect_time.as_secs_f64() * 1000.0 / frames;
        let avg_preview_ms = self.total_preview_time.as_secs_f64() * 1000.0 / frames;
        let total_ms = avg_capture_ms + avg_detect_ms + avg_preview_ms;

        tracing::info!(
            "Frame {}: capture={:.1}ms, detect={:.1}ms, preview={:.1}ms, total={:.1}ms, fps={:.1}, dropped={}, failed writes={}",
            self.frame_count,
            avg_capture_ms,
            avg_detect_ms,
            avg_preview_ms,
            total_ms,
            1000.0 / total_ms,
            self.dropped_frames,
            self.failed_writes
        );
    }
}

/// Drive the control loop until a pinch, the abort key or loss of the camera
///
/// The session is released before returning on every path.
pub fn run<C, L, P, A>(
    session: &mut Session<C, P, A>,
    detector: &mut L,
    settings: LoopSettings,
) -> ExitReason
where
    C: CaptureSource,
    L: LandmarkSource + ?Sized,
    P: PreviewSurface,
    A: ActuatorChannel,
{
    let frame_duration = settings
        .target_fps
        .filter(|&fps| fps > 0)
        .map(|fps| Duration::from_secs_f32(1.0 / fps as f32));
    let mut state = ControlState::new();
    let mut stats = FrameStats::default();

    tracing::info!("Starting control loop (mirror={})", settings.mirror);
    tracing::info!("Hold index and middle fingertips together to exit");

    let reason = loop {
        let loop_start = Instant::now();

        if !session.capture.is_open() {
            tracing::info!("Capture device closed, exiting...");
            break ExitReason::CaptureClosed;
        }

        // Capture frame; failures are retried on the next iteration
        let capture_start = Instant::now();
        let report = match session.capture.capture_frame() {
            Ok(frame) => {
                let frame = if settings.mirror {
                    imageops::flip_horizontal(&frame)
                } else {
                    frame
                };
                stats.total_capture_time += capture_start.elapsed();

                let detect_start = Instant::now();
                let hands = match detector.detect(&frame) {
                    Ok(hands) => hands,
                    Err(e) => {
                        tracing::warn!("Hand detection failed: {:#}", e);
                        Vec::new()
                    }
                };
                stats.total_detect_time += detect_start.elapsed();

                let report = state.step(&hands, &mut session.actuator);
                if report.transmission == Some(Transmission::Failed) {
                    stats.failed_writes += 1;
                }
                tracing::debug!(
                    "Frame {}: angle={:?}, transmission={:?}, pinch streak={}",
                    stats.frame_count + 1,
                    report.angle.map(|a| a.degrees()),
                    report.transmission,
                    state.pinch_streak()
                );

                if session.preview.wants_frames() {
                    let preview_start = Instant::now();
                    let mut annotated = frame;
                    overlay::annotate(&mut annotated, &hands, &report);
                    if let Err(e) = session.preview.show(&annotated) {
                        tracing::warn!("{:#}", e);
                    }
                    stats.total_preview_time += preview_start.elapsed();
                }

                stats.frame_count += 1;
                if stats.frame_count % STATS_INTERVAL == 0 {
                    stats.report();
                }
                Some(report)
            }
            Err(e) => {
                stats.dropped_frames += 1;
                tracing::debug!("Frame dropped ({} so far): {:#}", stats.dropped_frames, e);
                None
            }
        };

        if session.preview.abort_requested() {
            tracing::info!("ESC pressed, exiting...");
            break ExitReason::AbortKey;
        }

        if report.is_some_and(|r| r.exit_requested) {
            tracing::info!("Fingers pinched consistently, exiting...");
            break ExitReason::PinchGesture;
        }

        // Dropped frames are paced too
        if let Some(frame_duration) = frame_duration {
            let elapsed = loop_start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            }
        }
    };

    tracing::info!(
        "Control loop stopped after {} frames, last angle {:?}",
        stats.frame_count,
        state.last_sent_angle().map(|a| a.degrees())
    );

    session.release();
    reason
}
