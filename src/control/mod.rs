mod command;
mod exit;
mod geometry;

pub use command::{Angle, Transmission, MAX_ANGLE};
pub use geometry::{primary_geometry, HandGeometry};

use command::CommandFilter;
use exit::ExitDebouncer;

use crate::actuator::ActuatorChannel;
use crate::landmarks::Hand;

/// What one frame of hand data did to the control state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub geometry: Option<HandGeometry>,
    pub angle: Option<Angle>,
    pub transmission: Option<Transmission>,
    pub exit_requested: bool,
}

/// Control state carried across frames by the frame loop
#[derive(Clone, Debug, Default)]
pub struct ControlState {
    filter: CommandFilter,
    exit: ExitDebouncer,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_sent_angle(&self) -> Option<Angle> {
        self.filter.last_sent()
    }

    pub fn pinch_streak(&self) -> u32 {
        self.exit.pinch_streak()
    }

    /// Process the hands detected in one frame
    ///
    /// Only the primary hand drives the servo and the exit gesture. Frames
    /// without a usable hand leave the angle alone and reset the pinch streak.
    pub fn step<A>(&mut self, hands: &[Hand], actuator: &mut A) -> FrameReport
    where
        A: ActuatorChannel + ?Sized,
    {
        let geometry = primary_geometry(hands);
        let angle = geometry.map(|g| Angle::from_distance(g.control_distance));
        let transmission = angle.map(|angle| self.filter.offer(angle, actuator));
        let exit_requested = self.exit.observe(geometry.map(|g| g.exit_distance));

        FrameReport {
            geometry,
            angle,
            transmission,
            exit_requested,
        }
    }
}
