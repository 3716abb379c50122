use crate::actuator::ActuatorChannel;
use std::fmt;

/// Pixels of thumb/index separation per degree of servo travel
pub const DISTANCE_DIVISOR: f32 = 2.0;

/// Upper bound of the servo range in degrees
pub const MAX_ANGLE: u8 = 180;

/// A new angle is only sent when it moves more than this many degrees
pub const CHANGE_THRESHOLD: u8 = 5;

/// Servo command in whole degrees, always within `0..=MAX_ANGLE`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(u8);

impl Angle {
    #[cfg(test)]
    pub fn new(degrees: u8) -> Option<Self> {
        (degrees <= MAX_ANGLE).then_some(Self(degrees))
    }

    /// Map a control distance to an angle: `clamp(round(d / 2), 0, 180)`
    ///
    /// Negative and NaN distances map to 0.
    pub fn from_distance(distance: f32) -> Self {
        let degrees = (distance / DISTANCE_DIVISOR).round();
        if degrees.is_nan() || degrees <= 0.0 {
            Self(0)
        } else {
            Self(degrees.min(MAX_ANGLE as f32) as u8)
        }
    }

    pub fn degrees(self) -> u8 {
        self.0
    }

    pub fn abs_diff(self, other: Angle) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of offering an angle to the [`CommandFilter`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transmission {
    Sent,
    Suppressed,
    Failed,
}

/// Suppresses near-duplicate servo commands
#[derive(Clone, Debug, Default)]
pub struct CommandFilter {
    last_sent: Option<Angle>,
}

impl CommandFilter {
    /// Last angle successfully written to the actuator
    pub fn last_sent(&self) -> Option<Angle> {
        self.last_sent
    }

    pub fn should_transmit(&self, angle: Angle) -> bool {
        match self.last_sent {
            None => true,
            Some(last) => angle.abs_diff(last) > CHANGE_THRESHOLD,
        }
    }

    /// Send `angle` if it differs enough from the last sent one
    ///
    /// A failed write is logged and leaves the last sent angle untouched.
    pub fn offer<A>(&mut self, angle: Angle, actuator: &mut A) -> Transmission
    where
        A: ActuatorChannel + ?Sized,
    {
        if !self.should_transmit(angle) {
            return Transmission::Suppressed;
        }

        match actuator.send_angle(angle) {
            Ok(()) => {
                tracing::info!("Sending angle: {}", angle);
                self.last_sent = Some(angle);
                Transmission::Sent
            }
            Err(e) => {
                tracing::error!("Servo control error: {}", e);
                Transmission::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::testing::RecordingActuator;

    #[test]
    fn mapping_halves_and_rounds() {
        assert_eq!(Angle::from_distance(100.0).degrees(), 50);
        assert_eq!(Angle::from_distance(104.0).degrees(), 52);
        assert_eq!(Angle::from_distance(101.0).degrees(), 51);
        assert_eq!(Angle::from_distance(0.0).degrees(), 0);
    }

    #[test]
    fn mapping_is_clamped() {
        assert_eq!(Angle::from_distance(360.0).degrees(), 180);
        assert_eq!(Angle::from_distance(10_000.0).degrees(), 180);
        assert_eq!(Angle::from_distance(f32::INFINITY).degrees(), 180);
        assert_eq!(Angle::from_distance(-4.0).degrees(), 0);
        assert_eq!(Angle::from_distance(f32::NAN).degrees(), 0);
    }

    #[test]
    fn mapping_is_monotonic_and_bounded() {
        let mut previous = Angle::from_distance(0.0);
        for step in 0..2_000 {
            let angle = Angle::from_distance(step as f32 * 0.25);
            assert!(angle.degrees() <= MAX_ANGLE);
            assert!(angle >= previous);
            previous = angle;
        }
    }

    #[test]
    fn angle_new_rejects_out_of_range() {
        assert_eq!(Angle::new(180).map(Angle::degrees), Some(180));
        assert!(Angle::new(181).is_none());
    }

    #[test]
    fn transmit_rule_over_all_pairs() {
        for prev in 0..=MAX_ANGLE {
            for next in 0..=MAX_ANGLE {
                let filter = CommandFilter {
                    last_sent: Angle::new(prev),
                };
                let expected = prev.abs_diff(next) > CHANGE_THRESHOLD;
                assert_eq!(filter.should_transmit(Angle::new(next).unwrap()), expected);
            }
        }
    }

    #[test]
    fn first_angle_always_sent() {
        let mut filter = CommandFilter::default();
        let mut actuator = RecordingActuator::default();
        let angle = Angle::from_distance(100.0);
        assert_eq!(filter.offer(angle, &mut actuator), Transmission::Sent);
        assert_eq!(actuator.writes, vec![b"50\n".to_vec()]);
        assert_eq!(filter.last_sent(), Some(angle));
    }

    #[test]
    fn first_small_angle_sent_too() {
        let mut filter = CommandFilter::default();
        let mut actuator = RecordingActuator::default();
        assert_eq!(filter.offer(Angle::from_distance(4.0), &mut actuator), Transmission::Sent);
        assert_eq!(actuator.writes, vec![b"2\n".to_vec()]);
    }

    #[test]
    fn small_change_is_suppressed() {
        let mut filter = CommandFilter::default();
        let mut actuator = RecordingActuator::default();
        filter.offer(Angle::from_distance(100.0), &mut actuator);
        let result = filter.offer(Angle::from_distance(104.0), &mut actuator);
        assert_eq!(result, Transmission::Suppressed);
        assert_eq!(actuator.writes.len(), 1);
        assert_eq!(filter.last_sent().map(Angle::degrees), Some(50));
    }

    #[test]
    fn large_change_is_sent() {
        let mut filter = CommandFilter::default();
        let mut actuator = RecordingActuator::default();
        filter.offer(Angle::from_distance(100.0), &mut actuator);
        let result = filter.offer(Angle::from_distance(120.0), &mut actuator);
        assert_eq!(result, Transmission::Sent);
        assert_eq!(actuator.writes.last().unwrap(), b"60\n");
        assert_eq!(filter.last_sent().map(Angle::degrees), Some(60));
    }

    #[test]
    fn failed_write_keeps_last_sent() {
        let mut filter = CommandFilter::default();
        let mut actuator = RecordingActuator::default();
        filter.offer(Angle::from_distance(100.0), &mut actuator);

        actuator.fail_writes = true;
        let result = filter.offer(Angle::from_distance(140.0), &mut actuator);
        assert_eq!(result, Transmission::Failed);
        assert_eq!(filter.last_sent().map(Angle::degrees), Some(50));

        // retried once the link recovers
        actuator.fail_writes = false;
        let result = filter.offer(Angle::from_distance(140.0), &mut actuator);
        assert_eq!(result, Transmission::Sent);
        assert_eq!(actuator.writes.last().unwrap(), b"70\n");
    }
}
