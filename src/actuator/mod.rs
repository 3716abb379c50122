mod serial;

pub use serial::SerialActuator;

use crate::control::Angle;
use thiserror::Error;

/// Errors from the actuator link
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),

    #[error("channel is closed")]
    Closed,
}

/// Wire encoding of a servo command: decimal degrees terminated by a newline
pub fn encode_angle(angle: Angle) -> Vec<u8> {
    format!("{}\n", angle).into_bytes()
}

/// Trait for byte-oriented links to the servo controller
pub trait ActuatorChannel {
    /// Write raw bytes to the link
    fn write(&mut self, bytes: &[u8]) -> Result<(), ActuatorError>;

    /// Send one servo command
    fn send_angle(&mut self, angle: Angle) -> Result<(), ActuatorError> {
        self.write(&encode_angle(angle))
    }

    /// Close the link. Closing an already closed link is a no-op.
    fn close(&mut self) -> Result<(), ActuatorError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{ActuatorChannel, ActuatorError};
    use std::io;

    /// Actuator that records every write
    #[derive(Debug, Default)]
    pub struct RecordingActuator {
        pub writes: Vec<Vec<u8>>,
        pub fail_writes: bool,
        pub closed: bool,
        pub close_calls: usize,
    }

    impl ActuatorChannel for RecordingActuator {
        fn write(&mut self, bytes: &[u8]) -> Result<(), ActuatorError> {
            if self.closed {
                return Err(ActuatorError::Closed);
            }
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "link stalled").into());
            }
            self.writes.push(bytes.to_vec());
            Ok(())
        }

        fn close(&mut self) -> Result<(), ActuatorError> {
            self.close_calls += 1;
            self.closed = true;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_are_newline_terminated_decimal() {
        assert_eq!(encode_angle(Angle::new(90).unwrap()), b"90\n");
        assert_eq!(encode_angle(Angle::new(0).unwrap()), b"0\n");
        assert_eq!(encode_angle(Angle::new(180).unwrap()), b"180\n");
    }

    #[test]
    fn write_after_close_is_rejected() {
        let mut actuator = testing::RecordingActuator::default();
        actuator.close().unwrap();
        let err = actuator.send_angle(Angle::new(10).unwrap()).unwrap_err();
        assert!(matches!(err, ActuatorError::Closed));
        assert!(actuator.writes.is_empty());
    }
}
