use super::{ActuatorChannel, ActuatorError};
use serialport::{DataBits, Parity, SerialPort, StopBits};
use std::io::Write;
use std::thread;
use std::time::Duration;

/// Link speed expected by the servo firmware
pub const BAUD_RATE: u32 = 115_200;

/// The controller resets when the port opens; writes before this are lost
const SETTLE_DELAY: Duration = Duration::from_secs(2);

const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// Servo controller on a serial port
pub struct SerialActuator {
    port: Option<Box<dyn SerialPort>>,
    name: String,
}

impl SerialActuator {
    /// Open `port_name` at 115200 8N1 and wait for the controller to settle
    pub fn open(port_name: &str) -> Result<Self, ActuatorError> {
        tracing::info!("Opening serial port {} at {} baud", port_name, BAUD_RATE);

        let port = serialport::new(port_name, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(WRITE_TIMEOUT)
            .open()
            .map_err(|source| ActuatorError::Open {
                port: port_name.to_string(),
                source,
            })?;

        thread::sleep(SETTLE_DELAY);

        tracing::info!("Serial port initialized");

        Ok(Self {
            port: Some(port),
            name: port_name.to_string(),
        })
    }
}

impl ActuatorChannel for SerialActuator {
    fn write(&mut self, bytes: &[u8]) -> Result<(), ActuatorError> {
        let port = self.port.as_mut().ok_or(ActuatorError::Closed)?;
        port.write_all(bytes)?;
        port.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), ActuatorError> {
        if self.port.take().is_some() {
            tracing::info!("Serial port {} closed", self.name);
        }
        Ok(())
    }
}
