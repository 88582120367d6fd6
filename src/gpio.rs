use std::cell::Cell;

#[cfg(target_os = "linux")]
use light_control::bsp::header;
use light_control::bsp::output::Output;
use tracing::{debug, info};

use crate::error::GpioError;

/// Output which resides in memory, for simulation or testing
pub struct SimOutput {
    name: &'static str,
    level: Cell<bool>,
}

impl SimOutput {
    /// Factory function to create a low output
    pub fn create(name: &'static str) -> Self {
        return SimOutput {
            name,
            level: Cell::new(false),
        };
    }
}

impl Output for SimOutput {
    fn set(&self, high: bool) {
        if self.level.replace(high) != high {
            debug!(led = self.name, high, "simulated output changed");
        }
    }

    fn is_high(&self) -> bool {
        return self.level.get();
    }
}

#[cfg(target_os = "linux")]
pub use self::hardware::PinOutput;

#[cfg(target_os = "linux")]
mod hardware {
    use std::cell::RefCell;

    use light_control::bsp::header::board_to_bcm;
    use light_control::bsp::output::Output;
    use rppal::gpio::{Gpio, OutputPin};
    use tracing::debug;

    use crate::error::GpioError;

    /// An LED on the GPIO header. The pin is reset and released when dropped.
    pub struct PinOutput {
        name: &'static str,
        board: u8,
        pin: RefCell<OutputPin>,
    }

    impl PinOutput {
        /// Claims the board pin as an output, initially low
        pub fn claim(gpio: &Gpio, name: &'static str, board: u8) -> Result<Self, GpioError> {
            let bcm = board_to_bcm(board).ok_or(GpioError::NotGpio(board))?;
            let mut pin = gpio
                .get(bcm)
                .map_err(|source| GpioError::Claim { board, bcm, source })?
                .into_output_low();
            pin.set_reset_on_drop(true);
            debug!(led = name, board, bcm, "claimed pin");
            Ok(PinOutput {
                name,
                board,
                pin: RefCell::new(pin),
            })
        }
    }

    impl Output for PinOutput {
        fn set(&self, high: bool) {
            let mut pin = self.pin.borrow_mut();
            if pin.is_set_high() != high {
                debug!(led = self.name, board = self.board, high, "pin changed");
            }
            if high {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }

        fn is_high(&self) -> bool {
            self.pin.borrow().is_set_high()
        }
    }
}

/// The three LEDs of the traffic light
pub struct Board {
    green: Box<dyn Output>,
    amber: Box<dyn Output>,
    red: Box<dyn Output>,
    simulated: bool,
}

impl Board {
    pub fn simulated() -> Board {
        info!("using simulated LEDs");
        Board {
            green: Box::new(SimOutput::create("green")),
            amber: Box::new(SimOutput::create("amber")),
            red: Box::new(SimOutput::create("red")),
            simulated: true,
        }
    }

    /// Claims board pins 18, 16 and 13
    #[cfg(target_os = "linux")]
    pub fn open() -> Result<Board, GpioError> {
        let gpio = rppal::gpio::Gpio::new().map_err(GpioError::Open)?;
        let board = Board {
            green: Box::new(PinOutput::claim(&gpio, "green", header::GREEN)?),
            amber: Box::new(PinOutput::claim(&gpio, "amber", header::AMBER)?),
            red: Box::new(PinOutput::claim(&gpio, "red", header::RED)?),
            simulated: false,
        };
        info!(
            green = header::GREEN,
            amber = header::AMBER,
            red = header::RED,
            "GPIO pins claimed (board numbering)"
        );
        Ok(board)
    }

    #[cfg(not(target_os = "linux"))]
    pub fn open() -> Result<Board, GpioError> {
        Err(GpioError::Unsupported)
    }

    pub fn outputs(&self) -> (&dyn Output, &dyn Output, &dyn Output) {
        (self.green.as_ref(), self.amber.as_ref(), self.red.as_ref())
    }

    pub fn lit(&self) -> (bool, bool, bool) {
        (
            self.green.is_high(),
            self.amber.is_high(),
            self.red.is_high(),
        )
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        if !self.simulated {
            info!("releasing GPIO pins");
        }
    }
}
