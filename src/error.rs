use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpioError {
    #[cfg(target_os = "linux")]
    #[error("cannot open the GPIO peripheral: {0}")]
    Open(#[source] rppal::gpio::Error),

    #[cfg(target_os = "linux")]
    #[error("cannot claim board pin {board} (BCM {bcm}): {source}")]
    Claim {
        board: u8,
        bcm: u8,
        #[source]
        source: rppal::gpio::Error,
    },

    #[error("board pin {0} has no GPIO function")]
    NotGpio(u8),

    #[cfg(not(target_os = "linux"))]
    #[error("GPIO is not available on this platform, run with --simulate")]
    Unsupported,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Gpio(#[from] GpioError),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot install the log subscriber: {0}")]
    Logging(String),
}
