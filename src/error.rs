//! Error types.

use thiserror::Error;

/// Failure reported by the HID transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Hid(#[from] hidapi::HidError),

    #[error("{0}")]
    Other(String),
}

/// Errors from Luxafor commands.
#[derive(Error, Debug)]
pub enum Error {
    /// HID subsystem could not be initialized.
    #[error("unable to access HID: {0}")]
    Api(#[source] TransportError),

    /// Connection to the device could not be established.
    #[error("open device: {0}")]
    Open(#[source] TransportError),

    /// Frame write failed after the device was opened.
    #[error("device write: {0}")]
    Write(#[source] TransportError),
}

pub type Result<T> = std::result::Result<T, Error>;
