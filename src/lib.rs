//! Luxafor USB LED indicator driver.
//!
//! Devices are discovered through the platform HID library and driven with
//! fixed 5 byte output reports. Every command opens a short lived connection
//! to the device, so a [`Luxafor`] handle can be kept around indefinitely.
//!
//! ```no_run
//! use luxafor::{Led, Rgb};
//!
//! # fn main() -> Result<(), luxafor::Error> {
//! for lux in luxafor::enumerate()? {
//!     lux.set(Led::FrontAll, Rgb::RED)?;
//!     lux.fade(Led::BackAll, Rgb::BLUE, 128)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod error;
pub mod protocol;
pub mod transport;

pub use crate::controller::{Luxafor, POLICE_PAUSE};
pub use crate::error::{Error, Result, TransportError};
pub use crate::protocol::{Animation, Frame, Led, Rgb, WaveType, FRAME_LEN};
pub use crate::transport::{
    Connection, DeviceDescriptor, HidConnection, HidDescriptor, HidTransport, Transport,
};

/// Luxafor USB vendor ID.
pub const VENDOR_ID: u16 = 0x04d8;

/// Luxafor USB product ID.
pub const PRODUCT_ID: u16 = 0xf372;

/// List all Luxafors attached to this system.
///
/// Finding no devices is not an error.
pub fn enumerate() -> Result<Vec<Luxafor>> {
    let transport = HidTransport::new().map_err(Error::Api)?;
    Ok(Luxafor::enumerate_with(&transport))
}
