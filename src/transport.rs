//! HID transport abstraction.

use std::ffi::CString;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use hidapi::{HidApi, HidDevice};

use crate::error::TransportError;

/// Report ID prefixed to every output report.
const REPORT_ID: u8 = 0x00;

/// Platform HID enumeration.
pub trait Transport {
    type Descriptor: DeviceDescriptor;

    /// List attached devices for a vendor/product pair.
    fn enumerate(&self, vendor_id: u16, product_id: u16) -> Vec<Self::Descriptor>;
}

/// Enumeration record for a single attached device.
pub trait DeviceDescriptor: Clone {
    type Connection: Connection;

    /// HID vendor ID.
    fn vendor_id(&self) -> u16;

    /// HID product ID.
    fn product_id(&self) -> u16;

    /// Open a new connection to the device.
    fn open(&self) -> Result<Self::Connection, TransportError>;
}

/// Open device handle.
pub trait Connection {
    /// Write a raw output report, returning the number of bytes written.
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Release the handle.
    fn close(self) -> Result<(), TransportError>;
}

/// Transport backed by the system's HID library.
pub struct HidTransport {
    api: Arc<HidApi>,
}

impl HidTransport {
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self { api: Arc::new(HidApi::new()?) })
    }
}

impl Transport for HidTransport {
    type Descriptor = HidDescriptor;

    fn enumerate(&self, vendor_id: u16, product_id: u16) -> Vec<HidDescriptor> {
        self.api
            .device_list()
            .filter(|info| info.vendor_id() == vendor_id && info.product_id() == product_id)
            .map(|info| HidDescriptor {
                api: self.api.clone(),
                vendor_id: info.vendor_id(),
                product_id: info.product_id(),
                path: info.path().to_owned(),
            })
            .collect()
    }
}

/// Attached HID device, identified by its platform path.
#[derive(Clone)]
pub struct HidDescriptor {
    api: Arc<HidApi>,
    vendor_id: u16,
    product_id: u16,
    path: CString,
}

impl HidDescriptor {
    /// Platform specific device path.
    pub fn path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Debug for HidDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HidDescriptor")
            .field("vendor_id", &format_args!("{:04x}", self.vendor_id))
            .field("product_id", &format_args!("{:04x}", self.product_id))
            .field("path", &self.path)
            .finish()
    }
}

impl DeviceDescriptor for HidDescriptor {
    type Connection = HidConnection;

    fn vendor_id(&self) -> u16 {
        self.vendor_id
    }

    fn product_id(&self) -> u16 {
        self.product_id
    }

    fn open(&self) -> Result<HidConnection, TransportError> {
        let device = self.api.open_path(&self.path)?;
        Ok(HidConnection { device })
    }
}

/// Open hidapi device handle.
pub struct HidConnection {
    device: HidDevice,
}

impl Connection for HidConnection {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        // The device does not use numbered reports.
        let mut report = Vec::with_capacity(data.len() + 1);
        report.push(REPORT_ID);
        report.extend_from_slice(data);

        let written = self.device.write(&report)?;
        Ok(written.saturating_sub(1))
    }

    fn close(self) -> Result<(), TransportError> {
        // Handle is released on drop.
        drop(self.device);
        Ok(())
    }
}
