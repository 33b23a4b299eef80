//! Luxafor device control.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::protocol::{Animation, Frame, Led, Rgb};
use crate::transport::{Connection, DeviceDescriptor, HidDescriptor, Transport};
use crate::{PRODUCT_ID, VENDOR_ID};

/// Pause between the two halves of a police animation cycle.
pub const POLICE_PAUSE: Duration = Duration::from_millis(500);

/// Speed used for the police animation fades.
const POLICE_SPEED: u8 = 255;

/// Handle for one attached Luxafor.
///
/// This only stores the enumeration record. Every command opens its own
/// connection, writes a single frame and closes it again.
#[derive(Debug, Clone)]
pub struct Luxafor<D = HidDescriptor> {
    descriptor: D,
}

impl<D: DeviceDescriptor> Luxafor<D> {
    pub fn new(descriptor: D) -> Self {
        Self { descriptor }
    }

    /// List all attached Luxafors known to `transport`.
    ///
    /// Records with a foreign vendor or product ID are skipped, even if the
    /// transport returned them.
    pub fn enumerate_with<T>(transport: &T) -> Vec<Self>
    where
        T: Transport<Descriptor = D>,
    {
        let devices: Vec<_> = transport
            .enumerate(VENDOR_ID, PRODUCT_ID)
            .into_iter()
            .filter(|descriptor| {
                descriptor.vendor_id() == VENDOR_ID && descriptor.product_id() == PRODUCT_ID
            })
            .map(Self::new)
            .collect();

        info!(count = devices.len(), "Enumerated Luxafor devices");

        devices
    }

    /// Enumeration record of this device.
    pub fn descriptor(&self) -> &D {
        &self.descriptor
    }

    /// Write a single command to the device.
    ///
    /// The `speed` is accepted for every animation, but it is not part of the
    /// 5 byte frame.
    pub fn send_command(
        &self,
        animation: Animation,
        led: Led,
        color: Rgb,
        speed: u8,
    ) -> Result<()> {
        self.write_frame(Frame::new(animation, led, color, speed))
    }

    /// Turn all LEDs into a solid color.
    pub fn solid(&self, color: Rgb) -> Result<()> {
        self.set(Led::All, color)
    }

    /// Set an LED target to a static color.
    pub fn set(&self, led: Led, color: Rgb) -> Result<()> {
        // Speed is ignored by static frames.
        self.send_command(Animation::Static, led, color, 0)
    }

    /// Set multiple LED targets to a static color, in order.
    ///
    /// Stops at the first failure. LEDs which were already set keep their new
    /// color.
    pub fn set_many(&self, leds: &[Led], color: Rgb) -> Result<()> {
        for led in leds {
            self.set(*led, color)?;
        }
        Ok(())
    }

    /// Fade an LED target to a color.
    pub fn fade(&self, led: Led, color: Rgb, speed: u8) -> Result<()> {
        self.send_command(Animation::Fade, led, color, speed)
    }

    /// Alternate red and blue between the front and back LEDs.
    ///
    /// Blocks for `loops` full cycles of two [`POLICE_PAUSE`] halves each.
    ///
    /// Failed frames never abort the animation: every failure is logged and
    /// skipped, and the call always succeeds once all cycles have run.
    pub fn police(&self, loops: usize) -> Result<()> {
        let mut failures = 0;

        for _ in 0..loops {
            failures += self.police_half(Rgb::RED, Rgb::BLUE);
            thread::sleep(POLICE_PAUSE);

            failures += self.police_half(Rgb::BLUE, Rgb::RED);
            thread::sleep(POLICE_PAUSE);
        }

        if failures > 0 {
            warn!(loops, failures, "Police animation finished with dropped frames");
        }

        Ok(())
    }

    /// Fade front and back to their colors, returning the number of failures.
    fn police_half(&self, front: Rgb, back: Rgb) -> usize {
        [(Led::FrontAll, front), (Led::BackAll, back)]
            .into_iter()
            .filter_map(|(led, color)| self.fade(led, color, POLICE_SPEED).err())
            .inspect(|err| warn!(%err, "Dropped police animation frame"))
            .count()
    }

    /// Turn all LEDs off.
    pub fn off(&self) -> Result<()> {
        self.set(Led::All, Rgb::BLACK)
    }

    /// Open the device, write `frame` and close it again.
    fn write_frame(&self, frame: Frame) -> Result<()> {
        let bytes = frame.to_bytes();
        debug!(
            animation = ?frame.animation,
            led = ?frame.led,
            color = %frame.color,
            speed = frame.speed,
            "Writing frame {:02x?}",
            &bytes[..],
        );

        let mut connection = self.descriptor.open().map_err(Error::Open)?;
        let result = connection.write(&bytes).map(|_| ()).map_err(Error::Write);

        // Closing is best effort and never overrides the write result.
        if let Err(err) = connection.close() {
            warn!(%err, "Unable to close device");
        }

        result
    }
}
