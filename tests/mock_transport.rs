//! Controller behavior against a recording in-memory transport.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use luxafor::{
    Connection, DeviceDescriptor, Led, Luxafor, Rgb, Transport, TransportError, POLICE_PAUSE,
    PRODUCT_ID, VENDOR_ID,
};

#[derive(Default)]
struct Recorder {
    attempts: Vec<Vec<u8>>,
    fail_writes: bool,
}

#[derive(Clone)]
struct MockDescriptor {
    vendor_id: u16,
    product_id: u16,
    recorder: Arc<Mutex<Recorder>>,
}

impl MockDescriptor {
    fn new(vendor_id: u16, product_id: u16) -> Self {
        Self { vendor_id, product_id, recorder: Default::default() }
    }

    fn luxafor() -> Self {
        Self::new(VENDOR_ID, PRODUCT_ID)
    }
}

struct MockConnection {
    recorder: Arc<Mutex<Recorder>>,
}

impl DeviceDescriptor for MockDescriptor {
    type Connection = MockConnection;

    fn vendor_id(&self) -> u16 {
        self.vendor_id
    }

    fn product_id(&self) -> u16 {
        self.product_id
    }

    fn open(&self) -> Result<MockConnection, TransportError> {
        Ok(MockConnection { recorder: self.recorder.clone() })
    }
}

impl Connection for MockConnection {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let mut recorder = self.recorder.lock().unwrap();
        recorder.attempts.push(data.to_vec());
        if recorder.fail_writes {
            return Err(TransportError::Other("device unplugged".into()));
        }
        Ok(data.len())
    }

    fn close(self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Transport which ignores the requested IDs and returns every device.
struct MockTransport {
    devices: Vec<MockDescriptor>,
}

impl Transport for MockTransport {
    type Descriptor = MockDescriptor;

    fn enumerate(&self, _vendor_id: u16, _product_id: u16) -> Vec<MockDescriptor> {
        self.devices.clone()
    }
}

#[test]
fn enumerate_counts() {
    for count in [0, 1, 3] {
        let devices = (0..count).map(|_| MockDescriptor::luxafor()).collect();
        let transport = MockTransport { devices };
        assert_eq!(Luxafor::enumerate_with(&transport).len(), count);
    }
}

#[test]
fn enumerate_skips_foreign_devices() {
    let transport = MockTransport {
        devices: vec![
            MockDescriptor::new(0x048d, 0x8297),
            MockDescriptor::luxafor(),
            MockDescriptor::new(VENDOR_ID, 0x0001),
            MockDescriptor::new(0x0b05, PRODUCT_ID),
            MockDescriptor::luxafor(),
        ],
    };

    let devices = Luxafor::enumerate_with(&transport);
    assert_eq!(devices.len(), 2);
    for lux in devices {
        assert_eq!(lux.descriptor().vendor_id(), VENDOR_ID);
        assert_eq!(lux.descriptor().product_id(), PRODUCT_ID);
    }
}

#[test]
fn enumerated_devices_are_independent() {
    let first = MockDescriptor::luxafor();
    let second = MockDescriptor::luxafor();
    let transport = MockTransport { devices: vec![first.clone(), second.clone()] };

    let devices = Luxafor::enumerate_with(&transport);
    devices[1].solid(Rgb::GREEN).unwrap();

    assert!(first.recorder.lock().unwrap().attempts.is_empty());
    assert_eq!(second.recorder.lock().unwrap().attempts, vec![vec![1, 255, 0, 255, 0]]);
}

#[test]
fn police_runs_all_frames() {
    let descriptor = MockDescriptor::luxafor();
    let lux = Luxafor::new(descriptor.clone());

    let start = Instant::now();
    lux.police(2).unwrap();
    assert!(start.elapsed() >= POLICE_PAUSE * 4);

    let attempts = descriptor.recorder.lock().unwrap().attempts.clone();
    assert_eq!(attempts.len(), 8);
    assert_eq!(attempts[0], vec![2, Led::FrontAll.code(), 255, 0, 0]);
    assert_eq!(attempts[1], vec![2, Led::BackAll.code(), 0, 0, 255]);
    assert_eq!(attempts[2], vec![2, Led::FrontAll.code(), 0, 0, 255]);
    assert_eq!(attempts[3], vec![2, Led::BackAll.code(), 255, 0, 0]);
    assert_eq!(attempts[..4], attempts[4..]);
}

#[test]
fn police_ignores_write_failures() {
    let descriptor = MockDescriptor::luxafor();
    descriptor.recorder.lock().unwrap().fail_writes = true;
    let lux = Luxafor::new(descriptor.clone());

    assert!(lux.police(1).is_ok());
    assert_eq!(descriptor.recorder.lock().unwrap().attempts.len(), 4);

    // Regular commands still report the failure.
    assert!(lux.off().is_err());
}
