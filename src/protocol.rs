//! Luxafor HID command encoding.
//!
//! Every command is a single 5 byte output report:
//!
//! | Byte | Meaning        |
//! |------|----------------|
//! | 0    | Animation code |
//! | 1    | LED target     |
//! | 2    | Red            |
//! | 3    | Green          |
//! | 4    | Blue           |

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use bytes::{BufMut, Bytes, BytesMut};
use clap::ValueEnum;
use thiserror::Error;

/// Length of a command frame on the wire.
pub const FRAME_LEN: usize = 5;

/// Device animation mode.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
#[repr(u8)]
pub enum Animation {
    Static = 1,
    Fade = 2,
    Strobe = 3,
    Wave = 4,
    Pattern = 6,
}

impl Animation {
    /// Protocol byte for this animation.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Animation {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Static),
            2 => Ok(Self::Fade),
            3 => Ok(Self::Strobe),
            4 => Ok(Self::Wave),
            6 => Ok(Self::Pattern),
            code => Err(UnknownCode { kind: "animation", code }),
        }
    }
}

/// Addressable LED target.
#[derive(ValueEnum, Default, PartialEq, Eq, Debug, Copy, Clone)]
#[repr(u8)]
pub enum Led {
    FrontTop = 1,
    FrontMiddle = 2,
    FrontBottom = 3,
    BackTop = 4,
    BackMiddle = 5,
    BackBottom = 6,
    FrontAll = 65,
    BackAll = 66,
    #[default]
    All = 255,
}

impl Led {
    /// The six physically distinct LEDs.
    pub const INDIVIDUAL: [Led; 6] = [
        Led::FrontTop,
        Led::FrontMiddle,
        Led::FrontBottom,
        Led::BackTop,
        Led::BackMiddle,
        Led::BackBottom,
    ];

    /// Protocol byte for this target.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Led {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::FrontTop),
            2 => Ok(Self::FrontMiddle),
            3 => Ok(Self::FrontBottom),
            4 => Ok(Self::BackTop),
            5 => Ok(Self::BackMiddle),
            6 => Ok(Self::BackBottom),
            65 => Ok(Self::FrontAll),
            66 => Ok(Self::BackAll),
            255 => Ok(Self::All),
            code => Err(UnknownCode { kind: "LED", code }),
        }
    }
}

/// Wave animation shape.
///
/// No command currently emits a wave frame.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
#[repr(u8)]
pub enum WaveType {
    SingleSmall = 1,
    SingleLarge = 2,
    DoubleSmall = 3,
    DoubleLarge = 4,
}

impl WaveType {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for WaveType {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::SingleSmall),
            2 => Ok(Self::SingleLarge),
            3 => Ok(Self::DoubleSmall),
            4 => Ok(Self::DoubleLarge),
            code => Err(UnknownCode { kind: "wave type", code }),
        }
    }
}

/// Byte that does not map to any protocol constant.
#[derive(Error, PartialEq, Eq, Debug, Copy, Clone)]
#[error("unknown {kind} code: {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: u8,
}

/// RGB color.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
    pub const GREEN: Rgb = Rgb::new(0x00, 0xff, 0x00);
    pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xff);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color string not matching `0xRRGGBB` or `#RRGGBB`.
#[derive(Error, PartialEq, Eq, Debug, Clone)]
#[error("color '{0}' does not match format 0xRRGGBB")]
pub struct InvalidColor(String);

impl FromStr for Rgb {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Rgb, InvalidColor> {
        let chars = match s.strip_prefix("0x").or_else(|| s.strip_prefix('#')) {
            Some(chars) if chars.len() == 6 => chars,
            _ => return Err(InvalidColor(s.into())),
        };

        match u32::from_str_radix(chars, 16) {
            Ok(mut color) => {
                let b = (color & 0xff) as u8;
                color >>= 8;
                let g = (color & 0xff) as u8;
                color >>= 8;
                let r = color as u8;
                Ok(Rgb { r, g, b })
            },
            Err(_) => Err(InvalidColor(s.into())),
        }
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Single device command.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Frame {
    pub animation: Animation,
    pub led: Led,
    pub color: Rgb,
    /// Requested animation speed.
    ///
    /// The device accepts 5 byte frames for static and fade commands, so this
    /// is never written to the wire.
    pub speed: u8,
}

impl Frame {
    pub fn new(animation: Animation, led: Led, color: Rgb, speed: u8) -> Self {
        Self { animation, led, color, speed }
    }

    /// Convert the frame to its wire format.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(FRAME_LEN);

        buf.put_u8(self.animation.code());
        buf.put_u8(self.led.code());

        buf.put_u8(self.color.r);
        buf.put_u8(self.color.g);
        buf.put_u8(self.color.b);

        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_frame_layout() {
        let frame = Frame::new(Animation::Static, Led::BackMiddle, Rgb::new(1, 2, 3), 0);
        assert_eq!(&frame.to_bytes()[..], &[1, 5, 1, 2, 3]);
    }

    #[test]
    fn speed_is_not_encoded() {
        let color = Rgb::new(0x10, 0x20, 0x30);
        let slow = Frame::new(Animation::Fade, Led::FrontAll, color, 0).to_bytes();
        let fast = Frame::new(Animation::Fade, Led::FrontAll, color, 255).to_bytes();

        assert_eq!(slow.len(), FRAME_LEN);
        assert_eq!(slow, fast);
        assert_eq!(&fast[..], &[2, 65, 0x10, 0x20, 0x30]);
    }

    #[test]
    fn led_codes() {
        assert_eq!(Led::FrontTop.code(), 1);
        assert_eq!(Led::BackBottom.code(), 6);
        assert_eq!(Led::FrontAll.code(), 65);
        assert_eq!(Led::BackAll.code(), 66);
        assert_eq!(Led::All.code(), 255);

        for led in Led::value_variants() {
            assert_eq!(Led::try_from(led.code()), Ok(*led));
        }
        assert!(Led::try_from(7).is_err());
    }

    #[test]
    fn animation_codes() {
        assert_eq!(Animation::try_from(6), Ok(Animation::Pattern));
        assert_eq!(Animation::try_from(5), Err(UnknownCode { kind: "animation", code: 5 }));
        assert_eq!(WaveType::try_from(4), Ok(WaveType::DoubleLarge));
        assert!(WaveType::try_from(0).is_err());
    }

    #[test]
    fn parse_color() {
        assert_eq!("0xff8000".parse::<Rgb>(), Ok(Rgb::new(0xff, 0x80, 0x00)));
        assert_eq!("#0000ff".parse::<Rgb>(), Ok(Rgb::BLUE));
        assert!("ff8000".parse::<Rgb>().is_err());
        assert!("0xff80".parse::<Rgb>().is_err());
        assert!("0xgg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn display_color() {
        assert_eq!(Rgb::new(0xab, 0x01, 0xff).to_string(), "0xab01ff");
    }
}
