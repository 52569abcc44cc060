//! Text attributes
//!
//! A transport-neutral control surface: one attribute per setting plus
//! `data`, read and written as text the way sysfs-style files are. Numeric
//! values are shown as decimal with a trailing newline. `data` carries raw
//! bytes in both directions.

use core::fmt::{Debug, Write};
use core::str::{self, FromStr};

use heapless::String;

use crate::clock::BitClock;
use crate::error::Error;
use crate::line::LineIo;
use crate::queue::Bytes;
use crate::serial::SoftUart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    TxPin,
    RxPin,
    BaudRate,
    Loopback,
    Data,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::TxPin,
        Attribute::RxPin,
        Attribute::BaudRate,
        Attribute::Loopback,
        Attribute::Data,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::TxPin => "tx_pin",
            Attribute::RxPin => "rx_pin",
            Attribute::BaudRate => "baud_rate",
            Attribute::Loopback => "loopback",
            Attribute::Data => "data",
        }
    }
}

/// Unknown attribute name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownAttribute;

impl FromStr for Attribute {
    type Err = UnknownAttribute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tx_pin" | "gpio_tx" => Ok(Attribute::TxPin),
            "rx_pin" | "gpio_rx" => Ok(Attribute::RxPin),
            "baud_rate" | "baudrate" => Ok(Attribute::BaudRate),
            "loopback" => Ok(Attribute::Loopback),
            "data" => Ok(Attribute::Data),
            _ => Err(UnknownAttribute),
        }
    }
}

/// Parse a decimal integer, ignoring surrounding whitespace
fn parse_number<E>(input: &[u8]) -> Result<i64, Error<E>> {
    str::from_utf8(input)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or(Error::Malformed)
}

fn decimal(value: i64) -> Bytes {
    let mut text: String<24> = String::new();
    // i64 plus newline fits in 24 bytes
    let _ = writeln!(text, "{}", value);
    let mut out = Bytes::new();
    let _ = out.extend_from_slice(text.as_bytes());
    out
}

impl<L, C> SoftUart<L, C>
where
    L: LineIo,
    L::Error: Debug,
    C: BitClock,
{
    /// Read an attribute
    ///
    /// Reading `data` drains the inbox.
    pub fn show(&self, attr: Attribute) -> Bytes {
        match attr {
            Attribute::TxPin => decimal(i64::from(self.tx_pin())),
            Attribute::RxPin => decimal(i64::from(self.rx_pin())),
            Attribute::BaudRate => decimal(i64::from(self.baud_rate())),
            Attribute::Loopback => decimal(i64::from(self.loopback() as u8)),
            Attribute::Data => self.collect(),
        }
    }

    /// Write an attribute, returning the number of input bytes consumed
    pub fn store(&self, attr: Attribute, input: &[u8]) -> Result<usize, Error<L::Error>> {
        match attr {
            Attribute::TxPin => {
                let pin = parse_number(input)?;
                self.set_tx_pin(narrow_pin(pin))?
            }
            Attribute::RxPin => {
                let pin = parse_number(input)?;
                self.set_rx_pin(narrow_pin(pin))?
            }
            Attribute::BaudRate => self.set_baud_rate(parse_number(input)?)?,
            Attribute::Loopback => self.set_loopback(parse_number(input)?)?,
            Attribute::Data => self.submit(input)?,
        }
        Ok(input.len())
    }
}

// values outside i32 are out of pin range anyway
fn narrow_pin(pin: i64) -> i32 {
    if pin < 0 {
        pin.max(i64::from(i32::MIN)) as i32
    } else {
        pin.min(i64::from(i32::MAX)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for attr in Attribute::ALL.iter() {
            assert_eq!(attr.name().parse::<Attribute>(), Ok(*attr));
        }
        assert_eq!("gpio_tx".parse::<Attribute>(), Ok(Attribute::TxPin));
        assert_eq!("gpio_rx".parse::<Attribute>(), Ok(Attribute::RxPin));
        assert_eq!("baudrate".parse::<Attribute>(), Ok(Attribute::BaudRate));
        assert_eq!("parity".parse::<Attribute>(), Err(UnknownAttribute));
    }

    #[test]
    fn numbers_tolerate_whitespace() {
        assert_eq!(parse_number::<()>(b"9600\n"), Ok(9600));
        assert_eq!(parse_number::<()>(b"  -1 "), Ok(-1));
        assert_eq!(parse_number::<()>(b"96OO"), Err(Error::Malformed));
        assert_eq!(parse_number::<()>(b""), Err(Error::Malformed));
        assert_eq!(parse_number::<()>(&[0xFF, 0x31]), Err(Error::Malformed));
    }

    #[test]
    fn decimal_has_newline() {
        assert_eq!(&decimal(4800)[..], b"4800\n");
        assert_eq!(&decimal(0)[..], b"0\n");
    }

    #[test]
    fn narrow_pin_saturates() {
        assert_eq!(narrow_pin(17), 17);
        assert_eq!(narrow_pin(-1), -1);
        assert_eq!(narrow_pin(1 << 40), i32::MAX);
        assert_eq!(narrow_pin(-(1 << 40)), i32::MIN);
    }
}
