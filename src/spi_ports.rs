//! Both SPI interfaces of a device, addressed by a numeric selector.
//!
//! [`SpiPorts`] suits code that picks the interface at run time, such as a command interpreter.
//! Interfaces are handed over with their pins claimed but not yet configured
//! ([`SpiConfig::bind`](crate::spi::SpiConfig::bind)) and are initialized on request. Every
//! operation checks the selector and the interface's state before touching a register, so a
//! failed call leaves the hardware as it was.
//!
//! Each device module exports a `SpiPorts` alias with its two USCIs filled in.

use crate::spi::{Spi, SpiInterface, SpiUsci};
use crate::util::{log_trace, log_warn};
use core::fmt;
use core::mem;

/// Selector of the device's USCI_A interface
pub const SPI_A: u8 = 0;
/// Selector of the device's USCI_B interface
pub const SPI_B: u8 = 1;

/// SPI operation errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// The selector names no interface of this device
    UsciDoesNotExist,
    /// `init` was called on an interface that is already running
    AlreadyInitialized,
    /// The interface has not been initialized yet
    NotInitialized,
}

impl fmt::Display for SpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiError::UsciDoesNotExist => f.write_str("USCI does not exist"),
            SpiError::AlreadyInitialized => f.write_str("USCI already initialized"),
            SpiError::NotInitialized => f.write_str("USCI not initialized"),
        }
    }
}

enum Slot<USCI: SpiUsci> {
    Bound(SpiInterface<USCI>),
    Ready(Spi<USCI>),
    // Only seen while `init` moves the interface between states
    Vacant,
}

impl<USCI: SpiUsci> Slot<USCI> {
    fn init(&mut self) -> Result<(), SpiError> {
        match mem::replace(self, Slot::Vacant) {
            Slot::Bound(iface) => {
                *self = Slot::Ready(iface.init());
                Ok(())
            }
            other => {
                *self = other;
                Err(SpiError::AlreadyInitialized)
            }
        }
    }

    #[inline]
    fn ready(&mut self) -> Result<&mut Spi<USCI>, SpiError> {
        match self {
            Slot::Ready(spi) => Ok(spi),
            _ => Err(SpiError::NotInitialized),
        }
    }

    #[inline]
    fn is_ready(&self) -> bool {
        matches!(self, Slot::Ready(_))
    }
}

/// The two SPI interfaces of a device.
pub struct SpiPorts<A: SpiUsci, B: SpiUsci> {
    a: Slot<A>,
    b: Slot<B>,
}

// Runs `$body` with `$spi` bound to the selected, initialized driver
macro_rules! with_spi {
    ($self:ident, $sel:expr, |$spi:ident| $body:expr) => {
        match $sel {
            SPI_A => {
                let $spi = $self.a.ready()?;
                Ok($body)
            }
            SPI_B => {
                let $spi = $self.b.ready()?;
                Ok($body)
            }
            sel => Err(unknown(sel)),
        }
    };
}

#[inline]
fn unknown(_sel: u8) -> SpiError {
    log_warn!("spi: no interface {=u8}", _sel);
    SpiError::UsciDoesNotExist
}

impl<A: SpiUsci, B: SpiUsci> SpiPorts<A, B> {
    /// Takes both interfaces, neither initialized
    pub fn new(a: SpiInterface<A>, b: SpiInterface<B>) -> Self {
        SpiPorts {
            a: Slot::Bound(a),
            b: Slot::Bound(b),
        }
    }

    /// Routes the interface's pins and configures its USCI. Fails without touching any register
    /// if the interface is already initialized.
    pub fn init(&mut self, sel: u8) -> Result<(), SpiError> {
        let res = match sel {
            SPI_A => self.a.init(),
            SPI_B => self.b.init(),
            sel => return Err(unknown(sel)),
        };
        if res.is_err() {
            log_warn!("spi: interface {=u8} already initialized", sel);
        } else {
            log_trace!("spi: interface {=u8} initialized", sel);
        }
        res
    }

    /// Whether the interface has been initialized
    pub fn is_initialized(&self, sel: u8) -> Result<bool, SpiError> {
        match sel {
            SPI_A => Ok(self.a.is_ready()),
            SPI_B => Ok(self.b.is_ready()),
            sel => Err(unknown(sel)),
        }
    }

    /// See [`Spi::prescaler`]
    pub fn prescaler(&mut self, sel: u8) -> Result<u16, SpiError> {
        with_spi!(self, sel, |spi| spi.prescaler())
    }

    /// See [`Spi::set_prescaler`]
    pub fn set_prescaler(&mut self, sel: u8, div: u16) -> Result<(), SpiError> {
        with_spi!(self, sel, |spi| spi.set_prescaler(div))
    }

    /// See [`Spi::set_max_prescaler`]
    pub fn set_max_prescaler(&mut self, sel: u8) -> Result<(), SpiError> {
        with_spi!(self, sel, |spi| spi.set_max_prescaler())
    }

    /// See [`Spi::falling_edge`]
    pub fn falling_edge(&mut self, sel: u8) -> Result<(), SpiError> {
        with_spi!(self, sel, |spi| spi.falling_edge())
    }

    /// See [`Spi::rising_edge`]
    pub fn rising_edge(&mut self, sel: u8) -> Result<(), SpiError> {
        with_spi!(self, sel, |spi| spi.rising_edge())
    }

    /// See [`Spi::pulse_clk`]
    pub fn pulse_clk(&mut self, sel: u8, times: u16) -> Result<(), SpiError> {
        with_spi!(self, sel, |spi| spi.pulse_clk(times))
    }

    /// See [`Spi::disable_somi`]
    pub fn disable_somi(&mut self, sel: u8) -> Result<(), SpiError> {
        with_spi!(self, sel, |spi| spi.disable_somi())
    }

    /// See [`Spi::enable_somi`]
    pub fn enable_somi(&mut self, sel: u8) -> Result<(), SpiError> {
        with_spi!(self, sel, |spi| spi.enable_somi())
    }

    /// See [`Spi::set_dummy_byte`]
    pub fn set_dummy_byte(&mut self, sel: u8, dummy: u8) -> Result<(), SpiError> {
        with_spi!(self, sel, |spi| spi.set_dummy_byte(dummy))
    }

    /// See [`Spi::tx`]
    pub fn tx(&mut self, sel: u8, byte: u8) -> Result<u8, SpiError> {
        with_spi!(self, sel, |spi| spi.tx(byte))
    }

    /// See [`Spi::tx_frame`]
    pub fn tx_frame(&mut self, sel: u8, buf: &[u8]) -> Result<(), SpiError> {
        with_spi!(self, sel, |spi| spi.tx_frame(buf))
    }

    /// See [`Spi::rx_frame`]
    pub fn rx_frame(&mut self, sel: u8, buf: &mut [u8]) -> Result<(), SpiError> {
        with_spi!(self, sel, |spi| spi.rx_frame(buf))
    }
}
