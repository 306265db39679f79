//! MSP430G2553.
//!
//! Ports P1 to P3. Every port has a primary (PxSEL) and secondary (PxSEL2) peripheral select
//! register, P1 and P2 can raise interrupts, and there is no drive strength control.
//!
//! P3 is only bonded out on the 28- and 32-pin packages and needs the `g2553-28pin` feature.
//!
//! SPI runs on USCI_A0 {CLK: `P1.4`, SOMI: `P1.1`, SIMO: `P1.2`} and USCI_B0 {CLK: `P1.5`,
//! SOMI: `P1.6`, SIMO: `P1.7`}. Both need PxSEL and PxSEL2 set on their pins.

use crate::gpio::{gpio_port, Pin1, Pin2, Pin4, Pin5, Pin6, Pin7};
use crate::hw_traits::gpio::{Device, Sel2Periph, SelPeriph, UsciSelect};
use crate::hw_traits::usci::{UsciRegs, UsciSpiPeriph};
use crate::hw_traits::Reg8;
use crate::pin_id::{self, PinId};
use crate::spi::SpiUsci;
use core::sync::atomic::{AtomicBool, Ordering};

/// Number of GPIO ports
pub const NUM_PORTS: usize = 3;
/// Number of ports with interrupts
pub const NUM_INT_PORTS: usize = 2;

const P3_MASK: u8 = if cfg!(feature = "g2553-28pin") { 0xFF } else { 0x00 };

/// The MSP430G2553 register map
pub struct G2553;

impl Device for G2553 {
    const PXIN: &'static [u16] = &[0x0020, 0x0028, 0x0018];
    const PXOUT: &'static [u16] = &[0x0021, 0x0029, 0x0019];
    const PXDIR: &'static [u16] = &[0x0022, 0x002A, 0x001A];
    const PXREN: &'static [u16] = &[0x0027, 0x002F, 0x0010];
    const PXDS: &'static [u16] = &[];
    const PXSEL: &'static [u16] = &[0x0026, 0x002E, 0x001B];
    const PXSEL2: &'static [u16] = &[0x0041, 0x0042, 0x0043];
    const PXIES: &'static [u16] = &[0x0024, 0x002C];
    const PXIE: &'static [u16] = &[0x0025, 0x002D];
    const PXIFG: &'static [u16] = &[0x0023, 0x002B];

    const PIN_MASK: &'static [u8] = &[0xFF, 0xFF, P3_MASK];
}

/// Identifier of pin `bit` of the port at `port_index` (P1 is 0), if the selected package has it
pub fn pin_id(port_index: u8, bit: u8) -> Option<PinId> {
    pin_id::lookup::<G2553>(port_index, bit)
}

/// Validates a raw pin identifier against the selected package
pub fn pin_id_from_raw(raw: u8) -> Option<PinId> {
    pin_id::from_raw::<G2553>(raw)
}

gpio_port!(
    /// Port P1
    P1, P1Parts: G2553, index 0,
    caps [IntrPeriph, Sel2Periph, SelPeriph],
    pins {
        pin0: Pin0, pin1: Pin1, pin2: Pin2, pin3: Pin3,
        pin4: Pin4, pin5: Pin5, pin6: Pin6, pin7: Pin7,
    }
);

gpio_port!(
    /// Port P2
    P2, P2Parts: G2553, index 1,
    caps [IntrPeriph, Sel2Periph, SelPeriph],
    pins {
        pin0: Pin0, pin1: Pin1, pin2: Pin2, pin3: Pin3,
        pin4: Pin4, pin5: Pin5, pin6: Pin6, pin7: Pin7,
    }
);

#[cfg(feature = "g2553-28pin")]
gpio_port!(
    /// Port P3
    P3, P3Parts: G2553, index 2,
    caps [Sel2Periph, SelPeriph],
    pins {
        pin0: Pin0, pin1: Pin1, pin2: Pin2, pin3: Pin3,
        pin4: Pin4, pin5: Pin5, pin6: Pin6, pin7: Pin7,
    }
);

// USCI functions on P1 are the secondary peripheral: PxSEL and PxSEL2 both set
impl UsciSelect for P1 {
    #[inline(always)]
    fn route(mask: u8) {
        <P1 as SelPeriph>::PXSEL.on(mask);
        <P1 as Sel2Periph>::PXSEL2.on(mask);
    }

    #[inline(always)]
    fn unroute(mask: u8) {
        <P1 as Sel2Periph>::PXSEL2.off(mask);
        <P1 as SelPeriph>::PXSEL.off(mask);
    }
}

// IE2/IFG2 are shared between USCI_A0 and USCI_B0
const IFG2: Reg8 = Reg8::at(0x0003);

/// USCI_A0 in SPI mode
pub struct UsciA0 {
    _private: (),
}

impl UsciSpiPeriph for UsciA0 {
    const REGS: UsciRegs = UsciRegs {
        ctl0: Reg8::at(0x0060),
        ctl1: Reg8::at(0x0061),
        br0: Reg8::at(0x0062),
        br1: Reg8::at(0x0063),
        stat: Reg8::at(0x0065),
        rxbuf: Reg8::at(0x0066),
        txbuf: Reg8::at(0x0067),
        ifg: IFG2,
        rxifg: 1 << 0,
        txifg: 1 << 1,
    };
}

impl SpiUsci for UsciA0 {
    type Port = P1;
    type Sclk = Pin4;
    type Somi = Pin1;
    type Simo = Pin2;
}

/// USCI_B0 in SPI mode
pub struct UsciB0 {
    _private: (),
}

impl UsciSpiPeriph for UsciB0 {
    const REGS: UsciRegs = UsciRegs {
        ctl0: Reg8::at(0x0068),
        ctl1: Reg8::at(0x0069),
        br0: Reg8::at(0x006A),
        br1: Reg8::at(0x006B),
        stat: Reg8::at(0x006D),
        rxbuf: Reg8::at(0x006E),
        txbuf: Reg8::at(0x006F),
        ifg: IFG2,
        rxifg: 1 << 2,
        txifg: 1 << 3,
    };
}

impl SpiUsci for UsciB0 {
    type Port = P1;
    type Sclk = Pin5;
    type Somi = Pin6;
    type Simo = Pin7;
}

/// Both SPI interfaces of the device, addressed by selector
pub type SpiPorts = crate::spi_ports::SpiPorts<UsciA0, UsciB0>;

static TAKEN: AtomicBool = AtomicBool::new(false);

/// Tokens for the device's ports and SPI-capable USCIs
#[allow(non_snake_case, missing_docs)]
pub struct Peripherals {
    pub P1: P1,
    pub P2: P2,
    #[cfg(feature = "g2553-28pin")]
    pub P3: P3,
    pub USCI_A0: UsciA0,
    pub USCI_B0: UsciB0,
}

impl Peripherals {
    /// Returns the tokens the first time it is called, `None` afterwards
    pub fn take() -> Option<Self> {
        critical_section::with(|_| {
            if TAKEN.load(Ordering::Relaxed) {
                None
            } else {
                TAKEN.store(true, Ordering::Relaxed);
                // Safety: guarded by TAKEN
                Some(unsafe { Self::steal() })
            }
        })
    }

    /// Creates the tokens unconditionally
    ///
    /// # Safety
    /// Tokens must not be duplicated; two owners of the same port or USCI race on its registers.
    pub unsafe fn steal() -> Self {
        Peripherals {
            P1: P1 { _private: () },
            P2: P2 { _private: () },
            #[cfg(feature = "g2553-28pin")]
            P3: P3 { _private: () },
            USCI_A0: UsciA0 { _private: () },
            USCI_B0: UsciB0 { _private: () },
        }
    }
}
