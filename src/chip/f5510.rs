//! MSP430F5510.
//!
//! Ports P1 to P6 and PJ. Every port has drive strength control, P1 to P6 have a peripheral
//! select register, and only P1 and P2 can raise interrupts.
//!
//! Without the `f5510-64pin` feature the 48-pin RGZ/PT package is assumed: P2 only has P2.0,
//! there is no P3, and P6 stops at P6.3.
//!
//! SPI runs on USCI_A1 {SCLK: `P4.0`, SOMI: `P4.5`, SIMO: `P4.4`} and USCI_B1 {SCLK: `P4.3`,
//! SOMI: `P4.2`, SIMO: `P4.1`}, the default port mapping of P4.

use crate::gpio::{gpio_port, Pin0, Pin1, Pin2, Pin3, Pin4, Pin5};
use crate::hw_traits::gpio::{Device, SelPeriph, UsciSelect};
use crate::hw_traits::usci::{UsciRegs, UsciSpiPeriph};
use crate::hw_traits::Reg8;
use crate::pin_id::{self, PinId};
use crate::spi::SpiUsci;
use core::sync::atomic::{AtomicBool, Ordering};

/// Number of GPIO ports, counting PJ
pub const NUM_PORTS: usize = 7;
/// Number of ports with a PxSEL register
pub const NUM_SEL_PORTS: usize = 6;
/// Number of ports with interrupts
pub const NUM_INT_PORTS: usize = 2;

const P2_MASK: u8 = if cfg!(feature = "f5510-64pin") { 0xFF } else { 0x01 };
const P3_MASK: u8 = if cfg!(feature = "f5510-64pin") { 0x1F } else { 0x00 };
const P6_MASK: u8 = if cfg!(feature = "f5510-64pin") { 0xFF } else { 0x0F };

/// The MSP430F5510 register map
pub struct F5510;

impl Device for F5510 {
    const PXIN: &'static [u16] = &[0x0200, 0x0201, 0x0220, 0x0221, 0x0240, 0x0241, 0x0320];
    const PXOUT: &'static [u16] = &[0x0202, 0x0203, 0x0222, 0x0223, 0x0242, 0x0243, 0x0322];
    const PXDIR: &'static [u16] = &[0x0204, 0x0205, 0x0224, 0x0225, 0x0244, 0x0245, 0x0324];
    const PXREN: &'static [u16] = &[0x0206, 0x0207, 0x0226, 0x0227, 0x0246, 0x0247, 0x0326];
    const PXDS: &'static [u16] = &[0x0208, 0x0209, 0x0228, 0x0229, 0x0248, 0x0249, 0x0328];
    const PXSEL: &'static [u16] = &[0x020A, 0x020B, 0x022A, 0x022B, 0x024A, 0x024B];
    const PXSEL2: &'static [u16] = &[];
    const PXIES: &'static [u16] = &[0x0218, 0x0219];
    const PXIE: &'static [u16] = &[0x021A, 0x021B];
    const PXIFG: &'static [u16] = &[0x021C, 0x021D];

    const PIN_MASK: &'static [u8] = &[0xFF, P2_MASK, P3_MASK, 0xFF, 0x3F, P6_MASK, 0x0F];
}

/// Identifier of pin `bit` of the port at `port_index` (P1 is 0, PJ is 6), if the selected
/// package has it
pub fn pin_id(port_index: u8, bit: u8) -> Option<PinId> {
    pin_id::lookup::<F5510>(port_index, bit)
}

/// Validates a raw pin identifier against the selected package
pub fn pin_id_from_raw(raw: u8) -> Option<PinId> {
    pin_id::from_raw::<F5510>(raw)
}

gpio_port!(
    /// Port P1
    P1, P1Parts: F5510, index 0,
    caps [IntrPeriph, SelPeriph, DsPeriph],
    pins {
        pin0: Pin0, pin1: Pin1, pin2: Pin2, pin3: Pin3,
        pin4: Pin4, pin5: Pin5, pin6: Pin6, pin7: Pin7,
    }
);

gpio_port!(
    /// Port P2
    P2, P2Parts: F5510, index 1,
    caps [IntrPeriph, SelPeriph, DsPeriph],
    pins {
        pin0: Pin0,
        #[cfg(feature = "f5510-64pin")] pin1: Pin1,
        #[cfg(feature = "f5510-64pin")] pin2: Pin2,
        #[cfg(feature = "f5510-64pin")] pin3: Pin3,
        #[cfg(feature = "f5510-64pin")] pin4: Pin4,
        #[cfg(feature = "f5510-64pin")] pin5: Pin5,
        #[cfg(feature = "f5510-64pin")] pin6: Pin6,
        #[cfg(feature = "f5510-64pin")] pin7: Pin7,
    }
);

#[cfg(feature = "f5510-64pin")]
gpio_port!(
    /// Port P3
    P3, P3Parts: F5510, index 2,
    caps [SelPeriph, DsPeriph],
    pins {
        pin0: Pin0, pin1: Pin1, pin2: Pin2, pin3: Pin3, pin4: Pin4,
    }
);

gpio_port!(
    /// Port P4
    P4, P4Parts: F5510, index 3,
    caps [SelPeriph, DsPeriph],
    pins {
        pin0: Pin0, pin1: Pin1, pin2: Pin2, pin3: Pin3,
        pin4: Pin4, pin5: Pin5, pin6: Pin6, pin7: Pin7,
    }
);

gpio_port!(
    /// Port P5
    P5, P5Parts: F5510, index 4,
    caps [SelPeriph, DsPeriph],
    pins {
        pin0: Pin0, pin1: Pin1, pin2: Pin2, pin3: Pin3, pin4: Pin4, pin5: Pin5,
    }
);

gpio_port!(
    /// Port P6
    P6, P6Parts: F5510, index 5,
    caps [SelPeriph, DsPeriph],
    pins {
        pin0: Pin0, pin1: Pin1, pin2: Pin2, pin3: Pin3,
        #[cfg(feature = "f5510-64pin")] pin4: Pin4,
        #[cfg(feature = "f5510-64pin")] pin5: Pin5,
        #[cfg(feature = "f5510-64pin")] pin6: Pin6,
        #[cfg(feature = "f5510-64pin")] pin7: Pin7,
    }
);

gpio_port!(
    /// Port PJ
    PJ, PJParts: F5510, index 6,
    caps [DsPeriph],
    pins {
        pin0: Pin0, pin1: Pin1, pin2: Pin2, pin3: Pin3,
    }
);

// USCI functions on P4 only need PxSEL
impl UsciSelect for P4 {
    #[inline(always)]
    fn route(mask: u8) {
        <P4 as SelPeriph>::PXSEL.on(mask);
    }

    #[inline(always)]
    fn unroute(mask: u8) {
        <P4 as SelPeriph>::PXSEL.off(mask);
    }
}

// F5xx USCI: CTLW0 at +0x00 (CTL1 is the low byte), BRW at +0x06, STAT at +0x0A, RXBUF at
// +0x0C, TXBUF at +0x0E, IFG at +0x1D
macro_rules! usci_regs {
    ($base:literal) => {
        UsciRegs {
            ctl0: Reg8::at($base + 0x01),
            ctl1: Reg8::at($base),
            br0: Reg8::at($base + 0x06),
            br1: Reg8::at($base + 0x07),
            stat: Reg8::at($base + 0x0A),
            rxbuf: Reg8::at($base + 0x0C),
            txbuf: Reg8::at($base + 0x0E),
            ifg: Reg8::at($base + 0x1D),
            rxifg: 1 << 0,
            txifg: 1 << 1,
        }
    };
}

/// USCI_A1 in SPI mode
pub struct UsciA1 {
    _private: (),
}

impl UsciSpiPeriph for UsciA1 {
    const REGS: UsciRegs = usci_regs!(0x0600);
}

impl SpiUsci for UsciA1 {
    type Port = P4;
    type Sclk = Pin0;
    type Somi = Pin5;
    type Simo = Pin4;
}

/// USCI_B1 in SPI mode
pub struct UsciB1 {
    _private: (),
}

impl UsciSpiPeriph for UsciB1 {
    const REGS: UsciRegs = usci_regs!(0x0620);
}

impl SpiUsci for UsciB1 {
    type Port = P4;
    type Sclk = Pin3;
    type Somi = Pin2;
    type Simo = Pin1;
}

/// Both SPI interfaces of the device, addressed by selector
pub type SpiPorts = crate::spi_ports::SpiPorts<UsciA1, UsciB1>;

static TAKEN: AtomicBool = AtomicBool::new(false);

/// Tokens for the device's ports and SPI-capable USCIs
#[allow(non_snake_case, missing_docs)]
pub struct Peripherals {
    pub P1: P1,
    pub P2: P2,
    #[cfg(feature = "f5510-64pin")]
    pub P3: P3,
    pub P4: P4,
    pub P5: P5,
    pub P6: P6,
    pub PJ: PJ,
    pub USCI_A1: UsciA1,
    pub USCI_B1: UsciB1,
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
            #[cfg(feature = "f5510-64pin")]
            P3: P3 { _private: () },
            P4: P4 { _private: () },
            P5: P5 { _private: () },
            P6: P6 { _private: () },
            PJ: PJ { _private: () },
            USCI_A1: UsciA1 { _private: () },
            USCI_B1: UsciB1 { _private: () },
        }
    }
}
