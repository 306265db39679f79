//! SPI master
//!
//! Each device has two USCIs that can run SPI: USCI_A1 and USCI_B1 on the MSP430F5510, USCI_A0
//! and USCI_B0 on the MSP430G2553. Only master mode with 3-pin wiring is supported; chip select
//! is an ordinary output pin driven by the caller.
//!
//! Begin by calling [`SpiConfig::new()`] with a USCI token, adjust the defaults with the builder
//! methods, then hand over the interface's clock, SOMI and SIMO pins with [`SpiConfig::init()`].
//! The pins can be in any GPIO mode, since init routes them to the USCI itself. Holding the
//! returned [`Spi`] is the proof the interface is configured; the USCI token is gone, so the
//! interface cannot be initialized twice.
//!
//! The defaults are master, synchronous, data captured on the first clock edge with the clock
//! idling low (UCCKPH set), MSB first, SMCLK as clock source divided by [`MAX_PRESCALER`], and
//! `0x00` as the byte clocked out while receiving.
//!
//! [`Spi`] implements the embedded-hal [`SpiBus`](embedded_hal::spi::SpiBus) trait and the
//! non-blocking [`FullDuplex`](embedded_hal_nb::spi::FullDuplex) trait from
//! [`embedded-hal-nb`](embedded_hal_nb). With the `embedded-hal-02` feature the legacy
//! embedded-hal 0.2 traits are implemented too.

use crate::gpio::{Pin, PinNum};
use crate::hw_traits::gpio::{GpioPeriph, UsciSelect};
use crate::hw_traits::usci::{Ctl0, Ctl1, UsciSpiPeriph};
use crate::util::{log_trace, spin};
use embedded_hal::spi::{Mode, Phase, Polarity};
use nb::Error::WouldBlock;

/// Divider programmed by `init` and [`Spi::set_max_prescaler`]
pub const MAX_PRESCALER: u16 = 2;

/// Marks a USCI capable of SPI communication, along with the pins it is wired to
pub trait SpiUsci: UsciSpiPeriph {
    /// Port the interface's pins live on
    type Port: UsciSelect;
    /// Serial clock
    type Sclk: PinNum;
    /// Slave out, master in
    type Somi: PinNum;
    /// Slave in, master out
    type Simo: PinNum;
}

#[inline(always)]
fn sclk_mask<USCI: SpiUsci>() -> u8 {
    1 << USCI::Sclk::NUM
}

#[inline(always)]
fn somi_mask<USCI: SpiUsci>() -> u8 {
    1 << USCI::Somi::NUM
}

#[inline(always)]
fn simo_mask<USCI: SpiUsci>() -> u8 {
    1 << USCI::Simo::NUM
}

/// Order in which the bits of a byte are shifted out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// Clock the bit clock is derived from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// SMCLK
    Smclk,
    /// ACLK
    Aclk,
}

impl From<ClockSource> for Ctl1 {
    #[inline(always)]
    fn from(src: ClockSource) -> Self {
        match src {
            ClockSource::Smclk => Ctl1::UCSSEL_SMCLK,
            ClockSource::Aclk => Ctl1::UCSSEL_ACLK,
        }
    }
}

#[inline]
fn apply_mode(ctl0: &mut Ctl0, mode: Mode) {
    ctl0.set(Ctl0::UCCKPH, mode.phase == Phase::CaptureOnFirstTransition);
    ctl0.set(Ctl0::UCCKPL, mode.polarity == Polarity::IdleHigh);
}

/// Configuration object for a USCI being set up for SPI mode.
pub struct SpiConfig<USCI: SpiUsci> {
    usci: USCI,
    ctl0: Ctl0,
    ssel: Ctl1,
    prescaler: u16,
    dummy: u8,
}

impl<USCI: SpiUsci> SpiConfig<USCI> {
    /// Begin configuring a USCI for SPI mode, starting from the defaults
    pub fn new(usci: USCI) -> Self {
        SpiConfig {
            usci,
            ctl0: Ctl0::UCCKPH | Ctl0::UCMSB | Ctl0::UCMST | Ctl0::UCSYNC,
            ssel: Ctl1::UCSSEL_SMCLK,
            prescaler: MAX_PRESCALER,
            dummy: 0x00,
        }
    }

    /// Sets clock polarity and phase
    #[inline]
    pub fn mode(mut self, mode: Mode) -> Self {
        apply_mode(&mut self.ctl0, mode);
        self
    }

    /// Sets the bit order
    #[inline]
    pub fn bit_order(mut self, order: BitOrder) -> Self {
        self.ctl0.set(Ctl0::UCMSB, order == BitOrder::MsbFirst);
        self
    }

    /// Sets the clock source
    #[inline]
    pub fn clock_source(mut self, src: ClockSource) -> Self {
        self.ssel = src.into();
        self
    }

    /// Sets the bit clock divider
    #[inline]
    pub fn prescaler(mut self, div: u16) -> Self {
        self.prescaler = div;
        self
    }

    /// Sets the byte clocked out while receiving
    #[inline]
    pub fn dummy_byte(mut self, dummy: u8) -> Self {
        self.dummy = dummy;
        self
    }

    /// Claims the interface's pins without touching the USCI yet
    pub fn bind<C, I, O>(
        self,
        _sclk: Pin<USCI::Port, USCI::Sclk, C>,
        _somi: Pin<USCI::Port, USCI::Somi, I>,
        _simo: Pin<USCI::Port, USCI::Simo, O>,
    ) -> SpiInterface<USCI> {
        SpiInterface { config: self }
    }

    /// Routes the pins to the USCI, configures it and creates the SPI driver
    pub fn init<C, I, O>(
        self,
        sclk: Pin<USCI::Port, USCI::Sclk, C>,
        somi: Pin<USCI::Port, USCI::Somi, I>,
        simo: Pin<USCI::Port, USCI::Simo, O>,
    ) -> Spi<USCI> {
        self.bind(sclk, somi, simo).init()
    }

    #[inline]
    fn configure_hw(&self) {
        critical_section::with(|_| {
            USCI::Port::route(sclk_mask::<USCI>() | somi_mask::<USCI>() | simo_mask::<USCI>());

            self.usci.ctl1_set_rst();
            self.usci.ctl0_wr(self.ctl0);
            self.usci.ctl1_wr(self.ssel | Ctl1::UCSWRST);
            self.usci.br_wr(self.prescaler);
            self.usci.ctl1_clear_rst();
        });
    }
}

/// An SPI interface whose pins are claimed but whose USCI is not configured yet.
pub struct SpiInterface<USCI: SpiUsci> {
    config: SpiConfig<USCI>,
}

impl<USCI: SpiUsci> SpiInterface<USCI> {
    /// Routes the pins to the USCI, configures it and creates the SPI driver
    pub fn init(self) -> Spi<USCI> {
        self.config.configure_hw();
        log_trace!(
            "spi init: ctl0={=u8:#x} prescaler={=u16}",
            self.config.ctl0.bits(),
            self.config.prescaler
        );
        Spi {
            usci: self.config.usci,
            dummy: self.config.dummy,
        }
    }
}

/// A USCI configured as SPI master.
///
/// Busy-waits never time out; a USCI that stops shifting blocks forever.
pub struct Spi<USCI: SpiUsci> {
    usci: USCI,
    dummy: u8,
}

impl<USCI: SpiUsci> Spi<USCI> {
    // Hold the USCI in reset around `f`, with interrupts off
    #[inline]
    fn reconfigure(&mut self, f: impl FnOnce(&USCI)) {
        critical_section::with(|_| {
            self.usci.ctl1_set_rst();
            f(&self.usci);
            self.usci.ctl1_clear_rst();
        });
    }

    /// Current bit clock divider
    #[inline]
    pub fn prescaler(&self) -> u16 {
        self.usci.br_rd()
    }

    /// Sets the bit clock divider
    #[inline]
    pub fn set_prescaler(&mut self, div: u16) {
        self.reconfigure(|usci| usci.br_wr(div));
    }

    /// Resets the bit clock divider to [`MAX_PRESCALER`]
    #[inline]
    pub fn set_max_prescaler(&mut self) {
        self.set_prescaler(MAX_PRESCALER);
    }

    /// Capture data on the second clock edge (UCCKPH clear)
    #[inline]
    pub fn falling_edge(&mut self) {
        self.reconfigure(|usci| usci.ctl0_clear(Ctl0::UCCKPH));
    }

    /// Capture data on the first clock edge (UCCKPH set)
    #[inline]
    pub fn rising_edge(&mut self) {
        self.reconfigure(|usci| usci.ctl0_set(Ctl0::UCCKPH));
    }

    /// Changes clock polarity and phase
    #[inline]
    pub fn change_mode(&mut self, mode: Mode) {
        self.reconfigure(|usci| {
            let mut ctl0 = usci.ctl0_rd();
            apply_mode(&mut ctl0, mode);
            usci.ctl0_wr(ctl0);
        });
    }

    /// Changes the bit order
    #[inline]
    pub fn set_bit_order(&mut self, order: BitOrder) {
        self.reconfigure(|usci| match order {
            BitOrder::MsbFirst => usci.ctl0_set(Ctl0::UCMSB),
            BitOrder::LsbFirst => usci.ctl0_clear(Ctl0::UCMSB),
        });
    }

    /// Sets the byte clocked out by [`rx_frame`](Self::rx_frame) and the embedded-hal reads
    #[inline]
    pub fn set_dummy_byte(&mut self, dummy: u8) {
        self.dummy = dummy;
    }

    /// Takes the clock pin from the USCI and toggles it by hand `times` times, starting and ending
    /// at the idle level selected by UCCKPL. Some SD cards need this to enter SPI mode. The clock
    /// pin is an output and routed back to the USCI afterwards.
    pub fn pulse_clk(&mut self, times: u16) {
        let mask = sclk_mask::<USCI>();
        let out = <USCI::Port as GpioPeriph>::PXOUT;
        let idle_high = self.usci.ctl0_rd().contains(Ctl0::UCCKPL);

        USCI::Port::unroute(mask);
        if idle_high {
            out.on(mask);
        } else {
            out.off(mask);
        }
        <USCI::Port as GpioPeriph>::PXDIR.on(mask);

        for _ in 0..times {
            if idle_high {
                out.off(mask);
                out.on(mask);
            } else {
                out.pulse(mask);
            }
        }
        USCI::Port::route(mask);
    }

    /// Returns the SOMI pin to general-purpose use, releasing the line for other devices
    #[inline]
    pub fn disable_somi(&mut self) {
        USCI::Port::unroute(somi_mask::<USCI>());
    }

    /// Routes the SOMI pin back to the USCI
    #[inline]
    pub fn enable_somi(&mut self) {
        USCI::Port::route(somi_mask::<USCI>());
    }

    /// Sends one byte and returns the byte shifted in meanwhile
    #[inline]
    pub fn tx(&mut self, byte: u8) -> u8 {
        self.usci.txbuf_wr(byte);
        while self.usci.is_busy() {
            spin();
        }
        self.usci.rxbuf_rd()
    }

    /// Sends `buf` starting from its last byte, so a little-endian buffer goes out most
    /// significant byte first. Received bytes are discarded.
    pub fn tx_frame(&mut self, buf: &[u8]) {
        for &byte in buf.iter().rev() {
            while !self.usci.transmit_flag() {
                spin();
            }
            self.usci.txbuf_wr(byte);
        }
        while self.usci.is_busy() {
            spin();
        }
        // Clears the receive flag left by the last byte
        let _ = self.usci.rxbuf_rd();
    }

    /// Fills `buf` in order, clocking out the dummy byte for each byte received
    pub fn rx_frame(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            self.usci.txbuf_wr(self.dummy);
            while !self.usci.receive_flag() {
                spin();
            }
            *byte = self.usci.rxbuf_rd();
        }
    }

    fn recv_byte(&mut self) -> nb::Result<u8, core::convert::Infallible> {
        if self.usci.receive_flag() {
            Ok(self.usci.rxbuf_rd())
        } else {
            Err(WouldBlock)
        }
    }

    fn send_byte(&mut self, word: u8) -> nb::Result<(), core::convert::Infallible> {
        if self.usci.transmit_flag() {
            self.usci.txbuf_wr(word);
            Ok(())
        } else {
            Err(WouldBlock)
        }
    }
}

mod ehal1 {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, SpiBus};
    use nb::block;

    impl<USCI: SpiUsci> ErrorType for Spi<USCI> {
        type Error = Infallible;
    }

    impl<USCI: SpiUsci> SpiBus for Spi<USCI> {
        /// Sends the dummy byte for every word so the slave can respond on SOMI
        fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            let dummy = self.dummy;
            for word in words {
                block!(self.send_byte(dummy))?;
                *word = block!(self.recv_byte())?;
            }
            Ok(())
        }

        /// Writes `words` in order, ignoring the incoming words
        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            for word in words {
                block!(self.send_byte(*word))?;
                let _ = block!(self.recv_byte());
            }
            Ok(())
        }

        /// If `write` is longer than `read`, the surplus incoming words are discarded. If `read`
        /// is longer, the dummy byte is sent until it is full.
        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
            let mut read_bytes = read.iter_mut();
            let mut write_bytes = write.iter();
            let dummy_write = self.dummy;
            let mut dummy_read = 0;

            loop {
                let (rd, wr) = match (read_bytes.next(), write_bytes.next()) {
                    (Some(rd), Some(wr)) => (rd, wr),
                    (Some(rd), None) => (rd, &dummy_write),
                    (None, Some(wr)) => (&mut dummy_read, wr),
                    (None, None) => break,
                };

                block!(self.send_byte(*wr))?;
                *rd = block!(self.recv_byte())?;
            }
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            for word in words {
                block!(self.send_byte(*word))?;
                *word = block!(self.recv_byte())?;
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            while self.usci.is_busy() {
                spin();
            }
            Ok(())
        }
    }
}

mod ehal_nb1 {
    use super::*;
    use embedded_hal_nb::{nb, spi::FullDuplex};

    impl<USCI: SpiUsci> FullDuplex<u8> for Spi<USCI> {
        fn read(&mut self) -> nb::Result<u8, Self::Error> {
            self.recv_byte()
        }

        fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
            self.send_byte(word)
        }
    }
}

#[cfg(feature = "embedded-hal-02")]
mod ehal02 {
    use super::*;
    use embedded_hal_02::spi::FullDuplex;

    impl<USCI: SpiUsci> FullDuplex<u8> for Spi<USCI> {
        type Error = void::Void;

        fn read(&mut self) -> nb::Result<u8, Self::Error> {
            if self.usci.receive_flag() {
                Ok(self.usci.rxbuf_rd())
            } else {
                Err(WouldBlock)
            }
        }

        fn send(&mut self, word: u8) -> nb::Result<(), Self::Error> {
            if self.usci.transmit_flag() {
                self.usci.txbuf_wr(word);
                Ok(())
            } else {
                Err(WouldBlock)
            }
        }
    }

    // Implementing FullDuplex above gets us a blocking write and transfer implementation for free
    impl<USCI: SpiUsci> embedded_hal_02::blocking::spi::write::Default<u8> for Spi<USCI> {}
    impl<USCI: SpiUsci> embedded_hal_02::blocking::spi::transfer::Default<u8> for Spi<USCI> {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::{f5510, g2553};
    use crate::gpio::GpioExt;
    use crate::sim::{self, Access};
    use embedded_hal::spi::{SpiBus, MODE_0, MODE_3};

    // USCI_B1 on the F5510
    const B1_CTL1: u16 = 0x0620;
    const B1_CTL0: u16 = 0x0621;
    const B1_BR0: u16 = 0x0626;
    const B1_BR1: u16 = 0x0627;
    const B1_STAT: u16 = 0x062A;
    const B1_RXBUF: u16 = 0x062C;
    const B1_TXBUF: u16 = 0x062E;
    const B1_IFG: u16 = 0x063D;
    const P4OUT: u16 = 0x0223;
    const P4DIR: u16 = 0x0225;
    const P4SEL: u16 = 0x022B;

    fn f5510_b1(
        config: impl FnOnce(SpiConfig<f5510::UsciB1>) -> SpiConfig<f5510::UsciB1>,
    ) -> Spi<f5510::UsciB1> {
        sim::reset();
        let p = unsafe { f5510::Peripherals::steal() };
        let p4 = p.P4.split();
        sim::clear_log();
        config(SpiConfig::new(p.USCI_B1)).init(p4.pin3, p4.pin2, p4.pin1)
    }

    fn f5510_b1_default() -> Spi<f5510::UsciB1> {
        f5510_b1(|config| config)
    }

    #[test]
    fn init_sequence() {
        let spi = f5510_b1_default();
        assert_eq!(sim::peek(P4SEL), 0x0E);
        assert_eq!(sim::peek(B1_CTL0), 0xA9);
        assert_eq!(sim::peek(B1_CTL1), 0x80);
        assert_eq!(spi.prescaler(), 2);
        // reset held while CTL0, CTL1 and the divider are written
        assert_eq!(sim::writes_to(B1_CTL1), [0x01, 0x81, 0x80]);
        let log = sim::log();
        let released = log.iter().rposition(|a| *a == Access::Write(B1_CTL1, 0x80)).unwrap();
        let ctl0 = log.iter().position(|a| *a == Access::Write(B1_CTL0, 0xA9)).unwrap();
        let br = log.iter().position(|a| *a == Access::Write(B1_BR0, 0x02)).unwrap();
        assert!(ctl0 < released && br < released);
    }

    #[test]
    fn init_with_custom_configuration() {
        let _spi = f5510_b1(|config| {
            config
                .mode(MODE_3)
                .bit_order(BitOrder::LsbFirst)
                .clock_source(ClockSource::Aclk)
                .prescaler(0x0104)
        });
        // UCCKPL | UCMST | UCSYNC
        assert_eq!(sim::peek(B1_CTL0), 0x49);
        assert_eq!(sim::peek(B1_CTL1), 0x40);
        assert_eq!(sim::peek(B1_BR0), 0x04);
        assert_eq!(sim::peek(B1_BR1), 0x01);
    }

    #[test]
    fn g2553_init_sets_both_selects() {
        sim::reset();
        let p = unsafe { g2553::Peripherals::steal() };
        let p1 = p.P1.split();
        let mut spi = SpiConfig::new(p.USCI_A0).init(p1.pin4, p1.pin1, p1.pin2);
        assert_eq!(sim::peek(0x0026), 0x16); // P1SEL
        assert_eq!(sim::peek(0x0041), 0x16); // P1SEL2
        assert_eq!(sim::peek(0x0060), 0xA9); // UCA0CTL0
        assert_eq!(sim::peek(0x0061), 0x80); // UCA0CTL1
        assert_eq!(sim::peek(0x0062), 0x02); // UCA0BR0

        spi.set_bit_order(BitOrder::LsbFirst);
        assert_eq!(sim::peek(0x0060), 0x89);
        assert_eq!(sim::peek(0x0061), 0x80);
    }

    #[test]
    fn g2553_shared_interrupt_flags() {
        sim::reset();
        let p = unsafe { g2553::Peripherals::steal() };
        let p1 = p.P1.split();
        sim::attach_usci(&<g2553::UsciB0 as UsciSpiPeriph>::REGS, |b| b ^ 0xFF, 1);
        let mut spi = SpiConfig::new(p.USCI_B0).init(p1.pin5, p1.pin6, p1.pin7);
        assert_eq!(sim::peek(0x0026), 0xE0);
        assert_eq!(spi.tx(0x0F), 0xF0);
        assert_eq!(sim::peek(0x006F), 0x0F); // UCB0TXBUF
        // UCA0 flags in IFG2 are left alone
        assert_eq!(sim::peek(0x0003) & 0x03, 0x00);
    }

    #[test]
    fn max_prescaler_is_reset_bracketed() {
        let mut spi = f5510_b1_default();
        spi.set_prescaler(0x0310);
        assert_eq!(spi.prescaler(), 0x0310);
        sim::clear_log();
        spi.set_max_prescaler();
        assert_eq!(sim::peek(B1_BR0), 2);
        assert_eq!(sim::peek(B1_BR1), 0);
        assert_eq!(sim::writes_to(B1_CTL1), [0x81, 0x80]);
        assert_eq!(
            sim::log().iter().filter(|a| matches!(a, Access::Write(..))).last(),
            Some(&Access::Write(B1_CTL1, 0x80))
        );
    }

    #[test]
    fn clock_edges() {
        let mut spi = f5510_b1_default();
        spi.falling_edge();
        assert_eq!(sim::peek(B1_CTL0), 0x29);
        spi.rising_edge();
        assert_eq!(sim::peek(B1_CTL0), 0xA9);
        spi.change_mode(MODE_3);
        assert_eq!(sim::peek(B1_CTL0), 0x69);
        spi.change_mode(MODE_0);
        assert_eq!(sim::peek(B1_CTL0), 0xA9);
        assert_eq!(sim::peek(B1_CTL1) & 0x01, 0);
    }

    #[test]
    fn tx_waits_for_shift_register() {
        let mut spi = f5510_b1_default();
        sim::attach_usci(&<f5510::UsciB1 as UsciSpiPeriph>::REGS, |b| b.rotate_left(4), 3);
        sim::clear_log();
        assert_eq!(spi.tx(0x5A), 0xA5);
        assert_eq!(sim::writes_to(B1_TXBUF), [0x5A]);
        assert_eq!(sim::reads_of(B1_STAT), 4);
        let log = sim::log();
        assert_eq!(log[0], Access::Write(B1_TXBUF, 0x5A));
        assert_eq!(log.last(), Some(&Access::Read(B1_RXBUF)));
    }

    #[test]
    fn tx_frame_sends_last_byte_first() {
        let mut spi = f5510_b1_default();
        sim::attach_usci(&<f5510::UsciB1 as UsciSpiPeriph>::REGS, |b| b, 2);
        sim::clear_log();
        spi.tx_frame(&[1, 2, 3]);
        assert_eq!(sim::writes_to(B1_TXBUF), [3, 2, 1]);
        assert_eq!(sim::reads_of(B1_RXBUF), 1);
        assert_eq!(sim::log().last(), Some(&Access::Read(B1_RXBUF)));
    }

    #[test]
    fn tx_frame_waits_for_transmit_buffer() {
        let mut spi = f5510_b1_default();
        sim::attach_usci_with_tx_delay(&<f5510::UsciB1 as UsciSpiPeriph>::REGS, |b| b, 1, 2);
        sim::clear_log();
        spi.tx_frame(&[1, 2, 3]);
        assert_eq!(sim::writes_to(B1_TXBUF), [3, 2, 1]);

        // Flag polls before each TXBUF write: the first finds it set, later ones spin twice
        let mut polls = Vec::new();
        let mut count = 0;
        for access in sim::log() {
            match access {
                Access::Read(B1_IFG) => count += 1,
                Access::Write(B1_TXBUF, _) => {
                    polls.push(count);
                    count = 0;
                }
                _ => {}
            }
        }
        assert_eq!(polls, [1, 3, 3]);
        assert!(sim::writes_to(B1_IFG).is_empty());
    }

    #[test]
    fn rx_frame_fills_in_order() {
        let mut spi = f5510_b1_default();
        let mut script = [0x11, 0x22, 0x33].into_iter();
        sim::attach_usci(
            &<f5510::UsciB1 as UsciSpiPeriph>::REGS,
            move |_| script.next().unwrap_or(0),
            0,
        );
        let mut buf = [0; 3];
        spi.rx_frame(&mut buf);
        assert_eq!(buf, [0x11, 0x22, 0x33]);
        assert_eq!(sim::writes_to(B1_TXBUF), [0x00, 0x00, 0x00]);

        spi.set_dummy_byte(0xFF);
        spi.rx_frame(&mut buf[..1]);
        assert_eq!(sim::writes_to(B1_TXBUF), [0x00, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn pulse_clk_idle_low() {
        let mut spi = f5510_b1_default();
        sim::clear_log();
        spi.pulse_clk(2);
        assert_eq!(sim::writes_to(P4OUT), [0x00, 0x08, 0x00, 0x08, 0x00]);
        assert_eq!(sim::writes_to(P4SEL), [0x06, 0x0E]);
        assert_eq!(sim::peek(P4DIR) & 0x08, 0x08);
    }

    #[test]
    fn pulse_clk_idle_high() {
        let mut spi = f5510_b1(|config| config.mode(MODE_3));
        sim::clear_log();
        spi.pulse_clk(2);
        assert_eq!(sim::writes_to(P4OUT), [0x08, 0x00, 0x08, 0x00, 0x08]);
        assert_eq!(sim::peek(P4SEL), 0x0E);
    }

    #[test]
    fn somi_routing() {
        let mut spi = f5510_b1_default();
        spi.disable_somi();
        assert_eq!(sim::peek(P4SEL), 0x0A);
        spi.enable_somi();
        assert_eq!(sim::peek(P4SEL), 0x0E);
    }

    #[test]
    fn spi_bus_writes_in_order() {
        let mut spi = f5510_b1(|config| config.dummy_byte(0xFF));
        sim::attach_usci(&<f5510::UsciB1 as UsciSpiPeriph>::REGS, |b| b.wrapping_add(1), 0);
        SpiBus::write(&mut spi, &[1, 2, 3]).unwrap();
        assert_eq!(sim::writes_to(B1_TXBUF), [1, 2, 3]);

        let mut read = [0; 4];
        SpiBus::transfer(&mut spi, &mut read, &[0x10, 0x20]).unwrap();
        assert_eq!(read, [0x11, 0x21, 0x00, 0x00]);
        assert_eq!(sim::writes_to(B1_TXBUF)[3..], [0x10, 0x20, 0xFF, 0xFF]);

        let mut words = [5, 6];
        SpiBus::transfer_in_place(&mut spi, &mut words).unwrap();
        assert_eq!(words, [6, 7]);
        SpiBus::flush(&mut spi).unwrap();
    }

    #[test]
    fn full_duplex_would_block() {
        use embedded_hal_nb::spi::FullDuplex;

        let mut spi = f5510_b1_default();
        // no USCI model attached, so neither flag is ever raised
        assert!(matches!(FullDuplex::read(&mut spi), Err(WouldBlock)));
        assert!(matches!(FullDuplex::write(&mut spi, 1), Err(WouldBlock)));
        sim::poke(B1_IFG, 0x03);
        assert!(FullDuplex::write(&mut spi, 1).is_ok());
        sim::poke(B1_RXBUF, 0x42);
        assert_eq!(FullDuplex::read(&mut spi).ok(), Some(0x42));
    }

    #[test]
    fn full_duplex_write_blocks_while_transmitting() {
        use embedded_hal_nb::spi::FullDuplex;

        let mut spi = f5510_b1_default();
        sim::attach_usci_with_tx_delay(&<f5510::UsciB1 as UsciSpiPeriph>::REGS, |b| b, 0, 2);
        assert!(FullDuplex::write(&mut spi, 0xA5).is_ok());
        assert!(matches!(FullDuplex::write(&mut spi, 0x5A), Err(WouldBlock)));
        assert!(matches!(FullDuplex::write(&mut spi, 0x5A), Err(WouldBlock)));
        assert!(FullDuplex::write(&mut spi, 0x5A).is_ok());
        assert_eq!(sim::writes_to(B1_TXBUF), [0xA5, 0x5A]);
    }
}
