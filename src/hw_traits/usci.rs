use super::Reg8;
use bitflags::bitflags;

bitflags! {
    /// UCxCTL0 in synchronous mode
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Ctl0: u8 {
        const UCCKPH = 1 << 7;
        const UCCKPL = 1 << 6;
        const UCMSB = 1 << 5;
        const UC7BIT = 1 << 4;
        const UCMST = 1 << 3;
        const UCMODE1 = 1 << 2;
        const UCMODE0 = 1 << 1;
        const UCSYNC = 1 << 0;
    }
}

bitflags! {
    /// UCxCTL1 in synchronous mode
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Ctl1: u8 {
        const UCSSEL1 = 1 << 7;
        const UCSSEL0 = 1 << 6;
        const UCSWRST = 1 << 0;
    }
}

impl Ctl1 {
    pub const UCSSEL_ACLK: Ctl1 = Ctl1::UCSSEL0;
    pub const UCSSEL_SMCLK: Ctl1 = Ctl1::UCSSEL1;
}

// UCxSTAT
pub const UCBUSY: u8 = 1 << 0;

/// Registers of one USCI in SPI mode. On the F5xx the interrupt flags live in a per-USCI UCxIFG;
/// on the G2xx they share IFG2, hence the explicit flag masks.
pub struct UsciRegs {
    pub ctl0: Reg8,
    pub ctl1: Reg8,
    pub br0: Reg8,
    pub br1: Reg8,
    pub stat: Reg8,
    pub rxbuf: Reg8,
    pub txbuf: Reg8,
    pub ifg: Reg8,
    pub rxifg: u8,
    pub txifg: u8,
}

pub trait UsciSpiPeriph: 'static {
    const REGS: UsciRegs;

    #[inline(always)]
    fn ctl1_set_rst(&self) {
        Self::REGS.ctl1.on(Ctl1::UCSWRST.bits());
    }

    #[inline(always)]
    fn ctl1_clear_rst(&self) {
        Self::REGS.ctl1.off(Ctl1::UCSWRST.bits());
    }

    // only call while in reset state
    #[inline(always)]
    fn ctl1_wr(&self, reg: Ctl1) {
        Self::REGS.ctl1.write(reg.bits());
    }

    #[inline(always)]
    fn ctl0_rd(&self) -> Ctl0 {
        Ctl0::from_bits_retain(Self::REGS.ctl0.read())
    }

    // only call while in reset state
    #[inline(always)]
    fn ctl0_wr(&self, reg: Ctl0) {
        Self::REGS.ctl0.write(reg.bits());
    }

    // only call while in reset state
    #[inline(always)]
    fn ctl0_set(&self, bits: Ctl0) {
        Self::REGS.ctl0.on(bits.bits());
    }

    // only call while in reset state
    #[inline(always)]
    fn ctl0_clear(&self, bits: Ctl0) {
        Self::REGS.ctl0.off(bits.bits());
    }

    #[inline(always)]
    fn br_rd(&self) -> u16 {
        u16::from(Self::REGS.br1.read()) << 8 | u16::from(Self::REGS.br0.read())
    }

    // only call while in reset state
    #[inline(always)]
    fn br_wr(&self, ucbr: u16) {
        let [lo, hi] = ucbr.to_le_bytes();
        Self::REGS.br0.write(lo);
        Self::REGS.br1.write(hi);
    }

    #[inline(always)]
    fn is_busy(&self) -> bool {
        Self::REGS.stat.is_on(UCBUSY)
    }

    #[inline(always)]
    fn transmit_flag(&self) -> bool {
        Self::REGS.ifg.is_on(Self::REGS.txifg)
    }

    #[inline(always)]
    fn receive_flag(&self) -> bool {
        Self::REGS.ifg.is_on(Self::REGS.rxifg)
    }

    #[inline(always)]
    fn txbuf_wr(&self, val: u8) {
        Self::REGS.txbuf.write(val);
    }

    #[inline(always)]
    fn rxbuf_rd(&self) -> u8 {
        Self::REGS.rxbuf.read()
    }
}
