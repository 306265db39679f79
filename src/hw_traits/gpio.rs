use super::Reg8;

/// Per-device register address tables. Each table is indexed by port index (port number - 1); a
/// table only covers the ports that have that register class.
pub trait Device: 'static {
    const PXIN: &'static [u16];
    const PXOUT: &'static [u16];
    const PXDIR: &'static [u16];
    const PXREN: &'static [u16];
    const PXDS: &'static [u16];
    const PXSEL: &'static [u16];
    const PXSEL2: &'static [u16];
    const PXIES: &'static [u16];
    const PXIE: &'static [u16];
    const PXIFG: &'static [u16];

    // Bonded-out pins of each port on the selected package
    const PIN_MASK: &'static [u8];
}

// Port capabilities. Register handles resolve at compile time, so implementing a capability for a
// port the table doesn't cover fails const evaluation instead of addressing the wrong register.

pub trait GpioPeriph: Sized + 'static {
    type Device: Device;
    const INDEX: usize;

    const PXIN: Reg8 = Reg8::at(<Self::Device as Device>::PXIN[Self::INDEX]);
    const PXOUT: Reg8 = Reg8::at(<Self::Device as Device>::PXOUT[Self::INDEX]);
    const PXDIR: Reg8 = Reg8::at(<Self::Device as Device>::PXDIR[Self::INDEX]);
    const PXREN: Reg8 = Reg8::at(<Self::Device as Device>::PXREN[Self::INDEX]);

    #[inline(always)]
    fn pin_mask() -> u8 {
        <Self::Device as Device>::PIN_MASK[Self::INDEX]
    }

    #[inline(always)]
    fn reset_pins(mask: u8) {
        Self::PXDIR.off(mask);
        Self::PXREN.off(mask);
    }
}

pub trait SelPeriph: GpioPeriph {
    const PXSEL: Reg8 = Reg8::at(<Self::Device as Device>::PXSEL[Self::INDEX]);

    #[inline(always)]
    fn reset_pins(mask: u8) {
        Self::PXSEL.off(mask);
    }
}

pub trait Sel2Periph: SelPeriph {
    const PXSEL2: Reg8 = Reg8::at(<Self::Device as Device>::PXSEL2[Self::INDEX]);

    #[inline(always)]
    fn reset_pins(mask: u8) {
        Self::PXSEL2.off(mask);
    }
}

pub trait DsPeriph: GpioPeriph {
    const PXDS: Reg8 = Reg8::at(<Self::Device as Device>::PXDS[Self::INDEX]);

    #[inline(always)]
    fn reset_pins(mask: u8) {
        Self::PXDS.off(mask);
    }
}

pub trait IntrPeriph: GpioPeriph {
    const PXIES: Reg8 = Reg8::at(<Self::Device as Device>::PXIES[Self::INDEX]);
    const PXIE: Reg8 = Reg8::at(<Self::Device as Device>::PXIE[Self::INDEX]);
    const PXIFG: Reg8 = Reg8::at(<Self::Device as Device>::PXIFG[Self::INDEX]);

    // Interrupts off first, so nothing fires while the rest of the port is rewritten
    #[inline(always)]
    fn reset_pins(mask: u8) {
        Self::PXIE.off(mask);
        Self::PXIFG.off(mask);
    }
}

/// Selects the peripheral function a USCI needs on this port's pins.
pub trait UsciSelect: GpioPeriph {
    fn route(mask: u8);
    fn unroute(mask: u8);
}
