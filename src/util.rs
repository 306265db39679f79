// Mask arithmetic for read-modify-write register access
pub(crate) trait BitsExt {
    fn set_mask(self, mask: Self) -> Self;
    fn clear_mask(self, mask: Self) -> Self;
    fn flip_mask(self, mask: Self) -> Self;
}

impl BitsExt for u8 {
    #[inline(always)]
    fn set_mask(self, mask: Self) -> Self {
        self | mask
    }

    #[inline(always)]
    fn clear_mask(self, mask: Self) -> Self {
        self & !mask
    }

    #[inline(always)]
    fn flip_mask(self, mask: Self) -> Self {
        self ^ mask
    }
}

// Body of every busy-wait loop in the crate
#[inline(always)]
pub(crate) fn spin() {
    #[cfg(target_arch = "msp430")]
    msp430::asm::nop();
    #[cfg(not(target_arch = "msp430"))]
    core::hint::spin_loop();
}

// Event logging, compiled out unless the `defmt` feature is on
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
    }};
}
pub(crate) use log_trace;

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
    }};
}
pub(crate) use log_warn;
