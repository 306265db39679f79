use crate::util::BitsExt;

pub mod gpio;
pub mod usci;

#[cfg(not(test))]
mod bus {
    #[inline(always)]
    pub fn read(addr: u16) -> u8 {
        // Safety: every `Reg8` is built from a device address table
        unsafe { core::ptr::read_volatile(addr as usize as *const u8) }
    }

    #[inline(always)]
    pub fn write(addr: u16, val: u8) {
        // Safety: every `Reg8` is built from a device address table
        unsafe { core::ptr::write_volatile(addr as usize as *mut u8, val) }
    }
}

#[cfg(test)]
use crate::sim as bus;

/// Handle to one byte-wide memory-mapped register.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Reg8(u16);

impl Reg8 {
    #[inline(always)]
    pub const fn at(addr: u16) -> Self {
        Reg8(addr)
    }

    #[inline(always)]
    pub const fn addr(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub fn read(self) -> u8 {
        bus::read(self.0)
    }

    #[inline(always)]
    pub fn write(self, bits: u8) {
        bus::write(self.0, bits)
    }

    #[inline(always)]
    pub fn on(self, mask: u8) {
        self.write(self.read().set_mask(mask))
    }

    #[inline(always)]
    pub fn off(self, mask: u8) {
        self.write(self.read().clear_mask(mask))
    }

    #[inline(always)]
    pub fn toggle(self, mask: u8) {
        self.write(self.read().flip_mask(mask))
    }

    /// On, then off
    #[inline(always)]
    pub fn pulse(self, mask: u8) {
        self.on(mask);
        self.off(mask);
    }

    #[inline(always)]
    pub fn is_on(self, mask: u8) -> bool {
        self.read() & mask != 0
    }
}
