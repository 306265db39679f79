//! Numeric pin identifiers.
//!
//! A [`PinId`] packs a port and a bit into one byte: port number `n` (P1 is 1) owns the
//! identifiers `n * PORT_SIZE ..= n * PORT_SIZE + 7`, so `id / PORT_SIZE - 1` is the port index
//! used by the register address tables and `id % PORT_SIZE` is the bit inside the port's
//! registers. Which identifiers exist depends on the device and package, see
//! [`f5510::pin_id`](crate::chip::f5510::pin_id) and [`g2553::pin_id`](crate::chip::g2553::pin_id).

use crate::hw_traits::gpio::Device;

/// Bits per port
pub const PORT_SIZE: u8 = 8;

/// Identifier of one physical pin
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(u8);

impl PinId {
    #[inline(always)]
    pub(crate) const fn from_parts(port_index: u8, bit: u8) -> Self {
        PinId((port_index + 1) * PORT_SIZE + bit)
    }

    /// Zero-based index of the port, as used by the register address tables
    #[inline(always)]
    pub const fn port_index(self) -> u8 {
        self.0 / PORT_SIZE - 1
    }

    /// Bit position inside the port's registers
    #[inline(always)]
    pub const fn bit(self) -> u8 {
        self.0 % PORT_SIZE
    }

    /// Single-bit mask of this pin inside the port's registers
    #[inline(always)]
    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }

    /// Split into `(port index, bit)`
    #[inline(always)]
    pub const fn decode(self) -> (u8, u8) {
        (self.port_index(), self.bit())
    }

    /// The raw identifier
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

pub(crate) fn lookup<D: Device>(port_index: u8, bit: u8) -> Option<PinId> {
    if bit >= PORT_SIZE {
        return None;
    }
    let mask = *D::PIN_MASK.get(usize::from(port_index))?;
    if mask & (1 << bit) == 0 {
        return None;
    }
    Some(PinId::from_parts(port_index, bit))
}

pub(crate) fn from_raw<D: Device>(raw: u8) -> Option<PinId> {
    let port_number = raw / PORT_SIZE;
    if port_number == 0 {
        return None;
    }
    lookup::<D>(port_number - 1, raw % PORT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_port_offsets() {
        // P1.0 sits at PORT_SIZE, P4.0 at 4 * PORT_SIZE
        assert_eq!(PinId::from_parts(0, 0).raw(), 8);
        assert_eq!(PinId::from_parts(3, 0).raw(), 32);
        assert_eq!(PinId::from_parts(3, 5).raw(), 37);
        assert_eq!(PinId::from_parts(3, 5).decode(), (3, 5));
        assert_eq!(PinId::from_parts(3, 5).mask(), 0b0010_0000);
    }

    #[test]
    fn every_id_decodes_to_one_pair() {
        for port_index in 0..7u8 {
            for bit in 0..PORT_SIZE {
                let id = PinId::from_parts(port_index, bit);
                assert_eq!(id.decode(), (port_index, bit));
            }
        }
    }
}
