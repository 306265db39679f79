//! Simulated register bus for host tests.
//!
//! Replaces volatile memory access under `cfg(test)`. Each test thread gets its own register
//! bank, so tests stay independent when run in parallel. A USCI can be attached to model the
//! transmit/receive handshake the SPI driver polls on.

use crate::hw_traits::usci::{UsciRegs, UCBUSY};
use std::cell::RefCell;

const MEM_SIZE: usize = 0x0800;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read(u16),
    Write(u16, u8),
}

struct Usci {
    stat: u16,
    rxbuf: u16,
    txbuf: u16,
    ifg: u16,
    rxifg: u8,
    txifg: u8,
    busy_polls: u8,
    busy_left: u8,
    tx_polls: u8,
    tx_left: u8,
    responder: Box<dyn FnMut(u8) -> u8>,
}

struct Bank {
    mem: [u8; MEM_SIZE],
    log: Vec<Access>,
    uscis: Vec<Usci>,
}

impl Bank {
    const fn new() -> Self {
        Bank {
            mem: [0; MEM_SIZE],
            log: Vec::new(),
            uscis: Vec::new(),
        }
    }
}

std::thread_local! {
    static BANK: RefCell<Bank> = const { RefCell::new(Bank::new()) };
}

pub fn read(addr: u16) -> u8 {
    BANK.with(|bank| {
        let mut guard = bank.borrow_mut();
        let bank = &mut *guard;
        bank.log.push(Access::Read(addr));
        let mut val = bank.mem[usize::from(addr)];
        for usci in bank.uscis.iter_mut() {
            if addr == usci.stat {
                if usci.busy_left > 0 {
                    usci.busy_left -= 1;
                    val |= UCBUSY;
                } else {
                    val &= !UCBUSY;
                }
            } else if addr == usci.rxbuf {
                bank.mem[usize::from(usci.ifg)] &= !usci.rxifg;
            }
            // TXIFG comes back after the value read here, so the next poll sees it
            if addr == usci.ifg && usci.tx_left > 0 {
                usci.tx_left -= 1;
                if usci.tx_left == 0 {
                    bank.mem[usize::from(usci.ifg)] |= usci.txifg;
                }
            }
        }
        val
    })
}

pub fn write(addr: u16, val: u8) {
    BANK.with(|bank| {
        let mut guard = bank.borrow_mut();
        let bank = &mut *guard;
        bank.log.push(Access::Write(addr, val));
        bank.mem[usize::from(addr)] = val;
        for usci in bank.uscis.iter_mut() {
            if addr == usci.txbuf {
                bank.mem[usize::from(usci.rxbuf)] = (usci.responder)(val);
                bank.mem[usize::from(usci.ifg)] |= usci.rxifg;
                usci.busy_left = usci.busy_polls;
                if usci.tx_polls == 0 {
                    bank.mem[usize::from(usci.ifg)] |= usci.txifg;
                } else {
                    bank.mem[usize::from(usci.ifg)] &= !usci.txifg;
                    usci.tx_left = usci.tx_polls;
                }
            }
        }
    })
}

/// Zeroes every register, forgets attached USCIs and clears the access log
pub fn reset() {
    BANK.with(|bank| *bank.borrow_mut() = Bank::new());
}

/// Reads a register without logging the access or triggering USCI behaviour
pub fn peek(addr: u16) -> u8 {
    BANK.with(|bank| bank.borrow().mem[usize::from(addr)])
}

/// Sets a register without logging the access, as the hardware would
pub fn poke(addr: u16, val: u8) {
    BANK.with(|bank| bank.borrow_mut().mem[usize::from(addr)] = val);
}

/// Every value written to `addr`, oldest first
pub fn writes_to(addr: u16) -> Vec<u8> {
    BANK.with(|bank| {
        bank.borrow()
            .log
            .iter()
            .filter_map(|access| match *access {
                Access::Write(a, val) if a == addr => Some(val),
                _ => None,
            })
            .collect()
    })
}

/// Number of reads of `addr`
pub fn reads_of(addr: u16) -> usize {
    BANK.with(|bank| {
        bank.borrow()
            .log
            .iter()
            .filter(|access| **access == Access::Read(addr))
            .count()
    })
}

/// Total number of register writes since the last reset
pub fn write_count() -> usize {
    BANK.with(|bank| {
        bank.borrow()
            .log
            .iter()
            .filter(|access| matches!(access, Access::Write(..)))
            .count()
    })
}

/// Every access since the last reset
pub fn log() -> Vec<Access> {
    BANK.with(|bank| bank.borrow().log.clone())
}

/// Forgets the access log, keeping register contents
pub fn clear_log() {
    BANK.with(|bank| bank.borrow_mut().log.clear());
}

/// Models a USCI whose transmit buffer is always ready. Each byte written to TXBUF is passed to
/// `responder`, whose answer lands in RXBUF with the receive flag raised; UCBUSY then reads set
/// for `busy_polls` reads of STAT.
pub fn attach_usci(regs: &UsciRegs, responder: impl FnMut(u8) -> u8 + 'static, busy_polls: u8) {
    attach_usci_with_tx_delay(regs, responder, busy_polls, 0);
}

/// Like [`attach_usci`], but a TXBUF write also clears TXIFG, which stays clear for the next
/// `tx_polls` reads of the interrupt flag register.
pub fn attach_usci_with_tx_delay(
    regs: &UsciRegs,
    responder: impl FnMut(u8) -> u8 + 'static,
    busy_polls: u8,
    tx_polls: u8,
) {
    BANK.with(|bank| {
        let mut guard = bank.borrow_mut();
        let bank = &mut *guard;
        bank.mem[usize::from(regs.ifg.addr())] |= regs.txifg;
        bank.uscis.push(Usci {
            stat: regs.stat.addr(),
            rxbuf: regs.rxbuf.addr(),
            txbuf: regs.txbuf.addr(),
            ifg: regs.ifg.addr(),
            rxifg: regs.rxifg,
            txifg: regs.txifg,
            busy_polls,
            busy_left: 0,
            tx_polls,
            tx_left: 0,
            responder: Box::new(responder),
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw_traits::Reg8;

    fn regs() -> UsciRegs {
        UsciRegs {
            ctl0: Reg8::at(0x0068),
            ctl1: Reg8::at(0x0069),
            br0: Reg8::at(0x006A),
            br1: Reg8::at(0x006B),
            stat: Reg8::at(0x006D),
            rxbuf: Reg8::at(0x006E),
            txbuf: Reg8::at(0x006F),
            ifg: Reg8::at(0x0003),
            rxifg: 1 << 2,
            txifg: 1 << 3,
        }
    }

    #[test]
    fn usci_handshake() {
        reset();
        attach_usci(&regs(), |b| !b, 2);
        assert_eq!(peek(0x0003), 0x08);
        write(0x006F, 0x0F);
        assert_eq!(peek(0x0003), 0x0C);
        assert_eq!(read(0x006D) & UCBUSY, UCBUSY);
        assert_eq!(read(0x006D) & UCBUSY, UCBUSY);
        assert_eq!(read(0x006D) & UCBUSY, 0);
        assert_eq!(read(0x006E), 0xF0);
        assert_eq!(peek(0x0003), 0x08);
    }

    #[test]
    fn transmit_flag_returns_after_polls() {
        reset();
        attach_usci_with_tx_delay(&regs(), |b| b, 0, 2);
        assert_eq!(read(0x0003) & 0x08, 0x08);
        write(0x006F, 0x55);
        assert_eq!(peek(0x0003), 0x04);
        assert_eq!(read(0x0003) & 0x08, 0);
        assert_eq!(read(0x0003) & 0x08, 0);
        assert_eq!(read(0x0003) & 0x08, 0x08);
        assert_eq!(read(0x0003) & 0x08, 0x08);
        assert_eq!(read(0x006E), 0x55);
        assert_eq!(peek(0x0003), 0x08);
    }

    #[test]
    fn log_tracks_accesses() {
        reset();
        write(0x0021, 1);
        let _ = read(0x0021);
        write(0x0021, 2);
        assert_eq!(writes_to(0x0021), [1, 2]);
        assert_eq!(reads_of(0x0021), 1);
        assert_eq!(write_count(), 2);
        assert_eq!(log()[1], Access::Read(0x0021));
        clear_log();
        assert_eq!(write_count(), 0);
        assert_eq!(peek(0x0021), 2);
    }
}
