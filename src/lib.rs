//! Named-pin GPIO and SPI master driver for the MSP430F5510 and MSP430G2553, implementing the
//! [`embedded_hal`] traits.
//! Here are the datasheets ([`F5510`], [`G2553`]) and user's guides ([`F5xx`], [`G2xx`]) for
//! reference.
//!
//! [`embedded_hal`]: https://github.com/rust-embedded/embedded-hal
//! [`F5510`]: https://www.ti.com/lit/ds/symlink/msp430f5510.pdf
//! [`G2553`]: https://www.ti.com/lit/ds/symlink/msp430g2553.pdf
//! [`F5xx`]: https://www.ti.com/lit/ug/slau208q/slau208q.pdf
//! [`G2xx`]: https://www.ti.com/lit/ug/slau144j/slau144j.pdf
//!
//! # Usage
//!
//! Take the device's tokens with `Peripherals::take()` from [`chip::f5510`] or [`chip::g2553`],
//! split the ports into pins with [`GpioExt`](gpio::GpioExt), and configure an SPI interface
//! with [`SpiConfig`](spi::SpiConfig). Code that selects SPI interfaces by number at run time
//! can use the device's `SpiPorts` instead.
//!
//! Pins only bonded out on the larger packages are behind the `f5510-64pin` and `g2553-28pin`
//! features. `defmt` enables logging through [`defmt`](https://docs.rs/defmt), and
//! `embedded-hal-02` adds the embedded-hal 0.2 trait implementations.
//!
//! Multi-register sequences that must not be interrupted run inside
//! [`critical_section::with`], so the application has to provide a critical section
//! implementation, e.g. the `critical-section-single-core` feature of the `msp430` crate.
//!
//! When using this crate as a dependency, make sure you include the appropriate `memory.x` file for
//! your microcontroller.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

pub mod chip;
pub mod gpio;
pub mod pin_id;
pub mod prelude;
pub mod spi;
pub mod spi_ports;

mod hw_traits;
#[cfg(test)]
mod sim;
mod util;
