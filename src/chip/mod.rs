//! Supported devices.
//!
//! Each module carries the device's register address tables, its port and USCI tokens, and a
//! `Peripherals` singleton handing those tokens out. Pins missing from the smaller packages are
//! enabled with the `f5510-64pin` and `g2553-28pin` features.

pub mod f5510;
pub mod g2553;
