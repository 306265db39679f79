//! Prelude

pub use crate::gpio::DsPortNum as _msp430_pfw_DsPortNum;
pub use crate::gpio::GpioExt as _msp430_pfw_GpioExt;
pub use crate::gpio::GpioFunction as _msp430_pfw_GpioFunction;
pub use crate::gpio::IntrPortNum as _msp430_pfw_IntrPortNum;
pub use crate::gpio::PinNum as _msp430_pfw_PinNum;
pub use crate::gpio::PortNum as _msp430_pfw_PortNum;
pub use crate::gpio::Sel2PortNum as _msp430_pfw_Sel2PortNum;
pub use crate::gpio::SelPortNum as _msp430_pfw_SelPortNum;
pub use crate::spi::SpiUsci as _msp430_pfw_SpiUsci;
