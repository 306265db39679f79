//! GPIO pins, typed by port, pin number and mode.
//!
//! Pins are obtained by splitting a port token from a device's `Peripherals` with
//! [`GpioExt::split`]. Every pin starts as a floating input. Mode changes consume the pin and
//! return it with its new mode, so a pin can only be used in the way its registers are configured.
//!
//! Register classes a port lacks are not reachable: drive strength needs a [`DsPortNum`] port,
//! interrupts an [`IntrPortNum`] port, and peripheral select a [`SelPortNum`] (or, for the
//! G2553's secondary functions, a [`Sel2PortNum`]) port. Using them on any other port is a
//! compile error.
//!
//! Individual register operations are not atomic with respect to interrupts. Wrap sequences in
//! a critical section if an interrupt handler touches the same port.

use crate::hw_traits::gpio::{Device, DsPeriph, GpioPeriph, IntrPeriph, Sel2Periph, SelPeriph};
use crate::hw_traits::Reg8;
use crate::pin_id::PinId;
use core::convert::Infallible;
use core::marker::PhantomData;

/// Trait implemented on GPIO ports
pub trait PortNum: GpioPeriph {}
impl<P: GpioPeriph> PortNum for P {}

/// Ports with a peripheral select register (PxSEL)
pub trait SelPortNum: PortNum + SelPeriph {}
impl<P: SelPeriph> SelPortNum for P {}

/// Ports with a second peripheral select register (PxSEL2)
pub trait Sel2PortNum: SelPortNum + Sel2Periph {}
impl<P: Sel2Periph> Sel2PortNum for P {}

/// Ports with a drive strength register (PxDS)
pub trait DsPortNum: PortNum + DsPeriph {}
impl<P: DsPeriph> DsPortNum for P {}

/// Ports with interrupt capability
pub trait IntrPortNum: PortNum + IntrPeriph {}
impl<P: IntrPeriph> IntrPortNum for P {}

/// Trait implemented on GPIO pin numbers
pub trait PinNum {
    /// Bit position of the pin inside its port
    const NUM: u8;
}

macro_rules! pin_nums {
    ($($Pin:ident: $num:literal),*) => {
        $(
            #[doc = concat!("Pin number ", $num)]
            pub struct $Pin;
            impl PinNum for $Pin {
                const NUM: u8 = $num;
            }
        )*
    };
}

pin_nums!(Pin0: 0, Pin1: 1, Pin2: 2, Pin3: 3, Pin4: 4, Pin5: 5, Pin6: 6, Pin7: 7);

/// Direction typestate for output
pub struct Output;
/// Direction typestate for input
pub struct Input<PULL>(PhantomData<PULL>);

/// Pullup input typestate
pub struct Pullup;
/// Pulldown input typestate
pub struct Pulldown;
/// Floating input typestate
pub struct Floating;

/// Peripheral function selected through PxSEL
pub struct Alternate1<MODE>(PhantomData<MODE>);
/// Secondary peripheral function selected through PxSEL and PxSEL2
pub struct Alternate2<MODE>(PhantomData<MODE>);

mod sealed {
    use super::*;

    pub trait SealedGpioFunction {}

    impl SealedGpioFunction for Output {}
    impl<PULL> SealedGpioFunction for Input<PULL> {}
}

/// Marker for GPIO (non-alternate) pin modes
pub trait GpioFunction: sealed::SealedGpioFunction {}
impl GpioFunction for Output {}
impl<PULL> GpioFunction for Input<PULL> {}

/// Drive strength of an output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveStrength {
    /// Reduced drive (PxDS bit clear, the reset value)
    Reduced,
    /// Full drive (PxDS bit set)
    Full,
}

/// Edge that sets a pin's interrupt flag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low-to-high transition (PxIES bit clear)
    Rising,
    /// High-to-low transition (PxIES bit set)
    Falling,
}

/// A single GPIO pin.
pub struct Pin<PORT: PortNum, PIN: PinNum, MODE> {
    _port: PhantomData<PORT>,
    _pin: PhantomData<PIN>,
    _mode: PhantomData<MODE>,
}

macro_rules! make_pin {
    () => {
        Pin {
            _port: PhantomData,
            _pin: PhantomData,
            _mode: PhantomData,
        }
    };
}

impl<PORT: PortNum, PIN: PinNum, MODE> Pin<PORT, PIN, MODE> {
    /// Identifier of this pin
    pub const ID: PinId = PinId::from_parts(PORT::INDEX as u8, PIN::NUM);

    const MASK: u8 = 1 << PIN::NUM;

    #[inline(always)]
    pub(crate) fn new() -> Self {
        make_pin!()
    }

    /// Identifier of this pin
    #[inline(always)]
    pub fn id(&self) -> PinId {
        Self::ID
    }
}

impl<PORT: PortNum, PIN: PinNum, MODE: GpioFunction> Pin<PORT, PIN, MODE> {
    /// Configures pin as output
    #[inline]
    pub fn to_output(self) -> Pin<PORT, PIN, Output> {
        PORT::PXDIR.on(Self::MASK);
        make_pin!()
    }

    /// Configures pin as floating input, disabling its pull resistor
    #[inline]
    pub fn to_input_floating(self) -> Pin<PORT, PIN, Input<Floating>> {
        PORT::PXDIR.off(Self::MASK);
        PORT::PXREN.off(Self::MASK);
        make_pin!()
    }

    /// Configures pin as input with the pull resistor enabled towards Vcc
    #[inline]
    pub fn to_input_pullup(self) -> Pin<PORT, PIN, Input<Pullup>> {
        PORT::PXDIR.off(Self::MASK);
        PORT::PXOUT.on(Self::MASK);
        PORT::PXREN.on(Self::MASK);
        make_pin!()
    }

    /// Configures pin as input with the pull resistor enabled towards ground
    #[inline]
    pub fn to_input_pulldown(self) -> Pin<PORT, PIN, Input<Pulldown>> {
        PORT::PXDIR.off(Self::MASK);
        PORT::PXOUT.off(Self::MASK);
        PORT::PXREN.on(Self::MASK);
        make_pin!()
    }

    /// Hands the pin over to a peripheral through PxSEL
    #[inline]
    pub fn to_alternate1(self) -> Pin<PORT, PIN, Alternate1<MODE>>
    where
        PORT: SelPortNum,
    {
        PORT::PXSEL.on(Self::MASK);
        make_pin!()
    }

    /// Hands the pin over to a secondary peripheral through PxSEL and PxSEL2
    #[inline]
    pub fn to_alternate2(self) -> Pin<PORT, PIN, Alternate2<MODE>>
    where
        PORT: Sel2PortNum,
    {
        PORT::PXSEL.on(Self::MASK);
        PORT::PXSEL2.on(Self::MASK);
        make_pin!()
    }

    /// Erases the port and pin number, resolving registers at run time instead
    #[inline(always)]
    pub fn into_erased(self) -> ErasedPin<PORT::Device, MODE> {
        ErasedPin {
            id: Self::ID,
            _device: PhantomData,
            _mode: PhantomData,
        }
    }
}

impl<PORT: SelPortNum, PIN: PinNum, MODE: GpioFunction> Pin<PORT, PIN, Alternate1<MODE>> {
    /// Returns the pin to GPIO use
    #[inline]
    pub fn to_gpio(self) -> Pin<PORT, PIN, MODE> {
        PORT::PXSEL.off(Self::MASK);
        make_pin!()
    }
}

impl<PORT: Sel2PortNum, PIN: PinNum, MODE: GpioFunction> Pin<PORT, PIN, Alternate2<MODE>> {
    /// Returns the pin to GPIO use
    #[inline]
    pub fn to_gpio(self) -> Pin<PORT, PIN, MODE> {
        PORT::PXSEL2.off(Self::MASK);
        PORT::PXSEL.off(Self::MASK);
        make_pin!()
    }
}

impl<PORT: PortNum, PIN: PinNum> Pin<PORT, PIN, Output> {
    /// Drives the pin high
    #[inline(always)]
    pub fn set_high(&mut self) {
        PORT::PXOUT.on(Self::MASK);
    }

    /// Drives the pin low
    #[inline(always)]
    pub fn set_low(&mut self) {
        PORT::PXOUT.off(Self::MASK);
    }

    /// Inverts the output level
    #[inline(always)]
    pub fn toggle(&mut self) {
        PORT::PXOUT.toggle(Self::MASK);
    }

    /// Drives the pin high, then low
    #[inline(always)]
    pub fn pulse(&mut self) {
        PORT::PXOUT.pulse(Self::MASK);
    }

    /// Whether the output latch is high
    #[inline(always)]
    pub fn is_set_high(&self) -> bool {
        PORT::PXOUT.is_on(Self::MASK)
    }

    /// Whether the output latch is low
    #[inline(always)]
    pub fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }

    /// Sets the output drive strength
    #[inline]
    pub fn set_drive_strength(&mut self, strength: DriveStrength)
    where
        PORT: DsPortNum,
    {
        match strength {
            DriveStrength::Full => PORT::PXDS.on(Self::MASK),
            DriveStrength::Reduced => PORT::PXDS.off(Self::MASK),
        }
    }
}

impl<PORT: PortNum, PIN: PinNum, PULL> Pin<PORT, PIN, Input<PULL>> {
    /// Whether the pin reads high
    #[inline(always)]
    pub fn is_high(&self) -> bool {
        PORT::PXIN.is_on(Self::MASK)
    }

    /// Whether the pin reads low
    #[inline(always)]
    pub fn is_low(&self) -> bool {
        !self.is_high()
    }
}

impl<PORT: IntrPortNum, PIN: PinNum, PULL> Pin<PORT, PIN, Input<PULL>> {
    /// Selects which edge sets the interrupt flag. Changing the edge may itself set the flag.
    #[inline]
    pub fn select_interrupt_edge(&mut self, edge: Edge) {
        match edge {
            Edge::Falling => PORT::PXIES.on(Self::MASK),
            Edge::Rising => PORT::PXIES.off(Self::MASK),
        }
    }

    /// Enables the pin's interrupt
    #[inline]
    pub fn enable_interrupt(&mut self) {
        PORT::PXIE.on(Self::MASK);
    }

    /// Disables the pin's interrupt
    #[inline]
    pub fn disable_interrupt(&mut self) {
        PORT::PXIE.off(Self::MASK);
    }

    /// Clears the pin's interrupt flag
    #[inline]
    pub fn clear_interrupt_flag(&mut self) {
        PORT::PXIFG.off(Self::MASK);
    }

    /// Whether the pin's interrupt flag is set
    #[inline]
    pub fn interrupt_flag(&self) -> bool {
        PORT::PXIFG.is_on(Self::MASK)
    }
}

/// A pin whose port and number are only known at run time.
///
/// Registers are resolved by indexing the device's address tables with the pin's
/// [`PinId`], so only the register classes every port has (in, out, direction, pull) are
/// available.
pub struct ErasedPin<D: Device, MODE> {
    id: PinId,
    _device: PhantomData<D>,
    _mode: PhantomData<MODE>,
}

impl<D: Device, MODE: GpioFunction> ErasedPin<D, MODE> {
    /// Identifier of this pin
    #[inline(always)]
    pub fn id(&self) -> PinId {
        self.id
    }

    #[inline(always)]
    fn reg(&self, table: &'static [u16]) -> Reg8 {
        Reg8::at(table[usize::from(self.id.port_index())])
    }

    #[inline(always)]
    fn into_mode<NEW>(self) -> ErasedPin<D, NEW> {
        ErasedPin {
            id: self.id,
            _device: PhantomData,
            _mode: PhantomData,
        }
    }

    /// Configures pin as output
    #[inline]
    pub fn to_output(self) -> ErasedPin<D, Output> {
        self.reg(D::PXDIR).on(self.id.mask());
        self.into_mode()
    }

    /// Configures pin as floating input, disabling its pull resistor
    #[inline]
    pub fn to_input_floating(self) -> ErasedPin<D, Input<Floating>> {
        self.reg(D::PXDIR).off(self.id.mask());
        self.reg(D::PXREN).off(self.id.mask());
        self.into_mode()
    }

    /// Configures pin as input with the pull resistor enabled towards Vcc
    #[inline]
    pub fn to_input_pullup(self) -> ErasedPin<D, Input<Pullup>> {
        self.reg(D::PXDIR).off(self.id.mask());
        self.reg(D::PXOUT).on(self.id.mask());
        self.reg(D::PXREN).on(self.id.mask());
        self.into_mode()
    }

    /// Configures pin as input with the pull resistor enabled towards ground
    #[inline]
    pub fn to_input_pulldown(self) -> ErasedPin<D, Input<Pulldown>> {
        self.reg(D::PXDIR).off(self.id.mask());
        self.reg(D::PXOUT).off(self.id.mask());
        self.reg(D::PXREN).on(self.id.mask());
        self.into_mode()
    }
}

impl<D: Device> ErasedPin<D, Output> {
    /// Drives the pin high
    #[inline]
    pub fn set_high(&mut self) {
        self.reg(D::PXOUT).on(self.id.mask());
    }

    /// Drives the pin low
    #[inline]
    pub fn set_low(&mut self) {
        self.reg(D::PXOUT).off(self.id.mask());
    }

    /// Inverts the output level
    #[inline]
    pub fn toggle(&mut self) {
        self.reg(D::PXOUT).toggle(self.id.mask());
    }

    /// Drives the pin high, then low
    #[inline]
    pub fn pulse(&mut self) {
        self.reg(D::PXOUT).pulse(self.id.mask());
    }

    /// Whether the output latch is high
    #[inline]
    pub fn is_set_high(&self) -> bool {
        self.reg(D::PXOUT).is_on(self.id.mask())
    }
}

impl<D: Device, PULL> ErasedPin<D, Input<PULL>> {
    /// Whether the pin reads high
    #[inline]
    pub fn is_high(&self) -> bool {
        self.reg(D::PXIN).is_on(self.id.mask())
    }
}

/// Splits a GPIO port token into its pins
pub trait GpioExt {
    /// The pins of the port
    type Parts;

    /// Returns every bonded-out pin of the port as a floating input, with interrupts, drive
    /// strength and peripheral select cleared
    fn split(self) -> Self::Parts;
}

// Declares a port token, its capabilities and its `Parts`. Pins absent on some packages carry a
// `#[cfg]`; the device's PIN_MASK table must agree with it.
macro_rules! gpio_port {
    (
        $(#[$attr:meta])*
        $Px:ident, $PxParts:ident: $Device:ty, index $index:literal,
        caps [$($Cap:ident),*],
        pins { $( $(#[$pin_attr:meta])* $pin:ident: $PinN:ident ),* $(,)? }
    ) => {
        $(#[$attr])*
        pub struct $Px {
            _private: (),
        }

        impl $crate::hw_traits::gpio::GpioPeriph for $Px {
            type Device = $Device;
            const INDEX: usize = $index;
        }

        $( impl $crate::hw_traits::gpio::$Cap for $Px {} )*

        #[doc = concat!("Pins of port ", stringify!($Px))]
        pub struct $PxParts {
            $(
                $(#[$pin_attr])*
                #[allow(missing_docs)]
                pub $pin: $crate::gpio::Pin<
                    $Px,
                    $crate::gpio::$PinN,
                    $crate::gpio::Input<$crate::gpio::Floating>,
                >,
            )*
        }

        impl $crate::gpio::GpioExt for $Px {
            type Parts = $PxParts;

            #[inline]
            fn split(self) -> $PxParts {
                let mask = <$Px as $crate::hw_traits::gpio::GpioPeriph>::pin_mask();
                $( <$Px as $crate::hw_traits::gpio::$Cap>::reset_pins(mask); )*
                <$Px as $crate::hw_traits::gpio::GpioPeriph>::reset_pins(mask);
                $PxParts {
                    $(
                        $(#[$pin_attr])*
                        $pin: $crate::gpio::Pin::new(),
                    )*
                }
            }
        }
    };
}
pub(crate) use gpio_port;

mod ehal1 {
    use super::*;
    use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

    impl<PORT: PortNum, PIN: PinNum, MODE> ErrorType for Pin<PORT, PIN, MODE> {
        type Error = Infallible;
    }

    impl<PORT: PortNum, PIN: PinNum> OutputPin for Pin<PORT, PIN, Output> {
        #[inline(always)]
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Pin::set_low(self);
            Ok(())
        }

        #[inline(always)]
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Pin::set_high(self);
            Ok(())
        }
    }

    impl<PORT: PortNum, PIN: PinNum> StatefulOutputPin for Pin<PORT, PIN, Output> {
        #[inline(always)]
        fn is_set_high(&mut self) -> Result<bool, Self::Error> {
            Ok(Pin::is_set_high(self))
        }

        #[inline(always)]
        fn is_set_low(&mut self) -> Result<bool, Self::Error> {
            Ok(Pin::is_set_low(self))
        }

        #[inline(always)]
        fn toggle(&mut self) -> Result<(), Self::Error> {
            Pin::toggle(self);
            Ok(())
        }
    }

    impl<PORT: PortNum, PIN: PinNum, PULL> InputPin for Pin<PORT, PIN, Input<PULL>> {
        #[inline(always)]
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(Pin::is_high(self))
        }

        #[inline(always)]
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(Pin::is_low(self))
        }
    }

    impl<D: Device, MODE> ErrorType for ErasedPin<D, MODE> {
        type Error = Infallible;
    }

    impl<D: Device> OutputPin for ErasedPin<D, Output> {
        #[inline]
        fn set_low(&mut self) -> Result<(), Self::Error> {
            ErasedPin::set_low(self);
            Ok(())
        }

        #[inline]
        fn set_high(&mut self) -> Result<(), Self::Error> {
            ErasedPin::set_high(self);
            Ok(())
        }
    }

    impl<D: Device, PULL> InputPin for ErasedPin<D, Input<PULL>> {
        #[inline]
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(ErasedPin::is_high(self))
        }

        #[inline]
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!ErasedPin::is_high(self))
        }
    }
}

#[cfg(feature = "embedded-hal-02")]
mod ehal02 {
    use super::*;
    use embedded_hal_02::digital::v2::{
        InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin,
    };

    impl<PORT: PortNum, PIN: PinNum> OutputPin for Pin<PORT, PIN, Output> {
        type Error = void::Void;

        #[inline(always)]
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Pin::set_low(self);
            Ok(())
        }

        #[inline(always)]
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Pin::set_high(self);
            Ok(())
        }
    }

    impl<PORT: PortNum, PIN: PinNum> StatefulOutputPin for Pin<PORT, PIN, Output> {
        #[inline(always)]
        fn is_set_high(&self) -> Result<bool, Self::Error> {
            Ok(Pin::is_set_high(self))
        }

        #[inline(always)]
        fn is_set_low(&self) -> Result<bool, Self::Error> {
            Ok(Pin::is_set_low(self))
        }
    }

    impl<PORT: PortNum, PIN: PinNum> ToggleableOutputPin for Pin<PORT, PIN, Output> {
        type Error = void::Void;

        #[inline(always)]
        fn toggle(&mut self) -> Result<(), Self::Error> {
            Pin::toggle(self);
            Ok(())
        }
    }

    impl<PORT: PortNum, PIN: PinNum, PULL> InputPin for Pin<PORT, PIN, Input<PULL>> {
        type Error = void::Void;

        #[inline(always)]
        fn is_high(&self) -> Result<bool, Self::Error> {
            Ok(Pin::is_high(self))
        }

        #[inline(always)]
        fn is_low(&self) -> Result<bool, Self::Error> {
            Ok(Pin::is_low(self))
        }
    }
}
