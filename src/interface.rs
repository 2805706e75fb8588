//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and three transports
//! built on embedded-hal v1.0:
//!
//! - [`SpiInterface`]: hardware SPI plus a DC pin
//! - [`BitBangInterface`]: software SPI clocked out over GPIO
//! - [`I2cInterface`]: I2C with a control byte before every transfer
//!
//! Each transport owns a delay provider and routes every transfer through a
//! [`RetryPolicy`]: a failed transfer is retried up to the attempt budget and
//! the last error is returned. The [`TransportErrorKind`] of the most recent
//! failed attempt is kept and reported by [`DisplayInterface::last_error`].
//!
//! ## Hardware Requirements
//!
//! SPI panels need:
//! - SPI bus (MOSI + SCK, CS handled by the [`SpiDevice`])
//! - **DC**: Data/Command select (output, low = command)
//! - **RST**: Reset (output, active low)
//!
//! I2C panels need only the bus and the 7-bit address (usually `0x3C`).
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use monoraster::{command, DisplayInterface, RetryPolicy, SpiInterface};
//! # use core::convert::Infallible;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! // Create interface with SPI, DC and RST pins
//! let mut interface = SpiInterface::new(MockSpi, MockPin, MockPin, MockDelay);
//! interface.set_retry_policy(RetryPolicy::new(5, 20));
//!
//! let _ = interface.send_command(command::DISPLAY_ON);
//! let _ = interface.send_data(&[0xFF, 0x00, 0xFF]);
//! ```

use core::convert::Infallible;
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c::{self, I2c, Operation};
use embedded_hal::spi::{self, SpiDevice};

use crate::command;
use crate::retry::RetryPolicy;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for hardware interface to a page-addressed controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Driver`](crate::display::Driver) to work with any
/// bus that satisfies embedded-hal traits.
///
/// ## Implementing
///
/// For most cases, use one of the provided transports. If you need custom
/// behavior (e.g., a 3-wire SPI panel without DC), implement this trait on
/// your own type.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send a command byte to the controller
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or a GPIO fails after all retries.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send a sequence of command bytes
    ///
    /// The default implementation sends them one at a time.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failing command.
    fn send_commands(&mut self, commands: &[u8]) -> InterfaceResult<(), Self::Error> {
        commands.iter().try_for_each(|c| self.send_command(*c))
    }

    /// Send display data bytes to the controller
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or a GPIO fails after all retries.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Perform hardware reset
    ///
    /// Transports without a reset line do nothing.
    fn reset<D: DelayNs>(&mut self, delay: &mut D);

    /// Replace the transfer retry policy
    ///
    /// Transports that never fail may ignore this.
    fn set_retry_policy(&mut self, _policy: RetryPolicy) {}

    /// Kind of the most recent failed transfer attempt, if any
    ///
    /// Kept even when a later retry succeeded. Transports that do not
    /// classify their errors report `None`.
    fn last_error(&self) -> Option<TransportErrorKind> {
        None
    }
}

/// Bus-independent classification of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// SPI bus failure
    Spi(spi::ErrorKind),
    /// I2C bus failure
    I2c(i2c::ErrorKind),
    /// GPIO failure (DC, CS, clock or data line)
    Pin(digital::ErrorKind),
    /// The transport did not say
    Other,
}

impl TransportErrorKind {
    fn of<BusErr, PinErr: digital::Error>(
        error: &InterfaceError<BusErr, PinErr>,
        bus: impl FnOnce(&BusErr) -> Self,
    ) -> Self {
        match error {
            InterfaceError::Spi(e) | InterfaceError::I2c(e) => bus(e),
            InterfaceError::Pin(e) => Self::Pin(e.kind()),
        }
    }
}

/// Errors that can occur at the interface level
///
/// Generic over bus and GPIO error types. Transports without one of them use
/// [`Infallible`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceError<BusErr, PinErr> {
    /// SPI communication error
    Spi(BusErr),
    /// I2C communication error
    I2c(BusErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<BusErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<BusErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::I2c(e) => write!(f, "I2C error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<BusErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<BusErr, PinErr> {}

fn pulse_reset<RST: OutputPin, D: DelayNs>(rst: &mut RST, delay: &mut D) {
    // Reset sequence: HIGH -> LOW 10ms -> HIGH 10ms
    let _ = rst.set_high();
    delay.delay_ms(1);
    let _ = rst.set_low();
    delay.delay_ms(10);
    let _ = rst.set_high();
    delay.delay_ms(10);
}

/// Hardware SPI transport
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `D` - Delay used between retry attempts
pub struct SpiInterface<SPI, DC, RST, D> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Retry back-off delay
    delay: D,
    retry: RetryPolicy,
    last_error: Option<TransportErrorKind>,
}

impl<SPI, DC, RST, D> SpiInterface<SPI, DC, RST, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create a new SPI transport with the default retry policy
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: D) -> Self {
        Self {
            spi,
            dc,
            rst,
            delay,
            retry: RetryPolicy::default(),
            last_error: None,
        }
    }

    /// Current retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Give back the owned bus, pins and delay
    pub fn release(self) -> (SPI, DC, RST, D) {
        (self.spi, self.dc, self.rst, self.delay)
    }
}

impl<SPI, DC, RST, D, PinErr> DisplayInterface for SpiInterface<SPI, DC, RST, D>
where
    SPI: SpiDevice,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    D: DelayNs,
    PinErr: digital::Error,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.send_commands(&[command])
    }

    fn send_commands(&mut self, commands: &[u8]) -> InterfaceResult<(), Self::Error> {
        let Self {
            spi,
            dc,
            delay,
            retry,
            last_error,
            ..
        } = self;
        retry.run(delay, |_| {
            dc.set_low()
                .map_err(InterfaceError::Pin)
                .and_then(|()| spi.write(commands).map_err(InterfaceError::Spi))
                .and_then(|()| dc.set_high().map_err(InterfaceError::Pin))
                .inspect_err(|e| *last_error = Some(spi_error_kind(e)))
        })
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        let Self {
            spi,
            dc,
            delay,
            retry,
            last_error,
            ..
        } = self;
        retry.run(delay, |_| {
            dc.set_high()
                .map_err(InterfaceError::Pin)
                .and_then(|()| spi.write(data).map_err(InterfaceError::Spi))
                .inspect_err(|e| *last_error = Some(spi_error_kind(e)))
        })
    }

    fn reset<DL: DelayNs>(&mut self, delay: &mut DL) {
        pulse_reset(&mut self.rst, delay);
    }

    fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retry = policy;
    }

    fn last_error(&self) -> Option<TransportErrorKind> {
        self.last_error
    }
}

fn spi_error_kind<BusErr: spi::Error, PinErr: digital::Error>(
    error: &InterfaceError<BusErr, PinErr>,
) -> TransportErrorKind {
    TransportErrorKind::of(error, |e| TransportErrorKind::Spi(e.kind()))
}

/// Default bit-bang half clock period in microseconds
pub const DEFAULT_HALF_PERIOD_US: u32 = 1;

/// Software SPI transport clocked out over GPIO
///
/// Bytes are shifted MSB first, MOSI set up before each rising SCLK edge.
/// Chip select is held low for the whole transfer and released again even
/// when a pin fails part way through.
pub struct BitBangInterface<SCLK, MOSI, DC, CS, RST, D> {
    sclk: SCLK,
    mosi: MOSI,
    dc: DC,
    cs: CS,
    rst: RST,
    delay: D,
    half_period_us: u32,
    retry: RetryPolicy,
    last_error: Option<TransportErrorKind>,
}

impl<SCLK, MOSI, DC, CS, RST, D, PinErr> BitBangInterface<SCLK, MOSI, DC, CS, RST, D>
where
    SCLK: OutputPin<Error = PinErr>,
    MOSI: OutputPin<Error = PinErr>,
    DC: OutputPin<Error = PinErr>,
    CS: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    D: DelayNs,
    PinErr: digital::Error,
{
    /// Create a new bit-banged transport
    pub fn new(sclk: SCLK, mosi: MOSI, dc: DC, cs: CS, rst: RST, delay: D) -> Self {
        Self {
            sclk,
            mosi,
            dc,
            cs,
            rst,
            delay,
            half_period_us: DEFAULT_HALF_PERIOD_US,
            retry: RetryPolicy::default(),
            last_error: None,
        }
    }

    /// Set the delay between clock edges in microseconds
    ///
    /// 0 clocks as fast as the GPIO allows.
    pub fn set_half_period(&mut self, us: u32) -> &mut Self {
        self.half_period_us = us;
        self
    }

    /// Current half clock period in microseconds
    pub fn half_period(&self) -> u32 {
        self.half_period_us
    }

    /// Clock one byte out, MSB first
    ///
    /// # Errors
    ///
    /// Returns the first GPIO error; the byte is then partially sent.
    pub fn shift_out(
        &mut self,
        byte: u8,
    ) -> InterfaceResult<(), InterfaceError<Infallible, PinErr>> {
        shift_out(
            &mut self.sclk,
            &mut self.mosi,
            &mut self.delay,
            self.half_period_us,
            byte,
        )
    }

    fn transfer(
        &mut self,
        dc_high: bool,
        bytes: &[u8],
    ) -> InterfaceResult<(), InterfaceError<Infallible, PinErr>> {
        let Self {
            sclk,
            mosi,
            dc,
            cs,
            delay,
            half_period_us,
            retry,
            last_error,
            ..
        } = self;
        let half = *half_period_us;
        retry.run(delay, |delay| {
            dc.set_state(dc_high.into())
                .map_err(InterfaceError::Pin)
                .and_then(|()| cs.set_low().map_err(InterfaceError::Pin))
                .and_then(|()| {
                    let sent = bytes.iter().try_for_each(|byte| {
                        shift_out(&mut *sclk, &mut *mosi, &mut *delay, half, *byte)
                    });
                    let released = cs.set_high().map_err(InterfaceError::Pin);
                    sent.and(released)
                })
                .inspect_err(|e| {
                    *last_error = Some(TransportErrorKind::of(e, |never| match *never {}));
                })
        })
    }
}

fn shift_out<SCLK, MOSI, D, PinErr>(
    sclk: &mut SCLK,
    mosi: &mut MOSI,
    delay: &mut D,
    half_period_us: u32,
    byte: u8,
) -> InterfaceResult<(), InterfaceError<Infallible, PinErr>>
where
    SCLK: OutputPin<Error = PinErr>,
    MOSI: OutputPin<Error = PinErr>,
    D: DelayNs,
{
    for bit in (0..8).rev() {
        mosi.set_state((byte & (1 << bit) != 0).into())
            .map_err(InterfaceError::Pin)?;
        delay.delay_us(half_period_us);
        sclk.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_us(half_period_us);
        sclk.set_low().map_err(InterfaceError::Pin)?;
    }
    Ok(())
}

impl<SCLK, MOSI, DC, CS, RST, D, PinErr> DisplayInterface
    for BitBangInterface<SCLK, MOSI, DC, CS, RST, D>
where
    SCLK: OutputPin<Error = PinErr>,
    MOSI: OutputPin<Error = PinErr>,
    DC: OutputPin<Error = PinErr>,
    CS: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    D: DelayNs,
    PinErr: digital::Error,
{
    type Error = InterfaceError<Infallible, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.transfer(false, &[command])
    }

    fn send_commands(&mut self, commands: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.transfer(false, commands)
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.transfer(true, data)
    }

    fn reset<DL: DelayNs>(&mut self, delay: &mut DL) {
        pulse_reset(&mut self.rst, delay);
    }

    fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retry = policy;
    }

    fn last_error(&self) -> Option<TransportErrorKind> {
        self.last_error
    }
}

/// Default 7-bit I2C address of SSD1306-class panels
pub const DEFAULT_I2C_ADDRESS: u8 = 0x3C;

/// I2C transport
///
/// Commands are framed with control byte `0x00`, display data with `0x40`.
pub struct I2cInterface<I2C, D> {
    i2c: I2C,
    address: u8,
    delay: D,
    retry: RetryPolicy,
    last_error: Option<TransportErrorKind>,
}

impl<I2C, D> I2cInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a new I2C transport for the device at `address`
    pub fn new(i2c: I2C, address: u8, delay: D) -> Self {
        Self {
            i2c,
            address,
            delay,
            retry: RetryPolicy::default(),
            last_error: None,
        }
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the owned bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn write_framed(
        &mut self,
        control: u8,
        bytes: &[u8],
    ) -> InterfaceResult<(), InterfaceError<I2C::Error, Infallible>> {
        let Self {
            i2c: bus,
            address,
            delay,
            retry,
            last_error,
        } = self;
        let control = [control];
        retry.run(delay, |_| {
            let mut operations = [Operation::Write(&control), Operation::Write(bytes)];
            bus.transaction(*address, &mut operations).map_err(|e| {
                *last_error = Some(TransportErrorKind::I2c(i2c::Error::kind(&e)));
                InterfaceError::I2c(e)
            })
        })
    }
}

impl<I2C, D> DisplayInterface for I2cInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = InterfaceError<I2C::Error, Infallible>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.write_framed(command::I2C_CONTROL_COMMAND, &[command])
    }

    fn send_commands(&mut self, commands: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.write_framed(command::I2C_CONTROL_COMMAND, commands)
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.write_framed(command::I2C_CONTROL_DATA, data)
    }

    fn reset<DL: DelayNs>(&mut self, _delay: &mut DL) {}

    fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retry = policy;
    }

    fn last_error(&self) -> Option<TransportErrorKind> {
        self.last_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use embedded_hal::spi::{self, Operation as SpiOperation};

    struct MockDelay {
        total_ms: u32,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    /// Shared wire state so pins and bus can observe each other
    #[derive(Default)]
    struct Wire {
        dc: bool,
        cs: bool,
        mosi: bool,
        rst_events: Vec<bool>,
        /// (dc, bytes) per SPI write
        writes: Vec<(bool, Vec<u8>)>,
        /// (dc, cs, mosi) sampled on each rising clock edge
        clocked: Vec<(bool, bool, bool)>,
        failures_left: u8,
        /// Rising clock edges that fail before the clock works again
        sclk_failures: u8,
    }

    #[derive(Clone, Copy)]
    enum Role {
        Dc,
        Cs,
        Mosi,
        Sclk,
        Rst,
    }

    struct WirePin {
        wire: Rc<RefCell<Wire>>,
        role: Role,
    }

    impl embedded_hal::digital::ErrorType for WirePin {
        type Error = digital::ErrorKind;
    }

    impl OutputPin for WirePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            let mut wire = self.wire.borrow_mut();
            match self.role {
                Role::Dc => wire.dc = false,
                Role::Cs => wire.cs = false,
                Role::Mosi => wire.mosi = false,
                Role::Sclk => {}
                Role::Rst => wire.rst_events.push(false),
            }
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            let mut wire = self.wire.borrow_mut();
            match self.role {
                Role::Dc => wire.dc = true,
                Role::Cs => wire.cs = true,
                Role::Mosi => wire.mosi = true,
                Role::Sclk => {
                    if wire.sclk_failures > 0 {
                        wire.sclk_failures -= 1;
                        return Err(digital::ErrorKind::Other);
                    }
                    let sample = (wire.dc, wire.cs, wire.mosi);
                    wire.clocked.push(sample);
                }
                Role::Rst => wire.rst_events.push(true),
            }
            Ok(())
        }
    }

    struct MockSpi {
        wire: Rc<RefCell<Wire>>,
    }

    impl spi::ErrorType for MockSpi {
        type Error = spi::ErrorKind;
    }

    impl SpiDevice for MockSpi {
        fn transaction(
            &mut self,
            operations: &mut [SpiOperation<'_, u8>],
        ) -> Result<(), Self::Error> {
            let mut wire = self.wire.borrow_mut();
            if wire.failures_left > 0 {
                wire.failures_left -= 1;
                return Err(spi::ErrorKind::Other);
            }
            for op in operations {
                if let SpiOperation::Write(bytes) = op {
                    let dc = wire.dc;
                    wire.writes.push((dc, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    fn pin(wire: &Rc<RefCell<Wire>>, role: Role) -> WirePin {
        WirePin {
            wire: Rc::clone(wire),
            role,
        }
    }

    fn spi_interface(
        wire: &Rc<RefCell<Wire>>,
    ) -> SpiInterface<MockSpi, WirePin, WirePin, MockDelay> {
        SpiInterface::new(
            MockSpi {
                wire: Rc::clone(wire),
            },
            pin(wire, Role::Dc),
            pin(wire, Role::Rst),
            MockDelay { total_ms: 0 },
        )
    }

    #[test]
    fn test_spi_command_then_data_dc_levels() {
        let wire = Rc::new(RefCell::new(Wire::default()));
        let mut interface = spi_interface(&wire);
        interface.send_command(0xAF).unwrap();
        interface.send_data(&[1, 2, 3]).unwrap();
        let wire = wire.borrow();
        assert_eq!(wire.writes[0], (false, alloc::vec![0xAF]));
        assert_eq!(wire.writes[1], (true, alloc::vec![1, 2, 3]));
        // DC is left high after a command
        assert!(wire.dc);
    }

    #[test]
    fn test_spi_retries_transient_failure() {
        let wire = Rc::new(RefCell::new(Wire::default()));
        wire.borrow_mut().failures_left = 2;
        let mut interface = spi_interface(&wire);
        interface.send_data(&[0x55]).unwrap();
        assert_eq!(wire.borrow().writes.len(), 1);
        let (_, _, _, delay) = interface.release();
        assert_eq!(delay.total_ms, 200);
    }

    #[test]
    fn test_spi_gives_up_after_budget() {
        let wire = Rc::new(RefCell::new(Wire::default()));
        wire.borrow_mut().failures_left = 10;
        let mut interface = spi_interface(&wire);
        interface.set_retry_policy(RetryPolicy::new(4, 1));
        let result = interface.send_command(0xAE);
        assert_eq!(result, Err(InterfaceError::Spi(spi::ErrorKind::Other)));
        assert_eq!(wire.borrow().failures_left, 6);
        assert_eq!(interface.retry_policy(), RetryPolicy::new(4, 1));
        assert_eq!(
            interface.last_error(),
            Some(TransportErrorKind::Spi(spi::ErrorKind::Other))
        );
    }

    #[test]
    fn test_spi_reset_pulses_low() {
        let wire = Rc::new(RefCell::new(Wire::default()));
        let mut interface = spi_interface(&wire);
        let mut delay = MockDelay { total_ms: 0 };
        interface.reset(&mut delay);
        assert_eq!(wire.borrow().rst_events, alloc::vec![true, false, true]);
        assert_eq!(delay.total_ms, 21);
    }

    fn bitbang(
        wire: &Rc<RefCell<Wire>>,
    ) -> BitBangInterface<WirePin, WirePin, WirePin, WirePin, WirePin, MockDelay> {
        BitBangInterface::new(
            pin(wire, Role::Sclk),
            pin(wire, Role::Mosi),
            pin(wire, Role::Dc),
            pin(wire, Role::Cs),
            pin(wire, Role::Rst),
            MockDelay { total_ms: 0 },
        )
    }

    fn clocked_bytes(wire: &Wire) -> Vec<u8> {
        wire.clocked
            .chunks(8)
            .map(|bits| {
                bits.iter()
                    .fold(0u8, |acc, (_, _, mosi)| (acc << 1) | u8::from(*mosi))
            })
            .collect()
    }

    #[test]
    fn test_bitbang_shifts_msb_first() {
        let wire = Rc::new(RefCell::new(Wire::default()));
        let mut interface = bitbang(&wire);
        interface.shift_out(0xA5).unwrap();
        let wire = wire.borrow();
        assert_eq!(wire.clocked.len(), 8);
        assert_eq!(clocked_bytes(&wire), alloc::vec![0xA5]);
    }

    #[test]
    fn test_bitbang_frames_command_and_data() {
        let wire = Rc::new(RefCell::new(Wire::default()));
        let mut interface = bitbang(&wire);
        interface.send_command(0x81).unwrap();
        interface.send_data(&[0x3C, 0x01]).unwrap();
        let wire = wire.borrow();
        assert_eq!(clocked_bytes(&wire), alloc::vec![0x81, 0x3C, 0x01]);
        // DC low for the command, high for data, CS low throughout
        assert!(wire.clocked[..8].iter().all(|(dc, cs, _)| !dc && !cs));
        assert!(wire.clocked[8..].iter().all(|(dc, cs, _)| *dc && !cs));
        // CS released afterwards
        assert!(wire.cs);
    }

    #[test]
    fn test_bitbang_releases_cs_after_pin_failure() {
        let wire = Rc::new(RefCell::new(Wire::default()));
        wire.borrow_mut().sclk_failures = 1;
        let mut interface = bitbang(&wire);
        interface.set_retry_policy(RetryPolicy::new(1, 0));
        let result = interface.send_data(&[0xFF]);
        assert_eq!(result, Err(InterfaceError::Pin(digital::ErrorKind::Other)));
        assert!(wire.borrow().cs);
        assert_eq!(
            interface.last_error(),
            Some(TransportErrorKind::Pin(digital::ErrorKind::Other))
        );
    }

    #[test]
    fn test_bitbang_retry_resends_whole_transfer() {
        let wire = Rc::new(RefCell::new(Wire::default()));
        wire.borrow_mut().sclk_failures = 1;
        let mut interface = bitbang(&wire);
        interface.send_command(0xAF).unwrap();
        let wire = wire.borrow();
        assert_eq!(clocked_bytes(&wire), alloc::vec![0xAF]);
        assert!(wire.cs);
    }

    #[test]
    fn test_bitbang_half_period() {
        let wire = Rc::new(RefCell::new(Wire::default()));
        let mut interface = bitbang(&wire);
        assert_eq!(interface.half_period(), DEFAULT_HALF_PERIOD_US);
        interface.set_half_period(0);
        assert_eq!(interface.half_period(), 0);
    }

    struct MockI2c {
        address: Option<u8>,
        frames: Vec<Vec<u8>>,
        failures_left: u8,
    }

    impl i2c::ErrorType for MockI2c {
        type Error = i2c::ErrorKind;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(i2c::ErrorKind::NoAcknowledge(
                    i2c::NoAcknowledgeSource::Address,
                ));
            }
            self.address = Some(address);
            let mut frame = Vec::new();
            for op in operations {
                if let Operation::Write(bytes) = op {
                    frame.extend_from_slice(bytes);
                }
            }
            self.frames.push(frame);
            Ok(())
        }
    }

    fn i2c_interface(failures: u8) -> I2cInterface<MockI2c, MockDelay> {
        I2cInterface::new(
            MockI2c {
                address: None,
                frames: Vec::new(),
                failures_left: failures,
            },
            DEFAULT_I2C_ADDRESS,
            MockDelay { total_ms: 0 },
        )
    }

    #[test]
    fn test_i2c_control_bytes() {
        let mut interface = i2c_interface(0);
        interface.send_commands(&[0xAE, 0xA6]).unwrap();
        interface.send_data(&[0xFF]).unwrap();
        assert_eq!(interface.last_error(), None);
        let (bus, _) = interface.release();
        assert_eq!(bus.address, Some(0x3C));
        assert_eq!(bus.frames[0], alloc::vec![0x00, 0xAE, 0xA6]);
        assert_eq!(bus.frames[1], alloc::vec![0x40, 0xFF]);
    }

    #[test]
    fn test_i2c_records_last_error_and_recovers() {
        let mut interface = i2c_interface(1);
        interface.send_command(0xAF).unwrap();
        assert_eq!(
            interface.last_error(),
            Some(TransportErrorKind::I2c(i2c::ErrorKind::NoAcknowledge(
                i2c::NoAcknowledgeSource::Address
            )))
        );
        let (bus, delay) = interface.release();
        assert_eq!(bus.frames.len(), 1);
        assert_eq!(delay.total_ms, 100);
    }

    #[test]
    fn test_i2c_exhaustion_returns_error() {
        let mut interface = i2c_interface(3);
        let result = interface.send_data(&[0x00]);
        assert!(matches!(result, Err(InterfaceError::I2c(_))));
        let (bus, delay) = interface.release();
        assert!(bus.frames.is_empty());
        assert_eq!(delay.total_ms, 200);
    }
}
