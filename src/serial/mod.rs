//! A serial device abstraction for the ESP8266 driver
//!
//! The driver talks to the module through a byte-oriented UART that never
//! blocks on the remote peer: reads only ever consume bytes the device has
//! already buffered, and writes enqueue into a transmit FIFO whose drain is
//! observable through [`Serial::busy`]. Implementations exist for hardware
//! UART peripherals and for in-memory mocks in the test suite.

#![allow(missing_docs)]

/// Parity configuration for the serial frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    None,
}

/// Number of stop bits per serial frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit.
    One,
}

/// Line settings for a serial device.
///
/// The driver programs these to 115200-8-N-1 during
/// [`initialize`](crate::wifi::Esp8266::initialize); implementations apply
/// them when their own `initialize` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Symbol rate in bits per second.
    pub baud_rate: u32,
    /// Data bits per frame.
    pub frame_size: u8,
    /// Parity bit configuration.
    pub parity: Parity,
    /// Stop bit configuration.
    pub stop_bits: StopBits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            frame_size: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// A non-blocking byte-oriented serial device.
///
/// All methods must return without waiting on the remote peer. The only
/// permissible wait anywhere in the contract is the caller polling
/// [`busy`](Serial::busy) while the local transmit FIFO drains, which is a
/// hardware-scale delay, not a network one.
pub trait Serial {
    /// Apply the current [`Settings`] and bring the device up.
    ///
    /// Returns `false` if the device could not be configured.
    fn initialize(&mut self) -> bool;

    /// Mutable access to the line settings consumed by the next
    /// [`initialize`](Serial::initialize).
    fn settings(&mut self) -> &mut Settings;

    /// Discard any bytes held in the transmit buffer.
    fn flush(&mut self);

    /// Enqueue `bytes` for transmission without blocking.
    fn write(&mut self, bytes: &[u8]);

    /// `true` while previously written bytes are still draining out of the
    /// transmit FIFO.
    fn busy(&self) -> bool;

    /// Number of received bytes ready to be read right now.
    fn bytes_available(&self) -> usize;

    /// Copy up to `dest.len()` already-received bytes into `dest`.
    ///
    /// Returns the number of bytes copied, which may be zero. Never waits
    /// for more data to arrive.
    fn read(&mut self, dest: &mut [u8]) -> usize;
}
