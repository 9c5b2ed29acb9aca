//! ESP8266 AT-command transaction driver.
//!
//! The driver is a cooperative state machine layered over three small
//! readers, each of which consumes bytes from the serial device one tick at
//! a time without ever waiting for data:
//!
//! * [`readers::SequenceReader`] emits an AT command, then scans the byte
//!   stream for a literal terminator such as `OK\r\n`
//! * [`readers::IntegerReader`] extracts the decimal packet length from a
//!   `+IPD,<n>:` announcement
//! * [`readers::BufferReader`] bulk-reads an announced number of payload
//!   bytes into a destination buffer
//!
//! [`Esp8266::get_status`] polls whichever reader currently owns the byte
//! stream and advances the transaction one phase when it completes. See the
//! crate-level documentation for a full usage example.

/// Default baud rate for the ESP8266 AT firmware.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Confirmation reply terminating most AT commands.
pub const OK_RESPONSE: &[u8] = b"OK\r\n";

/// Reply emitted after the module associates and obtains an address.
///
/// Present in the module's reply alphabet but not matched by the current
/// pipeline, which relies on the `OK\r\n` that follows `AT+CWJAP_CUR`.
pub const WIFI_CONNECTED: &[u8] = b"WIFI GOT IP\r\n\r\nOK\r\n";

/// Reply emitted when the module finishes booting.
///
/// Present in the module's reply alphabet but not matched by the current
/// pipeline, which proceeds straight to disabling command echo.
pub const RESET_COMPLETE: &[u8] = b"ready\r\n";

/// Framing prefix announcing an inbound TCP payload chunk: `+IPD,<n>:`.
pub const IPD_PREAMBLE: &[u8] = b"+IPD,";

/// Largest payload the module delivers in a single `+IPD` packet.
pub const MAX_RESPONSE_PACKET: usize = 1460;

/// Upper bound on the formatted outgoing request.
pub const MAX_TRANSMIT_PACKET: usize = 2048;

/// The password security mode of an access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPointSecurity {
    /// No authentication.
    Open,
    /// Wired Equivalent Privacy.
    Wep,
    /// Wi-Fi Protected Access, pre-shared key.
    WpaPsk,
    /// WPA2, pre-shared key.
    Wpa2Psk,
    /// Mixed WPA/WPA2, pre-shared key.
    WpaWpa2Psk,
}

pub mod error;
pub mod readers;

mod esp8266;

pub use esp8266::{Esp8266, Phase, ReadMode};

#[cfg(test)]
mod tests;
