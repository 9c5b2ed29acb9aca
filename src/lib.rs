//! # libesp8266 - ESP8266 AT-command driver
//!
//! A non-blocking driver for the ESP8266 Wi-Fi module controlled over a UART
//! serial link using the module's AT-command firmware. The driver brings the
//! module from power-on to an associated Wi-Fi station and then executes
//! HTTP/1.1 GET requests against servers reachable through that association,
//! delivering the response body into a caller-supplied buffer.
//!
//! ## Features
//!
//! - Cooperative, suspension-free operation: every call to
//!   [`wifi::Esp8266::get_status`] performs a bounded amount of work and
//!   returns immediately, so the driver can share a bare-metal main loop
//!   with other peripherals
//! - No dynamic allocation: the response buffer, credentials, and request
//!   parameters are all borrowed from the caller
//! - Transport agnostic: any UART that implements the [`serial::Serial`]
//!   contract works, on hardware or in a host-side test harness
//! - Multi-packet HTTP responses reassembled from the module's
//!   `+IPD,<n>:` framing
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libesp8266 = "0.1.0"
//! ```
//!
//! Construct the driver with a serial port, access point credentials, and a
//! response buffer, then poll it:
//!
//! ```rust,no_run
//! use libesp8266::wifi::{Esp8266, Phase};
//! use libesp8266::http::Request;
//! # use libesp8266::serial::{Serial, Settings};
//! # struct Uart { settings: Settings }
//! # impl Serial for Uart {
//! #     fn initialize(&mut self) -> bool { true }
//! #     fn settings(&mut self) -> &mut Settings { &mut self.settings }
//! #     fn flush(&mut self) {}
//! #     fn write(&mut self, _bytes: &[u8]) {}
//! #     fn busy(&self) -> bool { false }
//! #     fn bytes_available(&self) -> usize { 0 }
//! #     fn read(&mut self, _dest: &mut [u8]) -> usize { 0 }
//! # }
//! # let mut uart = Uart { settings: Settings::default() };
//!
//! let mut response = [0u8; 4096];
//! let mut driver = Esp8266::new(&mut uart, "my-network", "hunter2", &mut response);
//!
//! assert!(driver.initialize());
//! while !driver.connected() {
//!     driver.get_status();
//! }
//!
//! driver.request(Request {
//!     domain: "example.com",
//!     ..Request::default()
//! });
//! loop {
//!     match driver.get_status() {
//!         Phase::Complete => break,
//!         Phase::Failure => panic!("request failed"),
//!         _ => continue,
//!     }
//! }
//! let body = driver.response();
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based IoT devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt formatting support for embedded debugging
//!
//! ## Limitations
//!
//! - Only GET requests are emitted on the wire; other [`http::Method`]
//!   variants are accepted but produce GET requests
//! - Only `HTTP/1.1` status lines and `Content-Length`-delimited bodies are
//!   recognized (no chunked transfer encoding, no keep-alive)
//! - No TLS, DNS caching, or redirect handling
//! - Error replies from the module (`ERROR\r\n`) are not matched; a caller
//!   that sees no phase progress across its own deadline should abandon the
//!   transaction and re-initialize

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Byte-oriented serial device contract consumed by the driver.
///
/// The driver does not own a UART implementation; it drives any device that
/// exposes non-blocking reads of whatever bytes are currently available.
pub mod serial;

/// HTTP request description and response-header parsing.
///
/// Contains the request descriptor handed to the driver and the minimal
/// first-packet header parser (status line, `Content-Length`, header
/// terminator) the transaction machine relies on.
pub mod http;

/// The ESP8266 transaction driver: readers, state machine, errors.
pub mod wifi;
