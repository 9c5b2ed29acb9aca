//! Cooperative single-tick readers over a non-blocking serial device.
//!
//! Each reader owns only its cursor state; the serial device (and, for
//! [`SequenceReader`], the buffer backing a pending command) is handed in
//! at every [`poll`](SequenceReader::poll) call. A `poll` consumes at most
//! what the device already has buffered and returns whether the reader has
//! finished. Once finished, further polls return `true` without touching
//! the serial device at all.

use crate::serial::Serial;

/// What a [`SequenceReader`] transmits before scanning begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCommand {
    /// Nothing to send; start scanning immediately.
    None,
    /// A fixed command string, typically an AT command literal.
    Literal(&'static [u8]),
    /// The bytes live in the backing buffer passed to
    /// [`SequenceReader::poll`]. Used to transmit the formatted HTTP
    /// request, which is staged in the caller's response buffer.
    Backing,
}

/// Sends an optional command, then scans incoming bytes for a literal
/// terminator sequence.
///
/// Matching is naive: a cursor walks the terminator and resets to zero on
/// any mismatch, rather than falling back to the longest matching prefix.
/// A terminator with self-overlapping prefixes can therefore be missed
/// when the overlap straddles a mismatch; none of the sequences the driver
/// scans for (`OK\r\n`, `\r\n`, `+IPD,`) overlap themselves, so the naive
/// policy holds.
#[derive(Debug)]
pub struct SequenceReader {
    command: SearchCommand,
    sequence: &'static [u8],
    search_index: usize,
    command_sent: bool,
}

impl SequenceReader {
    /// Create a reader with no pending search.
    ///
    /// The empty sequence is already fully matched, so a fresh reader
    /// reports done until [`new_search`](SequenceReader::new_search) arms it.
    pub const fn new() -> Self {
        Self {
            command: SearchCommand::None,
            sequence: &[],
            search_index: 0,
            command_sent: false,
        }
    }

    /// Arm the reader with a command to send and a terminator to scan for.
    pub fn new_search(&mut self, command: SearchCommand, sequence: &'static [u8]) {
        self.command = command;
        self.sequence = sequence;
        self.search_index = 0;
        self.command_sent = false;
    }

    /// Advance the search by at most one byte.
    ///
    /// The first poll after [`new_search`](SequenceReader::new_search)
    /// transmits the command, waiting only for the local TX FIFO to drain.
    /// `backing` supplies the bytes for [`SearchCommand::Backing`]; it is
    /// ignored for the other command kinds.
    pub fn poll<S: Serial>(&mut self, serial: &mut S, backing: &[u8]) -> bool {
        if self.search_index == self.sequence.len() {
            return true;
        }

        if !self.command_sent {
            let bytes = match self.command {
                SearchCommand::None => &[][..],
                SearchCommand::Literal(literal) => literal,
                SearchCommand::Backing => backing,
            };
            if !bytes.is_empty() {
                serial.write(bytes);
                while serial.busy() {}
            }
            self.command_sent = true;
        }

        if serial.bytes_available() >= 1 {
            let mut buffer = [0u8; 1];
            if serial.read(&mut buffer) == 1 {
                if self.sequence[self.search_index] == buffer[0] {
                    self.search_index += 1;
                } else {
                    self.search_index = 0;
                }
            }
        }

        self.search_index == self.sequence.len()
    }
}

impl Default for SequenceReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts an unsigned decimal integer from the byte stream.
///
/// Leading non-digit bytes are skipped; digits accumulate base-10; the
/// first non-digit after at least one digit terminates the read and is
/// consumed along with it. This matches the module's `+IPD,<n>:` framing,
/// where the `:` separator doubles as the terminator byte.
#[derive(Debug)]
pub struct IntegerReader {
    finished: bool,
    found_digit: bool,
    value: u32,
}

impl IntegerReader {
    /// Create a reader in the finished state.
    ///
    /// A reader that was never [`restart`](IntegerReader::restart)ed polls
    /// as done immediately, so a stray construction cannot stall the
    /// transaction machine.
    pub const fn new() -> Self {
        Self {
            finished: true,
            found_digit: false,
            value: 0,
        }
    }

    /// Begin a fresh integer read.
    pub fn restart(&mut self) {
        self.finished = false;
        self.found_digit = false;
        self.value = 0;
    }

    /// Consume at most one byte; returns `true` once the integer is
    /// terminated.
    pub fn poll<S: Serial>(&mut self, serial: &mut S) -> bool {
        if self.finished {
            return true;
        }

        if serial.bytes_available() >= 1 {
            let mut buffer = [0u8; 1];
            if serial.read(&mut buffer) == 1 {
                let byte = buffer[0];
                if byte.is_ascii_digit() {
                    self.value = self
                        .value
                        .wrapping_mul(10)
                        .wrapping_add(u32::from(byte - b'0'));
                    self.found_digit = true;
                } else if self.found_digit {
                    self.finished = true;
                }
            }
        }

        self.finished
    }

    /// The accumulated integer.
    pub fn value(&self) -> u32 {
        self.value
    }
}

impl Default for IntegerReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Fills a window of a destination buffer with exactly `len` bytes from
/// the serial stream, consuming whatever is available each tick.
///
/// The reader tracks only offsets; the destination slice is passed to
/// every [`poll`](BufferReader::poll) by the driver, which routes it to
/// either the packet scratch buffer or the caller's response buffer
/// depending on the current phase.
#[derive(Debug)]
pub struct BufferReader {
    offset: usize,
    len: usize,
    filled: usize,
}

impl BufferReader {
    /// Create a reader with an empty window, which is already full.
    pub const fn new() -> Self {
        Self {
            offset: 0,
            len: 0,
            filled: 0,
        }
    }

    /// Target `dest[offset..offset + len]` for the next fill.
    ///
    /// The driver guarantees the window lies within the destination slice
    /// it passes to [`poll`](BufferReader::poll).
    pub fn new_buffer(&mut self, offset: usize, len: usize) {
        self.offset = offset;
        self.len = len;
        self.filled = 0;
    }

    /// Read whatever the device has buffered into the remaining window.
    ///
    /// Returns `true` once the window is full; the completing tick itself
    /// returns `false`, with completion observed on the next poll.
    pub fn poll<S: Serial>(&mut self, serial: &mut S, dest: &mut [u8]) -> bool {
        if self.filled == self.len {
            return true;
        }

        let window = &mut dest[self.offset + self.filled..self.offset + self.len];
        self.filled += serial.read(window);

        false
    }
}

impl Default for BufferReader {
    fn default() -> Self {
        Self::new()
    }
}
