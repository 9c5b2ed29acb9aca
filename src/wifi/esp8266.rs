//! The ESP8266 transaction state machine.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::http::{Request, ResponseHeader};
use crate::serial::{Parity, Serial, StopBits};

use super::error::Error;
use super::readers::{BufferReader, IntegerReader, SearchCommand, SequenceReader};
use super::{
    DEFAULT_BAUD_RATE, IPD_PREAMBLE, MAX_RESPONSE_PACKET, MAX_TRANSMIT_PACKET, OK_RESPONSE,
};

/// Capacity for the rendered `AT+CIPSEND=<n>` command line.
const CIPSEND_COMMAND_CAPACITY: usize = 32;

/// A phase of the transaction state machine.
///
/// Phases are ordered: everything from [`ConnectedToAp`](Phase::ConnectedToAp)
/// onward counts as associated, which is what
/// [`Esp8266::connected`] tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Power-on state; nothing has been sent to the module yet.
    Reset,
    /// Sending `ATE0` and waiting for the echo-off acknowledgement.
    DisableEcho,
    /// Sending `AT+CWMODE=1` to put the module in station mode.
    ConfigureAsHttpClient,
    /// Joining the access point with `AT+CWJAP_CUR`.
    AttemptingApConnection,
    /// Associated and idle; waiting for a request.
    ConnectedToAp,
    /// Opening the TCP connection with `AT+CIPSTART`.
    ConnectingToServer,
    /// Formatting the HTTP request and announcing its length.
    PreparingRequest,
    /// Transmitting the request and scanning for the `+IPD,` preamble.
    SendingRequest,
    /// Reading the first packet's announced byte count.
    GetFirstPacketLength,
    /// Bulk-reading the first packet into the scratch buffer.
    ReadingFirstPacket,
    /// Parsing status code, Content-Length, and header terminator.
    ParsingHeader,
    /// Reading a continuation packet's announced byte count.
    GetPacketLength,
    /// Bulk-reading a continuation packet into the response buffer.
    ReadPacketIntoResponse,
    /// Advancing the response cursor and deciding whether more follows.
    GetNextPacket,
    /// Closing the TCP connection after a successful read.
    CloseConnection,
    /// Closing the TCP connection after a failure.
    CloseConnectionFailure,
    /// Terminal: the response body is in the caller's buffer.
    Complete,
    /// Terminal: the transaction failed; see [`Esp8266::error`].
    Failure,
}

/// Which reader currently owns the serial byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// The sequence reader is scanning for a terminator.
    UntilSequence,
    /// The buffer reader is filling a packet window.
    IntoBuffer,
    /// The integer reader is extracting a packet length.
    Integer,
    /// No reader is active; the machine transitions on the next tick.
    Complete,
}

/// Non-blocking ESP8266 AT-command driver.
///
/// One instance owns an exclusive borrow of the serial device and of the
/// caller's response buffer for its whole lifetime. All progress happens
/// inside [`get_status`](Esp8266::get_status); no method waits on the
/// remote peer. See the crate-level documentation for a usage example.
#[derive(Debug)]
pub struct Esp8266<'a, S: Serial> {
    serial: &'a mut S,
    response: &'a mut [u8],
    ssid: &'a str,
    password: &'a str,
    searcher: SequenceReader,
    integer_reader: IntegerReader,
    reader: BufferReader,
    packet: [u8; MAX_RESPONSE_PACKET],
    request: Request<'a>,
    header: ResponseHeader,
    phase: Phase,
    next_phase: Phase,
    read_mode: ReadMode,
    request_length: usize,
    response_position: usize,
    error: Option<Error>,
}

impl<'a, S: Serial> Esp8266<'a, S> {
    /// Create a driver over `serial` that will join `ssid` and deliver
    /// response bodies into `response`.
    ///
    /// The driver starts in [`Phase::Reset`]; call
    /// [`initialize`](Esp8266::initialize) before polling.
    pub fn new(
        serial: &'a mut S,
        ssid: &'a str,
        password: &'a str,
        response: &'a mut [u8],
    ) -> Self {
        Self {
            serial,
            response,
            ssid,
            password,
            searcher: SequenceReader::new(),
            integer_reader: IntegerReader::new(),
            reader: BufferReader::new(),
            packet: [0; MAX_RESPONSE_PACKET],
            request: Request::default(),
            header: ResponseHeader::default(),
            phase: Phase::Reset,
            next_phase: Phase::Reset,
            read_mode: ReadMode::Complete,
            request_length: 0,
            response_position: 0,
            error: None,
        }
    }

    /// Configure the serial link (115200-8-N-1) and reset the machine.
    ///
    /// Returns `false` if the serial device failed to initialize. Also
    /// disarms any reader left over from an abandoned transaction, so a
    /// stalled driver can be recovered by re-initializing and issuing a
    /// fresh request.
    pub fn initialize(&mut self) -> bool {
        let settings = self.serial.settings();
        settings.baud_rate = DEFAULT_BAUD_RATE;
        settings.frame_size = 8;
        settings.parity = Parity::None;
        settings.stop_bits = StopBits::One;

        if !self.serial.initialize() {
            return false;
        }
        self.serial.flush();

        self.phase = Phase::Reset;
        self.next_phase = Phase::Reset;
        self.read_mode = ReadMode::Complete;
        self.searcher = SequenceReader::new();
        self.integer_reader = IntegerReader::new();
        self.reader = BufferReader::new();
        self.error = None;
        true
    }

    /// Change the access point to join.
    ///
    /// Updates the stored credentials; progression observed through
    /// [`get_status`](Esp8266::get_status) continues from
    /// [`Phase::ConnectedToAp`].
    pub fn change_access_point(&mut self, ssid: &'a str, password: &'a str) {
        self.ssid = ssid;
        self.password = password;
        self.next_phase = Phase::ConnectedToAp;
    }

    /// `true` once the module has associated with the access point.
    pub fn connected(&self) -> bool {
        self.phase >= Phase::ConnectedToAp
    }

    /// Start an HTTP request.
    ///
    /// Latches the request parameters, aborts any in-flight work, and
    /// re-enters the pipeline at [`Phase::ConnectingToServer`]. The
    /// connection of an interrupted transaction is not closed first;
    /// callers interleaving requests mid-transaction accept a stale TCP
    /// session on the module.
    pub fn request(&mut self, request: Request<'a>) {
        self.request = request;
        self.error = None;
        self.next_phase = Phase::ConnectingToServer;
        self.read_mode = ReadMode::Complete;
    }

    /// Drive one cooperative step and return the current phase.
    ///
    /// Polls whichever reader owns the byte stream; when the reader
    /// finishes, the next call advances the machine one phase. Terminal
    /// phases are sticky until [`request`](Esp8266::request) or
    /// [`change_access_point`](Esp8266::change_access_point) re-arms the
    /// pipeline.
    pub fn get_status(&mut self) -> Phase {
        if self.phase == Phase::Reset {
            self.transition();
        }

        if (self.phase == Phase::Complete || self.phase == Phase::Failure)
            && self.next_phase == self.phase
        {
            return self.phase;
        }

        match self.read_mode {
            ReadMode::UntilSequence => {
                let backing = &self.response[..self.request_length];
                if self.searcher.poll(&mut *self.serial, backing) {
                    self.read_mode = ReadMode::Complete;
                }
            }
            ReadMode::IntoBuffer => {
                let Self {
                    serial,
                    reader,
                    response,
                    packet,
                    phase,
                    ..
                } = self;
                let dest: &mut [u8] = if *phase == Phase::ReadingFirstPacket {
                    &mut packet[..]
                } else {
                    &mut response[..]
                };
                if reader.poll(&mut **serial, dest) {
                    self.read_mode = ReadMode::Complete;
                }
            }
            ReadMode::Integer => {
                if self.integer_reader.poll(&mut *self.serial) {
                    self.read_mode = ReadMode::Complete;
                }
            }
            ReadMode::Complete => {
                self.phase = self.next_phase;
                self.transition();
            }
        }

        self.phase
    }

    /// The response body, valid once [`get_status`](Esp8266::get_status)
    /// has returned [`Phase::Complete`].
    ///
    /// Returns an empty slice in every other phase; before completion the
    /// buffer holds transient transaction data.
    pub fn response(&self) -> &[u8] {
        if self.phase == Phase::Complete {
            &self.response[..self.header.content_length]
        } else {
            &[]
        }
    }

    /// The parsed header of the in-flight or completed response.
    pub fn header(&self) -> &ResponseHeader {
        &self.header
    }

    /// The cause recorded for the last failed transaction, if any.
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Write `bytes` synchronously, waiting only for the TX FIFO to drain.
    fn send(&mut self, bytes: &[u8]) {
        self.serial.flush();
        self.serial.write(bytes);
        while self.serial.busy() {}
    }

    /// Record a failure cause and route to the closing phase.
    fn fail(&mut self, error: Error) {
        self.error = Some(error);
        self.next_phase = Phase::CloseConnectionFailure;
    }

    /// Format the HTTP request into the response buffer.
    ///
    /// The request is staged in a transmit-bounded scratch vector first, so
    /// a request that would overflow either the transmit packet limit or
    /// the caller's buffer fails before any of it reaches the wire.
    fn format_request(&mut self) -> Result<usize, Error> {
        let path = self.request.path;
        let domain = self.request.domain;
        let port = self.request.port;

        let mut staged: Vec<u8, MAX_TRANSMIT_PACKET> = Vec::new();

        // Request line. Only GET is ever emitted, whatever the method says.
        staged
            .extend_from_slice(b"GET ")
            .map_err(|_| Error::RequestFormat)?;
        staged
            .extend_from_slice(path.as_bytes())
            .map_err(|_| Error::RequestFormat)?;
        staged
            .extend_from_slice(b" HTTP/1.1\r\n")
            .map_err(|_| Error::RequestFormat)?;

        // Host field.
        staged
            .extend_from_slice(b"Host: ")
            .map_err(|_| Error::RequestFormat)?;
        staged
            .extend_from_slice(domain.as_bytes())
            .map_err(|_| Error::RequestFormat)?;
        staged.push(b':').map_err(|_| Error::RequestFormat)?;
        staged
            .extend_from_slice(port.as_bytes())
            .map_err(|_| Error::RequestFormat)?;

        // End of header: the Host line's CRLF plus a double blank line.
        staged
            .extend_from_slice(b"\r\n\r\n\r\n")
            .map_err(|_| Error::RequestFormat)?;

        if staged.len() > self.response.len() {
            return Err(Error::RequestFormat);
        }
        self.response[..staged.len()].copy_from_slice(&staged);
        Ok(staged.len())
    }

    /// Install the request-transmission scan.
    ///
    /// The formatted request staged in the response buffer becomes the
    /// pending command, and the scan target becomes the `+IPD,` preamble of
    /// the first response packet.
    fn enter_sending_request(&mut self) {
        self.searcher
            .new_search(SearchCommand::Backing, IPD_PREAMBLE);
        self.next_phase = Phase::GetFirstPacketLength;
        self.read_mode = ReadMode::UntilSequence;
    }

    /// Run the entry action of the current phase and select its successor.
    fn transition(&mut self) {
        match self.phase {
            Phase::Reset => {
                self.next_phase = Phase::DisableEcho;
            }
            Phase::DisableEcho => {
                self.searcher
                    .new_search(SearchCommand::Literal(b"ATE0\r\n"), OK_RESPONSE);
                self.next_phase = Phase::ConfigureAsHttpClient;
                self.read_mode = ReadMode::UntilSequence;
            }
            Phase::ConfigureAsHttpClient => {
                self.searcher
                    .new_search(SearchCommand::Literal(b"AT+CWMODE=1\r\n"), OK_RESPONSE);
                self.next_phase = Phase::AttemptingApConnection;
                self.read_mode = ReadMode::UntilSequence;
            }
            Phase::AttemptingApConnection => {
                let ssid = self.ssid;
                let password = self.password;
                self.send(b"AT+CWJAP_CUR=\"");
                self.send(ssid.as_bytes());
                self.send(b"\",\"");
                self.send(password.as_bytes());
                self.searcher
                    .new_search(SearchCommand::Literal(b"\"\r\n"), OK_RESPONSE);
                self.next_phase = Phase::ConnectedToAp;
                self.read_mode = ReadMode::UntilSequence;
            }
            Phase::ConnectedToAp => {}
            Phase::ConnectingToServer => {
                let domain = self.request.domain;
                let port = self.request.port;
                self.send(b"AT+CIPSTART=\"TCP\",\"");
                self.send(domain.as_bytes());
                self.send(b"\",");
                self.send(port.as_bytes());
                self.searcher
                    .new_search(SearchCommand::Literal(b"\r\n"), OK_RESPONSE);
                self.next_phase = Phase::PreparingRequest;
                self.read_mode = ReadMode::UntilSequence;
            }
            Phase::PreparingRequest => match self.format_request() {
                Ok(length) => {
                    self.request_length = length;

                    let mut command: String<CIPSEND_COMMAND_CAPACITY> = String::new();
                    if write!(command, "AT+CIPSEND={}\r\n", length).is_err() {
                        self.fail(Error::CommandFormat);
                    } else {
                        self.send(command.as_bytes());
                        // The CIPSEND acknowledgement is never waited on:
                        // entry falls straight through to the request
                        // transmission, whose +IPD scan skips the OK bytes.
                        self.enter_sending_request();
                    }
                }
                Err(error) => self.fail(error),
            },
            Phase::SendingRequest => self.enter_sending_request(),
            Phase::GetFirstPacketLength => {
                self.integer_reader.restart();
                self.next_phase = Phase::ReadingFirstPacket;
                self.read_mode = ReadMode::Integer;
            }
            Phase::ReadingFirstPacket => {
                let announced = self.integer_reader.value() as usize;
                self.reader
                    .new_buffer(0, announced.min(MAX_RESPONSE_PACKET));
                self.next_phase = Phase::ParsingHeader;
                self.read_mode = ReadMode::IntoBuffer;
            }
            Phase::ParsingHeader => {
                let first_length = (self.integer_reader.value() as usize).min(MAX_RESPONSE_PACKET);
                self.header = ResponseHeader::parse(&self.packet[..first_length]);

                if !self.header.is_valid() {
                    self.fail(Error::InvalidHeader);
                } else if self.header.content_length > self.response.len() {
                    self.fail(Error::ResponseTooLarge);
                } else if self.header.header_length + self.header.content_length <= first_length {
                    // The whole body arrived with the header.
                    let start = self.header.header_length;
                    let length = self.header.content_length;
                    self.response[..length].copy_from_slice(&self.packet[start..start + length]);
                    self.next_phase = Phase::CloseConnection;
                } else {
                    // Pull the partial body out of the header packet.
                    let start = self.header.header_length;
                    let retrieved = first_length - start;
                    self.response[..retrieved].copy_from_slice(&self.packet[start..first_length]);
                    self.response_position = retrieved;
                    self.next_phase = Phase::GetPacketLength;
                }
            }
            Phase::GetPacketLength => {
                self.integer_reader.restart();
                self.next_phase = Phase::ReadPacketIntoResponse;
                self.read_mode = ReadMode::Integer;
            }
            Phase::ReadPacketIntoResponse => {
                let announced = self.integer_reader.value() as usize;
                let capacity = self.response.len() - self.response_position;
                self.reader
                    .new_buffer(self.response_position, announced.min(capacity));
                self.next_phase = Phase::GetNextPacket;
                self.read_mode = ReadMode::IntoBuffer;
            }
            Phase::GetNextPacket => {
                self.response_position += self.integer_reader.value() as usize;
                if self.response_position >= self.header.content_length {
                    self.next_phase = Phase::CloseConnection;
                } else {
                    self.next_phase = Phase::GetPacketLength;
                }
            }
            Phase::CloseConnection => {
                self.searcher
                    .new_search(SearchCommand::Literal(b"AT+CIPCLOSE\r\n"), OK_RESPONSE);
                self.next_phase = Phase::Complete;
                self.read_mode = ReadMode::UntilSequence;
            }
            Phase::CloseConnectionFailure => {
                self.searcher
                    .new_search(SearchCommand::Literal(b"AT+CIPCLOSE\r\n"), OK_RESPONSE);
                self.next_phase = Phase::Failure;
                self.read_mode = ReadMode::UntilSequence;
            }
            Phase::Complete => {}
            Phase::Failure => {}
        }
    }
}
