//! Failure causes recorded by the transaction driver.
//!
//! The driver does not return `Result` from its polling surface; a failed
//! transaction drains through [`Phase::CloseConnectionFailure`] to
//! [`Phase::Failure`] after a best-effort `AT+CIPCLOSE`. The cause of that
//! routing is captured here and exposed through
//! [`Esp8266::error`](super::Esp8266::error) so callers can tell a
//! malformed response from a response that simply did not fit.
//!
//! [`Phase::CloseConnectionFailure`]: super::Phase::CloseConnectionFailure
//! [`Phase::Failure`]: super::Phase::Failure

/// A failure cause for an HTTP transaction.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The formatted request did not fit the transmit bound or the
    /// caller's response buffer.
    ///
    /// Raised before any of the request reaches the wire; the transaction
    /// fails without issuing `AT+CIPSEND`.
    RequestFormat,

    /// The `AT+CIPSEND=<n>` command string could not be rendered.
    CommandFormat,

    /// The first response packet did not parse as an HTTP/1.1 header.
    ///
    /// One of the status line, the `Content-Length` header, or the
    /// blank-line terminator was missing or parsed as zero.
    InvalidHeader,

    /// The announced `Content-Length` exceeds the caller's response buffer.
    ResponseTooLarge,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::RequestFormat => defmt::write!(f, "RequestFormat"),
            Error::CommandFormat => defmt::write!(f, "CommandFormat"),
            Error::InvalidHeader => defmt::write!(f, "InvalidHeader"),
            Error::ResponseTooLarge => defmt::write!(f, "ResponseTooLarge"),
        }
    }
}
