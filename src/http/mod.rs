//! Minimal HTTP/1.1 support for the ESP8266 transaction driver.
//!
//! This module holds the request descriptor the driver formats onto the
//! wire and the deliberately small response-header parser it runs over the
//! first `+IPD` packet of a response. Only the pieces the transaction
//! machine consumes are recognized: the `HTTP/1.1 ` status line, the
//! `Content-Length` header (case-sensitive), and the blank-line header
//! terminator. Everything else in the response headers is skipped over.

/// The header/body separator in an HTTP/1.1 message.
pub const END_OF_HEADER: &[u8] = b"\r\n\r\n";

/// Status-line prefix of the only HTTP version the parser recognizes.
const STATUS_LINE: &[u8] = b"HTTP/1.1 ";

/// Header token announcing the response body length.
const CONTENT_LENGTH: &[u8] = b"Content-Length: ";

/// HTTP request methods.
///
/// The full method set is accepted at the API surface, but the driver only
/// ever emits `GET` request lines on the wire; a request carrying any other
/// method silently produces a GET.
///
/// # Examples
///
/// ```rust
/// use libesp8266::http::Method;
///
/// assert_eq!(Method::Get.as_str(), "GET");
/// assert_eq!(Method::Patch.as_str(), "PATCH");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Requests a representation of the specified resource.
    Get,
    /// Asks for a response identical to GET, without the response body.
    Head,
    /// Submits an entity to the specified resource.
    Post,
    /// Replaces all current representations of the target resource.
    Put,
    /// Deletes the specified resource.
    Delete,
    /// Establishes a tunnel to the server identified by the target resource.
    Connect,
    /// Describes the communication options for the target resource.
    Options,
    /// Performs a message loop-back test along the path to the target.
    Trace,
    /// Applies partial modifications to a resource.
    Patch,
}

impl Method {
    /// The method name as used in an HTTP request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
        }
    }
}

/// An HTTP request to run against a server reachable through the module.
///
/// All string fields are borrowed from the caller for the lifetime of the
/// driver. The defaults request the root document over port 80:
///
/// ```rust
/// use libesp8266::http::Request;
///
/// let request = Request {
///     domain: "example.com",
///     ..Request::default()
/// };
/// assert_eq!(request.path, "/");
/// assert_eq!(request.port, "80");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    /// Domain name of the server to connect to, without a scheme prefix.
    /// An example would be `google.com` or `developer.mozilla.org`.
    pub domain: &'a str,
    /// Path to the resource within the domain. URL parameters may be
    /// embedded, such as `/search?query=esp8266&price=lowest`.
    pub path: &'a str,
    /// Which HTTP method to use for this request.
    pub method: Method,
    /// Data to transmit to the web server. Typically used with POST
    /// requests; leave empty when there is nothing to send.
    pub send_data: &'a [u8],
    /// Which server port number to connect to, as a decimal string.
    pub port: &'a str,
}

impl Default for Request<'_> {
    fn default() -> Self {
        Self {
            domain: "",
            path: "/",
            method: Method::Get,
            send_data: &[],
            port: "80",
        }
    }
}

/// The fields the driver extracts from a response's first packet.
///
/// A header where any field is zero is the parse-failure sentinel; see
/// [`ResponseHeader::is_valid`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    /// HTTP status code from the `HTTP/1.1 ` status line.
    pub status_code: u32,
    /// Value of the `Content-Length` header.
    pub content_length: usize,
    /// Offset of the first body byte: position of `\r\n\r\n` plus four.
    pub header_length: usize,
}

impl ResponseHeader {
    /// Parse the captured first packet of a response.
    ///
    /// Locates the `HTTP/1.1 ` status line, the `Content-Length` header,
    /// and the header terminator. Any missing token yields the zero header.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use libesp8266::http::ResponseHeader;
    ///
    /// let packet = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
    /// let header = ResponseHeader::parse(packet);
    /// assert_eq!(header.status_code, 200);
    /// assert_eq!(header.content_length, 5);
    /// assert_eq!(header.header_length, packet.len() - 5);
    /// assert!(header.is_valid());
    /// ```
    pub fn parse(packet: &[u8]) -> Self {
        let index = match find_slice(packet, STATUS_LINE) {
            Some(index) => index,
            None => return Self::default(),
        };
        let status_code = match parse_decimal(&packet[index + STATUS_LINE.len()..]) {
            Some(value) => value,
            None => return Self::default(),
        };

        let index = match find_slice(packet, CONTENT_LENGTH) {
            Some(index) => index,
            None => return Self::default(),
        };
        let content_length = match parse_decimal(&packet[index + CONTENT_LENGTH.len()..]) {
            Some(value) => value as usize,
            None => return Self::default(),
        };

        let index = match find_slice(packet, END_OF_HEADER) {
            Some(index) => index,
            None => return Self::default(),
        };

        Self {
            status_code,
            content_length,
            header_length: index + END_OF_HEADER.len(),
        }
    }

    /// `true` when all three fields were parsed and are non-zero.
    pub fn is_valid(&self) -> bool {
        self.status_code != 0 && self.content_length != 0 && self.header_length != 0
    }
}

/// Find the first occurrence of a slice in another slice and return its
/// starting position.
pub(crate) fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Read a run of leading ASCII digits as an unsigned decimal.
///
/// Returns `None` when the slice does not start with a digit.
fn parse_decimal(bytes: &[u8]) -> Option<u32> {
    let mut value: u32 = 0;
    let mut digits = 0;
    for &byte in bytes {
        if byte.is_ascii_digit() {
            value = value.wrapping_mul(10).wrapping_add(u32::from(byte - b'0'));
            digits += 1;
        } else {
            break;
        }
    }
    if digits == 0 {
        None
    } else {
        Some(value)
    }
}
