use super::readers::{BufferReader, IntegerReader, SearchCommand, SequenceReader};
use crate::serial::{Serial, Settings};

const MOCK_BUFFER_SIZE: usize = 256;

struct MockSerial {
    settings: Settings,
    read_buffer: [u8; MOCK_BUFFER_SIZE],
    read_len: usize,
    write_buffer: [u8; MOCK_BUFFER_SIZE],
    write_len: usize,
}

impl MockSerial {
    fn new() -> Self {
        Self {
            settings: Settings::default(),
            read_buffer: [0; MOCK_BUFFER_SIZE],
            read_len: 0,
            write_buffer: [0; MOCK_BUFFER_SIZE],
            write_len: 0,
        }
    }

    /// Helper for tests to inject module-side bytes.
    fn set_read_data(&mut self, data: &[u8]) {
        let len = data.len().min(MOCK_BUFFER_SIZE);
        self.read_buffer[..len].copy_from_slice(&data[..len]);
        self.read_len = len;
    }

    fn written(&self) -> &[u8] {
        &self.write_buffer[..self.write_len]
    }

    fn remaining(&self) -> &[u8] {
        &self.read_buffer[..self.read_len]
    }
}

impl Serial for MockSerial {
    fn initialize(&mut self) -> bool {
        true
    }

    fn settings(&mut self) -> &mut Settings {
        &mut self.settings
    }

    fn flush(&mut self) {}

    fn write(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(MOCK_BUFFER_SIZE - self.write_len);
        self.write_buffer[self.write_len..self.write_len + len].copy_from_slice(&bytes[..len]);
        self.write_len += len;
    }

    fn busy(&self) -> bool {
        false
    }

    fn bytes_available(&self) -> usize {
        self.read_len
    }

    fn read(&mut self, dest: &mut [u8]) -> usize {
        let len = dest.len().min(self.read_len);
        dest[..len].copy_from_slice(&self.read_buffer[..len]);

        // Shift remaining data
        self.read_buffer.copy_within(len..self.read_len, 0);
        self.read_len -= len;

        len
    }
}

#[test]
fn fresh_sequence_reader_reports_done() {
    let mut serial = MockSerial::new();
    serial.set_read_data(b"OK\r\n");

    let mut reader = SequenceReader::new();
    assert!(reader.poll(&mut serial, &[]));
    // Nothing was consumed.
    assert_eq!(serial.remaining(), b"OK\r\n");
}

#[test]
fn sequence_reader_finds_terminator_mid_stream() {
    let mut serial = MockSerial::new();
    serial.set_read_data(b"AT noise OK\r\nrest");

    let mut reader = SequenceReader::new();
    reader.new_search(SearchCommand::None, b"OK\r\n");

    let mut done = false;
    for _ in 0..32 {
        if reader.poll(&mut serial, &[]) {
            done = true;
            break;
        }
    }
    assert!(done);
    // Bytes past the terminator are left for the next reader.
    assert_eq!(serial.remaining(), b"rest");
}

#[test]
fn sequence_reader_resets_cursor_on_mismatch() {
    let mut serial = MockSerial::new();
    // The doubled O defeats the naive scan: after the mismatch the cursor
    // restarts at zero on the following byte, not on the current one.
    serial.set_read_data(b"OOK\r\n");

    let mut reader = SequenceReader::new();
    reader.new_search(SearchCommand::None, b"OK\r\n");

    for _ in 0..5 {
        assert!(!reader.poll(&mut serial, &[]));
    }
    assert_eq!(serial.bytes_available(), 0);

    // A clean occurrence afterwards still matches.
    serial.set_read_data(b"OK\r\n");
    let mut done = false;
    for _ in 0..8 {
        if reader.poll(&mut serial, &[]) {
            done = true;
            break;
        }
    }
    assert!(done);
}

#[test]
fn sequence_reader_misses_overlapping_occurrence() {
    let mut serial = MockSerial::new();
    // "aab" genuinely occurs at offset 1, but the reset-to-zero policy
    // discards the overlap: a a a b scans as 1, 2, mismatch, mismatch.
    serial.set_read_data(b"aaab");

    let mut reader = SequenceReader::new();
    reader.new_search(SearchCommand::None, b"aab");

    for _ in 0..4 {
        assert!(!reader.poll(&mut serial, &[]));
    }
    assert_eq!(serial.bytes_available(), 0);

    // Only a clean occurrence, with the cursor at zero, completes.
    serial.set_read_data(b"aab");
    let mut done = false;
    for _ in 0..8 {
        if reader.poll(&mut serial, &[]) {
            done = true;
            break;
        }
    }
    assert!(done);
}

#[test]
fn sequence_reader_empty_terminator_completes_immediately() {
    let mut serial = MockSerial::new();
    serial.set_read_data(b"anything");

    let mut reader = SequenceReader::new();
    reader.new_search(SearchCommand::None, b"");

    assert!(reader.poll(&mut serial, &[]));
    assert_eq!(serial.remaining(), b"anything");
}

#[test]
fn sequence_reader_completion_is_sticky() {
    let mut serial = MockSerial::new();
    serial.set_read_data(b"OK\r\n");

    let mut reader = SequenceReader::new();
    reader.new_search(SearchCommand::None, b"OK\r\n");
    while !reader.poll(&mut serial, &[]) {}

    serial.set_read_data(b"more bytes");
    for _ in 0..4 {
        assert!(reader.poll(&mut serial, &[]));
    }
    assert_eq!(serial.remaining(), b"more bytes");
}

#[test]
fn sequence_reader_sends_literal_command_once() {
    let mut serial = MockSerial::new();

    let mut reader = SequenceReader::new();
    reader.new_search(SearchCommand::Literal(b"ATE0\r\n"), b"OK\r\n");

    assert!(!reader.poll(&mut serial, &[]));
    assert!(!reader.poll(&mut serial, &[]));
    assert_eq!(serial.written(), b"ATE0\r\n");
}

#[test]
fn sequence_reader_sends_backing_command() {
    let mut serial = MockSerial::new();

    let mut reader = SequenceReader::new();
    reader.new_search(SearchCommand::Backing, b"+IPD,");

    assert!(!reader.poll(&mut serial, b"GET / HTTP/1.1\r\n"));
    assert_eq!(serial.written(), b"GET / HTTP/1.1\r\n");
}

#[test]
fn integer_reader_starts_finished() {
    let mut serial = MockSerial::new();
    serial.set_read_data(b"123:");

    let mut reader = IntegerReader::new();
    assert!(reader.poll(&mut serial));
    assert_eq!(reader.value(), 0);
    assert_eq!(serial.remaining(), b"123:");
}

#[test]
fn integer_reader_skips_prefix_and_consumes_terminator() {
    let mut serial = MockSerial::new();
    serial.set_read_data(b",1460:x");

    let mut reader = IntegerReader::new();
    reader.restart();

    let mut done = false;
    for _ in 0..16 {
        if reader.poll(&mut serial) {
            done = true;
            break;
        }
    }
    assert!(done);
    assert_eq!(reader.value(), 1460);
    // The ':' terminator was consumed; the payload byte was not.
    assert_eq!(serial.remaining(), b"x");
}

#[test]
fn integer_reader_needs_a_digit_before_terminating() {
    let mut serial = MockSerial::new();
    serial.set_read_data(b"abc");

    let mut reader = IntegerReader::new();
    reader.restart();

    for _ in 0..3 {
        assert!(!reader.poll(&mut serial));
    }
    assert_eq!(serial.bytes_available(), 0);

    serial.set_read_data(b"7;");
    let mut done = false;
    for _ in 0..4 {
        if reader.poll(&mut serial) {
            done = true;
            break;
        }
    }
    assert!(done);
    assert_eq!(reader.value(), 7);
}

#[test]
fn buffer_reader_fills_across_ticks() {
    let mut serial = MockSerial::new();
    let mut dest = [0u8; 8];

    let mut reader = BufferReader::new();
    reader.new_buffer(0, 8);

    serial.set_read_data(b"abc");
    assert!(!reader.poll(&mut serial, &mut dest));
    assert_eq!(serial.bytes_available(), 0);

    serial.set_read_data(b"defgh");
    assert!(!reader.poll(&mut serial, &mut dest));
    assert!(reader.poll(&mut serial, &mut dest));
    assert_eq!(&dest, b"abcdefgh");
}

#[test]
fn buffer_reader_respects_window_offset() {
    let mut serial = MockSerial::new();
    let mut dest = [0u8; 8];

    let mut reader = BufferReader::new();
    reader.new_buffer(4, 4);

    serial.set_read_data(b"abcdzzzz");
    assert!(!reader.poll(&mut serial, &mut dest));
    assert!(reader.poll(&mut serial, &mut dest));
    assert_eq!(&dest, b"\0\0\0\0abcd");
    // Bytes beyond the window stay buffered.
    assert_eq!(serial.remaining(), b"zzzz");
}

#[test]
fn buffer_reader_empty_window_is_already_full() {
    let mut serial = MockSerial::new();
    serial.set_read_data(b"abcd");

    let mut reader = BufferReader::new();
    reader.new_buffer(0, 0);

    let mut dest = [0u8; 4];
    assert!(reader.poll(&mut serial, &mut dest));
    assert_eq!(serial.remaining(), b"abcd");
}
