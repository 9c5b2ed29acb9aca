use std::collections::VecDeque;
use std::hint::black_box;

use criterion::Criterion;
use libesp8266::http::Request;
use libesp8266::serial::{Serial, Settings};
use libesp8266::wifi::{Esp8266, Phase};

struct ReplaySerial {
    settings: Settings,
    incoming: VecDeque<u8>,
}

impl ReplaySerial {
    fn new() -> Self {
        Self {
            settings: Settings::default(),
            incoming: VecDeque::new(),
        }
    }

    fn feed(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }
}

impl Serial for ReplaySerial {
    fn initialize(&mut self) -> bool {
        true
    }

    fn settings(&mut self) -> &mut Settings {
        &mut self.settings
    }

    fn flush(&mut self) {}

    fn write(&mut self, _bytes: &[u8]) {}

    fn busy(&self) -> bool {
        false
    }

    fn bytes_available(&self) -> usize {
        self.incoming.len()
    }

    fn read(&mut self, dest: &mut [u8]) -> usize {
        let len = dest.len().min(self.incoming.len());
        for slot in dest[..len].iter_mut() {
            *slot = self.incoming.pop_front().unwrap();
        }
        len
    }
}

pub fn bench_association(c: &mut Criterion) {
    c.bench_function("esp8266/association", |b| {
        b.iter(|| {
            let mut serial = ReplaySerial::new();
            serial.feed(b"OK\r\nOK\r\nOK\r\n");

            let mut response = [0u8; 256];
            let mut driver = Esp8266::new(&mut serial, "net", "pw", &mut response);
            assert!(driver.initialize());
            while driver.get_status() != Phase::ConnectedToAp {}
            black_box(driver.connected())
        })
    });
}

pub fn bench_single_packet_get(c: &mut Criterion) {
    let packet = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
    let mut framed = format!("+IPD,{}:", packet.len()).into_bytes();
    framed.extend_from_slice(packet);

    c.bench_function("esp8266/single_packet_get", |b| {
        b.iter(|| {
            let mut serial = ReplaySerial::new();
            serial.feed(b"OK\r\nOK\r\nOK\r\n");
            serial.feed(b"OK\r\nOK\r\n");
            serial.feed(&framed);
            serial.feed(b"OK\r\n");

            let mut response = [0u8; 256];
            let mut driver = Esp8266::new(&mut serial, "net", "pw", &mut response);
            assert!(driver.initialize());
            while driver.get_status() != Phase::ConnectedToAp {}

            driver.request(Request {
                domain: "example.com",
                ..Request::default()
            });
            while driver.get_status() != Phase::Complete {}
            black_box(driver.response().len())
        })
    });
}
