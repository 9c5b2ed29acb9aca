use criterion::{criterion_group, criterion_main};

mod wifi;

criterion_group!(
    benches,
    wifi::esp8266::bench_association,
    wifi::esp8266::bench_single_packet_get
);
criterion_main!(benches);
