use criterion::{criterion_group, criterion_main, Criterion};
use ntp_wire::clock::Measurement;
use ntp_wire::leapsectz::{parse_reader, write, LeapSecond};
use ntp_wire::{from_ntp_time, to_ntp_time, Packet};
use std::hint::black_box;
use std::time::{Duration, SystemTime};

fn packet_benchmark(c: &mut Criterion) {
    let now = SystemTime::now();
    let packet = Packet::client_request(to_ntp_time(now));
    let bytes = packet.to_bytes();

    c.bench_function("packet_encode", |b| {
        b.iter(|| black_box(black_box(&packet).to_bytes()));
    });
    c.bench_function("packet_decode", |b| {
        b.iter(|| black_box(Packet::decode(black_box(&bytes))));
    });
    c.bench_function("ntp_time_round_trip", |b| {
        b.iter(|| black_box(from_ntp_time(to_ntp_time(black_box(now)))));
    });
    c.bench_function("measurement", |b| {
        let t2 = now + Duration::from_millis(10);
        let t3 = t2 + Duration::from_micros(10);
        let t4 = t3 + Duration::from_millis(20);

        b.iter(|| {
            black_box(Measurement::from_timestamps(
                black_box(now),
                t2,
                t3,
                t4,
            ))
        });
    });
}

fn leap_table_benchmark(c: &mut Criterion) {
    // 27 entries, the size of the current IERS table
    let leap_seconds: Vec<LeapSecond> = (1..=27u16)
        .map(|n| {
            LeapSecond::new(78_796_800 + u64::from(n) * 15_778_800, i32::from(n))
        })
        .collect();
    let mut table = Vec::new();
    write(&mut table, b'2', &leap_seconds, "UTC").unwrap();

    c.bench_function("leap_table_parse", |b| {
        b.iter(|| black_box(parse_reader(&mut black_box(table.as_slice()))));
    });
}

criterion_group!(packet_benches, packet_benchmark, leap_table_benchmark);
criterion_main!(packet_benches);
