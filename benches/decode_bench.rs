use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use source_query::protocol::schema::{decode_record, DecodeOptions};
use source_query::protocol::{decode_list, Player, Rule, ServerInfo};

fn info_response() -> Vec<u8> {
    let mut data = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x49, 0x11];
    data.extend_from_slice(b"A fairly typical server name\0de_dust2\0csgo\0Counter-Strike\0");
    data.extend_from_slice(&730i16.to_le_bytes());
    data.extend_from_slice(&[20, 24, 2, b'd', b'l', 0, 1]);
    data.extend_from_slice(b"1.38.7.9\0");
    data.push(0xF1);
    data.extend_from_slice(&27015i16.to_le_bytes());
    data.extend_from_slice(&76_561_198_000_000_000i64.to_le_bytes());
    data.extend_from_slice(&27020i16.to_le_bytes());
    data.extend_from_slice(b"SourceTV\0");
    data.extend_from_slice(b"competitive,secure,valve_ds\0");
    data.extend_from_slice(&730i64.to_le_bytes());
    data
}

fn player_response(count: u8) -> Vec<u8> {
    let mut data = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x44, count];
    for i in 0..count {
        data.push(0);
        data.extend_from_slice(format!("player_{i:03}\0").as_bytes());
        data.extend_from_slice(&i32::from(i).to_le_bytes());
        data.extend_from_slice(&(f32::from(i) * 60.0).to_le_bytes());
    }
    data
}

fn rules_response(count: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x45];
    data.extend_from_slice(&count.to_le_bytes());
    for i in 0..count {
        data.extend_from_slice(format!("sv_rule_{i}\0{i}\0").as_bytes());
    }
    data
}

#[allow(clippy::unwrap_used)]
fn bench_info(c: &mut Criterion) {
    let data = info_response();
    let mut group = c.benchmark_group("info_decode");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("all_edf_fields", |b| {
        b.iter(|| {
            let (info, _) = decode_record::<ServerInfo>(
                black_box(&data),
                DecodeOptions::response(ServerInfo::EDF_FIELD),
            )
            .unwrap();
            black_box(info);
        })
    });
    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_lists(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_decode");
    for count in [1u8, 16, 64] {
        let data = player_response(count);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_function(format!("players_{count}"), |b| {
            b.iter(|| black_box(decode_list::<Player>(black_box(&data)).unwrap()))
        });
    }

    let data = rules_response(80);
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("rules_80", |b| {
        b.iter(|| black_box(decode_list::<Rule>(black_box(&data)).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_info, bench_lists);
criterion_main!(benches);
