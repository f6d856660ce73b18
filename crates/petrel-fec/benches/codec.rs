//! Benchmarks for the packet codec: whole-buffer framing and streaming
//! decode with and without losses.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use petrel_fec::{BufferEncoder, GroupDecoder, Shard};

fn bench_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state: u32 = 0xDEAD_BEEF;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

fn decode_all(shards: &[&Shard]) -> usize {
    let mut dec = GroupDecoder::new();
    for shard in shards {
        dec.add(shard.packet());
    }
    let mut bytes = 0;
    while let Some(shard) = dec.take_shard() {
        bytes += shard.data().len();
    }
    bytes
}

fn bench_encode_buffer(c: &mut Criterion) {
    let sizes: &[usize] = &[4 * 1024, 64 * 1024, 256 * 1024];

    let mut group = c.benchmark_group("encode_buffer");
    for &size in sizes {
        let data = bench_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("ratio_0.5", size), &data, |b, data| {
            let mut enc = BufferEncoder::new(1400, 0.5);
            b.iter(|| enc.encode_buffer(data));
        });
    }
    group.finish();
}

fn bench_decode_buffer(c: &mut Criterion) {
    let sizes: &[usize] = &[4 * 1024, 64 * 1024, 256 * 1024];

    let mut group = c.benchmark_group("decode_buffer");
    for &size in sizes {
        let data = bench_data(size);
        let mut enc = BufferEncoder::new(1400, 0.5);
        let shards = enc.encode_buffer(&data);
        let k = usize::from(shards[0].header().n_blocks);

        // Clean stream: every shard arrives, no reconstruction needed.
        let all: Vec<&Shard> = shards.iter().collect();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("no_loss", size), &all, |b, shards| {
            b.iter(|| decode_all(shards));
        });

        // Every fourth data shard lost: reconstruction on every group,
        // within the parity budget.
        let lossy: Vec<&Shard> = shards
            .iter()
            .filter(|s| {
                let block = usize::from(s.header().block);
                block >= k || block % 4 != 0
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("quarter_data_lost", size), &lossy, |b, shards| {
            b.iter(|| decode_all(shards));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode_buffer, bench_decode_buffer);
criterion_main!(benches);
