use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nbtcodec::{
    codec::{from_json_str, to_json_string},
    decode_document, encode_document, read_document, write_document, Compound, DecodeOptions,
    EncodeOptions, List, Tag, TagType,
};

/// Документ, похожий на сохранение чанка: список секций с массивами.
fn chunk_like(sections: usize) -> Compound {
    let section = |y: i8| {
        let mut s = Compound::new();
        s.insert("Y".into(), Tag::Byte(y));
        s.insert("Blocks".into(), Tag::ByteArray(vec![y as u8; 4096]));
        s.insert("Palette".into(), Tag::IntArray((0..256).collect()));
        s.insert("Heights".into(), Tag::ShortArray(vec![64; 256]));
        Tag::Compound(s)
    };

    let mut root = Compound::new();
    root.insert("xPos".into(), Tag::Int(-12));
    root.insert("zPos".into(), Tag::Int(40));
    root.insert("LastUpdate".into(), Tag::Long(1_234_567));
    root.insert("Status".into(), Tag::from("full"));
    root.insert(
        "Sections".into(),
        Tag::List(List::new(TagType::Compound, (0..sections as i8).map(section).collect()).unwrap()),
    );
    root
}

/// Много мелких записей: нагрузка на ключи и заголовки.
fn wide_compound(entries: usize) -> Compound {
    (0..entries)
        .map(|i| (format!("key_{i}"), Tag::Double(i as f64 * 0.5)))
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_document");
    for sections in [1usize, 16] {
        let bytes = encode_document(&chunk_like(sections)).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("chunk", sections), &bytes, |b, bytes| {
            b.iter(|| decode_document(black_box(bytes)).unwrap())
        });
    }
    let bytes = encode_document(&wide_compound(1000)).unwrap();
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("wide_1000", |b| {
        b.iter(|| decode_document(black_box(&bytes)).unwrap())
    });
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_document");
    for sections in [1usize, 16] {
        let root = chunk_like(sections);
        group.bench_with_input(BenchmarkId::new("chunk", sections), &root, |b, root| {
            b.iter(|| encode_document(black_box(root)).unwrap())
        });
    }
    let root = wide_compound(1000);
    group.bench_function("wide_1000", |b| {
        b.iter(|| encode_document(black_box(&root)).unwrap())
    });
    group.finish();
}

fn bench_gzip(c: &mut Criterion) {
    let root = chunk_like(4);
    let mut group = c.benchmark_group("gzip_document");
    for level in [1u32, 6, 9] {
        let options = EncodeOptions {
            gzip: Some(level),
            ..EncodeOptions::default()
        };
        group.bench_with_input(BenchmarkId::new("write", level), &options, |b, options| {
            b.iter(|| write_document(black_box(&root), options).unwrap())
        });
    }
    let compressed = write_document(
        &root,
        &EncodeOptions {
            gzip: Some(6),
            ..EncodeOptions::default()
        },
    )
    .unwrap();
    group.bench_function("read", |b| {
        b.iter(|| read_document(black_box(&compressed), &DecodeOptions::default()).unwrap())
    });
    group.finish();
}

fn bench_json(c: &mut Criterion) {
    let root = wide_compound(200);
    let json = to_json_string(&root, false).unwrap();
    c.bench_function("to_json wide_200", |b| {
        b.iter(|| to_json_string(black_box(&root), false).unwrap())
    });
    c.bench_function("from_json wide_200", |b| {
        b.iter(|| from_json_str(black_box(&json)).unwrap())
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_gzip, bench_json);
criterion_main!(benches);
