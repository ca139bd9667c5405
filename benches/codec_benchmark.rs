use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hotelbeds_client::booking::ListAvailableHotelsResponse;
use hotelbeds_client::errors::{classify_message, decode_error};
use hotelbeds_client::ScalarKind;

fn availability_body(hotels: usize) -> String {
    let hotel = r#"{
        "code": 6613, "name": "Hotel", "latitude": "39.5696", "longitude": "2.6502",
        "minRate": "97.50", "maxRate": "140.20", "currency": "EUR",
        "rooms": [{"code": "DBL.ST", "name": "Double", "rates": [
            {"rateKey": "k", "net": "110.05", "sellingRate": "123.40", "allotment": 3,
             "cancellationPolicies": [{"amount": "55.03", "from": "2024-03-31T23:59:00+02:00"}]},
            {"rateKey": "k2", "net": 98.1, "sellingRate": 120, "allotment": 1}
        ]}]
    }"#;
    let hotels = vec![hotel; hotels].join(",");
    format!(
        r#"{{"hotels": {{"checkIn": "2024-04-02", "checkOut": "2024-04-03", "total": 1, "hotels": [{}]}}}}"#,
        hotels
    )
}

pub fn scalar_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_codec");

    let cases: [(&str, ScalarKind, &[u8]); 5] = [
        ("money", ScalarKind::Money, b"\"123.456\""),
        ("date", ScalarKind::DateOnly, b"\"2024-04-02\""),
        ("timestamp", ScalarKind::DateTimeMillis, b"\"2024-04-01 12:47:10.411\""),
        ("offset", ScalarKind::DateTimeOffset, b"\"2024-03-31T23:59:00+02:00\""),
        ("int_list", ScalarKind::CommaListInt, b"\"6613,6619,1,2,3,4,5,6,7,8\""),
    ];

    for (name, kind, raw) in cases.iter() {
        group.bench_with_input(BenchmarkId::new("decode", name), raw, |b, raw| {
            b.iter(|| kind.decode(black_box(raw)))
        });
        if let Ok(value) = kind.decode(raw) {
            group.bench_with_input(BenchmarkId::new("encode", name), &value, |b, value| {
                b.iter(|| kind.encode(black_box(value)))
            });
        }
    }

    group.finish();
}

pub fn response_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("availability_response");

    for hotels in [1, 50, 500].iter() {
        let body = availability_body(*hotels);
        group.bench_with_input(BenchmarkId::from_parameter(hotels), &body, |b, body| {
            b.iter(|| serde_json::from_str::<ListAvailableHotelsResponse>(black_box(body)))
        });
    }

    group.finish();
}

pub fn classification_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("error_classification");

    let messages = [
        "Rate limit exceeded",
        "Invalid request: booking does not exist",
        "Something nobody has seen before",
    ];
    for message in messages.iter() {
        group.bench_with_input(BenchmarkId::new("classify", message), message, |b, m| {
            b.iter(|| classify_message(black_box(m)))
        });
    }

    let long_body = br#"{"auditData":{"processTime":"5","serverId":"srv"},"code":"PRODUCT_ERROR","message":"Price has changed"}"#;
    group.bench_function("decode_long_shape", |b| {
        b.iter(|| decode_error(409, black_box(long_body)))
    });
    group.bench_function("decode_undefined", |b| {
        b.iter(|| decode_error(502, black_box(b"<html>Bad Gateway</html>")))
    });

    group.finish();
}

criterion_group!(
    benches,
    scalar_benchmark,
    response_benchmark,
    classification_benchmark
);
criterion_main!(benches);
