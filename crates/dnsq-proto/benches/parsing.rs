//! DNS message parsing benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dnsq_proto::name::NameParser;
use dnsq_proto::rdata::RData;
use dnsq_proto::reverse::reverse_name;
use dnsq_proto::{Message, Name, OpCode, Question, RecordType, ResourceRecord};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// A response with one question and a CNAME chain ending in two A records,
/// every owner name compressed against the question.
fn compressed_response() -> Vec<u8> {
    let mut wire = vec![
        0xAB, 0xCD, 0x81, 0x80, 0x00, 0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00,
    ];
    wire.extend_from_slice(b"\x03www\x07example\x03com\x00\x00\x01\x00\x01");

    // www.example.com CNAME edge.example.com
    wire.extend_from_slice(&[0xC0, 0x0C, 0x00, 0x05, 0x00, 0x01, 0, 0, 0x0E, 0x10, 0x00, 0x07]);
    wire.extend_from_slice(b"\x04edge\xC0\x10");

    // edge.example.com A x2
    for last in [1u8, 2] {
        wire.extend_from_slice(&[0xC0, 0x2D, 0x00, 0x01, 0x00, 0x01, 0, 0, 0x01, 0x2C, 0x00, 0x04]);
        wire.extend_from_slice(&[192, 0, 2, last]);
    }
    wire
}

fn parsing_benchmarks(c: &mut Criterion) {
    let response = compressed_response();

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(response.len() as u64));
    group.bench_function("compressed_response", |b| {
        b.iter(|| Message::parse(black_box(&response)))
    });
    group.bench_function("compressed_name", |b| {
        let parser = NameParser::new(&response);
        b.iter(|| parser.parse_name(black_box(0x2D)))
    });
    group.finish();

    let question = Question::new(Name::from_str("www.example.com").unwrap(), RecordType::A);
    c.bench_function("encode_request", |b| {
        b.iter(|| {
            Message::encode_request(black_box(0x1234), OpCode::Query, true, &[question.clone()])
        })
    });

    let mut message = Message::query(1, question.clone());
    for i in 0..16 {
        message.add_answer(ResourceRecord::a(
            Name::from_str("www.example.com").unwrap(),
            300,
            Ipv4Addr::new(192, 0, 2, i),
        ));
    }
    message.add_authority(
        ResourceRecord::from_rdata(
            Name::from_str("example.com").unwrap(),
            3600,
            RData::NS(Name::from_str("ns1.example.com").unwrap()),
        )
        .unwrap(),
    );
    c.bench_function("to_wire_17_records", |b| b.iter(|| black_box(&message).to_wire()));

    c.bench_function("reverse_name_ipv6", |b| {
        b.iter(|| reverse_name(black_box("2001:db8:85a3::8a2e:370:7334")))
    });
}

criterion_group!(benches, parsing_benchmarks);
criterion_main!(benches);
