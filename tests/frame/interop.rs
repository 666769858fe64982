//! Interoperability with streams that are not verpack frames, and with
//! decoders that do not know about frames.

use crate::common::*;
use std::io::Cursor;
use verpack::{
    GraphBuilder, GraphCodec, Header, MsgPackCodec, Node, NoopObserver, PackageScope,
    HEADER_MARKER,
};

fn plain_unit(graph: &verpack::ObjectGraph) -> Vec<u8> {
    let mut buf = Vec::new();
    MsgPackCodec
        .encode_unit(graph, &mut buf, &mut NoopObserver)
        .unwrap();
    buf
}

#[test]
fn headerless_stream_is_the_payload() {
    let (reader, sink) = collecting(environment(writing_index(), &[]));
    let (back, report) = reader.loads(&plain_unit(&point(7, 8))).unwrap();
    assert_eq!(back, point(7, 8));
    assert!(report.is_none());
    assert!(sink.is_empty());
}

#[test]
fn plain_decoder_sees_header_as_a_map() {
    let bytes = writer().dumps(&point(1, 2)).unwrap();
    let mut cursor = Cursor::new(bytes);

    let first = MsgPackCodec.decode_unit(&mut cursor).unwrap();
    let entries = first.root_node().as_map().unwrap();
    let marker = entries.iter().find(|(k, _)| k == "marker").unwrap().1;
    assert_eq!(first.get(marker).unwrap().as_str(), Some(HEADER_MARKER));

    let second = MsgPackCodec.decode_unit(&mut cursor).unwrap();
    assert_eq!(second, point(1, 2));
}

#[test]
fn user_map_that_looks_like_a_header_is_payload() {
    // Right marker, wrong field types
    let mut b = GraphBuilder::new();
    let marker = b.str(HEADER_MARKER);
    let version = b.str("one");
    let packages = b.list(vec![]);
    let root = b.map([
        ("marker", marker),
        ("format_version", version),
        ("packages", packages),
    ]);
    let lookalike = b.finish(root).unwrap();

    let (reader, _sink) = collecting(environment(writing_index(), &[]));
    let (back, report) = reader.loads(&plain_unit(&lookalike)).unwrap();
    assert_eq!(back, lookalike);
    assert!(report.is_none());
}

#[test]
fn header_from_newer_format_is_still_read() {
    let mut header = Header::from_snapshot(
        &environment(writing_index(), &[]).snapshot(&["geo-types"].into_iter().collect()),
        PackageScope::Object,
    );
    header.format_version = 9;

    let mut bytes = plain_unit(&header.to_graph().unwrap());
    bytes.extend(plain_unit(&point(2, 2)));

    let (reader, _sink) = collecting(environment(writing_index(), &[]));
    let frame = reader.load_with_header(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(frame.payload, point(2, 2));
    assert_eq!(frame.header.unwrap().format_version, 9);
    assert!(frame.report.unwrap().is_empty());
}

#[test]
fn header_without_scope_gets_full_comparison() {
    let mut header = Header::from_snapshot(
        &environment(writing_index(), &[]).snapshot(&["geo-types"].into_iter().collect()),
        PackageScope::Object,
    );
    header.package_scope = None;

    let mut bytes = plain_unit(&header.to_graph().unwrap());
    bytes.extend(plain_unit(&point(2, 2)));

    let (reader, _sink) = collecting(environment(writing_index(), &[]));
    let report = reader.loads(&bytes).unwrap().1.unwrap();
    let names: Vec<_> = report.iter().map(|m| m.distribution.as_str()).collect();
    assert_eq!(names, vec!["itoa", "toolbox"]);
}

#[test]
fn garbage_first_unit_is_an_error() {
    let (reader, _sink) = collecting(environment(writing_index(), &[]));
    assert!(reader.loads(&[0xc1, 0x00, 0x01]).is_err());
    assert!(reader.loads(&[]).is_err());
}

#[test]
fn scalar_payload_round_trips_without_header() {
    let graph = verpack::ObjectGraph::single(Node::Int(42)).unwrap();
    let (reader, _sink) = collecting(environment(writing_index(), &[]));
    let (back, report) = reader.loads(&plain_unit(&graph)).unwrap();
    assert_eq!(back, graph);
    assert!(report.is_none());
}
