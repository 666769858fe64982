//! Reading in an environment that differs from the writer's.

use crate::common::*;
use std::io::Cursor;
use verpack::{Error, MismatchKind, PackageScope, StaticIndex, TypeRegistry};

fn upgraded_index() -> StaticIndex {
    StaticIndex::new()
        .with_distribution("geo-types", "0.8.0", ["geo_types"])
        .with_distribution("toolbox", "2.1.0", ["toolbox", "numbers"])
        .with_distribution("itoa", "1.0.11", ["itoa"])
}

#[test]
fn version_change_is_reported_once() {
    let bytes = writer().dumps(&point(1, 1)).unwrap();
    let (reader, sink) = collecting(environment(upgraded_index(), &[]));

    let (back, report) = reader.loads(&bytes).unwrap();
    assert_eq!(back, point(1, 1));

    let report = report.unwrap();
    assert_eq!(report.len(), 1);
    let m = report.get("geo-types").unwrap();
    assert_eq!(m.kind, MismatchKind::VersionChanged);
    assert_eq!(m.old_version.as_deref(), Some("0.7.13"));
    assert_eq!(m.new_version.as_deref(), Some("0.8.0"));

    assert_eq!(sink.take(), vec![report]);
}

#[test]
fn removed_distribution_is_missing_now() {
    let bytes = writer().dumps(&shapes_with_cycle()).unwrap();
    let index = StaticIndex::new().with_distribution("geo-types", "0.7.13", ["geo_types"]);
    let (reader, sink) = collecting(environment(index, &[]));

    let (_, report) = reader.loads(&bytes).unwrap();
    let report = report.unwrap();
    let missing: Vec<_> = report
        .of_kind(MismatchKind::MissingNow)
        .map(|m| m.distribution.as_str())
        .collect();
    assert_eq!(missing, vec!["toolbox"]);
    assert_eq!(report.len(), 1);
    assert_eq!(sink.len(), 1);
}

#[test]
fn installed_scope_reports_new_distribution_as_missing_then() {
    let vp = writer().with_scope(PackageScope::Installed);
    let bytes = vp.dumps(&point(0, 0)).unwrap();
    let (reader, _sink) = collecting(environment(
        writing_index().with_distribution("serde", "1.0.203", ["serde"]),
        &[],
    ));

    let report = reader.loads(&bytes).unwrap().1.unwrap();
    assert_eq!(report.len(), 1);
    let m = report.get("serde").unwrap();
    assert_eq!(m.kind, MismatchKind::MissingThen);
    assert_eq!(m.old_version, None);
    assert_eq!(m.new_version.as_deref(), Some("1.0.203"));
}

#[test]
fn object_scope_ignores_unrelated_distributions() {
    let bytes = writer().dumps(&point(0, 0)).unwrap();
    let (reader, sink) = collecting(environment(
        writing_index()
            .with_distribution("serde", "1.0.203", ["serde"])
            .with_distribution("itoa", "1.0.12", ["itoa"]),
        &[],
    ));

    let report = reader.loads(&bytes).unwrap().1.unwrap();
    assert!(report.is_empty());
    assert!(sink.is_empty());
}

#[test]
fn no_version_normalization() {
    let bytes = writer().dumps(&point(0, 0)).unwrap();
    let index = StaticIndex::new().with_distribution("geo-types", "0.7.13+build5", ["geo_types"]);
    let (reader, _sink) = collecting(environment(index, &[]));

    let report = reader.loads(&bytes).unwrap().1.unwrap();
    assert_eq!(report.get("geo-types").unwrap().kind, MismatchKind::VersionChanged);
}

#[test]
fn runtime_version_difference_is_not_a_mismatch() {
    let bytes = writer().dumps(&point(0, 0)).unwrap();
    let env = environment(writing_index(), &[]).with_runtime_version("verpack-tests/2");
    let (reader, sink) = collecting(env);

    assert!(reader.loads(&bytes).unwrap().1.unwrap().is_empty());
    assert!(sink.is_empty());
}

#[test]
fn payload_failure_delivers_report_then_error() {
    let mut bytes = writer().dumps(&point(5, 5)).unwrap();
    bytes.truncate(bytes.len() - 2);
    let (reader, sink) = collecting(environment(upgraded_index(), &[]));

    let err = reader.loads(&bytes).unwrap_err();
    assert!(err.is_decode_failure(), "unexpected error {:?}", err);

    let reports = sink.take();
    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0].get("geo-types").unwrap().kind,
        MismatchKind::VersionChanged
    );
}

#[test]
fn strict_registry_rejects_unknown_types() {
    let bytes = writer().dumps(&shapes_with_cycle()).unwrap();
    let (reader, _sink) = collecting(environment(writing_index(), &[]));

    let only_points = TypeRegistry::strict().with_type(point_type());
    match reader.with_types(only_points).loads(&bytes) {
        Err(Error::UnknownType(t)) => assert_eq!(t, ratio_type()),
        other => panic!("expected UnknownType, got {:?}", other),
    }

    let (reader, _sink) = collecting(environment(writing_index(), &[]));
    let (back, _) = reader.with_types(fixture_types()).loads(&bytes).unwrap();
    assert_eq!(back, shapes_with_cycle());
}

#[test]
fn unreachable_objects_are_not_written() {
    let mut b = verpack::GraphBuilder::new();
    let x = b.int(9);
    let _orphan = b.instance(point_type(), [("x", x)]);
    let root = b.int(5);
    let object = b.finish(root).unwrap();

    let vp = writer();
    let frame = vp
        .load_with_header(&mut Cursor::new(vp.dumps(&object).unwrap()))
        .unwrap();
    assert!(frame.header.unwrap().packages.is_empty());

    let (reader, _sink) = collecting(environment(writing_index(), &[]));
    let strict = reader.with_types(TypeRegistry::strict());
    let (back, _) = strict.loads(&vp.dumps(&object).unwrap()).unwrap();
    assert_eq!(back, object);
    assert_eq!(back.node_count(), 1);
}

#[test]
fn report_display_lists_every_difference() {
    let bytes = writer().dumps(&shapes_with_cycle()).unwrap();
    let index = StaticIndex::new().with_distribution("geo-types", "0.9.0", ["geo_types"]);
    let (reader, _sink) = collecting(environment(index, &[]));

    let text = reader.load(&mut Cursor::new(bytes)).unwrap().1.unwrap().to_string();
    assert!(text.contains("geo-types: 0.7.13 -> 0.9.0"));
    assert!(text.contains("toolbox: 2.1.0 -> <missing>"));
}
