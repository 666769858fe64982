//! Same-environment round trips under every scope.

use crate::common::*;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::io::Cursor;
use verpack::{PackageScope, Verpack};

#[test]
fn every_scope_round_trips_with_empty_report() {
    let vp = writer();
    for scope in PackageScope::ALL {
        for object in [point(3, 4), shapes_with_cycle(), plain("hello")] {
            let mut buf = Vec::new();
            vp.dump_with_scope(&object, &mut buf, scope).unwrap();
            let (back, report) = vp.load(&mut Cursor::new(buf)).unwrap();
            assert_eq!(back, object, "scope {}", scope);
            assert!(report.unwrap().is_empty(), "scope {}", scope);
        }
    }
}

#[test]
fn header_records_scope_and_runtime() {
    let vp = writer();
    let frame = vp
        .load_with_header(&mut Cursor::new(vp.dumps(&shapes_with_cycle()).unwrap()))
        .unwrap();
    let header = frame.header.unwrap();
    assert_eq!(header.runtime_version, "verpack-tests/1");
    assert_eq!(header.package_scope, Some(PackageScope::Object));
    let names: Vec<_> = header.packages.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["geo-types", "toolbox"]);
}

#[test]
fn loaded_scope_records_loaded_and_object_distributions() {
    let vp = writer().with_scope(PackageScope::Loaded);
    let frame = vp
        .load_with_header(&mut Cursor::new(vp.dumps(&point(0, 0)).unwrap()))
        .unwrap();
    let names: Vec<_> = frame.header.unwrap().packages.into_keys().collect();
    assert_eq!(names, vec!["geo-types".to_string(), "itoa".to_string()]);
}

fn recorded(vp: &Verpack, object: &verpack::ObjectGraph, scope: PackageScope) -> BTreeSet<String> {
    let mut buf = Vec::new();
    vp.dump_with_scope(object, &mut buf, scope).unwrap();
    let frame = vp.load_with_header(&mut Cursor::new(buf)).unwrap();
    frame.header.unwrap().packages.into_keys().collect()
}

#[test]
fn headers_nest_by_scope_with_empty_module_registry() {
    // Nothing marked loaded, as with a fresh process-wide registry
    let (vp, _sink) = collecting(environment(writing_index(), &[]));
    for object in [point(1, 2), shapes_with_cycle(), plain("x")] {
        let object_scope = recorded(&vp, &object, PackageScope::Object);
        let loaded = recorded(&vp, &object, PackageScope::Loaded);
        let installed = recorded(&vp, &object, PackageScope::Installed);
        assert!(object_scope.is_subset(&loaded), "{:?} vs {:?}", object_scope, loaded);
        assert!(loaded.is_subset(&installed), "{:?} vs {:?}", loaded, installed);
    }
}

#[test]
fn scalar_object_has_empty_package_map() {
    let vp = writer();
    let frame = vp
        .load_with_header(&mut Cursor::new(vp.dumps(&plain("x")).unwrap()))
        .unwrap();
    assert!(frame.header.unwrap().packages.is_empty());
}

#[test]
fn frames_can_be_concatenated() {
    let vp = writer();
    let mut buf = Vec::new();
    vp.dump(&point(1, 2), &mut buf).unwrap();
    vp.dump(&plain("second"), &mut buf).unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(vp.load(&mut cursor).unwrap().0, point(1, 2));
    assert_eq!(vp.load(&mut cursor).unwrap().0, plain("second"));
}

#[test]
fn shared_facade_across_threads() {
    let vp = writer();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let vp: Verpack = vp.clone();
            std::thread::spawn(move || {
                let object = point(i, -i);
                let (back, report) = vp.loads(&vp.dumps(&object).unwrap()).unwrap();
                assert_eq!(back, object);
                assert!(report.unwrap().is_empty());
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

proptest! {
    #[test]
    fn prop_points_round_trip(x in any::<i64>(), y in any::<i64>(), scope in 0usize..3) {
        let vp = writer().with_scope(PackageScope::ALL[scope]);
        let object = point(x, y);
        let (back, report) = vp.loads(&vp.dumps(&object).unwrap()).unwrap();
        prop_assert_eq!(back, object);
        prop_assert!(report.unwrap().is_empty());
    }
}
