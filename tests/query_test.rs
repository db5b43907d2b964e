extern crate fdt_lookup;

mod common;

use common::*;
use fdt_lookup::base::*;
use fdt_lookup::error::{DevTreeError, HeaderError, PathError};

#[test]
fn chosen_bootargs() {
    let blob = chosen_blob();
    assert_eq!(get_property_str(&blob, "/chosen", "bootargs"), Ok("console=ttyS0"));

    let prop = get_property(&blob, "/chosen", "bootargs").unwrap();
    assert_eq!(prop.name(), Ok("bootargs"));
    assert_eq!(prop.length(), "console=ttyS0".len() + 1);
    assert!(prop.is_printable_str());
}

#[test]
fn missing_property() {
    let blob = chosen_blob();
    assert_eq!(get_property_u32(&blob, "/chosen", "missing"), Err(DevTreeError::NotFound));
    assert_eq!(get_property_str(&blob, "/missing", "bootargs"), Err(DevTreeError::NotFound));
}

#[test]
fn malformed_paths_are_not_lookup_failures() {
    let blob = chosen_blob();

    let err = get_property(&blob, "//", "bootargs").unwrap_err();
    assert_eq!(err, DevTreeError::InvalidPath(PathError::SlashOnly));
    assert!(err.is_path_error());
    assert!(!DevTreeError::NotFound.is_path_error());

    let codes: Vec<i32> = ["", "/", "//", "/chosen//x"]
        .iter()
        .map(|path| match get_property(&blob, path, "bootargs") {
            Err(DevTreeError::InvalidPath(e)) => e.code(),
            other => panic!("{:?} gave {:?}", path, other),
        })
        .collect();
    assert_eq!(codes, [-10, -10, -11, -12]);
}

#[test]
fn slash_placement_is_tolerated() {
    let blob = chosen_blob();
    for path in &["chosen", "/chosen", "chosen/", "/chosen/"] {
        assert_eq!(get_property_str(&blob, path, "bootargs"), Ok("console=ttyS0"), "{}", path);
    }
}

#[test]
fn value_aliases_the_buffer() {
    let blob = board_blob();
    let value = get_property_value(&blob, "/soc/ethernet@1000", "local-mac-address").unwrap();
    assert_eq!(value, &[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    assert!(blob.as_ptr_range().contains(&value.as_ptr()));

    let prop = get_property(&blob, "/soc/ethernet@1000", "local-mac-address").unwrap();
    assert_eq!(peek(&blob, prop.offset()), 3);
    assert_eq!(prop.raw().as_ptr(), value.as_ptr());
}

#[test]
fn u32_values() {
    let blob = board_blob();
    assert_eq!(get_property_u32(&blob, "/soc/ethernet@2000", "reg"), Ok(0x2000));
    assert_eq!(get_property_u32(&blob, "/soc/serial@3000", "reg"), Ok(0x3000));
    // All bits set is a value, not a failure.
    assert_eq!(get_property_u32(&blob, "/soc/ethernet@1000/phy@0", "phandle"), Ok(0xffff_ffff));
}

#[test]
fn typed_accessors_check_the_value() {
    let blob = board_blob();
    let devtree = DevTree::new(&blob).unwrap();
    let mismatch = Err(DevTreeError::TypeMismatch);

    assert_eq!(devtree.prop_u32("/chosen", "bootargs"), mismatch);
    assert_eq!(devtree.prop_u32("/soc/serial@3000", "clock-frequency"), mismatch);
    assert_eq!(devtree.prop_u32("/soc/serial@3000", "empty"), mismatch);
    assert_eq!(devtree.prop_str("/soc/serial@3000", "empty").unwrap_err(), DevTreeError::TypeMismatch);
    assert_eq!(devtree.prop_str("/soc/serial@3000", "unterminated").unwrap_err(), DevTreeError::TypeMismatch);
    assert_eq!(devtree.prop_str("/chosen", "rng-seed").unwrap_err(), DevTreeError::TypeMismatch);

    assert_eq!(devtree.prop_value("/soc/serial@3000", "empty"), Ok(&[][..]));
    assert!(!devtree.prop("/chosen", "rng-seed").unwrap().is_printable_str());
}

#[test]
fn wildcard_segments() {
    let blob = board_blob();
    let devtree = DevTree::new(&blob).unwrap();

    // The first match in tree order wins.
    assert_eq!(devtree.prop_u32("/soc/ethernet*", "reg"), Ok(0x1000));
    assert_eq!(devtree.prop_u32("/s*/e*", "reg"), Ok(0x1000));
    assert_eq!(devtree.prop_u32("/*/serial*", "reg"), Ok(0x3000));
    assert_eq!(devtree.prop_str("/soc/ethernet*", "status"), Ok("disabled"));
    assert_eq!(devtree.prop_u32("/soc/ethernet*/phy*", "phandle"), Ok(0xffff_ffff));

    assert_eq!(devtree.prop_u32("/soc/ethernet", "reg"), Err(DevTreeError::NotFound));
    assert_eq!(devtree.prop_u32("/soc/ethernet@1000x*", "reg"), Err(DevTreeError::NotFound));
}

#[test]
fn depth_must_match_the_path() {
    let blob = board_blob();
    let devtree = DevTree::new(&blob).unwrap();

    // `reg` lives at depth 2.
    assert_eq!(devtree.prop_u32("/soc", "reg"), Err(DevTreeError::NotFound));
    assert_eq!(devtree.prop_u32("/soc/ethernet@1000/phy@0", "reg"), Err(DevTreeError::NotFound));
    assert_eq!(devtree.prop_u32("/*", "reg"), Err(DevTreeError::NotFound));
    assert_eq!(devtree.prop_u32("/*/*/*", "reg"), Err(DevTreeError::NotFound));
    assert_eq!(devtree.prop_u32("/*/*", "reg"), Ok(0x1000));
}

#[test]
fn root_properties_are_not_addressable() {
    let blob = board_blob();
    let devtree = DevTree::new(&blob).unwrap();
    assert_eq!(
        devtree.prop_str("/", "compatible"),
        Err(DevTreeError::InvalidPath(PathError::Empty))
    );
    assert_eq!(devtree.prop_str("/*", "compatible"), Err(DevTreeError::NotFound));
}

#[test]
fn repeated_queries_are_identical() {
    let blob = board_blob();
    let devtree = DevTree::new(&blob).unwrap();
    let first = devtree.prop("/soc/ethernet*", "local-mac-address").unwrap();
    for _ in 0..3 {
        let again = get_property(&blob, "/soc/ethernet*", "local-mac-address").unwrap();
        assert_eq!(again, first);
        assert_eq!(again.offset(), first.offset());
        assert_eq!(again.raw().as_ptr(), first.raw().as_ptr());
        assert_eq!(devtree.prop_u32("/soc/ethernet*", "reg"), Ok(0x1000));
    }
}

#[test]
fn query_without_name_inspects_the_tree() {
    let blob = board_blob();
    let devtree = DevTree::new(&blob).unwrap();
    assert_eq!(
        devtree.query("/chosen", None, &QueryOptions::default()),
        Err(DevTreeError::NotFound)
    );
    assert_eq!(
        get_property_with(&blob, "//", None, &QueryOptions::default()),
        Err(DevTreeError::InvalidPath(PathError::SlashOnly))
    );
}

#[test]
fn options_do_not_change_results() {
    let blob = board_blob();
    let opts = QueryOptions {
        verbose: true,
        report_errors: true,
    };
    let quiet = get_property_with(&blob, "/soc/serial*", Some("reg"), &QueryOptions::default());
    let loud = get_property_with(&blob, "/soc/serial*", Some("reg"), &opts);
    assert_eq!(quiet, loud);
    assert_eq!(loud.unwrap().get_u32(), Ok(0x3000));
}

#[test]
fn invalid_header_is_reported() {
    let mut blob = chosen_blob();
    poke(&mut blob, LAST_COMP_VERSION, 1);
    assert_eq!(
        get_property_str(&blob, "/chosen", "bootargs"),
        Err(DevTreeError::InvalidHeader(HeaderError::Version))
    );
    // Header problems come before path problems.
    assert_eq!(
        get_property(&blob, "//", "bootargs").unwrap_err(),
        DevTreeError::InvalidHeader(HeaderError::Version)
    );
}
