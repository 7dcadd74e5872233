//! Facade contents across add, remove and group-change passes.

use parcel_build::unit::BASE_TYPE;
use parcel_build::ExitCode;
use parcel_common::GroupKey;
use parcel_conformance::{package, Project};

// ===========================================================================
// Adding sources
// ===========================================================================

#[test]
fn facade_lists_every_member() {
    let p = Project::new();
    p.write("src/x/Alpha.p", &package("x"));
    p.write("src/x/Beta.p", &package("x"));

    let report = p.build_target("main");
    assert_eq!(report.summary.exit, ExitCode::Ok);
    assert_eq!(p.facade_members("main", "x"), vec!["x.Alpha", "x.Beta"]);

    let facade = p.facade("main", "x").unwrap();
    assert_eq!(facade.name, "x/PackageFacade");
    assert_eq!(facade.super_name, BASE_TYPE);
    let names: Vec<&str> = facade.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[test]
fn per_source_units_are_empty_types() {
    let p = Project::new();
    p.write("src/x/Alpha.p", &package("x"));
    p.build();

    let unit = p.unit("main", "x", "Alpha").unwrap();
    assert_eq!(unit.name, "x/Alpha");
    assert!(unit.fields.is_empty());
}

#[test]
fn adding_a_member_extends_the_facade() {
    let p = Project::new();
    p.write("src/x/Beta.p", &package("x"));
    p.build();
    assert_eq!(p.facade_members("main", "x"), vec!["x.Beta"]);

    p.write("src/x/Alpha.p", &package("x"));
    let report = p.build_target("main");
    assert_eq!(report.summary.compiled.len(), 1);
    assert_eq!(p.facade_members("main", "x"), vec!["x.Alpha", "x.Beta"]);
}

#[test]
fn members_in_other_directories_are_found_through_previous_facade() {
    let p = Project::new();
    p.write("src/one/Alpha.p", &package("x"));
    p.write("src/two/Beta.p", &package("x"));
    p.build();
    assert_eq!(p.facade_members("main", "x"), vec!["x.Alpha", "x.Beta"]);

    p.write("src/one/Gamma.p", &package("x"));
    p.build();
    assert_eq!(
        p.facade_members("main", "x"),
        vec!["x.Alpha", "x.Beta", "x.Gamma"]
    );
}

#[test]
fn editing_a_member_keeps_members_in_other_directories() {
    let p = Project::new();
    p.write("src/one/Alpha.p", &package("x"));
    p.write("src/two/Beta.p", &package("x"));
    p.build();

    p.write("src/one/Alpha.p", "package x; // edited\n");
    p.build();
    assert_eq!(p.facade_members("main", "x"), vec!["x.Alpha", "x.Beta"]);
}

#[test]
fn field_names_follow_decapitalization() {
    let p = Project::new();
    p.write("src/x/URLParser.p", &package("x"));
    p.write("src/x/Widget.p", &package("x"));
    p.build();

    let facade = p.facade("main", "x").unwrap();
    let names: Vec<&str> = facade.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["URLParser", "widget"]);
}

#[test]
fn duplicate_base_names_share_one_field() {
    let p = Project::new();
    p.write("src/one/Alpha.p", &package("x"));
    p.write("src/two/Alpha.p", &package("x"));
    p.build();
    assert_eq!(p.facade_members("main", "x"), vec!["x.Alpha"]);
}

#[test]
fn nested_group_maps_to_nested_directories() {
    let p = Project::new();
    p.write("src/Alpha.p", &package("a.b"));
    p.build();

    assert!(p.unit_path("main", "a.b", "PackageFacade").ends_with("a/b/PackageFacade.unit"));
    assert_eq!(p.facade_members("main", "a.b"), vec!["a.b.Alpha"]);
}

// ===========================================================================
// Removing sources
// ===========================================================================

#[test]
fn removing_a_member_shrinks_the_facade() {
    let p = Project::new();
    p.write("src/x/Alpha.p", &package("x"));
    p.write("src/x/Beta.p", &package("x"));
    p.build();

    p.remove("src/x/Beta.p");
    let report = p.build_target("main");
    assert_eq!(report.summary.exit, ExitCode::Ok);
    assert!(report.summary.compiled.is_empty());
    assert_eq!(p.facade_members("main", "x"), vec!["x.Alpha"]);
    assert!(p.unit("main", "x", "Beta").is_none());
}

#[test]
fn removing_the_last_member_skips_the_group() {
    let p = Project::new();
    p.write("src/x/Alpha.p", &package("x"));
    p.build();

    p.remove("src/x/Alpha.p");
    let report = p.build_target("main");
    assert_eq!(report.summary.exit, ExitCode::Ok);
    assert!(report.summary.facades.is_empty());
    assert_eq!(
        report.summary.skipped,
        vec![("main".to_string(), GroupKey::new("x"))]
    );
    assert!(p.facade("main", "x").is_none());
}

#[test]
fn removing_a_whole_directory_is_not_an_error() {
    let p = Project::new();
    p.write("src/gone/Alpha.p", &package("x"));
    p.write("src/kept/Beta.p", &package("x"));
    p.build();

    std::fs::remove_dir_all(p.root().join("src/gone")).unwrap();
    p.build();
    assert_eq!(p.facade_members("main", "x"), vec!["x.Beta"]);
}

// ===========================================================================
// Changing groups
// ===========================================================================

#[test]
fn group_change_updates_both_facades_in_one_pass() {
    let p = Project::new();
    p.write("src/x/Alpha.p", &package("x"));
    p.write("src/x/Beta.p", &package("x"));
    p.build();

    p.write("src/x/Alpha.p", &package("y"));
    let report = p.build_target("main");

    let groups: Vec<&GroupKey> = report.summary.facades.iter().map(|(_, g)| g).collect();
    assert_eq!(groups, vec![&GroupKey::new("x"), &GroupKey::new("y")]);
    assert_eq!(p.facade_members("main", "x"), vec!["x.Beta"]);
    assert_eq!(p.facade_members("main", "y"), vec!["y.Alpha"]);

    let alpha = p.root().join("src/x/Alpha.p");
    let key = parcel_common::system_independent(&alpha);
    assert_eq!(p.store("main").get(&key), Some(&GroupKey::new("y")));
}

#[test]
fn moving_into_an_existing_group_joins_its_facade() {
    let p = Project::new();
    p.write("src/x/Alpha.p", &package("x"));
    p.write("src/y/Beta.p", &package("y"));
    p.build();

    p.write("src/x/Alpha.p", &package("y"));
    p.build();
    assert_eq!(p.facade_members("main", "y"), vec!["y.Alpha", "y.Beta"]);
}

// ===========================================================================
// Missing or malformed declarations
// ===========================================================================

#[test]
fn undeclared_sources_share_the_default_facade() {
    let p = Project::new();
    p.write("src/Gamma.p", &package(""));
    p.write("src/util/Delta.p", &package(""));
    p.build();

    assert_eq!(p.facade_members("main", ""), vec!["Delta", "Gamma"]);
    assert!(p.output_dir("main").join("PackageFacade.unit").exists());
    assert!(p.output_dir("main").join("Gamma.unit").exists());
}

#[test]
fn malformed_declaration_falls_back_to_default_group() {
    let p = Project::new();
    p.write("src/Alpha.p", "package x\n");
    p.write("src/Beta.p", "  package   x  ; // trailing\n");
    p.build();

    assert_eq!(p.facade_members("main", ""), vec!["Alpha"]);
    assert_eq!(p.facade_members("main", "x"), vec!["x.Beta"]);
}

#[test]
fn declaration_must_open_the_file() {
    let p = Project::new();
    p.write("src/Alpha.p", "// header\npackage x;\n");
    p.build();
    assert_eq!(p.facade_members("main", ""), vec!["Alpha"]);
}
