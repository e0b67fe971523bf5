/*
 * resource_names.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end tests: parse templates and tags from strings, edit the tag
 * list, and resolve resource names.
 */

use lcfg_tags::{Change, TagError, TagList, TemplateChain, build_resource_name};
use pretty_assertions::assert_eq;

#[test]
fn test_names_for_each_tag() {
    let templates = TemplateChain::from_string("client_$ server_$").unwrap();
    let tags = TagList::from_string("web devel prod").unwrap();

    let names: Vec<String> = tags
        .iter()
        .map(|tag| {
            let single = TagList::from_string(tag.name()).unwrap();
            build_resource_name(&templates, &single, "client").unwrap()
        })
        .collect();

    assert_eq!(names, vec!["client_web", "client_devel", "client_prod"]);
}

#[test]
fn test_nested_lists() {
    // A two-level list: outer tag "eth0", inner tag "addr".
    let templates = TemplateChain::from_string("iface_$ option_$_$").unwrap();
    let mut context = TagList::from_string("eth0").unwrap();
    assert_eq!(
        build_resource_name(&templates, &context, "iface").unwrap(),
        "iface_eth0"
    );

    context.mutate_append("addr").unwrap();
    assert_eq!(
        build_resource_name(&templates, &context, "option").unwrap(),
        "option_eth0_addr"
    );
}

#[test]
fn test_rename_then_build() {
    let templates = TemplateChain::from_string("pkg_$").unwrap();
    let mut tags = TagList::from_string("old other").unwrap();

    assert_eq!(
        tags.mutate_replace("other", "new", true).unwrap(),
        Change::Replaced
    );
    assert_eq!(
        build_resource_name(&templates, &tags, "pkg").unwrap(),
        "pkg_new"
    );
}

#[test]
fn test_errors_carry_messages() {
    let templates = TemplateChain::from_string("foo_$_$").unwrap();
    let tags = TagList::from_string("a").unwrap();

    let err = build_resource_name(&templates, &tags, "missing").unwrap_err();
    assert_eq!(err.to_string(), "Failed to find template for field 'missing'");
    assert_eq!(err.code(), "L-TAG-5");

    let err = build_resource_name(&templates, &tags, "foo").unwrap_err();
    assert!(matches!(err, TagError::InsufficientTags { .. }));
    assert_eq!(err.code(), "L-TAG-6");
}

#[test]
fn test_templates_roundtrip() {
    let input = "foo_$ bar_$_$ baz_x_$_y";
    let templates: TemplateChain = input.parse().unwrap();
    assert_eq!(templates.to_string(), input);
}
