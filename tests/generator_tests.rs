#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use clientgen::config::GeneratorConfig;
use clientgen::generator::{generate_client_from_schema, generate_sources, WriteOptions};
use clientgen::spec::load_document_from_value;
use common::fixtures::{shop_document, write_schema};
use std::fs;

#[test]
fn test_generate_writes_endpoint_entity_and_model_files() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());
    let out = dir.path().join("generated");

    let summary = generate_client_from_schema(
        &schema,
        &out,
        &GeneratorConfig::default(),
        WriteOptions::default(),
    )
    .unwrap();

    // 2 endpoints + 3 entities (type + model each)
    assert_eq!(summary.written.len(), 8);
    for file in [
        "DateTimeEndpoint.ts",
        "OrderEndpoint.ts",
        "com/shop/Entity.ts",
        "com/shop/EntityModel.ts",
        "com/shop/Order.ts",
        "com/shop/OrderModel.ts",
        "com/shop/Status.ts",
        "com/shop/StatusModel.ts",
    ] {
        assert!(out.join(file).exists(), "missing {file}");
    }
}

#[test]
fn test_echo_date_endpoint_text() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());
    let out = dir.path().join("generated");
    generate_client_from_schema(&schema, &out, &GeneratorConfig::default(), WriteOptions::default())
        .unwrap();

    let text = fs::read_to_string(out.join("DateTimeEndpoint.ts")).unwrap();
    assert!(text.starts_with("/**\n * Generated by clientgen from openapi.json."));
    assert!(text.contains("import client from \"./connect-client.default.js\";"));
    assert!(text.contains(
        "async function _echoDate(\n  date: string | undefined,\n): Promise<string | undefined> {\n  return client.call(\"DateTimeEndpoint\", \"echoDate\", { date });\n}"
    ));
    assert!(text.contains("export { _echoDate as echoDate };"));
    assert!(text.contains("export const DateTimeEndpoint = Object.freeze({\n  echoDate: _echoDate,\n});"));
    assert!(text.contains("export default DateTimeEndpoint;"));

    let order = fs::read_to_string(out.join("OrderEndpoint.ts")).unwrap();
    assert!(order.contains("import type Order from \"./com/shop/Order.js\";"));
    assert!(order.contains("): Promise<Order> {"));
}

#[test]
fn test_model_validators_and_inheritance() {
    let doc = load_document_from_value(&shop_document()).unwrap();
    let generation = generate_sources(&doc, &GeneratorConfig::default(), "openapi.json");
    assert!(generation.failures.is_empty());

    let model = &generation.file("com/shop/OrderModel.ts").unwrap().contents;
    assert!(model.contains("import EntityModel from \"./EntityModel.js\";"));
    assert!(model.contains("class OrderModel<T extends Order = Order> extends EntityModel<T> {"));
    assert!(!model.contains("get id()"));
    assert!(model.contains("get tags(): ArrayModel<string, StringModel> {"));
    assert!(model.contains("(\"tags\", ArrayModel, [true, StringModel, [false]])"));
    // a union is modelled by its first branch
    assert!(model.contains("get code(): StringModel {"));
    assert!(model.contains("import StatusModel from \"./StatusModel.js\";"));

    let ty = &generation.file("com/shop/Order.ts").unwrap().contents;
    assert!(ty.contains("interface Order extends Entity {"));
    assert!(ty.contains("  tags?: ReadonlyArray<string>;"));

    let status = &generation.file("com/shop/Status.ts").unwrap().contents;
    assert!(status.contains("  OPEN = \"OPEN\","));
}

#[test]
fn test_rerun_reports_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());
    let out = dir.path().join("generated");
    let config = GeneratorConfig::default();

    let first = generate_client_from_schema(&schema, &out, &config, WriteOptions::default()).unwrap();
    let second = generate_client_from_schema(&schema, &out, &config, WriteOptions::default()).unwrap();

    assert!(second.written.is_empty());
    assert_eq!(second.unchanged.len(), first.written.len());
}

#[test]
fn test_hand_written_file_is_kept_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());
    let out = dir.path().join("generated");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("DateTimeEndpoint.ts"), "// mine\n").unwrap();

    let config = GeneratorConfig::default();
    let summary =
        generate_client_from_schema(&schema, &out, &config, WriteOptions::default()).unwrap();
    assert_eq!(summary.skipped, vec![out.join("DateTimeEndpoint.ts")]);
    assert_eq!(fs::read_to_string(out.join("DateTimeEndpoint.ts")).unwrap(), "// mine\n");

    let forced = WriteOptions { force: true, dry_run: false };
    generate_client_from_schema(&schema, &out, &config, forced).unwrap();
    assert!(fs::read_to_string(out.join("DateTimeEndpoint.ts"))
        .unwrap()
        .contains("echoDate"));
}

#[test]
fn test_dry_run_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());
    let out = dir.path().join("generated");
    let options = WriteOptions { force: false, dry_run: true };

    let summary =
        generate_client_from_schema(&schema, &out, &GeneratorConfig::default(), options).unwrap();
    assert_eq!(summary.planned.len(), 8);
    assert!(!out.exists());
}

#[test]
fn test_unsupported_document_version() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("swagger.json");
    fs::write(&schema, r#"{"swagger": "2.0", "paths": {}}"#).unwrap();
    let err = generate_client_from_schema(
        &schema,
        &dir.path().join("out"),
        &GeneratorConfig::default(),
        WriteOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("not supported"));
}
