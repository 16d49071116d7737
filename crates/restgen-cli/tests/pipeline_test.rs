//! Integration tests running pipeline commands against a temporary root.

use restgen_cli::GlobalArgs;
use restgen_cli::commands::{generate, index, publish};
use restgen_core::cli::{ExitCode, OutputFormat};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn global(root: &Path) -> GlobalArgs {
    GlobalArgs {
        config: None,
        root: Some(root.to_path_buf()),
    }
}

fn write_schema(root: &Path, key: &str, schema: &serde_json::Value) {
    let dir = root.join("schemas");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{key}.json")),
        serde_json::to_string_pretty(schema).unwrap(),
    )
    .unwrap();
}

fn js_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| Path::new(name).extension().is_some_and(|ext| ext == "js"))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_index_then_generate() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    let code = index::run(&global(root), false, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(root.join("service-index.json").exists());

    write_schema(
        root,
        "wql_v1",
        &json!({
            "openapi": "3.0.0",
            "servers": [{"url": "https://{tenant}.example.com/api/wql/v1/{tenant}"}],
            "paths": {
                "/data": {
                    "get": {"operationId": "getData", "summary": "Run a query"},
                    "post": {"operationId": "postData", "requestBody": {"content": {}}}
                }
            }
        }),
    );

    let code = generate::run(&global(root), None, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let tools = root.join("tools");
    assert_eq!(js_files(&tools.join("wql")).len(), 2);
    assert!(tools.join("wql").join("manifest.json").exists());

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tools.join("generation-summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["totalServices"], 1);
    assert_eq!(summary["totalTools"], 2);
}

#[tokio::test]
async fn test_regeneration_removes_dropped_operations() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    index::run(&global(root), false, OutputFormat::Text)
        .await
        .unwrap();

    write_schema(
        root,
        "wql_v1",
        &json!({"openapi": "3.0.0", "paths": {"/a": {"get": {}}, "/b": {"get": {}}}}),
    );
    generate::run(&global(root), None, OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(js_files(&root.join("tools/wql")).len(), 2);

    write_schema(
        root,
        "wql_v1",
        &json!({"openapi": "3.0.0", "paths": {"/a": {"get": {}}}}),
    );
    generate::run(&global(root), None, OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(js_files(&root.join("tools/wql")).len(), 1);
}

#[tokio::test]
async fn test_generate_without_schemas_reports_error_code() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    index::run(&global(root), false, OutputFormat::Json)
        .await
        .unwrap();

    let code = generate::run(&global(root), None, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::ERROR);
}

#[tokio::test]
async fn test_generate_without_index_fails() {
    let temp = TempDir::new().unwrap();
    let err = generate::run(&global(temp.path()), None, OutputFormat::Json)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("restgen index"));
}

#[tokio::test]
async fn test_generate_honours_tools_dir_override() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    index::run(&global(root), false, OutputFormat::Json)
        .await
        .unwrap();
    write_schema(
        root,
        "graph_v1",
        &json!({"swagger": "2.0", "basePath": "/graph/v1", "paths": {"/nodes": {"get": {}}}}),
    );

    let out = root.join("out");
    generate::run(&global(root), Some(out.clone()), OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(js_files(&out.join("graph")).len(), 1);
    assert!(!root.join("tools").exists());
}

#[tokio::test]
async fn test_publish_without_generated_tools_fails() {
    let temp = TempDir::new().unwrap();
    let err = publish::run(
        &global(temp.path()),
        Some("http://127.0.0.1:9".to_string()),
        None,
        vec![],
        true,
        OutputFormat::Json,
    )
    .await
    .unwrap_err();
    assert!(format!("{err:#}").contains("restgen generate"));
}

#[tokio::test]
async fn test_publish_rejects_invalid_registry_url() {
    let temp = TempDir::new().unwrap();
    let err = publish::run(
        &global(temp.path()),
        Some("registry.local".to_string()),
        None,
        vec![],
        true,
        OutputFormat::Json,
    )
    .await
    .unwrap_err();
    assert!(format!("{err:#}").contains("registry_url"));
}
