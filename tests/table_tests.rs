mod common;

use routetree::table::TableFormat;
use routetree::{RouteTable, ValidatorRegistry};
use std::io::Write;

fn write_table(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_yaml_table() {
    let file = write_table(".yaml", common::zoo_table_yaml());
    let table = RouteTable::load(file.path()).unwrap();
    assert_eq!(table.routes.len(), 8);
    assert_eq!(table.routes[1].path, "/zoo/animals");
    assert_eq!(table.routes[1].handlers, ["get_animals"]);
}

#[test]
fn test_load_json_and_toml_tables_agree() {
    let json = write_table(
        ".json",
        r#"{"routes": [
            {"path": "/blog/:id|isNum|", "handlers": ["auth", "show"]},
            {"path": "/static/*file", "handlers": ["files"]}
        ]}"#,
    );
    let toml = write_table(
        ".toml",
        r#"
[[routes]]
path = "/blog/:id|isNum|"
handlers = ["auth", "show"]

[[routes]]
path = "/static/*file"
handlers = ["files"]
"#,
    );

    let from_json = RouteTable::load(json.path()).unwrap();
    let from_toml = RouteTable::load(toml.path()).unwrap();
    assert_eq!(from_json, from_toml);

    let tree = from_json
        .into_tree(&ValidatorRegistry::with_builtins())
        .unwrap();
    let matched = tree.lookup("/blog/9").unwrap();
    assert_eq!(matched.handlers, ["auth".to_string(), "show".to_string()]);
}

#[test]
fn test_entries_without_handlers_are_skipped() {
    let table = RouteTable::parse(
        "routes:\n  - path: /draft\n  - path: /live\n    handlers: [live]\n",
        TableFormat::Yaml,
    )
    .unwrap();
    let tree = table.into_tree(&ValidatorRegistry::new()).unwrap();
    assert!(tree.lookup("/draft").is_none());
    assert!(tree.lookup("/live").is_some());
    assert_eq!(tree.routes(), ["/live".to_string()]);
}

#[test]
fn test_unsupported_extension() {
    let file = write_table(".ini", "routes = []");
    let err = RouteTable::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("unsupported route table extension"));
}

#[test]
fn test_parse_error_names_the_file() {
    let file = write_table(".json", "{ not json");
    let err = RouteTable::load(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse route table"));
}

#[test]
fn test_missing_file() {
    let err = RouteTable::load("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read route table"));
}

#[test]
fn test_build_failure_is_reported() {
    let file = write_table(
        ".yaml",
        "routes:\n  - path: /a/:id\n    handlers: [a]\n  - path: /a/:name\n    handlers: [b]\n",
    );
    let table = RouteTable::load(file.path()).unwrap();
    let err = table.into_tree(&ValidatorRegistry::new()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Failed to build route tree"));
    assert!(message.contains("ambiguous route"));
}
