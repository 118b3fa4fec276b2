#![allow(dead_code)]

use routetree::{RouteTree, ValidatorRegistry};

/// Route table shared by the integration suites.
pub fn zoo_table_yaml() -> &'static str {
    r#"
routes:
  - path: /
    handlers: [root_handler]
  - path: /zoo/animals
    handlers: [get_animals]
  - path: /zoo/animals/:id
    handlers: [get_animal]
  - path: /zoo/animals/:id/toys/:toy_id(\d+)
    handlers: [animal_toy]
  - path: /zoo/:category/animals/:id/habitats/:habitat_id|isNum|
    handlers: [habitat]
  - path: /zoo/health
    handlers: [health_check]
  - path: /assets/*file
    handlers: [assets]
  - path: /archive/*/index
    handlers: [archive_index]
"#
}

pub fn zoo_tree() -> RouteTree<String> {
    let table = routetree::RouteTable::parse(zoo_table_yaml(), routetree::table::TableFormat::Yaml)
        .expect("failed to parse route table");
    table
        .into_tree(&ValidatorRegistry::with_builtins())
        .expect("failed to build route tree")
}

pub fn assert_route_match(tree: &RouteTree<String>, path: &str, expected_handler: &str) {
    match tree.lookup(path) {
        Some(matched) => {
            println!("✅ {} → {:?} {:?}", path, matched.handlers, matched.params);
            assert_eq!(
                matched.handlers.first().map(String::as_str),
                Some(expected_handler),
                "Handler mismatch for {path}"
            );
        }
        None => {
            println!("❌ {} → no match", path);
            assert_eq!(expected_handler, "<none>", "Expected route to match for {path}");
        }
    }
}
