#![allow(dead_code)]

pub mod fixtures {
    use serde_json::{json, Value};
    use std::fs;
    use std::path::{Path, PathBuf};

    /// A small shop backend: one endpoint, an entity chain, an enum.
    pub fn shop_document() -> Value {
        json!({
            "openapi": "3.0.1",
            "info": {"title": "Shop", "version": "2.1.0"},
            "paths": {
                "/DateTimeEndpoint/echoDate": {
                    "post": {
                        "requestBody": {"content": {"application/json": {"schema": {
                            "type": "object",
                            "properties": {"date": {"type": "string", "nullable": true}}
                        }}}},
                        "responses": {"200": {"content": {"application/json": {
                            "schema": {"type": "string", "nullable": true}
                        }}}}
                    }
                },
                "/OrderEndpoint/find": {
                    "post": {
                        "requestBody": {"content": {"application/json": {"schema": {
                            "type": "object",
                            "properties": {"id": {"type": "integer"}}
                        }}}},
                        "responses": {"200": {"content": {"application/json": {
                            "schema": {"$ref": "#/components/schemas/com.shop.Order"}
                        }}}}
                    }
                }
            },
            "components": {"schemas": {
                "com.shop.Entity": {
                    "type": "object",
                    "properties": {"id": {"type": "integer"}}
                },
                "com.shop.Order": {
                    "allOf": [
                        {"$ref": "#/components/schemas/com.shop.Entity"},
                        {"type": "object", "properties": {
                            "tags": {
                                "type": "array",
                                "nullable": true,
                                "items": {"type": "string"}
                            },
                            "code": {"anyOf": [{"type": "string"}, {"type": "integer"}]},
                            "status": {"$ref": "#/components/schemas/com.shop.Status"}
                        }}
                    ]
                },
                "com.shop.Status": {"type": "string", "enum": ["OPEN", "SHIPPED"]}
            }}
        })
    }

    /// Write the shop document as `openapi.json` into `dir`.
    pub fn write_schema(dir: &Path) -> PathBuf {
        let path = dir.join("openapi.json");
        fs::write(&path, serde_json::to_string_pretty(&shop_document()).unwrap()).unwrap();
        path
    }

    /// Write a views tree into `dir/views`; each entry is (relative path, source).
    pub fn write_views(dir: &Path, files: &[(&str, &str)]) -> PathBuf {
        let views = dir.join("views");
        for (relative, source) in files {
            let path = views.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, source).unwrap();
        }
        views
    }

    pub fn view_source(component: &str) -> String {
        format!("export default function {component}() {{\n  return null;\n}}\n")
    }

    pub fn protected_view_source(component: &str, roles: &[&str]) -> String {
        let roles: Vec<String> = roles.iter().map(|r| format!("'{r}'")).collect();
        format!(
            "export const config = {{ title: '{component}', rolesAllowed: [{}] }};\n\n{}",
            roles.join(", "),
            view_source(component)
        )
    }
}
