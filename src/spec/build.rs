use super::types::{
    EntityBody, EntityDef, OperationDef, ParameterDef, Property, ReferenceSchema, SchemaBody,
    SchemaDocument, SchemaNode, ServiceDef,
};
use serde_json::Value;
use tracing::{debug, warn};

const METHODS: [&str; 8] = [
    "get", "post", "put", "delete", "patch", "options", "head", "trace",
];

/// Extract services and entities from a parsed OpenAPI 3 document.
///
/// # Errors
///
/// Returns an error when the document is not OpenAPI 3.x.
pub fn build_document(doc: &Value) -> anyhow::Result<SchemaDocument> {
    let version = doc.get("openapi").and_then(Value::as_str).unwrap_or("");
    if !version.starts_with("3.") {
        anyhow::bail!("OpenAPI version '{version}' is not supported (expected 3.x)");
    }

    let info = doc.get("info");
    let title = info
        .and_then(|i| i.get("title"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let api_version = info
        .and_then(|i| i.get("version"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(SchemaDocument {
        title,
        version: api_version,
        services: build_services(doc),
        entities: build_entities(doc),
    })
}

fn build_services(doc: &Value) -> Vec<ServiceDef> {
    let mut services: Vec<ServiceDef> = Vec::new();
    let Some(paths) = doc.get("paths").and_then(Value::as_object) else {
        return services;
    };

    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        let shared_params = item.get("parameters");
        for (method, operation) in item {
            let method = method.to_ascii_lowercase();
            if !METHODS.contains(&method.as_str()) {
                continue;
            }
            let service_name = service_name_for(path, operation);
            let op = build_operation(path, &method, &service_name, operation, shared_params);
            debug!(
                service = %service_name,
                operation = %op.name,
                method = %method,
                path = %path,
                parameters = op.parameters.len(),
                "Collected operation"
            );
            match services.iter_mut().find(|s| s.name == service_name) {
                Some(service) => service.operations.push(op),
                None => services.push(ServiceDef {
                    name: service_name,
                    operations: vec![op],
                }),
            }
        }
    }

    for service in &mut services {
        let mut seen = std::collections::HashSet::new();
        for op in &mut service.operations {
            if !seen.insert(op.name.clone()) {
                let unique = unique_operation_name(&seen, &op.name);
                warn!(
                    service = %service.name,
                    operation = %op.name,
                    renamed = %unique,
                    "Duplicate operation name"
                );
                seen.insert(unique.clone());
                op.name = unique;
            }
        }
    }
    services
}

fn unique_operation_name(seen: &std::collections::HashSet<String>, name: &str) -> String {
    let mut counter = 1;
    loop {
        let candidate = format!("{name}_{counter}");
        if !seen.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn service_name_for(path: &str, operation: &Value) -> String {
    if let Some(tag) = operation
        .get("tags")
        .and_then(Value::as_array)
        .and_then(|tags| tags.first())
        .and_then(Value::as_str)
    {
        return tag.to_string();
    }
    path_segments(path)
        .first()
        .filter(|s| !s.starts_with('{'))
        .map(|s| to_pascal_case(s))
        .unwrap_or_else(|| "Default".to_string())
}

fn operation_name_for(path: &str, method: &str, service: &str, operation: &Value) -> String {
    let segments = path_segments(path);
    if segments.len() == 2 && segments[0] == service && !segments[1].starts_with('{') {
        return segments[1].to_string();
    }
    if let Some(id) = operation.get("operationId").and_then(Value::as_str) {
        return to_camel_case(id);
    }
    let mut name = method.to_string();
    for segment in segments {
        let segment = segment.trim_start_matches('{').trim_end_matches('}');
        name.push_str(&to_pascal_case(segment));
    }
    name
}

fn build_operation(
    path: &str,
    method: &str,
    service: &str,
    operation: &Value,
    shared_params: Option<&Value>,
) -> OperationDef {
    let mut parameters = Vec::new();

    if let Some(body) = json_schema(operation.get("requestBody")) {
        match SchemaNode::from_value(body).body {
            SchemaBody::Object(properties) => {
                parameters.extend(properties.into_iter().map(|p| ParameterDef {
                    name: p.name,
                    schema: p.schema,
                    optional: false,
                }));
            }
            other => parameters.push(ParameterDef {
                name: "body".to_string(),
                schema: SchemaNode::new(other),
                optional: false,
            }),
        }
    }

    for declared in [shared_params, operation.get("parameters")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .flatten()
    {
        let Some(name) = declared.get("name").and_then(Value::as_str) else {
            continue;
        };
        // path parameters are always required
        let in_path = declared.get("in").and_then(Value::as_str) == Some("path");
        let required = in_path
            || declared
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false);
        let schema = declared
            .get("schema")
            .map(SchemaNode::from_value)
            .unwrap_or_else(|| SchemaNode::new(SchemaBody::String { enumeration: vec![] }));
        parameters.retain(|p: &ParameterDef| p.name != name);
        parameters.push(ParameterDef {
            name: name.to_string(),
            schema,
            optional: !required,
        });
    }

    let response = operation
        .get("responses")
        .and_then(Value::as_object)
        .and_then(|responses| {
            responses
                .iter()
                .find(|(status, _)| status.starts_with('2'))
                .and_then(|(_, response)| json_schema(Some(response)))
        })
        .map(SchemaNode::from_value);

    OperationDef {
        name: operation_name_for(path, method, service, operation),
        method: method.to_string(),
        path: path.to_string(),
        parameters,
        response,
        description: operation
            .get("description")
            .or_else(|| operation.get("summary"))
            .and_then(Value::as_str)
            .map(String::from),
    }
}

fn json_schema(container: Option<&Value>) -> Option<&Value> {
    let content = container?.get("content")?.as_object()?;
    content
        .get("application/json")
        .or_else(|| content.values().next())?
        .get("schema")
}

fn build_entities(doc: &Value) -> Vec<EntityDef> {
    let Some(schemas) = doc.pointer("/components/schemas").and_then(Value::as_object) else {
        return Vec::new();
    };
    schemas
        .iter()
        .map(|(name, schema)| build_entity(name, schema))
        .collect()
}

fn build_entity(name: &str, schema: &Value) -> EntityDef {
    let reference = ReferenceSchema::for_component(name);
    let node = SchemaNode::from_value(schema);
    let description = node.description.clone();

    let (parent, body) = match node.body {
        SchemaBody::String { enumeration } if !enumeration.is_empty() => {
            (None, EntityBody::Enum(enumeration))
        }
        SchemaBody::Object(properties) => (None, EntityBody::Object(properties)),
        SchemaBody::Composed(composed) => {
            let mut parent: Option<ReferenceSchema> = None;
            let mut properties: Vec<Property> = Vec::new();
            for branch in composed.branches {
                match branch.body {
                    SchemaBody::Reference(r) if parent.is_none() => parent = Some(r),
                    SchemaBody::Reference(r) => warn!(
                        entity = %name,
                        ignored_parent = %r.full_name,
                        "Entity declares more than one parent; only the first is used"
                    ),
                    SchemaBody::Object(props) => properties.extend(props),
                    _ => {}
                }
            }
            (parent, EntityBody::Object(properties))
        }
        _ => (None, EntityBody::Object(Vec::new())),
    };

    EntityDef {
        reference,
        parent,
        body,
        description,
    }
}

/// `echo_date` / `echo-date` / `EchoDate` → `EchoDate`
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `echo_date` / `EchoDate` → `echoDate`
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_openapi3() {
        let err = build_document(&json!({"swagger": "2.0"})).unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_service_from_path_group() {
        let doc = json!({
            "openapi": "3.0.1",
            "info": {"title": "Shop", "version": "1.0.0"},
            "paths": {
                "/DateTimeEndpoint/echoDate": {
                    "post": {
                        "tags": ["DateTimeEndpoint"],
                        "operationId": "DateTimeEndpoint_echoDate_POST",
                        "requestBody": {"content": {"application/json": {"schema": {
                            "type": "object",
                            "properties": {"date": {"type": "string", "format": "date", "nullable": true}}
                        }}}},
                        "responses": {"200": {"content": {"application/json": {"schema": {"type": "string"}}}}}
                    }
                }
            }
        });
        let built = build_document(&doc).unwrap();
        assert_eq!(built.title, "Shop");
        let service = built.service("DateTimeEndpoint").unwrap();
        let op = service.operation("echoDate").unwrap();
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].name, "date");
        assert!(op.parameters[0].schema.nullable);
        assert!(op.response.is_some());
    }

    #[test]
    fn test_operation_name_fallbacks() {
        let op = json!({"operationId": "list_pets"});
        assert_eq!(operation_name_for("/pets", "get", "Pets", &op), "listPets");
        assert_eq!(
            operation_name_for("/pets/{id}", "get", "Pets", &json!({})),
            "getPetsId"
        );
    }

    #[test]
    fn test_query_parameters_are_optional_unless_required() {
        let doc = json!({
            "openapi": "3.1.0",
            "paths": {"/pets/{id}": {
                "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}],
                "get": {
                    "parameters": [{"name": "expand", "in": "query", "schema": {"type": "boolean"}}],
                    "responses": {"204": {"description": "none"}}
                }
            }}
        });
        let built = build_document(&doc).unwrap();
        let op = &built.services[0].operations[0];
        assert_eq!(built.services[0].name, "Pets");
        assert_eq!(op.parameters[0].name, "id");
        assert!(!op.parameters[0].optional);
        assert!(op.parameters[1].optional);
        assert!(op.response.is_none());
    }

    #[test]
    fn test_path_parameters_are_required_without_flag() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": {"/orders/{orderId}/lines/{line}": {
                "get": {
                    "parameters": [
                        {"name": "orderId", "in": "path", "schema": {"type": "string"}},
                        {"name": "line", "in": "path", "required": false, "schema": {"type": "integer"}},
                        {"name": "page", "in": "query", "schema": {"type": "integer"}}
                    ],
                    "responses": {"204": {"description": "none"}}
                }
            }}
        });
        let built = build_document(&doc).unwrap();
        let op = &built.services[0].operations[0];
        let optional: Vec<(&str, bool)> = op
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.optional))
            .collect();
        assert_eq!(optional, vec![("orderId", false), ("line", false), ("page", true)]);
    }

    #[test]
    fn test_entity_inheritance_and_enum() {
        let doc = json!({
            "openapi": "3.0.0",
            "components": {"schemas": {
                "com.example.Parent": {"type": "object", "properties": {"id": {"type": "integer"}}},
                "com.example.Child": {"allOf": [
                    {"$ref": "#/components/schemas/com.example.Parent"},
                    {"type": "object", "properties": {"name": {"type": "string"}}}
                ]},
                "com.example.Status": {"type": "string", "enum": ["ACTIVE", "CLOSED"]}
            }}
        });
        let built = build_document(&doc).unwrap();
        let child = built.entity("com.example.Child").unwrap();
        assert_eq!(child.parent.as_ref().unwrap().full_name, "com.example.Parent");
        match &child.body {
            EntityBody::Object(props) => {
                assert_eq!(props.len(), 1);
                assert_eq!(props[0].name, "name");
            }
            EntityBody::Enum(_) => panic!("expected object entity"),
        }
        assert_eq!(
            built.entity("com.example.Status").unwrap().body,
            EntityBody::Enum(vec!["ACTIVE".to_string(), "CLOSED".to_string()])
        );
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(to_pascal_case("echo_date"), "EchoDate");
        assert_eq!(to_camel_case("EchoDate"), "echoDate");
        assert_eq!(to_camel_case(""), "");
    }
}
