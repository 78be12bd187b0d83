use serde_json::{Map, Value};

/// Prefix every component reference in the document starts with.
pub const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// A reference to a type defined elsewhere in the document.
///
/// Both the logical path and the display name are derived from the `$ref`
/// string alone, so two references to the same component always agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceSchema {
    /// The raw `$ref` value (e.g. `#/components/schemas/com.example.Account`)
    pub reference: String,
    /// Fully qualified component name (e.g. `com.example.Account`)
    pub full_name: String,
}

impl ReferenceSchema {
    /// Build a reference from a raw `$ref` string.
    pub fn parse(reference: &str) -> Self {
        let full_name = reference
            .strip_prefix(COMPONENTS_PREFIX)
            .or_else(|| reference.rsplit('/').next())
            .unwrap_or(reference)
            .to_string();
        Self {
            reference: reference.to_string(),
            full_name,
        }
    }

    /// Build a reference pointing at a named component.
    pub fn for_component(name: &str) -> Self {
        Self::parse(&format!("{COMPONENTS_PREFIX}{name}"))
    }

    /// Logical location of the generated type file, without extension.
    ///
    /// `com.example.Outer$Inner` becomes `com/example/Outer_Inner`.
    pub fn path(&self) -> String {
        self.full_name.replace('$', "_").replace('.', "/")
    }

    /// Name the referenced type is exported under.
    pub fn specifier(&self) -> String {
        self.full_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.full_name)
            .replace('$', "_")
    }
}

/// How the branches of a composed schema combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionKind {
    OneOf,
    AnyOf,
    AllOf,
}

impl CompositionKind {
    fn key(self) -> &'static str {
        match self {
            CompositionKind::OneOf => "oneOf",
            CompositionKind::AnyOf => "anyOf",
            CompositionKind::AllOf => "allOf",
        }
    }
}

/// A union or intersection of schemas in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSchema {
    pub kind: CompositionKind,
    pub branches: Vec<SchemaNode>,
}

/// A named property of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub schema: SchemaNode,
    pub required: bool,
}

/// Structural shape of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaBody {
    Reference(ReferenceSchema),
    Array(Box<SchemaNode>),
    /// String-keyed map; `None` means `additionalProperties: true`
    Map(Option<Box<SchemaNode>>),
    String { enumeration: Vec<String> },
    Number,
    Integer,
    Boolean,
    Composed(ComposedSchema),
    Object(Vec<Property>),
    Unknown,
}

/// One typed unit of the schema document.
///
/// The modifiers are kept on the node itself rather than wrapping it, so
/// they can be read from the original node after a composed schema has been
/// resolved to one of its branches.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub body: SchemaBody,
    pub nullable: bool,
    /// Raw `x-annotations` entries
    pub annotations: Vec<String>,
    /// Raw `x-validation-constraints` entries
    pub constraints: Vec<String>,
    pub format: Option<String>,
    pub description: Option<String>,
}

impl SchemaNode {
    pub fn new(body: SchemaBody) -> Self {
        Self {
            body,
            nullable: false,
            annotations: Vec::new(),
            constraints: Vec::new(),
            format: None,
            description: None,
        }
    }

    /// A node of unknown shape.
    pub fn unknown() -> Self {
        Self::new(SchemaBody::Unknown)
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Convert a JSON schema value into a node.
    ///
    /// Never fails: shapes that are not recognized become [`SchemaBody::Unknown`].
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::unknown();
        };

        let mut node = Self::unknown();
        node.nullable = obj.get("nullable").and_then(Value::as_bool).unwrap_or(false);
        node.annotations = annotation_entries(obj.get("x-annotations"));
        node.constraints = annotation_entries(obj.get("x-validation-constraints"));
        node.format = obj.get("format").and_then(Value::as_str).map(String::from);
        node.description = obj
            .get("description")
            .and_then(Value::as_str)
            .map(String::from);

        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            node.body = SchemaBody::Reference(ReferenceSchema::parse(reference));
            return node;
        }

        for kind in [
            CompositionKind::OneOf,
            CompositionKind::AnyOf,
            CompositionKind::AllOf,
        ] {
            if let Some(branches) = obj.get(kind.key()).and_then(Value::as_array) {
                let mut parsed: Vec<SchemaNode> = Vec::with_capacity(branches.len());
                for branch in branches {
                    if branch.get("type").and_then(Value::as_str) == Some("null") {
                        node.nullable = true;
                    } else {
                        parsed.push(SchemaNode::from_value(branch));
                    }
                }
                node.body = SchemaBody::Composed(ComposedSchema {
                    kind,
                    branches: parsed,
                });
                return node;
            }
        }

        let ty = match obj.get("type") {
            Some(Value::String(ty)) => Some(ty.as_str()),
            Some(Value::Array(types)) => {
                let mut first = None;
                for ty in types.iter().filter_map(Value::as_str) {
                    if ty == "null" {
                        node.nullable = true;
                    } else if first.is_none() {
                        first = Some(ty);
                    }
                }
                first
            }
            _ => None,
        };

        node.body = match ty {
            Some("string") => SchemaBody::String {
                enumeration: string_entries(obj.get("enum")),
            },
            Some("number") => SchemaBody::Number,
            Some("integer") => SchemaBody::Integer,
            Some("boolean") => SchemaBody::Boolean,
            Some("array") => array_body(obj),
            Some("object") => object_body(obj),
            Some("null") => {
                node.nullable = true;
                SchemaBody::Unknown
            }
            Some(_) => SchemaBody::Unknown,
            None if obj.contains_key("items") => array_body(obj),
            None if obj.contains_key("properties")
                || obj.contains_key("additionalProperties") =>
            {
                object_body(obj)
            }
            None => SchemaBody::Unknown,
        };
        node
    }
}

fn array_body(obj: &Map<String, Value>) -> SchemaBody {
    let items = obj
        .get("items")
        .map(SchemaNode::from_value)
        .unwrap_or_else(SchemaNode::unknown);
    SchemaBody::Array(Box::new(items))
}

fn object_body(obj: &Map<String, Value>) -> SchemaBody {
    let properties = obj.get("properties").and_then(Value::as_object);
    match (properties, obj.get("additionalProperties")) {
        (None, Some(Value::Bool(true))) => SchemaBody::Map(None),
        (None, Some(values @ Value::Object(_))) => {
            SchemaBody::Map(Some(Box::new(SchemaNode::from_value(values))))
        }
        (Some(properties), _) => {
            let required = string_entries(obj.get("required"));
            SchemaBody::Object(
                properties
                    .iter()
                    .map(|(name, schema)| Property {
                        name: name.clone(),
                        schema: SchemaNode::from_value(schema),
                        required: required.contains(name),
                    })
                    .collect(),
            )
        }
        (None, _) => SchemaBody::Object(Vec::new()),
    }
}

/// Collect the string entries of an array, skipping anything else.
fn string_entries(value: Option<&Value>) -> Vec<String> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| entry.as_str().map(str::to_string))
        .collect()
}

/// Collect annotation-like entries.
///
/// Plain strings are taken as-is; `{ "name": ..., "attributes": ... }`
/// objects are rewritten into the same `Name(attributes)` text form.
/// Any other entry is kept as its JSON text so that parsing it fails
/// instead of the validator silently disappearing.
fn annotation_entries(value: Option<&Value>) -> Vec<String> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| match entry {
            Value::String(s) => s.clone(),
            Value::Object(obj) => {
                let name = obj
                    .get("name")
                    .or_else(|| obj.get("simpleName"))
                    .and_then(Value::as_str);
                match (name, obj.get("attributes")) {
                    (Some(name), Some(attributes)) => format!("{name}({attributes})"),
                    (Some(name), None) => name.to_string(),
                    (None, _) => entry.to_string(),
                }
            }
            other => other.to_string(),
        })
        .collect()
}

/// A parameter of an endpoint operation, in call order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDef {
    /// Wire name used as the key of the parameter bag
    pub name: String,
    pub schema: SchemaNode,
    /// Whether callers may omit the argument
    pub optional: bool,
}

/// One callable operation of a backend service.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDef {
    pub name: String,
    pub method: String,
    pub path: String,
    pub parameters: Vec<ParameterDef>,
    /// Schema of the successful response; `None` for `void`
    pub response: Option<SchemaNode>,
    pub description: Option<String>,
}

/// A backend service ("endpoint") grouping operations.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDef {
    pub name: String,
    pub operations: Vec<OperationDef>,
}

impl ServiceDef {
    pub fn operation(&self, name: &str) -> Option<&OperationDef> {
        self.operations.iter().find(|op| op.name == name)
    }
}

/// Declared shape of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityBody {
    Object(Vec<Property>),
    Enum(Vec<String>),
}

/// A named entity type from `components.schemas`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDef {
    pub reference: ReferenceSchema,
    /// Immediate parent entity for `allOf` inheritance
    pub parent: Option<ReferenceSchema>,
    pub body: EntityBody,
    pub description: Option<String>,
}

impl EntityDef {
    pub fn name(&self) -> &str {
        &self.reference.full_name
    }
}

/// A loaded schema document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaDocument {
    pub title: String,
    pub version: String,
    pub services: Vec<ServiceDef>,
    pub entities: Vec<EntityDef>,
}

impl SchemaDocument {
    pub fn service(&self, name: &str) -> Option<&ServiceDef> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn entity(&self, full_name: &str) -> Option<&EntityDef> {
        self.entities.iter().find(|e| e.name() == full_name)
    }
}
