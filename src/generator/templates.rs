use askama::Template;

/// Whole generated module: header, imports, declarations
#[derive(Template)]
#[template(path = "module.ts.txt", escape = "none")]
pub struct ModuleTemplate<'a> {
    /// Ownership marker checked before overwriting
    pub marker: &'a str,
    /// Document or directory the module was generated from
    pub source: &'a str,
    pub module_name: &'a str,
    /// Rendered import statements
    pub imports: Vec<String>,
    pub declarations: &'a [String],
}

/// One endpoint operation as a local async function plus its export
#[derive(Template)]
#[template(path = "endpoint_function.ts.txt", escape = "none")]
pub struct EndpointFunctionTemplate<'a> {
    pub description: &'a str,
    /// Local binding, e.g. `_echoDate`
    pub local_name: &'a str,
    /// Exported operation name, e.g. `echoDate`
    pub exported_name: &'a str,
    /// Rendered parameter list without parentheses
    pub parameters: &'a str,
    pub return_type: &'a str,
    /// Local binding of the transport client
    pub client: &'a str,
    /// Quoted service name
    pub service: &'a str,
    /// Quoted operation name
    pub operation: &'a str,
    /// Rendered parameter bag object literal
    pub bag: &'a str,
}

/// Entry of the frozen aggregate object
#[derive(Debug, Clone)]
pub struct AggregateEntry {
    pub key: String,
    pub local_name: String,
}

#[derive(Template)]
#[template(path = "endpoint_aggregate.ts.txt", escape = "none")]
pub struct EndpointAggregateTemplate<'a> {
    pub name: &'a str,
    pub entries: &'a [AggregateEntry],
}

/// Property line of an entity interface
#[derive(Debug, Clone)]
pub struct InterfaceProperty {
    pub key: String,
    pub optional: bool,
    pub ty: String,
}

#[derive(Template)]
#[template(path = "entity_interface.ts.txt", escape = "none")]
pub struct EntityInterfaceTemplate<'a> {
    pub description: &'a str,
    pub name: &'a str,
    /// Parent interface binding, empty when there is none
    pub parent: &'a str,
    pub properties: &'a [InterfaceProperty],
}

#[derive(Debug, Clone)]
pub struct EnumMember {
    pub key: String,
    pub value: String,
}

#[derive(Template)]
#[template(path = "entity_enum.ts.txt", escape = "none")]
pub struct EntityEnumTemplate<'a> {
    pub name: &'a str,
    pub members: &'a [EnumMember],
}

/// Property accessor of a model class
#[derive(Debug, Clone)]
pub struct ModelAccessor {
    /// Getter name as written in the class body
    pub key: String,
    /// Quoted property name passed to the lookup
    pub name: String,
    /// Model class identifier of the property
    pub model: String,
    /// Declared accessor return type
    pub model_type: String,
    /// Validator argument list, nullability flag first
    pub arguments: String,
}

#[derive(Template)]
#[template(path = "model_class.ts.txt", escape = "none")]
pub struct ModelClassTemplate<'a> {
    pub name: &'a str,
    /// Entity value type binding
    pub entity: &'a str,
    /// Parent model class binding
    pub base: &'a str,
    /// Binding of the property-model lookup symbol
    pub lookup: &'a str,
    pub accessors: &'a [ModelAccessor],
}

#[derive(Template)]
#[template(path = "enum_model_class.ts.txt", escape = "none")]
pub struct EnumModelClassTemplate<'a> {
    pub name: &'a str,
    pub entity: &'a str,
    pub base: &'a str,
    pub enum_key: &'a str,
}
