//! Schema-to-code processors.
//!
//! Every processor implements [`SchemaVisitor`]: one method per schema kind.
//! [`dispatch`] holds the kind detection, written once, with an exhaustive
//! match so a new [`Kind`](crate::schema::Kind) cannot be added without every
//! processor handling it.
//!
//! | Processor | Output |
//! |---|---|
//! | [`TypeProcessor`] | value type (`ReadonlyArray<string>`) |
//! | [`ModelIdentifierProcessor`] | model class (`ArrayModel`, `AccountModel`) |
//! | [`ModelTypeProcessor`] | model type (`ArrayModel<string, StringModel>`) |
//! | [`ValidatorProcessor`] | validator arguments (`false, new NotNull()`) |

use crate::config::GeneratorConfig;
use crate::schema::{self, Classified};
use crate::spec::{ReferenceSchema, SchemaNode};

use super::annotation::{AnnotationError, AnnotationParser};
use super::expr::{Expr, TypeExpr};
use super::imports::Identifier;
use super::output::OutputFile;

/// A node together with the branch that drives its code shape.
///
/// Modifiers (nullability, annotations, constraints) are read from
/// `original`; the kind comes from `resolved`.
#[derive(Debug, Clone, Copy)]
pub struct SchemaView<'s> {
    pub original: &'s SchemaNode,
    pub resolved: &'s SchemaNode,
}

impl<'s> SchemaView<'s> {
    pub fn new(node: &'s SchemaNode) -> Self {
        Self {
            original: node,
            resolved: schema::resolve(node),
        }
    }
}

/// One artifact kind computed from a schema node.
pub trait SchemaVisitor {
    type Output;

    fn visit_reference(&mut self, view: SchemaView<'_>, reference: &ReferenceSchema)
        -> Self::Output;
    fn visit_array(&mut self, view: SchemaView<'_>, items: &SchemaNode) -> Self::Output;
    fn visit_map(&mut self, view: SchemaView<'_>, values: Option<&SchemaNode>) -> Self::Output;
    fn visit_string(&mut self, view: SchemaView<'_>) -> Self::Output;
    fn visit_number(&mut self, view: SchemaView<'_>) -> Self::Output;
    fn visit_integer(&mut self, view: SchemaView<'_>) -> Self::Output {
        self.visit_number(view)
    }
    fn visit_boolean(&mut self, view: SchemaView<'_>) -> Self::Output;
    fn visit_unknown(&mut self, view: SchemaView<'_>) -> Self::Output;
}

/// Route a node to the visitor method for its resolved kind.
pub fn dispatch<V: SchemaVisitor + ?Sized>(visitor: &mut V, node: &SchemaNode) -> V::Output {
    let view = SchemaView::new(node);
    match schema::classify_node(view.resolved) {
        Classified::Reference(reference) => visitor.visit_reference(view, reference),
        Classified::Array(items) => visitor.visit_array(view, items),
        Classified::Map(values) => visitor.visit_map(view, values),
        Classified::String => visitor.visit_string(view),
        Classified::Number => visitor.visit_number(view),
        Classified::Integer => visitor.visit_integer(view),
        Classified::Boolean => visitor.visit_boolean(view),
        // only composed schemas without branches survive resolution
        Classified::Composed(_) | Classified::Unknown => visitor.visit_unknown(view),
    }
}

fn builtin_model(file: &mut OutputFile, config: &GeneratorConfig, name: &str) -> Identifier {
    file.imports.named_import(&config.form_module, name, false)
}

/// Value type of a schema.
pub struct TypeProcessor<'a> {
    file: &'a mut OutputFile,
    mark_optional: bool,
}

impl<'a> TypeProcessor<'a> {
    pub fn new(file: &'a mut OutputFile) -> Self {
        Self {
            file,
            mark_optional: false,
        }
    }

    /// Render nullable schemas as `T | undefined`, at every depth.
    #[must_use]
    pub fn mark_optional(mut self, mark_optional: bool) -> Self {
        self.mark_optional = mark_optional;
        self
    }

    pub fn process(&mut self, node: &SchemaNode) -> TypeExpr {
        let ty = dispatch(self, node);
        if self.mark_optional && schema::is_nullable(node) {
            ty.optional()
        } else {
            ty
        }
    }
}

impl SchemaVisitor for TypeProcessor<'_> {
    type Output = TypeExpr;

    fn visit_reference(&mut self, _: SchemaView<'_>, reference: &ReferenceSchema) -> TypeExpr {
        let id = self
            .file
            .import_default(&reference.path(), &reference.specifier(), true);
        TypeExpr::Reference(id)
    }

    fn visit_array(&mut self, _: SchemaView<'_>, items: &SchemaNode) -> TypeExpr {
        TypeExpr::array(self.process(items))
    }

    fn visit_map(&mut self, _: SchemaView<'_>, values: Option<&SchemaNode>) -> TypeExpr {
        TypeExpr::record(values.map_or(TypeExpr::Any, |v| self.process(v)))
    }

    fn visit_string(&mut self, _: SchemaView<'_>) -> TypeExpr {
        TypeExpr::String
    }

    fn visit_number(&mut self, _: SchemaView<'_>) -> TypeExpr {
        TypeExpr::Number
    }

    fn visit_boolean(&mut self, _: SchemaView<'_>) -> TypeExpr {
        TypeExpr::Boolean
    }

    fn visit_unknown(&mut self, _: SchemaView<'_>) -> TypeExpr {
        TypeExpr::Unknown
    }
}

/// Runtime model class of a schema.
pub struct ModelIdentifierProcessor<'a> {
    file: &'a mut OutputFile,
    config: &'a GeneratorConfig,
}

impl<'a> ModelIdentifierProcessor<'a> {
    pub fn new(file: &'a mut OutputFile, config: &'a GeneratorConfig) -> Self {
        Self { file, config }
    }

    pub fn process(&mut self, node: &SchemaNode) -> Identifier {
        dispatch(self, node)
    }

    /// Model class generated for a referenced entity, imported lazily.
    pub fn entity_model(&mut self, reference: &ReferenceSchema) -> Identifier {
        let suffix = &self.config.model_suffix;
        let path = format!("{}{suffix}", reference.path());
        let name = format!("{}{suffix}", reference.specifier());
        self.file.import_default(&path, &name, false)
    }

    fn builtin(&mut self, name: &str) -> Identifier {
        builtin_model(self.file, self.config, name)
    }
}

impl SchemaVisitor for ModelIdentifierProcessor<'_> {
    type Output = Identifier;

    fn visit_reference(&mut self, _: SchemaView<'_>, reference: &ReferenceSchema) -> Identifier {
        self.entity_model(reference)
    }

    fn visit_array(&mut self, _: SchemaView<'_>, _: &SchemaNode) -> Identifier {
        self.builtin("ArrayModel")
    }

    fn visit_map(&mut self, _: SchemaView<'_>, _: Option<&SchemaNode>) -> Identifier {
        self.builtin("ObjectModel")
    }

    fn visit_string(&mut self, _: SchemaView<'_>) -> Identifier {
        self.builtin("StringModel")
    }

    fn visit_number(&mut self, _: SchemaView<'_>) -> Identifier {
        self.builtin("NumberModel")
    }

    fn visit_boolean(&mut self, _: SchemaView<'_>) -> Identifier {
        self.builtin("BooleanModel")
    }

    fn visit_unknown(&mut self, _: SchemaView<'_>) -> Identifier {
        self.builtin("ObjectModel")
    }
}

/// Declared type of a model accessor.
pub struct ModelTypeProcessor<'a> {
    file: &'a mut OutputFile,
    config: &'a GeneratorConfig,
}

impl<'a> ModelTypeProcessor<'a> {
    pub fn new(file: &'a mut OutputFile, config: &'a GeneratorConfig) -> Self {
        Self { file, config }
    }

    pub fn process(&mut self, node: &SchemaNode) -> TypeExpr {
        dispatch(self, node)
    }

    fn model_id(&mut self, view: SchemaView<'_>) -> Identifier {
        ModelIdentifierProcessor::new(self.file, self.config).process(view.original)
    }

    fn value_type(&mut self, node: &SchemaNode) -> TypeExpr {
        TypeProcessor::new(self.file).process(node)
    }
}

impl SchemaVisitor for ModelTypeProcessor<'_> {
    type Output = TypeExpr;

    fn visit_reference(&mut self, view: SchemaView<'_>, _: &ReferenceSchema) -> TypeExpr {
        TypeExpr::Reference(self.model_id(view))
    }

    fn visit_array(&mut self, view: SchemaView<'_>, items: &SchemaNode) -> TypeExpr {
        let model = self.model_id(view);
        let item_type = self.value_type(items);
        let item_model = self.process(items);
        TypeExpr::Generic(model, vec![item_type, item_model])
    }

    fn visit_map(&mut self, view: SchemaView<'_>, _: Option<&SchemaNode>) -> TypeExpr {
        let model = self.model_id(view);
        let record = self.value_type(view.resolved);
        TypeExpr::Generic(model, vec![record])
    }

    fn visit_string(&mut self, view: SchemaView<'_>) -> TypeExpr {
        TypeExpr::Reference(self.model_id(view))
    }

    fn visit_number(&mut self, view: SchemaView<'_>) -> TypeExpr {
        TypeExpr::Reference(self.model_id(view))
    }

    fn visit_boolean(&mut self, view: SchemaView<'_>) -> TypeExpr {
        TypeExpr::Reference(self.model_id(view))
    }

    fn visit_unknown(&mut self, view: SchemaView<'_>) -> TypeExpr {
        TypeExpr::Generic(self.model_id(view), vec![TypeExpr::Unknown])
    }
}

/// Validator arguments of a property: nullability flag, then item model
/// and item validators for arrays, then one validator per annotation and
/// per validation constraint.
pub struct ValidatorProcessor<'a> {
    file: &'a mut OutputFile,
    config: &'a GeneratorConfig,
}

impl<'a> ValidatorProcessor<'a> {
    pub fn new(file: &'a mut OutputFile, config: &'a GeneratorConfig) -> Self {
        Self { file, config }
    }

    pub fn process(&mut self, node: &SchemaNode) -> Result<Vec<Expr>, AnnotationError> {
        let mut exprs = vec![Expr::Bool(schema::is_nullable(node))];
        exprs.extend(dispatch(self, node)?);

        let mut parser = AnnotationParser::new(&mut self.file.imports, &self.config.form_module);
        if schema::is_annotated(node) {
            for raw in &node.annotations {
                exprs.push(parser.parse(raw)?);
            }
        }
        if schema::is_validation_constrained(node) {
            for raw in &node.constraints {
                exprs.push(parser.parse(raw)?);
            }
        }
        Ok(exprs)
    }
}

type Validators = Result<Vec<Expr>, AnnotationError>;

impl SchemaVisitor for ValidatorProcessor<'_> {
    type Output = Validators;

    fn visit_reference(&mut self, _: SchemaView<'_>, _: &ReferenceSchema) -> Validators {
        Ok(Vec::new())
    }

    fn visit_array(&mut self, _: SchemaView<'_>, items: &SchemaNode) -> Validators {
        let item_model = ModelIdentifierProcessor::new(self.file, self.config).process(items);
        let item_validators = self.process(items)?;
        Ok(vec![Expr::Ident(item_model), Expr::Array(item_validators)])
    }

    fn visit_map(&mut self, _: SchemaView<'_>, _: Option<&SchemaNode>) -> Validators {
        Ok(Vec::new())
    }

    fn visit_string(&mut self, _: SchemaView<'_>) -> Validators {
        Ok(Vec::new())
    }

    fn visit_number(&mut self, _: SchemaView<'_>) -> Validators {
        Ok(Vec::new())
    }

    fn visit_boolean(&mut self, _: SchemaView<'_>) -> Validators {
        Ok(Vec::new())
    }

    fn visit_unknown(&mut self, _: SchemaView<'_>) -> Validators {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::expr::join_exprs;
    use serde_json::json;

    fn node(v: serde_json::Value) -> SchemaNode {
        SchemaNode::from_value(&v)
    }

    fn file() -> OutputFile {
        OutputFile::new("com/example/AccountModel", "test")
    }

    #[test]
    fn test_union_types_like_first_branch() {
        let mut f = file();
        let union = node(json!({"oneOf": [{"type": "string"}, {"type": "integer"}]}));
        let plain = node(json!({"type": "string"}));
        let mut types = TypeProcessor::new(&mut f).mark_optional(true);
        assert_eq!(types.process(&union), types.process(&plain));
        assert_eq!(types.process(&union), TypeExpr::String);
    }

    #[test]
    fn test_type_of_nullable_array_and_map() {
        let mut f = file();
        let mut types = TypeProcessor::new(&mut f).mark_optional(true);
        let list = node(json!({"type": "array", "nullable": true, "items": {"type": "string", "nullable": true}}));
        assert_eq!(
            types.process(&list).to_string(),
            "ReadonlyArray<string | undefined> | undefined"
        );
        let map = node(json!({"type": "object", "additionalProperties": {"type": "number"}}));
        assert_eq!(types.process(&map).to_string(), "Readonly<Record<string, number>>");
        let any = node(json!({"type": "object", "additionalProperties": true}));
        assert_eq!(types.process(&any).to_string(), "Readonly<Record<string, any>>");
    }

    #[test]
    fn test_reference_type_is_type_only_import() {
        let mut f = OutputFile::new("OrderEndpoint", "test");
        let reference = node(json!({"$ref": "#/components/schemas/com.example.Order$Line"}));
        let ty = TypeProcessor::new(&mut f).process(&reference);
        assert_eq!(ty.to_string(), "Order_Line");
        assert_eq!(
            f.imports.render(),
            vec!["import type Order_Line from \"./com/example/Order_Line.js\";".to_string()]
        );
    }

    #[test]
    fn test_model_identifiers() {
        let config = GeneratorConfig::default();
        let mut f = file();
        let mut ids = ModelIdentifierProcessor::new(&mut f, &config);
        assert_eq!(&*ids.process(&node(json!({"type": "string"}))), "StringModel");
        assert_eq!(&*ids.process(&node(json!({"type": "integer"}))), "NumberModel");
        assert_eq!(&*ids.process(&node(json!({"type": "boolean"}))), "BooleanModel");
        assert_eq!(&*ids.process(&node(json!({"type": "array", "items": {}}))), "ArrayModel");
        assert_eq!(&*ids.process(&node(json!({"additionalProperties": true}))), "ObjectModel");
        assert_eq!(&*ids.process(&node(json!({}))), "ObjectModel");
        let reference = node(json!({"$ref": "#/components/schemas/com.example.Address"}));
        assert_eq!(&*ids.process(&reference), "AddressModel");
        let rendered = f.imports.render();
        assert!(rendered.contains(&"import AddressModel from \"./AddressModel.js\";".to_string()));
        assert!(rendered[0].contains("StringModel"));
    }

    #[test]
    fn test_model_types() {
        let config = GeneratorConfig::default();
        let mut f = file();
        let mut types = ModelTypeProcessor::new(&mut f, &config);
        let list = node(json!({"type": "array", "items": {"type": "string"}}));
        assert_eq!(
            types.process(&list).to_string(),
            "ArrayModel<string, StringModel>"
        );
        let map = node(json!({"additionalProperties": {"type": "boolean"}}));
        assert_eq!(
            types.process(&map).to_string(),
            "ObjectModel<Readonly<Record<string, boolean>>>"
        );
        assert_eq!(types.process(&node(json!({}))).to_string(), "ObjectModel<unknown>");
    }

    #[test]
    fn test_nullable_array_of_string_validators() {
        let config = GeneratorConfig::default();
        let mut f = file();
        let list = node(json!({"type": "array", "nullable": true, "items": {"type": "string"}}));
        let exprs = ValidatorProcessor::new(&mut f, &config).process(&list).unwrap();
        assert_eq!(exprs[0], Expr::Bool(true));
        assert!(matches!(&exprs[1], Expr::Ident(id) if &**id == "StringModel"));
        assert!(matches!(&exprs[2], Expr::Array(items) if items == &vec![Expr::Bool(false)]));
        assert_eq!(join_exprs(&exprs), "true, StringModel, [false]");
    }

    #[test]
    fn test_modifiers_read_from_original_node() {
        let config = GeneratorConfig::default();
        let mut f = file();
        let composed = node(json!({
            "anyOf": [{"type": "string"}],
            "nullable": true,
            "x-annotations": ["NotBlank"],
            "x-validation-constraints": ["Size({min: 1})"]
        }));
        let exprs = ValidatorProcessor::new(&mut f, &config).process(&composed).unwrap();
        assert_eq!(
            join_exprs(&exprs),
            "true, new NotBlank(), new Size({ min: 1 })"
        );
    }

    #[test]
    fn test_malformed_constraint_is_an_error() {
        let config = GeneratorConfig::default();
        let mut f = file();
        let bad = node(json!({"type": "string", "x-validation-constraints": ["Size({min:"]}));
        assert!(ValidatorProcessor::new(&mut f, &config).process(&bad).is_err());
    }

    #[test]
    fn test_unreadable_constraint_entries_are_errors() {
        let config = GeneratorConfig::default();
        for entry in [json!({"attributes": {"max": 3}}), json!(5)] {
            let mut f = file();
            let bad = node(json!({"type": "string", "x-validation-constraints": [entry]}));
            let err = ValidatorProcessor::new(&mut f, &config).process(&bad).unwrap_err();
            assert!(matches!(err, AnnotationError::Malformed { .. }), "{err}");
        }

        let mut f = file();
        let named = node(json!({
            "type": "string",
            "x-annotations": [{"simpleName": "Size", "attributes": {"max": 3}}]
        }));
        let exprs = ValidatorProcessor::new(&mut f, &config).process(&named).unwrap();
        assert_eq!(join_exprs(&exprs), "false, new Size({ max: 3 })");
    }
}
