//! Entity emitters: a type module and a model module per entity.
//!
//! Inheritance follows the `allOf` parent link: `B extends A` produces
//! `interface B extends A` and `class BModel extends AModel`. Only the
//! properties an entity declares itself are emitted on its own interface
//! and model class; inherited ones stay on the ancestors.

use askama::Template;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::spec::{EntityBody, EntityDef, Property};

use super::expr::{join_exprs, TypeExpr};
use super::literal::{object_key, quote};
use super::output::OutputFile;
use super::processor::{
    ModelIdentifierProcessor, ModelTypeProcessor, TypeProcessor, ValidatorProcessor,
};
use super::templates::{
    EntityEnumTemplate, EntityInterfaceTemplate, EnumMember, EnumModelClassTemplate,
    InterfaceProperty, ModelAccessor, ModelClassTemplate,
};
use super::GenerateError;

/// Logical path of an entity's model module.
pub fn model_file_path(entity: &EntityDef, config: &GeneratorConfig) -> String {
    format!("{}{}", entity.reference.path(), config.model_suffix)
}

fn render_error(entity: &EntityDef) -> impl FnOnce(askama::Error) -> GenerateError + '_ {
    move |source| GenerateError::Render {
        unit: entity.name().to_string(),
        source,
    }
}

/// Type module: `interface` (or `enum`) with the entity's own properties.
pub fn emit_entity_type(entity: &EntityDef, source: &str) -> Result<OutputFile, GenerateError> {
    let mut file = OutputFile::new(entity.reference.path(), source);
    let name = file.bind_own(&entity.reference.specifier());
    let description = entity.description.as_deref().unwrap_or_default();

    let declaration = match &entity.body {
        EntityBody::Enum(values) => {
            let members: Vec<EnumMember> = values
                .iter()
                .map(|value| EnumMember {
                    key: object_key(value),
                    value: quote(value),
                })
                .collect();
            EntityEnumTemplate {
                name: &name,
                members: &members,
            }
            .render()
        }
        EntityBody::Object(properties) => {
            let parent = match &entity.parent {
                Some(parent) => file
                    .import_default(&parent.path(), &parent.specifier(), true)
                    .to_string(),
                None => String::new(),
            };
            let properties: Vec<InterfaceProperty> = properties
                .iter()
                .map(|property| interface_property(&mut file, property))
                .collect();
            EntityInterfaceTemplate {
                description,
                name: &name,
                parent: &parent,
                properties: &properties,
            }
            .render()
        }
    }
    .map_err(render_error(entity))?;

    file.push(declaration);
    Ok(file)
}

fn interface_property(file: &mut OutputFile, property: &Property) -> InterfaceProperty {
    let ty = TypeProcessor::new(file)
        .mark_optional(true)
        .process(&property.schema);
    let optional = !property.required || ty.is_optional();
    let ty = match ty {
        TypeExpr::Optional(inner) => *inner,
        other => other,
    };
    InterfaceProperty {
        key: object_key(&property.name),
        optional,
        ty: ty.to_string(),
    }
}

/// Model module: a model class extending the parent's model class, or the
/// built-in object model for root entities.
pub fn emit_entity_model(
    entity: &EntityDef,
    config: &GeneratorConfig,
    source: &str,
) -> Result<OutputFile, GenerateError> {
    let mut file = OutputFile::new(model_file_path(entity, config), source);
    let class_name = file.bind_own(&format!(
        "{}{}",
        entity.reference.specifier(),
        config.model_suffix
    ));

    let declaration = match &entity.body {
        EntityBody::Enum(_) => {
            let entity_id = file.import_default(
                &entity.reference.path(),
                &entity.reference.specifier(),
                false,
            );
            let base = file
                .imports
                .named_import(&config.form_module, "EnumModel", false);
            let enum_key = file.imports.named_import(&config.form_module, "_enum", false);
            EnumModelClassTemplate {
                name: &class_name,
                entity: &entity_id,
                base: &base,
                enum_key: &enum_key,
            }
            .render()
            .map_err(render_error(entity))?
        }
        EntityBody::Object(properties) => {
            let entity_id = file.import_default(
                &entity.reference.path(),
                &entity.reference.specifier(),
                true,
            );
            let base = match &entity.parent {
                Some(parent) => ModelIdentifierProcessor::new(&mut file, config).entity_model(parent),
                None => file
                    .imports
                    .named_import(&config.form_module, "ObjectModel", false),
            };
            let lookup = file
                .imports
                .named_import(&config.form_module, "_getPropertyModel", false);

            let mut accessors = Vec::with_capacity(properties.len());
            for property in properties {
                accessors.push(model_accessor(&mut file, config, entity, property)?);
            }

            ModelClassTemplate {
                name: &class_name,
                entity: &entity_id,
                base: &base,
                lookup: &lookup,
                accessors: &accessors,
            }
            .render()
            .map_err(render_error(entity))?
        }
    };

    file.push(declaration);
    debug!(
        entity = entity.name(),
        file = file.path(),
        parent = entity.parent.as_ref().map(|p| p.full_name.as_str()),
        "Emitted entity model"
    );
    Ok(file)
}

fn model_accessor(
    file: &mut OutputFile,
    config: &GeneratorConfig,
    entity: &EntityDef,
    property: &Property,
) -> Result<ModelAccessor, GenerateError> {
    let model = ModelIdentifierProcessor::new(file, config).process(&property.schema);
    let model_type = ModelTypeProcessor::new(file, config).process(&property.schema);
    let validators = ValidatorProcessor::new(file, config)
        .process(&property.schema)
        .map_err(|source| GenerateError::Validator {
            entity: entity.name().to_string(),
            property: property.name.clone(),
            source,
        })?;

    Ok(ModelAccessor {
        key: object_key(&property.name),
        name: quote(&property.name),
        model: model.to_string(),
        model_type: model_type.to_string(),
        arguments: join_exprs(&validators),
    })
}
