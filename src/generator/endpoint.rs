//! Endpoint emitter: one module per backend service.

use std::collections::HashSet;

use askama::Template;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::spec::{OperationDef, ServiceDef};

use super::expr::TypeExpr;
use super::imports::sanitize_identifier;
use super::literal::{object_key, quote};
use super::output::OutputFile;
use super::processor::TypeProcessor;
use super::templates::{AggregateEntry, EndpointAggregateTemplate, EndpointFunctionTemplate};
use super::GenerateError;

/// Logical path of a service's endpoint module.
pub fn endpoint_file_path(service: &ServiceDef, config: &GeneratorConfig) -> String {
    let base = sanitize_identifier(&service.name);
    if base.ends_with(&config.endpoint_suffix) {
        base
    } else {
        format!("{base}{}", config.endpoint_suffix)
    }
}

/// Build the endpoint module of one service.
///
/// Every operation becomes a local `async function _<name>` whose body
/// forwards `{ service, operation, parameter bag }` to the transport client,
/// followed by a frozen aggregate object named after the service.
pub fn emit_endpoint(
    service: &ServiceDef,
    config: &GeneratorConfig,
    source: &str,
) -> Result<OutputFile, GenerateError> {
    let mut file = OutputFile::new(endpoint_file_path(service, config), source);
    let client_specifier = file.external_specifier(&config.client_module);
    let client = file.imports.default_import(&client_specifier, "client", false);
    let aggregate_name = file.bind_own(&service.name);

    let mut entries = Vec::with_capacity(service.operations.len());
    let mut exported = HashSet::new();
    for operation in &service.operations {
        let local_name = file.imports.reserve(&format!("_{}", operation.name));
        let exported_name = export_name(&mut exported, &operation.name);
        let declaration = emit_operation(
            &mut file,
            service,
            operation,
            &local_name,
            &exported_name,
            &client,
        )
            .map_err(|source| GenerateError::Render {
                unit: format!("{}.{}", service.name, operation.name),
                source,
            })?;
        file.push(declaration);
        entries.push(AggregateEntry {
            key: object_key(&operation.name),
            local_name: local_name.to_string(),
        });
    }

    let aggregate = EndpointAggregateTemplate {
        name: &aggregate_name,
        entries: &entries,
    }
    .render()
    .map_err(|source| GenerateError::Render {
        unit: service.name.clone(),
        source,
    })?;
    file.push(aggregate);

    debug!(
        service = %service.name,
        operations = service.operations.len(),
        file = file.path(),
        "Emitted endpoint module"
    );
    Ok(file)
}

/// Name an operation is exported under. Export names may be reserved
/// words but must still be identifiers, and unique within the module.
fn export_name(exported: &mut HashSet<String>, operation: &str) -> String {
    let base = sanitize_identifier(operation);
    let name = if exported.contains(&base) {
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !exported.contains(candidate))
            .unwrap_or(base)
    } else {
        base
    };
    exported.insert(name.clone());
    name
}

fn emit_operation(
    file: &mut OutputFile,
    service: &ServiceDef,
    operation: &OperationDef,
    local_name: &str,
    exported_name: &str,
    client: &str,
) -> Result<String, askama::Error> {
    // Parameters may only carry `?` when no required one follows.
    let last_required = operation.parameters.iter().rposition(|p| !p.optional);

    let mut parameters = Vec::with_capacity(operation.parameters.len());
    let mut bag = Vec::with_capacity(operation.parameters.len());
    let mut locals = Vec::with_capacity(operation.parameters.len());
    for (idx, parameter) in operation.parameters.iter().enumerate() {
        let local = file.imports.reserve(&parameter.name);
        locals.push(local.clone());
        let ty = TypeProcessor::new(file)
            .mark_optional(true)
            .process(&parameter.schema);
        let trailing_optional = parameter.optional && last_required.is_none_or(|last| idx > last);
        parameters.push(if trailing_optional {
            let ty = match ty {
                TypeExpr::Optional(inner) => *inner,
                other => other,
            };
            format!("{local}?: {ty}")
        } else if parameter.optional {
            format!("{local}: {}", ty.optional())
        } else {
            format!("{local}: {ty}")
        });

        let key = object_key(&parameter.name);
        bag.push(if key == *local {
            key
        } else {
            format!("{key}: {local}")
        });
    }

    let return_type = match &operation.response {
        Some(schema) => TypeProcessor::new(file).mark_optional(true).process(schema),
        None => TypeExpr::Void,
    };
    // Parameters are only bound inside this function.
    for local in &locals {
        file.imports.release(local);
    }

    let parameters = if parameters.is_empty() {
        String::new()
    } else {
        format!("\n  {},\n", parameters.join(",\n  "))
    };
    let bag = if bag.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", bag.join(", "))
    };

    EndpointFunctionTemplate {
        description: operation.description.as_deref().unwrap_or_default(),
        local_name,
        exported_name,
        parameters: &parameters,
        return_type: &return_type.to_string(),
        client,
        service: &quote(&service.name),
        operation: &quote(&operation.name),
        bag: &bag,
    }
    .render()
}
