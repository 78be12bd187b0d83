//! Parser for `x-annotations` and `x-validation-constraints` entries.
//!
//! Entries look like `NotNull`, `Size()`, `Size({ min: 1, max: 3 })` or
//! `javax.validation.constraints.Min(5)`. Only the last segment of a
//! qualified name is used. Each entry becomes a `new Validator(args)`
//! expression with the validator imported from the form module.

use thiserror::Error;

use super::expr::Expr;
use super::imports::ImportTable;
use super::literal::{self, LiteralError};

/// Validators the form runtime provides.
pub const KNOWN_VALIDATORS: &[&str] = &[
    "AssertFalse",
    "AssertTrue",
    "DecimalMax",
    "DecimalMin",
    "Digits",
    "Email",
    "Future",
    "FutureOrPresent",
    "Max",
    "Min",
    "Negative",
    "NegativeOrZero",
    "NotBlank",
    "NotEmpty",
    "NotNull",
    "Null",
    "Past",
    "PastOrPresent",
    "Pattern",
    "Positive",
    "PositiveOrZero",
    "Size",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("malformed validator `{raw}`: {reason}")]
    Malformed { raw: String, reason: String },
    #[error("malformed arguments in validator `{raw}`")]
    Arguments {
        raw: String,
        #[source]
        source: LiteralError,
    },
    #[error("unknown validator `{name}` in `{raw}`")]
    UnknownValidator { raw: String, name: String },
}

/// A parsed, not yet imported, validator invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: String,
    pub argument: Option<literal::Literal>,
}

/// Parse the text form of one annotation.
pub fn parse_annotation(raw: &str) -> Result<Annotation, AnnotationError> {
    let text = raw.trim();
    let malformed = |reason: &str| AnnotationError::Malformed {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    let name_end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.')))
        .unwrap_or(text.len());
    let qualified = &text[..name_end];
    let name = qualified.rsplit('.').next().unwrap_or(qualified);
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(malformed("missing validator name"));
    }

    let rest = text[name_end..].trim_start();
    let argument = if rest.is_empty() {
        None
    } else {
        let inner = rest
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(|| malformed("expected `(arguments)` after the name"))?;
        if inner.trim().is_empty() {
            None
        } else {
            Some(
                literal::parse(inner.trim()).map_err(|source| AnnotationError::Arguments {
                    raw: raw.to_string(),
                    source,
                })?,
            )
        }
    };

    if !KNOWN_VALIDATORS.contains(&name) {
        return Err(AnnotationError::UnknownValidator {
            raw: raw.to_string(),
            name: name.to_string(),
        });
    }

    Ok(Annotation {
        name: name.to_string(),
        argument,
    })
}

/// Turns annotation strings into validator construction expressions,
/// importing each validator into the owning file on first use.
pub struct AnnotationParser<'a> {
    imports: &'a mut ImportTable,
    form_module: &'a str,
}

impl<'a> AnnotationParser<'a> {
    pub fn new(imports: &'a mut ImportTable, form_module: &'a str) -> Self {
        Self {
            imports,
            form_module,
        }
    }

    pub fn parse(&mut self, raw: &str) -> Result<Expr, AnnotationError> {
        let annotation = parse_annotation(raw)?;
        let callee = self
            .imports
            .named_import(self.form_module, &annotation.name, false);
        let args = annotation
            .argument
            .map(|arg| vec![Expr::Literal(arg)])
            .unwrap_or_default();
        Ok(Expr::New(callee, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(raw: &str) -> Result<String, AnnotationError> {
        let mut imports = ImportTable::new();
        let mut parser = AnnotationParser::new(&mut imports, "@clientgen/form");
        parser.parse(raw).map(|e| e.to_string())
    }

    #[test]
    fn test_bare_and_empty_call() {
        assert_eq!(render("NotNull").unwrap(), "new NotNull()");
        assert_eq!(render("NotBlank()").unwrap(), "new NotBlank()");
    }

    #[test]
    fn test_arguments_are_kept() {
        assert_eq!(render("Min(5)").unwrap(), "new Min(5)");
        assert_eq!(
            render("Size({ min: 1, max: 3 })").unwrap(),
            "new Size({ min: 1, max: 3 })"
        );
        assert_eq!(
            render("Pattern({\"regexp\":\"^\\\\d+$\"})").unwrap(),
            "new Pattern({ regexp: \"^\\\\d+$\" })"
        );
    }

    #[test]
    fn test_qualified_name_uses_last_segment() {
        assert_eq!(
            render("jakarta.validation.constraints.Email").unwrap(),
            "new Email()"
        );
    }

    #[test]
    fn test_validator_imported_once() {
        let mut imports = ImportTable::new();
        let mut parser = AnnotationParser::new(&mut imports, "@clientgen/form");
        parser.parse("NotNull").unwrap();
        parser.parse("NotNull()").unwrap();
        assert_eq!(imports.len(), 1);
    }

    #[test]
    fn test_malformed_fails_loudly() {
        assert!(matches!(
            render("Size(min: 1"),
            Err(AnnotationError::Malformed { .. })
        ));
        assert!(matches!(
            render("Size({ min: })"),
            Err(AnnotationError::Arguments { .. })
        ));
        assert!(matches!(render(""), Err(AnnotationError::Malformed { .. })));
        assert!(matches!(
            render("Frobnicate()"),
            Err(AnnotationError::UnknownValidator { .. })
        ));
    }
}
