//! Descriptors for the type and value expressions the processors produce.
//!
//! Both render to TypeScript through `Display`.

use std::fmt;

use super::imports::Identifier;
use super::literal::Literal;

/// A structural type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    String,
    Number,
    Boolean,
    Unknown,
    Any,
    Void,
    /// `ReadonlyArray<T>`
    Array(Box<TypeExpr>),
    /// `Readonly<Record<string, V>>`
    Record(Box<TypeExpr>),
    /// A named type bound in the current file
    Reference(Identifier),
    /// `Name<A, B>`
    Generic(Identifier, Vec<TypeExpr>),
    /// `T | undefined`
    Optional(Box<TypeExpr>),
    Promise(Box<TypeExpr>),
    /// `typeof Name`
    TypeOf(Identifier),
}

impl TypeExpr {
    pub fn array(item: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(item))
    }

    pub fn record(value: TypeExpr) -> Self {
        TypeExpr::Record(Box::new(value))
    }

    pub fn promise(inner: TypeExpr) -> Self {
        TypeExpr::Promise(Box::new(inner))
    }

    /// `T | undefined`; already optional types are left alone.
    pub fn optional(self) -> Self {
        match self {
            TypeExpr::Optional(_) => self,
            other => TypeExpr::Optional(Box::new(other)),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeExpr::Optional(_))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::String => f.write_str("string"),
            TypeExpr::Number => f.write_str("number"),
            TypeExpr::Boolean => f.write_str("boolean"),
            TypeExpr::Unknown => f.write_str("unknown"),
            TypeExpr::Any => f.write_str("any"),
            TypeExpr::Void => f.write_str("void"),
            TypeExpr::Array(item) => write!(f, "ReadonlyArray<{item}>"),
            TypeExpr::Record(value) => write!(f, "Readonly<Record<string, {value}>>"),
            TypeExpr::Reference(name) => f.write_str(name),
            TypeExpr::Generic(name, args) => {
                write!(f, "{name}<")?;
                write_list(f, args)?;
                f.write_str(">")
            }
            TypeExpr::Optional(inner) => write!(f, "{inner} | undefined"),
            TypeExpr::Promise(inner) => write!(f, "Promise<{inner}>"),
            TypeExpr::TypeOf(name) => write!(f, "typeof {name}"),
        }
    }
}

/// A value expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(bool),
    Ident(Identifier),
    Array(Vec<Expr>),
    /// `new Callee(args...)`
    New(Identifier, Vec<Expr>),
    Literal(Literal),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Ident(name) => f.write_str(name),
            Expr::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Expr::New(callee, args) => {
                write!(f, "new {callee}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Literal(literal) => write!(f, "{literal}"),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Render a list of expressions the way it appears as call arguments.
pub fn join_exprs(items: &[Expr]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
