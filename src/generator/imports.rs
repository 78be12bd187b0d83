//! Per-file import bookkeeping and relative path computation.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path};
use std::sync::Arc;

/// A local identifier in a generated file.
///
/// Shared so that repeated lookups of the same import hand out the very
/// same allocation (`Arc::ptr_eq` holds between them).
pub type Identifier = Arc<str>;

/// Words that can never be used as a local binding in generated modules.
const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield",
];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Turn arbitrary text into a syntactically valid identifier.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ImportKind {
    Default,
    Named(String),
    Namespace,
}

#[derive(Debug, Clone)]
struct ImportRecord {
    path: String,
    kind: ImportKind,
    alias: Identifier,
    type_only: bool,
}

/// Import table of one output file.
///
/// Records are keyed by module path (and exported name for named imports),
/// so asking twice for the same module returns the alias handed out first.
/// Aliases are unique within the file; a colliding suggestion gets the
/// lowest free numeric suffix (`Name_1`, `Name_2`, ...).
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    records: Vec<ImportRecord>,
    index: HashMap<(String, ImportKind), usize>,
    taken: HashSet<String>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a local name that is not an import (function, parameter, class).
    pub fn reserve(&mut self, suggested: &str) -> Identifier {
        let name = self.unique_name(suggested);
        self.taken.insert(name.clone());
        Identifier::from(name)
    }

    /// Give back a name claimed with [`reserve`](Self::reserve) once the
    /// scope it was bound in has ended. Import aliases stay bound.
    pub fn release(&mut self, name: &str) {
        if !self.records.iter().any(|r| &*r.alias == name) {
            self.taken.remove(name);
        }
    }

    fn unique_name(&self, suggested: &str) -> String {
        let base = sanitize_identifier(suggested);
        if !self.taken.contains(&base) && !is_reserved_word(&base) {
            return base;
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or(base)
    }

    fn add(&mut self, path: &str, kind: ImportKind, suggested: &str, type_only: bool) -> Identifier {
        let key = (path.to_string(), kind.clone());
        if let Some(&idx) = self.index.get(&key) {
            let record = &mut self.records[idx];
            if !type_only {
                record.type_only = false;
            }
            return record.alias.clone();
        }
        let alias = self.reserve(suggested);
        self.index.insert(key, self.records.len());
        self.records.push(ImportRecord {
            path: path.to_string(),
            kind,
            alias: alias.clone(),
            type_only,
        });
        alias
    }

    /// Default import of `path`. A value import upgrades an earlier type-only one.
    pub fn default_import(&mut self, path: &str, suggested: &str, type_only: bool) -> Identifier {
        self.add(path, ImportKind::Default, suggested, type_only)
    }

    /// Named import of `name` from `path`.
    pub fn named_import(&mut self, path: &str, name: &str, type_only: bool) -> Identifier {
        self.add(path, ImportKind::Named(name.to_string()), name, type_only)
    }

    /// `import * as alias from path`.
    pub fn namespace_import(&mut self, path: &str, suggested: &str) -> Identifier {
        self.add(path, ImportKind::Namespace, suggested, false)
    }

    /// Value import keyed by path; `is_default` picks default or named form.
    pub fn get_or_add(&mut self, path: &str, suggested: &str, is_default: bool) -> Identifier {
        if is_default {
            self.default_import(path, suggested, false)
        } else {
            self.named_import(path, suggested, false)
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Import statements in first-use order of their module paths.
    ///
    /// Named imports from one module are merged into a single statement and
    /// sorted by exported name.
    pub fn render(&self) -> Vec<String> {
        let mut paths: Vec<&str> = Vec::new();
        for record in &self.records {
            if !paths.contains(&record.path.as_str()) {
                paths.push(&record.path);
            }
        }

        let mut statements = Vec::new();
        for path in paths {
            let of_path = || self.records.iter().filter(move |r| r.path == path);

            for record in of_path().filter(|r| r.kind == ImportKind::Namespace) {
                statements.push(format!("import * as {} from \"{path}\";", record.alias));
            }
            for record in of_path().filter(|r| r.kind == ImportKind::Default) {
                let keyword = if record.type_only { "import type" } else { "import" };
                statements.push(format!("{keyword} {} from \"{path}\";", record.alias));
            }

            let mut named: Vec<(&str, &ImportRecord)> = of_path()
                .filter_map(|r| match &r.kind {
                    ImportKind::Named(name) => Some((name.as_str(), r)),
                    _ => None,
                })
                .collect();
            if named.is_empty() {
                continue;
            }
            named.sort_by(|a, b| a.0.cmp(b.0));
            let all_types = named.iter().all(|(_, r)| r.type_only);
            let specifiers: Vec<String> = named
                .iter()
                .map(|(name, r)| {
                    let prefix = if r.type_only && !all_types { "type " } else { "" };
                    if *name == &*r.alias {
                        format!("{prefix}{name}")
                    } else {
                        format!("{prefix}{name} as {}", r.alias)
                    }
                })
                .collect();
            let keyword = if all_types { "import type" } else { "import" };
            statements.push(format!(
                "{keyword} {{ {} }} from \"{path}\";",
                specifiers.join(", ")
            ));
        }
        statements
    }
}

/// Relative module specifier from one generated file to another.
///
/// Both arguments are logical, `/`-separated locations inside the output
/// tree; `from_file` names a file, so its last segment is dropped. The
/// result always starts with `./` or `../`.
pub fn relative_path(from_file: &str, to: &str) -> String {
    let from_dir: Vec<&str> = from_file
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    let from_dir = &from_dir[..from_dir.len().saturating_sub(1)];
    let to_parts: Vec<&str> = to.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    join_relative(from_dir, &to_parts)
}

/// Relative specifier from a directory to a file on disk, `/`-separated.
pub fn relativize(from_dir: &Path, to: &Path) -> String {
    let normal = |p: &Path| -> Vec<String> {
        p.components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect()
    };
    let from = normal(from_dir);
    let to = normal(to);
    let from: Vec<&str> = from.iter().map(String::as_str).collect();
    let to: Vec<&str> = to.iter().map(String::as_str).collect();
    join_relative(&from, &to)
}

fn join_relative(from_dir: &[&str], to: &[&str]) -> String {
    let common = from_dir
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let ups = from_dir.len() - common;
    let rest = to[common..].join("/");
    if ups == 0 {
        format!("./{rest}")
    } else {
        format!("{}{rest}", "../".repeat(ups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_same_path_returns_same_alias() {
        let mut table = ImportTable::new();
        let first = table.get_or_add("./com/example/Account.js", "Account", true);
        let second = table.get_or_add("./com/example/Account.js", "Other", true);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(table.len(), 1);
        assert_eq!(table.render().len(), 1);
    }

    #[test]
    fn test_collision_gets_lowest_free_suffix() {
        let mut table = ImportTable::new();
        let a = table.default_import("./a/Account.js", "Account", true);
        let b = table.default_import("./b/Account.js", "Account", true);
        let c = table.default_import("./c/Account.js", "Account", true);
        assert_eq!(&*a, "Account");
        assert_eq!(&*b, "Account_1");
        assert_eq!(&*c, "Account_2");
    }

    #[test]
    fn test_reserved_words_are_suffixed() {
        let mut table = ImportTable::new();
        assert_eq!(&*table.reserve("delete"), "delete_1");
        assert_eq!(&*table.reserve("class"), "class_1");
        assert_eq!(&*table.reserve("first-name"), "first_name");
        assert_eq!(&*table.reserve("1st"), "_1st");
    }

    #[test]
    fn test_released_name_can_be_claimed_again() {
        let mut table = ImportTable::new();
        let client = table.default_import("./client.js", "client", false);
        let date = table.reserve("date");
        table.release(&date);
        table.release(&client);
        assert_eq!(&*table.reserve("date"), "date");
        assert_eq!(&*table.reserve("client"), "client_1");
    }

    #[test]
    fn test_render_merges_named_imports() {
        let mut table = ImportTable::new();
        table.named_import("@clientgen/form", "StringModel", false);
        table.named_import("@clientgen/form", "NotNull", false);
        table.default_import("./Account.js", "Account", true);
        table.named_import("@clientgen/form", "StringModel", false);
        let rendered = table.render();
        assert_eq!(
            rendered,
            vec![
                "import { NotNull, StringModel } from \"@clientgen/form\";".to_string(),
                "import type Account from \"./Account.js\";".to_string(),
            ]
        );
    }

    #[test]
    fn test_value_import_upgrades_type_only() {
        let mut table = ImportTable::new();
        table.default_import("./X.js", "X", true);
        table.default_import("./X.js", "X", false);
        assert_eq!(table.render(), vec!["import X from \"./X.js\";".to_string()]);
    }

    #[test]
    fn test_relative_path_forms() {
        assert_eq!(relative_path("Endpoint", "com/example/Account"), "./com/example/Account");
        assert_eq!(relative_path("com/example/AModel", "com/example/A"), "./A");
        assert_eq!(relative_path("com/example/AModel", "com/other/B"), "../other/B");
        assert_eq!(relative_path("com/example/deep/X", "Y"), "../../../Y");
        assert_eq!(
            relative_path("com/example/AModel", "com/other/B"),
            relative_path("com/example/AModel", "com/other/B")
        );
    }

    #[test]
    fn test_relativize_filesystem_paths() {
        let out = PathBuf::from("/project/frontend/generated");
        let view = PathBuf::from("/project/frontend/views/about.tsx");
        assert_eq!(relativize(&out, &view), "../views/about.tsx");
        let inside = PathBuf::from("/project/frontend/generated/x.ts");
        assert_eq!(relativize(&out, &inside), "./x.ts");
    }
}
