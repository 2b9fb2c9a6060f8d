//! Declarations handed to the naming pass by a front end

use crate::domain::source::SourceLocation;
use serde::{Deserialize, Serialize};

/// Kind tag of a declaration; only type-like declarations are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// Classes, structs, enums, traits, interfaces and type aliases
    TypeOrInterface,
    /// Everything else the front end reports
    Other,
}

/// A named declaration discovered by a front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declared name; never empty
    pub name: String,
    pub kind: DeclKind,
    /// Location of the first character of `name`
    pub anchor: SourceLocation,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclKind, anchor: SourceLocation) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "declaration names must not be empty");
        Self { name, kind, anchor }
    }

    /// Shorthand for a type or interface declaration
    pub fn type_decl(name: impl Into<String>, anchor: SourceLocation) -> Self {
        Self::new(name, DeclKind::TypeOrInterface, anchor)
    }

    pub fn is_type_or_interface(&self) -> bool {
        self.kind == DeclKind::TypeOrInterface
    }
}
