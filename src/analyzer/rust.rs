//! Rust declaration source using syn for AST parsing
//!
//! Code Quality Principle: Specialized Analysis Services - syn does the parsing, we only classify
//! - Implements DeclarationSource for clean polymorphism
//! - Type-like items become TypeOrInterface declarations, everything named else is Other
//! - Identifier spans are translated into byte anchors of the original buffer

use crate::analyzer::DeclarationSource;
use crate::domain::declarations::{DeclKind, Declaration};
use crate::domain::source::LineIndex;
use crate::domain::violations::NamingResult;
use std::path::Path;

use syn::ext::IdentExt;
use syn::visit::Visit;

/// Declaration source for Rust files
#[derive(Debug, Default, Clone, Copy)]
pub struct RustSource;

impl RustSource {
    pub fn new() -> Self {
        Self
    }
}

impl DeclarationSource for RustSource {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn handles_file(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == "rs")
            .unwrap_or(false)
    }

    fn declarations(&self, content: &str) -> NamingResult<Vec<Declaration>> {
        let syntax_tree = match syn::parse_file(content) {
            Ok(tree) => tree,
            Err(e) => {
                // Not valid Rust; nothing reliable to check
                tracing::debug!("Failed to parse Rust source: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut collector = DeclarationCollector {
            index: LineIndex::new(content),
            declarations: Vec::new(),
        };
        collector.visit_file(&syntax_tree);

        Ok(collector.declarations)
    }
}

/// Visitor recording named items in document order
struct DeclarationCollector<'a> {
    index: LineIndex<'a>,
    declarations: Vec<Declaration>,
}

impl DeclarationCollector<'_> {
    fn record(&mut self, ident: &syn::Ident, kind: DeclKind) {
        let start = ident.span().start();
        let Some(location) = self.index.location(start.line, start.column) else {
            tracing::debug!("No source location for `{}` at {}:{}", ident, start.line, start.column);
            return;
        };

        // `r#type` is anchored at `type`
        let raw_prefix = if ident.to_string().starts_with("r#") { 2 } else { 0 };
        let name = ident.unraw().to_string();

        self.declarations
            .push(Declaration::new(name, kind, location.with_offset(raw_prefix)));
    }
}

impl<'ast> Visit<'ast> for DeclarationCollector<'_> {
    fn visit_item_struct(&mut self, item: &'ast syn::ItemStruct) {
        self.record(&item.ident, DeclKind::TypeOrInterface);
        syn::visit::visit_item_struct(self, item);
    }

    fn visit_item_enum(&mut self, item: &'ast syn::ItemEnum) {
        self.record(&item.ident, DeclKind::TypeOrInterface);
        syn::visit::visit_item_enum(self, item);
    }

    fn visit_item_union(&mut self, item: &'ast syn::ItemUnion) {
        self.record(&item.ident, DeclKind::TypeOrInterface);
        syn::visit::visit_item_union(self, item);
    }

    fn visit_item_trait(&mut self, item: &'ast syn::ItemTrait) {
        self.record(&item.ident, DeclKind::TypeOrInterface);
        syn::visit::visit_item_trait(self, item);
    }

    fn visit_item_trait_alias(&mut self, item: &'ast syn::ItemTraitAlias) {
        self.record(&item.ident, DeclKind::TypeOrInterface);
        syn::visit::visit_item_trait_alias(self, item);
    }

    fn visit_item_type(&mut self, item: &'ast syn::ItemType) {
        self.record(&item.ident, DeclKind::TypeOrInterface);
        syn::visit::visit_item_type(self, item);
    }

    fn visit_trait_item_type(&mut self, item: &'ast syn::TraitItemType) {
        self.record(&item.ident, DeclKind::TypeOrInterface);
        syn::visit::visit_trait_item_type(self, item);
    }

    fn visit_item_fn(&mut self, item: &'ast syn::ItemFn) {
        self.record(&item.sig.ident, DeclKind::Other);
        syn::visit::visit_item_fn(self, item);
    }

    fn visit_impl_item_fn(&mut self, item: &'ast syn::ImplItemFn) {
        self.record(&item.sig.ident, DeclKind::Other);
        syn::visit::visit_impl_item_fn(self, item);
    }

    fn visit_trait_item_fn(&mut self, item: &'ast syn::TraitItemFn) {
        self.record(&item.sig.ident, DeclKind::Other);
        syn::visit::visit_trait_item_fn(self, item);
    }

    fn visit_item_const(&mut self, item: &'ast syn::ItemConst) {
        self.record(&item.ident, DeclKind::Other);
        syn::visit::visit_item_const(self, item);
    }

    fn visit_item_static(&mut self, item: &'ast syn::ItemStatic) {
        self.record(&item.ident, DeclKind::Other);
        syn::visit::visit_item_static(self, item);
    }

    fn visit_item_mod(&mut self, item: &'ast syn::ItemMod) {
        self.record(&item.ident, DeclKind::Other);
        syn::visit::visit_item_mod(self, item);
    }
}
