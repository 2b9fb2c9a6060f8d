//! Objective-C declaration source using a regex token scan
//!
//! Comments and string literals are blanked out first with spaces of the same
//! byte length, so every match offset is also an offset into the original file.

use crate::analyzer::DeclarationSource;
use crate::domain::declarations::{DeclKind, Declaration};
use crate::domain::source::SourceLocation;
use crate::domain::violations::{NamingError, NamingResult};
use regex::Regex;
use std::path::Path;

// An optional lightweight-generics list may sit between the name and a category `(`
const CONTAINER_PATTERN: &str =
    r"@(interface|protocol|implementation)\b\s*([A-Za-z_$][A-Za-z0-9_$]*)\s*(?:<[^>{};]*>)?(\s*\()?";
const FORWARD_CLASS_PATTERN: &str = r"@class\b([^;]*);";
const IDENTIFIER_PATTERN: &str = r"[A-Za-z_$][A-Za-z0-9_$]*";

/// Declaration source for Objective-C headers and implementation files
#[derive(Debug, Clone)]
pub struct ObjcSource {
    container: Regex,
    forward_class: Regex,
    identifier: Regex,
}

impl ObjcSource {
    pub fn new() -> NamingResult<Self> {
        Ok(Self {
            container: compile(CONTAINER_PATTERN)?,
            forward_class: compile(FORWARD_CLASS_PATTERN)?,
            identifier: compile(IDENTIFIER_PATTERN)?,
        })
    }

    fn scan(&self, masked: &str) -> Vec<Declaration> {
        let mut declarations = Vec::new();

        for caps in self.container.captures_iter(masked) {
            let (Some(keyword), Some(name)) = (caps.get(1), caps.get(2)) else {
                continue;
            };

            // Only a plain `@interface Name` declares a new class; categories,
            // extensions, protocols and implementations refer to one.
            let kind = match keyword.as_str() {
                "interface" if caps.get(3).is_none() => DeclKind::TypeOrInterface,
                _ => DeclKind::Other,
            };
            declarations.push(Declaration::new(
                name.as_str(),
                kind,
                SourceLocation::new(name.start()),
            ));
        }

        for caps in self.forward_class.captures_iter(masked) {
            let Some(list) = caps.get(1) else {
                continue;
            };
            for ident in self.identifier.find_iter(list.as_str()) {
                declarations.push(Declaration::new(
                    ident.as_str(),
                    DeclKind::Other,
                    SourceLocation::new(list.start() + ident.start()),
                ));
            }
        }

        declarations.sort_by_key(|decl| decl.anchor);
        declarations
    }
}

impl DeclarationSource for ObjcSource {
    fn name(&self) -> &'static str {
        "objc"
    }

    fn handles_file(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext, "h" | "m" | "mm"))
            .unwrap_or(false)
    }

    fn declarations(&self, content: &str) -> NamingResult<Vec<Declaration>> {
        let masked = mask_comments_and_strings(content);
        debug_assert_eq!(masked.len(), content.len());
        Ok(self.scan(&masked))
    }
}

fn compile(pattern: &str) -> NamingResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| NamingError::pattern(format!("Invalid pattern '{pattern}': {e}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaskState {
    Code,
    LineComment,
    BlockComment,
    Quoted(char),
}

/// Copy of `source` with comments and literals replaced by spaces; newlines are kept
fn mask_comments_and_strings(source: &str) -> String {
    let mut masked = String::with_capacity(source.len());
    let mut state = MaskState::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            MaskState::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    state = MaskState::LineComment;
                    blank(&mut masked, c);
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    masked.push_str("  ");
                    state = MaskState::BlockComment;
                }
                '"' | '\'' => {
                    state = MaskState::Quoted(c);
                    masked.push(' ');
                }
                _ => masked.push(c),
            },
            MaskState::LineComment => {
                if c == '\n' {
                    state = MaskState::Code;
                }
                blank(&mut masked, c);
            }
            MaskState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    masked.push_str("  ");
                    state = MaskState::Code;
                } else {
                    blank(&mut masked, c);
                }
            }
            MaskState::Quoted(quote) => {
                if c == '\\' {
                    blank(&mut masked, c);
                    if let Some(escaped) = chars.next() {
                        blank(&mut masked, escaped);
                    }
                } else {
                    if c == quote || c == '\n' {
                        state = MaskState::Code;
                    }
                    blank(&mut masked, c);
                }
            }
        }
    }

    masked
}

fn blank(masked: &mut String, c: char) {
    if c == '\n' {
        masked.push('\n');
    } else {
        masked.extend(std::iter::repeat(' ').take(c.len_utf8()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn declarations(source: &str) -> Vec<Declaration> {
        ObjcSource::new().unwrap().declarations(source).unwrap()
    }

    fn anchored_text<'a>(source: &'a str, decl: &Declaration) -> &'a str {
        let start = decl.anchor.offset();
        &source[start..start + decl.name.len()]
    }

    #[rstest]
    #[case("Widget.h", true)]
    #[case("Widget.m", true)]
    #[case("Widget.mm", true)]
    #[case("widget.rs", false)]
    #[case("Makefile", false)]
    fn test_handles_objc_files(#[case] path: &str, #[case] expected: bool) {
        let source = ObjcSource::new().unwrap();
        assert_eq!(source.handles_file(Path::new(path)), expected);
    }

    #[test]
    fn test_class_interface_is_a_type() {
        let source = "@interface widget : NSObject\n@end\n";
        let decls = declarations(source);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "widget");
        assert_eq!(decls[0].kind, DeclKind::TypeOrInterface);
        assert_eq!(decls[0].anchor.offset(), 11);
    }

    #[test]
    fn test_generic_class_interface_is_a_type() {
        let source = "@interface my_box<__covariant ObjectType> : NSObject\n@end\n";
        let decls = declarations(source);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "my_box");
        assert_eq!(decls[0].kind, DeclKind::TypeOrInterface);
        assert_eq!(anchored_text(source, &decls[0]), "my_box");
    }

    #[rstest]
    #[case("@interface NSString (my_additions)\n@end\n", "NSString")]
    #[case("@interface my_view ()\n@end\n", "my_view")]
    #[case("@interface lib_array<ObjectType> (MyAdditions)\n@end\n", "lib_array")]
    #[case("@interface lib_map<KeyType, ValueType> ()\n@end\n", "lib_map")]
    #[case("@protocol my_delegate <NSObject>\n@end\n", "my_delegate")]
    #[case("@implementation my_view\n@end\n", "my_view")]
    fn test_non_declaring_containers_are_other(#[case] source: &str, #[case] name: &str) {
        let decls = declarations(source);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, name);
        assert_eq!(decls[0].kind, DeclKind::Other);
        assert_eq!(anchored_text(source, &decls[0]), name);
    }

    #[test]
    fn test_forward_class_list() {
        let source = "@class foo_bar, Baz;\n";
        let decls = declarations(source);

        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["foo_bar", "Baz"]);
        assert!(decls.iter().all(|d| d.kind == DeclKind::Other));
        for decl in &decls {
            assert_eq!(anchored_text(source, decl), decl.name);
        }
    }

    #[test]
    fn test_comments_and_strings_are_ignored() {
        let source = "// @interface hidden\n\
                      /* @interface also_hidden */\n\
                      NSString *s = @\"@interface fake\";\n\
                      @interface Real_One : NSObject\n@end\n";
        let decls = declarations(source);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "Real_One");
        assert_eq!(anchored_text(source, &decls[0]), "Real_One");
    }

    #[test]
    fn test_declarations_follow_document_order() {
        let source = "@class later_one;\n@interface first_type : NSObject\n@end\n";
        let names: Vec<_> = declarations(source).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["later_one", "first_type"]);
    }

    #[test]
    fn test_multibyte_comments_keep_byte_anchors() {
        let source = "/* «ü» */ @interface bad_name : NSObject\n@end\n";
        let decls = declarations(source);

        assert_eq!(anchored_text(source, &decls[0]), "bad_name");
    }

    #[test]
    fn test_mask_preserves_length_and_lines() {
        let source = "a // é\n\"x\\\"y\" b";
        let masked = mask_comments_and_strings(source);

        assert_eq!(masked.len(), source.len());
        assert_eq!(masked.lines().count(), source.lines().count());
        assert!(masked.starts_with("a "));
        assert!(masked.ends_with(" b"));
    }
}
