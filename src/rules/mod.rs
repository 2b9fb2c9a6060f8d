//! Naming rules for type declarations
//!
//! Code Quality Principle: Pure Rule Table - each rule is a predicate, a corrector and a pointer
//! - Rules are evaluated uniformly; adding one means adding a table entry
//! - Every rule looks only at the original name, never at another rule's correction
//! - Corrections always replace the whole name, whichever character triggered the rule

use crate::domain::violations::{Replacement, RuleId, Severity, Violation};
use crate::fixit;

/// A single naming-convention check
#[derive(Debug, Clone, Copy)]
pub struct NamingRule {
    pub id: RuleId,
    /// Message template; `{name}` and `{suggestion}` are substituted
    pub message: &'static str,
    /// One-paragraph explanation shown by `explain`
    pub description: &'static str,
    violates: fn(&str) -> bool,
    correct: fn(&str) -> String,
    primary_offset: fn(&str) -> usize,
}

pub const LEADING_LOWERCASE: NamingRule = NamingRule {
    id: RuleId::LeadingLowercase,
    message: "type name `{name}` must not begin with a lowercase letter",
    description: "Type and interface names start with an uppercase letter. \
                  The fix-it upper-cases the first character and leaves the rest untouched.",
    violates: starts_with_ascii_lowercase,
    correct: capitalize_first,
    primary_offset: first_char_offset,
};

pub const EMBEDDED_SEPARATOR: NamingRule = NamingRule {
    id: RuleId::EmbeddedSeparator,
    message: "type name `{name}` must not contain underscores",
    description: "Type and interface names are written without `_` separators, \
                  including leading and trailing ones. The diagnostic points at the first \
                  underscore; the fix-it removes every underscore from the name.",
    violates: contains_separator,
    correct: strip_separators,
    primary_offset: first_separator_offset,
};

/// Built-in rules in evaluation order
pub static BUILTIN_RULES: [NamingRule; 2] = [LEADING_LOWERCASE, EMBEDDED_SEPARATOR];

const SEPARATOR: char = '_';

impl NamingRule {
    pub fn lookup(id: RuleId) -> &'static NamingRule {
        match id {
            RuleId::LeadingLowercase => &BUILTIN_RULES[0],
            RuleId::EmbeddedSeparator => &BUILTIN_RULES[1],
        }
    }

    /// Check `name` using the rule's built-in message
    pub fn check(&self, name: &str) -> Option<Violation> {
        self.check_with_message(name, self.message)
    }

    /// Check `name`, rendering `template` as the violation message
    pub fn check_with_message(&self, name: &str, template: &str) -> Option<Violation> {
        if !(self.violates)(name) {
            return None;
        }

        let suggestion = (self.correct)(name);
        let (range_start, range_end) = fixit::name_extent(name);

        Some(Violation {
            rule_id: self.id,
            severity: Severity::Error,
            message: render_message(template, name, &suggestion),
            primary_offset: (self.primary_offset)(name),
            replacement: Replacement {
                range_start,
                range_end,
                text: suggestion,
            },
        })
    }

    /// Corrected name, whether or not the rule fires
    pub fn correct(&self, name: &str) -> String {
        (self.correct)(name)
    }
}

/// Check a name against the leading-lowercase rule
pub fn check_leading_lowercase(name: &str) -> Option<Violation> {
    LEADING_LOWERCASE.check(name)
}

/// Check a name against the embedded-separator rule
pub fn check_embedded_separator(name: &str) -> Option<Violation> {
    EMBEDDED_SEPARATOR.check(name)
}

/// All built-in violations for `name`, in rule order
pub fn check_all(name: &str) -> Vec<Violation> {
    BUILTIN_RULES.iter().filter_map(|rule| rule.check(name)).collect()
}

/// Substitute `{name}` and `{suggestion}` in a message template
pub fn render_message(template: &str, name: &str, suggestion: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{suggestion}", suggestion)
}

fn starts_with_ascii_lowercase(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut corrected = String::with_capacity(name.len());
            corrected.push(first.to_ascii_uppercase());
            corrected.push_str(chars.as_str());
            corrected
        }
        None => String::new(),
    }
}

fn first_char_offset(_name: &str) -> usize {
    0
}

fn contains_separator(name: &str) -> bool {
    name.contains(SEPARATOR)
}

fn strip_separators(name: &str) -> String {
    name.chars().filter(|&c| c != SEPARATOR).collect()
}

fn first_separator_offset(name: &str) -> usize {
    name.find(SEPARATOR).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("widget", "Widget")]
    #[case("bad_name", "Bad_name")]
    #[case("x", "X")]
    #[case("iPhone", "IPhone")]
    fn test_leading_lowercase_fires(#[case] name: &str, #[case] corrected: &str) {
        let violation = check_leading_lowercase(name).unwrap();
        assert_eq!(violation.rule_id, RuleId::LeadingLowercase);
        assert_eq!(violation.replacement.text, corrected);
        assert_eq!(violation.primary_offset, 0);
        assert_eq!(violation.severity, Severity::Error);
    }

    #[rstest]
    #[case("Widget")]
    #[case("_foo")]
    #[case("9lives")]
    #[case("$scope")]
    #[case("éclair")]
    fn test_leading_lowercase_ignores_non_lowercase_first(#[case] name: &str) {
        assert!(check_leading_lowercase(name).is_none());
    }

    #[rstest]
    #[case("My_Class", "MyClass", 2)]
    #[case("_foo", "foo", 0)]
    #[case("Foo_", "Foo", 3)]
    #[case("A__B_C", "ABC", 1)]
    fn test_embedded_separator_fires(
        #[case] name: &str,
        #[case] corrected: &str,
        #[case] pointer: usize,
    ) {
        let violation = check_embedded_separator(name).unwrap();
        assert_eq!(violation.rule_id, RuleId::EmbeddedSeparator);
        assert_eq!(violation.replacement.text, corrected);
        assert_eq!(violation.primary_offset, pointer);
        assert_eq!(violation.replacement.range_start, 0);
        assert_eq!(violation.replacement.range_end, name.len() - 1);
    }

    #[test]
    fn test_all_separator_name_corrects_to_empty() {
        let violation = check_embedded_separator("___").unwrap();
        assert_eq!(violation.replacement.text, "");
        assert_eq!(violation.replacement.range_end, 2);
        assert!(check_leading_lowercase("___").is_none());
    }

    #[test]
    fn test_both_rules_replace_the_original_name_independently() {
        let violations = check_all("bad_name");
        assert_eq!(violations.len(), 2);

        assert_eq!(violations[0].rule_id, RuleId::LeadingLowercase);
        assert_eq!(violations[0].replacement.text, "Bad_name");
        assert_eq!(violations[1].rule_id, RuleId::EmbeddedSeparator);
        assert_eq!(violations[1].replacement.text, "badname");

        for violation in &violations {
            assert_eq!(violation.replacement.range_start, 0);
            assert_eq!(violation.replacement.range_end, 7);
        }
    }

    #[test]
    fn test_clean_name_has_no_violations() {
        assert!(check_all("Clean").is_empty());
    }

    #[test]
    fn test_message_templates() {
        let violation = LEADING_LOWERCASE
            .check_with_message("widget", "rename {name} to {suggestion}")
            .unwrap();
        assert_eq!(violation.message, "rename widget to Widget");

        let violation = check_embedded_separator("My_Class").unwrap();
        assert_eq!(violation.message, "type name `My_Class` must not contain underscores");
    }

    #[test]
    fn test_lookup_matches_table_order() {
        for (index, id) in RuleId::ALL.into_iter().enumerate() {
            assert_eq!(NamingRule::lookup(id).id, id);
            assert_eq!(BUILTIN_RULES[index].id, id);
        }
    }

    proptest! {
        #[test]
        fn lowercase_correction_only_touches_first_char(name in "[a-z][A-Za-z0-9_]{0,16}") {
            let violation = check_leading_lowercase(&name).unwrap();
            let corrected = &violation.replacement.text;

            prop_assert_eq!(corrected.len(), name.len());
            prop_assert_eq!(&corrected[..1], name[..1].to_ascii_uppercase());
            prop_assert_eq!(&corrected[1..], &name[1..]);
        }

        #[test]
        fn non_lowercase_first_never_fires(name in "[A-Z0-9_$][A-Za-z0-9_]{0,16}") {
            prop_assert!(check_leading_lowercase(&name).is_none());
        }

        #[test]
        fn separator_correction_is_an_ordered_subsequence(name in "[A-Za-z0-9]{0,8}_[A-Za-z0-9_]{0,8}") {
            let violation = check_embedded_separator(&name).unwrap();
            let corrected = &violation.replacement.text;
            let expected: String = name.chars().filter(|&c| c != '_').collect();

            prop_assert!(!corrected.contains('_'));
            prop_assert_eq!(corrected, &expected);
            prop_assert_eq!(corrected.len(), name.len() - name.matches('_').count());
            prop_assert_eq!(violation.primary_offset, name.find('_').unwrap());
        }

        #[test]
        fn no_separator_never_fires(name in "[A-Za-z0-9]{1,16}") {
            prop_assert!(check_embedded_separator(&name).is_none());
        }

        #[test]
        fn corrections_are_idempotent(name in "[A-Za-z0-9_]{1,16}") {
            for rule in &BUILTIN_RULES {
                if let Some(violation) = rule.check(&name) {
                    if !violation.replacement.text.is_empty() {
                        prop_assert!(rule.check(&violation.replacement.text).is_none());
                    }
                }
            }
        }
    }
}
