//! Violation reporting into a host diagnostic sink
//!
//! Architecture: Ports and Adapters - The reporter talks to its host only through two traits
//! - DiagnosticIds hands out ids for custom diagnostics, like a compiler's id registry
//! - DiagnosticSink receives finished diagnostics and owns the failure policy
//! - Both are injected at construction so the pass runs without any front end

use crate::domain::declarations::Declaration;
use crate::domain::source::SourceLocation;
use crate::domain::violations::{FixIt, NamingError, NamingResult, RuleId, Severity, Violation};
use crate::fixit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a custom diagnostic kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagnosticId(pub u32);

/// A diagnostic ready for the host: one message, one location, one fix-it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub rule_id: RuleId,
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
    /// Name of the declaration the diagnostic is about
    pub declaration: String,
    pub fix_it: FixIt,
}

/// Registry of custom diagnostic ids, keyed by severity and message
pub trait DiagnosticIds {
    fn custom_id(&mut self, severity: Severity, message: &str) -> DiagnosticId;
}

/// Destination for finished diagnostics
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic) -> NamingResult<()>;
}

impl<T: DiagnosticIds + ?Sized> DiagnosticIds for &mut T {
    fn custom_id(&mut self, severity: Severity, message: &str) -> DiagnosticId {
        (**self).custom_id(severity, message)
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn emit(&mut self, diagnostic: Diagnostic) -> NamingResult<()> {
        (**self).emit(diagnostic)
    }
}

/// In-memory id registry; equal (severity, message) pairs share an id
#[derive(Debug, Default)]
pub struct CustomDiagnosticIds {
    ids: HashMap<(Severity, String), DiagnosticId>,
}

impl CustomDiagnosticIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl DiagnosticIds for CustomDiagnosticIds {
    fn custom_id(&mut self, severity: Severity, message: &str) -> DiagnosticId {
        let next = DiagnosticId(self.ids.len() as u32 + 1);
        *self
            .ids
            .entry((severity, message.to_string()))
            .or_insert(next)
    }
}

/// Sink that keeps every diagnostic in emission order
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&mut self, diagnostic: Diagnostic) -> NamingResult<()> {
        self.diagnostics.push(diagnostic);
        Ok(())
    }
}

/// Sink that accepts at most `capacity` diagnostics and rejects the rest
#[derive(Debug)]
pub struct BoundedSink {
    inner: CollectingSink,
    capacity: usize,
}

impl BoundedSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: CollectingSink::new(),
            capacity,
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.inner.into_diagnostics()
    }
}

impl DiagnosticSink for BoundedSink {
    fn emit(&mut self, diagnostic: Diagnostic) -> NamingResult<()> {
        if self.inner.diagnostics().len() >= self.capacity {
            return Err(NamingError::sink(format!(
                "diagnostic limit of {} reached",
                self.capacity
            )));
        }
        self.inner.emit(diagnostic)
    }
}

/// Turns violations into diagnostics and forwards them to a sink
#[derive(Debug)]
pub struct ViolationReporter<I, S> {
    ids: I,
    sink: S,
}

impl<I: DiagnosticIds, S: DiagnosticSink> ViolationReporter<I, S> {
    pub fn new(ids: I, sink: S) -> Self {
        Self { ids, sink }
    }

    /// Report one violation of `decl`; sink errors are returned unchanged
    pub fn report(&mut self, decl: &Declaration, violation: Violation) -> NamingResult<()> {
        let range = fixit::locate(decl.anchor, &decl.name);
        debug_assert_eq!(
            range.begin.offset() + violation.replacement.range_end,
            range.end.offset(),
            "replacement must span the original name"
        );

        let diagnostic = Diagnostic {
            id: self.ids.custom_id(violation.severity, &violation.message),
            rule_id: violation.rule_id,
            severity: violation.severity,
            location: fixit::primary_location(decl.anchor, violation.primary_offset),
            declaration: decl.name.clone(),
            fix_it: FixIt::replace(range, violation.replacement.text),
            message: violation.message,
        };

        tracing::debug!(
            rule = %diagnostic.rule_id,
            declaration = %diagnostic.declaration,
            location = %diagnostic.location,
            "reporting naming violation"
        );

        self.sink.emit(diagnostic)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (I, S) {
        (self.ids, self.sink)
    }
}

impl ViolationReporter<CustomDiagnosticIds, CollectingSink> {
    /// Reporter with a private id registry that collects diagnostics in memory
    pub fn collecting() -> Self {
        Self::new(CustomDiagnosticIds::new(), CollectingSink::new())
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.sink.into_diagnostics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;

    #[test]
    fn test_custom_ids_are_shared_per_message() {
        let mut ids = CustomDiagnosticIds::new();
        let a = ids.custom_id(Severity::Error, "first");
        let b = ids.custom_id(Severity::Error, "second");
        let c = ids.custom_id(Severity::Error, "first");
        let d = ids.custom_id(Severity::Warning, "first");

        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_ne!(a, d);
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_report_resolves_offsets_against_anchor() {
        let decl = Declaration::type_decl("My_Class", SourceLocation::new(40));
        let violation = rules::check_embedded_separator(&decl.name).unwrap();

        let mut reporter = ViolationReporter::collecting();
        reporter.report(&decl, violation).unwrap();
        let diagnostics = reporter.into_diagnostics();

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.location, SourceLocation::new(42));
        assert_eq!(diagnostic.fix_it.range.begin, SourceLocation::new(40));
        assert_eq!(diagnostic.fix_it.range.end, SourceLocation::new(47));
        assert_eq!(diagnostic.fix_it.replacement, "MyClass");
        assert_eq!(diagnostic.declaration, "My_Class");
    }

    #[test]
    fn test_report_passes_empty_replacement_through() {
        let decl = Declaration::type_decl("__", SourceLocation::new(0));
        let violation = rules::check_embedded_separator(&decl.name).unwrap();

        let mut reporter = ViolationReporter::collecting();
        reporter.report(&decl, violation).unwrap();
        let diagnostics = reporter.into_diagnostics();

        assert_eq!(diagnostics[0].fix_it.replacement, "");
        assert_eq!(diagnostics[0].fix_it.range.len(), 2);
    }

    #[test]
    fn test_sink_failure_is_returned() {
        let decl = Declaration::type_decl("widget", SourceLocation::new(0));
        let violation = rules::check_leading_lowercase(&decl.name).unwrap();

        let mut reporter = ViolationReporter::new(CustomDiagnosticIds::new(), BoundedSink::new(0));
        let err = reporter.report(&decl, violation).unwrap_err();
        assert!(matches!(err, NamingError::Sink { .. }));
    }

    #[test]
    fn test_reporter_accepts_borrowed_capabilities() {
        let mut ids = CustomDiagnosticIds::new();
        let mut sink = CollectingSink::new();
        let decl = Declaration::type_decl("widget", SourceLocation::new(3));

        {
            let mut reporter = ViolationReporter::new(&mut ids, &mut sink);
            let violation = rules::check_leading_lowercase(&decl.name).unwrap();
            reporter.report(&decl, violation).unwrap();
        }

        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(ids.len(), 1);
    }
}
