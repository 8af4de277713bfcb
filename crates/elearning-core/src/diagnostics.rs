//! Validation findings: [`ValidationIssue`] and the append-only
//! [`ValidationResult`] sequence that aggregates them.
//!
//! Findings are data, never exceptions -- a rule that finds a problem
//! returns a `ValidationResult` describing it; it does not fail. See
//! [`crate::error`] for the exception-flavored taxonomy that covers
//! everything that *does* stop a parse.

use std::fmt;

/// Severity of a single finding. Only warnings are non-fatal; `ERROR`
/// findings make [`ValidationResult::is_valid`] return `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// Where in the source package an issue was found, for display purposes.
/// Not byte-precise like the teacher's `Fix` offsets -- manifests are small
/// enough that "which element" is enough to act on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: Option<String>,
    pub element: Option<String>,
}

impl Location {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            element: None,
        }
    }

    pub fn element(path: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            element: Some(element.into()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, &self.element) {
            (Some(p), Some(e)) => write!(f, "{p} ({e})"),
            (Some(p), None) => write!(f, "{p}"),
            (None, Some(e)) => write!(f, "{e}"),
            (None, None) => write!(f, "<package root>"),
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Stable, upper-snake-case identifier, e.g. `SCORM12_MISSING_RESOURCE_REF`.
    pub code: &'static str,
    pub message: String,
    pub location: Location,
    pub suggested_fix: Option<String>,
}

impl ValidationIssue {
    pub fn error(code: &'static str, message: impl Into<String>, location: Location) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location,
            suggested_fix: None,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, location: Location) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            location,
            suggested_fix: None,
        }
    }

    pub fn with_suggested_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }
}

/// An ordered, immutable sequence of [`ValidationIssue`]s.
///
/// `ValidationResult` forms a monoid under [`merge`](Self::merge): `valid()`
/// is the identity, `merge` is associative, and the issue order of a merge is
/// the left-to-right concatenation of its operands. Nothing about an
/// existing `ValidationResult` is ever mutated in place; every combinator
/// returns a new value.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// The identity element: no issues, `is_valid() == true`.
    pub fn valid() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn single(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Concatenate `self`'s issues with `other`'s, in that order.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.issues.extend(other.issues);
        self
    }

    /// Fold a sequence of results into one, in order. `valid()` for an empty
    /// iterator, consistent with `merge`'s identity.
    pub fn merge_all(results: impl IntoIterator<Item = Self>) -> Self {
        results.into_iter().fold(Self::valid(), Self::merge)
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    /// Human-readable report: `"N error(s) found"` followed by a numbered
    /// line per error, with `Location:`/`Suggestion:` detail lines.
    pub fn format_errors(&self) -> String {
        let errors: Vec<&ValidationIssue> = self.errors().collect();
        let mut out = format!("{} error(s) found", errors.len());
        for (i, issue) in errors.iter().enumerate() {
            out.push_str(&format!("\n{}. [{}] {}", i + 1, issue.code, issue.message));
            out.push_str(&format!("\n   Location: {}", issue.location));
            if let Some(fix) = &issue.suggested_fix {
                out.push_str(&format!("\n   Suggestion: {fix}"));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(code: &'static str) -> ValidationIssue {
        ValidationIssue::error(code, "broken", Location::none())
    }

    fn warn(code: &'static str) -> ValidationIssue {
        ValidationIssue::warning(code, "heads up", Location::none())
    }

    #[test]
    fn valid_is_empty_and_valid() {
        let r = ValidationResult::valid();
        assert!(r.is_valid());
        assert!(!r.has_errors());
        assert!(r.issues().is_empty());
    }

    #[test]
    fn merge_is_identity_on_valid() {
        let r = ValidationResult::single(err("X"));
        let left = ValidationResult::valid().merge(r.clone());
        let right = r.clone().merge(ValidationResult::valid());
        assert_eq!(left.issues().len(), 1);
        assert_eq!(right.issues().len(), 1);
    }

    #[test]
    fn merge_concatenates_in_order() {
        let a = ValidationResult::single(err("A"));
        let b = ValidationResult::single(err("B"));
        let merged = a.merge(b);
        let codes: Vec<_> = merged.issues().iter().map(|i| i.code).collect();
        assert_eq!(codes, vec!["A", "B"]);
    }

    #[test]
    fn warnings_do_not_invalidate() {
        let r = ValidationResult::single(warn("SOFT"));
        assert!(r.is_valid());
        assert_eq!(r.warnings().count(), 1);
        assert_eq!(r.errors().count(), 0);
    }

    #[test]
    fn has_errors_iff_any_error_severity() {
        let only_warn = ValidationResult::single(warn("W"));
        assert!(!only_warn.has_errors());
        let with_err = only_warn.merge(ValidationResult::single(err("E")));
        assert!(with_err.has_errors());
        assert!(!with_err.is_valid());
    }

    #[test]
    fn format_errors_lists_only_errors() {
        let r = ValidationResult::single(warn("W")).merge(ValidationResult::single(
            err("SCORM12_MISSING_RESOURCE_REF").with_suggested_fix("add the resource"),
        ));
        let text = r.format_errors();
        assert!(text.starts_with("1 error(s) found"));
        assert!(text.contains("SCORM12_MISSING_RESOURCE_REF"));
        assert!(text.contains("Suggestion: add the resource"));
        assert!(!text.contains("heads up"));
    }
}
