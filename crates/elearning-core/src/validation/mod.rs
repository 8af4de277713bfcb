//! Rule-based validation: each specification obligation lives in its own
//! rule, and a validator is the ordered composition (by [`ValidationResult::merge`])
//! of the rules for one standard.

pub mod aicc;
pub mod cmi5;
pub mod common;
pub mod scorm12;
pub mod scorm2004;
pub mod xapi;

use crate::diagnostics::ValidationResult;
use crate::manifest::PackageManifest;

/// A stateless, thread-safe check against a parsed manifest. Rules never
/// see a null manifest in the normal flow -- callers always hold a `&
/// PackageManifest` -- so there's no separate defensive check to write for
/// that here; the invariant is purely a documentation note for anyone
/// implementing a new rule.
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, manifest: &PackageManifest) -> ValidationResult;
}

/// Run every rule in `rules` against `manifest` and fold the results in
/// order. No rule short-circuits another; every rule always runs.
pub fn run_all(rules: &[Box<dyn ValidationRule>], manifest: &PackageManifest) -> ValidationResult {
    ValidationResult::merge_all(rules.iter().map(|r| r.check(manifest)))
}

/// The rule list for one standard, common rules first so their issues
/// precede standard-specific ones in the merged result.
pub fn rules_for(module_type: crate::manifest::ModuleType) -> Vec<Box<dyn ValidationRule>> {
    use crate::manifest::ModuleType::*;

    let mut rules: Vec<Box<dyn ValidationRule>> = vec![
        Box::new(common::DuplicateIdentifier),
        Box::new(common::PathSecurity),
        Box::new(common::OrphanedResources),
    ];
    match module_type {
        Scorm12 => rules.extend(scorm12::rules()),
        Scorm2004 => rules.extend(scorm2004::rules()),
        Aicc => rules.extend(aicc::rules()),
        Cmi5 => rules.extend(cmi5::rules()),
        Xapi => rules.extend(xapi::rules()),
    }
    rules
}

/// Treat whitespace-only strings as absent, matching every standard's
/// "required non-empty" rules.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}
