//! # elearning-core
//!
//! Parser and validator for e-learning content packages: SCORM 1.2, SCORM
//! 2004, AICC, cmi5, and xAPI/TinCan.
//!
//! Given a package root (a directory, a ZIP archive, or anything else
//! behind a [`fs::FileAccess`]), this crate detects which standard the
//! package conforms to, parses its manifest into a normalized shape, runs
//! the rule set for that standard, and reports findings as data rather than
//! exceptions. The [`parser::ParserFactory`] ties detection, parsing, and
//! validation together; most callers only need it.
//!
//! ## Stability Tiers
//!
//! Public modules are classified into stability tiers:
//!
//! - **Stable** -- `diagnostics`, `error`, `fs`, `manifest`.
//!   These modules follow semver: breaking changes require a major version bump.
//! - **Unstable** -- `detection`, `parser`, `validation`.
//!   Interfaces may change on minor releases. Use with care in downstream crates.
//! - **Internal** -- `xml`, `encoding`, `activity_tree` (pub(crate) surface
//!   re-exported where a downstream consumer genuinely needs the type, e.g.
//!   [`activity_tree::ActivityTree`] on [`manifest::ModuleMetadata`]).

// Rules read more naturally with a nested if than a combined `&&` condition
// when the two conditions explain different things (a feature gate and a
// rule's own precondition).
#![allow(clippy::collapsible_if)]

/// Derived SCORM 2004 activity tree.
///
/// **Stability: internal**, re-exported only via [`manifest::ModuleMetadata`].
pub mod activity_tree;
/// Charset detection for manifest bytes.
///
/// **Stability: internal**.
pub mod detection;
/// Validation findings and their append-only aggregate.
///
/// **Stability: stable** -- breaking changes require a major version bump.
pub mod diagnostics;
/// BOM/declaration/heuristic charset detection.
///
/// **Stability: internal**.
pub mod encoding;
/// Crate-wide error taxonomy.
///
/// **Stability: stable** -- breaking changes require a major version bump.
pub mod error;
/// Storage abstraction over a package root (directory, ZIP, remote, mock).
///
/// **Stability: stable** -- breaking changes require a major version bump.
pub mod fs;
/// Normalized manifest shape and the five per-standard parsers that produce it.
///
/// **Stability: stable** -- breaking changes require a major version bump.
pub mod manifest;
/// Template-method parsing pipeline and the factory that dispatches to it.
///
/// **Stability: unstable** -- interface may change on minor releases.
pub mod parser;
/// Opt-in XSD schema validation for SCORM 2004 manifests, via libxml2 FFI.
///
/// **Stability: unstable**, gated behind the `schema-validation` feature.
#[cfg(feature = "schema-validation")]
pub mod schema;
/// Secure, namespace-aware XML materialization and scalar decoding.
///
/// **Stability: internal**.
pub mod xml;
/// Rule-based validation: one rule per specification obligation, composed
/// per standard.
///
/// **Stability: unstable** -- interface may change on minor releases.
pub mod validation;

pub use detection::{ModuleTypeDetector, ModuleTypeDetectorChain};
pub use diagnostics::{Location, Severity, ValidationIssue, ValidationResult};
pub use error::{CoreError, CoreResult, FileAccessError};
pub use fs::{DirectoryFileAccess, FileAccess, MockFileAccess, RemoteFileAccess, RemoteObjectStore, ZipFileAccess};
pub use manifest::{Item, LomFragment, ModuleMetadata, ModuleType, PackageManifest, Resource};
pub use parser::{
    BaseParser, ParseResult, Parser, ParserFactory, ParserOptions, ParserOptionsBuilder,
};
pub use validation::ValidationRule;

#[cfg(test)]
mod integration_smoke {
    use super::*;
    use fs::MockFileAccess;

    /// A top-to-bottom check that detection, parsing, and validation agree
    /// on a minimal but complete SCORM 1.2 package -- every module this
    /// crate ships participates in producing this one result.
    #[test]
    fn scorm12_package_detects_parses_and_validates() {
        let access = MockFileAccess::new().with_file(
            "imsmanifest.xml",
            r#"<?xml version="1.0"?>
<manifest identifier="course_1" xmlns="http://www.imsproject.org/xsd/imscp_rootv1p1p2" xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2">
  <organizations default="org_1">
    <organization identifier="org_1">
      <title>Intro Course</title>
      <item identifier="item_1" identifierref="resource_1"><title>Lesson 1</title></item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="resource_1" adlcp:scormtype="sco" href="index.html">
      <file href="index.html"/>
    </resource>
  </resources>
</manifest>"#,
        );

        let factory = ParserFactory::new();
        let parser = factory
            .from_file_access(Box::new(access), ParserOptions::default())
            .expect("scorm12 layout should be recognized");
        assert_eq!(parser.module_type(), ModuleType::Scorm12);

        let result = parser.parse_and_validate().expect("well-formed package should parse");
        assert!(result.validation.is_valid());
        assert_eq!(result.metadata.manifest.launch_url.as_deref(), Some("index.html"));
    }

    #[test]
    fn unrecognized_package_is_a_detection_error() {
        let access = MockFileAccess::new().with_file("readme.txt", "nothing here");
        let factory = ParserFactory::new();
        let err = factory
            .from_file_access(Box::new(access), ParserOptions::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::DetectionUnknown { .. }));
    }
}
