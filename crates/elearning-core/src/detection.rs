//! Package-type detection: a priority-ordered chain of plugins, each
//! probing the file tree for the marker its standard requires.
//!
//! Grounded on a chain-of-responsibility pattern: plugins are tried from
//! highest priority to lowest and the first match wins, rather than any
//! plugin being able to veto or reorder the others.

use crate::fs::FileAccess;
use crate::manifest::ModuleType;

/// One detection strategy. `priority` breaks ties when more than one
/// plugin's marker is present in the same package (e.g. a cmi5 package
/// that also happens to carry AICC-shaped `.au`/`.crs` files).
pub trait ModuleTypeDetector: Send + Sync {
    fn name(&self) -> &str;
    fn priority(&self) -> i32;
    fn detect(&self, access: &dyn FileAccess) -> Option<ModuleType>;
}

struct ScormDetector;
impl ModuleTypeDetector for ScormDetector {
    fn name(&self) -> &str {
        "scorm"
    }
    fn priority(&self) -> i32 {
        100
    }
    fn detect(&self, access: &dyn FileAccess) -> Option<ModuleType> {
        if !access.exists("imsmanifest.xml") {
            return None;
        }
        Some(scorm_version(access))
    }
}

struct Cmi5Detector;
impl ModuleTypeDetector for Cmi5Detector {
    fn name(&self) -> &str {
        "cmi5"
    }
    fn priority(&self) -> i32 {
        90
    }
    fn detect(&self, access: &dyn FileAccess) -> Option<ModuleType> {
        access.exists("cmi5.xml").then_some(ModuleType::Cmi5)
    }
}

struct AiccDetector;
impl ModuleTypeDetector for AiccDetector {
    fn name(&self) -> &str {
        "aicc"
    }
    fn priority(&self) -> i32 {
        80
    }
    fn detect(&self, access: &dyn FileAccess) -> Option<ModuleType> {
        let entries = access.list("");
        let has_au = entries.iter().any(|p| p.to_ascii_lowercase().ends_with(".au"));
        let has_crs = entries.iter().any(|p| p.to_ascii_lowercase().ends_with(".crs"));
        (has_au && has_crs).then_some(ModuleType::Aicc)
    }
}

struct XapiDetector;
impl ModuleTypeDetector for XapiDetector {
    fn name(&self) -> &str {
        "xapi"
    }
    fn priority(&self) -> i32 {
        70
    }
    fn detect(&self, access: &dyn FileAccess) -> Option<ModuleType> {
        access.exists("tincan.xml").then_some(ModuleType::Xapi)
    }
}

/// Determine SCORM 1.2 vs 2004 from `imsmanifest.xml` alone, trying a small
/// set of fallback charsets before giving up and defaulting to 1.2.
pub fn scorm_version(access: &dyn FileAccess) -> ModuleType {
    let Some(path) = access.resolve_case("imsmanifest.xml") else {
        return ModuleType::Scorm12;
    };
    let Ok(bytes) = crate::fs::read_all(access, &path) else {
        return ModuleType::Scorm12;
    };

    for decode in [
        crate::xml::decode_xml(&bytes, &path),
        Ok(String::from_utf8_lossy(&bytes).into_owned()),
    ] {
        let Ok(text) = decode else {
            continue;
        };
        let Ok(doc) = roxmltree::Document::parse(&text) else {
            continue;
        };
        let root = doc.root_element();

        if let Some(schema) = crate::xml::text_of(crate::xml::child(root, "schema")) {
            if schema.eq_ignore_ascii_case("adl scorm") {
                if let Some(version) = crate::xml::text_of(crate::xml::child(root, "schemaversion")) {
                    if version.trim() == "1.2" {
                        return ModuleType::Scorm12;
                    }
                    if version.trim().starts_with("2004") {
                        return ModuleType::Scorm2004;
                    }
                }
            }
        }
        if crate::manifest::scorm2004::looks_like_scorm2004_namespace(root) {
            return ModuleType::Scorm2004;
        }
        return ModuleType::Scorm12;
    }
    ModuleType::Scorm12
}

/// Priority-ordered, mutable list of detector plugins.
pub struct ModuleTypeDetectorChain {
    detectors: Vec<Box<dyn ModuleTypeDetector>>,
}

impl Default for ModuleTypeDetectorChain {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ModuleTypeDetectorChain {
    /// An empty chain with no registered plugins.
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// The default plugin set: SCORM(100), cmi5(90), AICC(80), xAPI(70).
    pub fn with_defaults() -> Self {
        let mut chain = Self::new();
        chain.push(Box::new(ScormDetector));
        chain.push(Box::new(Cmi5Detector));
        chain.push(Box::new(AiccDetector));
        chain.push(Box::new(XapiDetector));
        chain
    }

    /// The default set minus the xAPI/TinCan plugin, for callers that want
    /// packages without `tincan.xml` to fail detection outright rather than
    /// being claimed by it.
    pub fn without_xapi() -> Self {
        let mut chain = Self::new();
        chain.push(Box::new(ScormDetector));
        chain.push(Box::new(Cmi5Detector));
        chain.push(Box::new(AiccDetector));
        chain
    }

    /// Register a plugin, keeping the list sorted by descending priority
    /// with original registration order as the tiebreak (stable sort).
    pub fn push(&mut self, detector: Box<dyn ModuleTypeDetector>) {
        self.detectors.push(detector);
        self.detectors.sort_by_key(|d| std::cmp::Reverse(d.priority()));
    }

    pub fn detect(&self, access: &dyn FileAccess) -> Option<ModuleType> {
        self.detectors.iter().find_map(|d| {
            let found = d.detect(access);
            if found.is_some() {
                tracing::debug!(detector = d.name(), "module type detector matched");
            }
            found
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileAccess;

    #[test]
    fn detects_scorm_by_manifest_presence() {
        let access = MockFileAccess::new().with_file(
            "imsmanifest.xml",
            "<manifest><schema>ADL SCORM</schema><schemaversion>1.2</schemaversion></manifest>",
        );
        let chain = ModuleTypeDetectorChain::with_defaults();
        assert_eq!(chain.detect(&access), Some(ModuleType::Scorm12));
    }

    #[test]
    fn scorm2004_detected_via_namespace_fallback() {
        let access = MockFileAccess::new().with_file(
            "imsmanifest.xml",
            r#"<manifest xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_v1p3"/>"#,
        );
        let chain = ModuleTypeDetectorChain::with_defaults();
        assert_eq!(chain.detect(&access), Some(ModuleType::Scorm2004));
    }

    #[test]
    fn cmi5_takes_precedence_over_aicc() {
        let access = MockFileAccess::new()
            .with_file("cmi5.xml", "<courseStructure/>")
            .with_file("course.au", "[Assignable_Unit]")
            .with_file("course.crs", "[Course]");
        let chain = ModuleTypeDetectorChain::with_defaults();
        assert_eq!(chain.detect(&access), Some(ModuleType::Cmi5));
    }

    #[test]
    fn aicc_requires_both_au_and_crs() {
        let access = MockFileAccess::new().with_file("course.au", "[Assignable_Unit]");
        let chain = ModuleTypeDetectorChain::with_defaults();
        assert_eq!(chain.detect(&access), None);
    }

    #[test]
    fn xapi_detected_by_tincan_manifest() {
        let access = MockFileAccess::new().with_file("tincan.xml", "<tincan/>");
        let chain = ModuleTypeDetectorChain::with_defaults();
        assert_eq!(chain.detect(&access), Some(ModuleType::Xapi));
    }

    #[test]
    fn unrecognized_layout_matches_nothing() {
        let access = MockFileAccess::new().with_file("readme.txt", "hello");
        let chain = ModuleTypeDetectorChain::with_defaults();
        assert_eq!(chain.detect(&access), None);
    }

    #[test]
    fn without_xapi_excludes_tincan_plugin() {
        let access = MockFileAccess::new().with_file("tincan.xml", "<tincan/>");
        let chain = ModuleTypeDetectorChain::without_xapi();
        assert_eq!(chain.detect(&access), None);
    }
}
