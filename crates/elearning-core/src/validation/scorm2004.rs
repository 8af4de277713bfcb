//! SCORM 2004-specific validation rules.
//!
//! The obligations mirror SCORM 1.2's (manifest identifier, organizations,
//! resources, resolvable references, launchable content) since both share
//! the same manifest shape; codes are namespaced `SCORM2004_` so a report
//! never conflates which generation of the manifest schema was at fault.

use crate::diagnostics::{Location, ValidationIssue, ValidationResult};
use crate::manifest::PackageManifest;
use crate::validation::{ValidationRule, is_blank};

pub fn rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(ManifestIdentifierRequired),
        Box::new(OrganizationsRequired),
        Box::new(ResourcesRequired),
        Box::new(ResourceReferenceValid),
        Box::new(ResourceHrefRequired),
    ]
}

struct ManifestIdentifierRequired;
impl ValidationRule for ManifestIdentifierRequired {
    fn name(&self) -> &str {
        "scorm2004-manifest-identifier-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if is_blank(&manifest.identifier) {
            return ValidationResult::single(ValidationIssue::error(
                "SCORM2004_MANIFEST_IDENTIFIER_REQUIRED",
                "<manifest> is missing a required `identifier` attribute",
                Location::element("imsmanifest.xml", "manifest"),
            ));
        }
        ValidationResult::valid()
    }
}

struct OrganizationsRequired;
impl ValidationRule for OrganizationsRequired {
    fn name(&self) -> &str {
        "scorm2004-organizations-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if manifest.organization_ids.is_empty() {
            return ValidationResult::single(ValidationIssue::error(
                "SCORM2004_ORGANIZATIONS_REQUIRED",
                "manifest has no <organizations>",
                Location::element("imsmanifest.xml", "organizations"),
            ));
        }
        ValidationResult::valid()
    }
}

struct ResourcesRequired;
impl ValidationRule for ResourcesRequired {
    fn name(&self) -> &str {
        "scorm2004-resources-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if manifest.resources.is_empty() {
            return ValidationResult::single(ValidationIssue::error(
                "SCORM2004_RESOURCES_REQUIRED",
                "manifest has no <resources>",
                Location::element("imsmanifest.xml", "resources"),
            ));
        }
        ValidationResult::valid()
    }
}

struct ResourceReferenceValid;
impl ValidationRule for ResourceReferenceValid {
    fn name(&self) -> &str {
        "scorm2004-resource-reference-valid"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        let available: Vec<&str> = manifest
            .resources
            .iter()
            .map(|r| r.identifier.as_str())
            .collect();
        let issues = manifest
            .all_items()
            .filter_map(|item| {
                let reference = item.identifierref.as_deref()?;
                if available.contains(&reference) {
                    return None;
                }
                Some(
                    ValidationIssue::error(
                        "SCORM2004_MISSING_RESOURCE_REF",
                        format!(
                            "item `{}` references unknown resource `{reference}`",
                            item.identifier
                        ),
                        Location::element("organizations", &item.identifier),
                    )
                    .with_suggested_fix(format!("known resources: {}", available.join(", "))),
                )
            })
            .collect();
        ValidationResult::from_issues(issues)
    }
}

struct ResourceHrefRequired;
impl ValidationRule for ResourceHrefRequired {
    fn name(&self) -> &str {
        "scorm2004-resource-href-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        let issues = manifest
            .resources
            .iter()
            .filter(|r| {
                r.scorm_type
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case("sco"))
                    && is_blank(&r.href)
            })
            .map(|r| {
                ValidationIssue::error(
                    "SCORM2004_RESOURCE_HREF_REQUIRED",
                    format!("SCO resource `{}` has no href", r.identifier),
                    Location::element("resources", &r.identifier),
                )
            })
            .collect();
        ValidationResult::from_issues(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Item, ModuleType, Resource};

    fn valid_manifest() -> PackageManifest {
        let mut m = PackageManifest::new(ModuleType::Scorm2004);
        m.identifier = Some("course_2004".into());
        m.organization_ids = vec!["org_1".into()];
        m.resources = vec![Resource {
            identifier: "resource_1".into(),
            scorm_type: Some("sco".into()),
            href: Some("index.html".into()),
            ..Default::default()
        }];
        m.items = vec![Item {
            identifier: "item_1".into(),
            identifierref: Some("resource_1".into()),
            visible: true,
            children: vec![Item {
                identifier: "item_1_1".into(),
                identifierref: Some("resource_1".into()),
                visible: true,
                ..Default::default()
            }],
            ..Default::default()
        }];
        m
    }

    #[test]
    fn valid_manifest_passes_every_rule() {
        let manifest = valid_manifest();
        for rule in rules() {
            assert!(rule.check(&manifest).is_valid(), "{} failed", rule.name());
        }
    }

    #[test]
    fn nested_item_reference_is_checked_recursively() {
        let mut manifest = valid_manifest();
        manifest.items[0].children[0].identifierref = Some("missing_resource".into());
        let result = ResourceReferenceValid.check(&manifest);
        assert!(result.has_errors());
        assert_eq!(result.issues()[0].code, "SCORM2004_MISSING_RESOURCE_REF");
    }
}
