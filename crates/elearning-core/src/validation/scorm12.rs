//! SCORM 1.2-specific validation rules.

use crate::diagnostics::{Location, ValidationIssue, ValidationResult};
use crate::manifest::PackageManifest;
use crate::validation::{ValidationRule, is_blank};

pub fn rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(ManifestIdentifierRequired),
        Box::new(OrganizationsRequired),
        Box::new(DefaultOrganizationValid),
        Box::new(ResourcesRequired),
        Box::new(ResourceReferenceValid),
        Box::new(ResourceHrefRequired),
        Box::new(LaunchableResourceRequired),
    ]
}

struct ManifestIdentifierRequired;
impl ValidationRule for ManifestIdentifierRequired {
    fn name(&self) -> &str {
        "scorm12-manifest-identifier-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if is_blank(&manifest.identifier) {
            return ValidationResult::single(ValidationIssue::error(
                "SCORM12_MANIFEST_IDENTIFIER_REQUIRED",
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
        "scorm12-organizations-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if manifest.organization_ids.is_empty() {
            return ValidationResult::single(ValidationIssue::error(
                "SCORM12_ORGANIZATIONS_REQUIRED",
                "manifest has no <organizations>",
                Location::element("imsmanifest.xml", "organizations"),
            ));
        }
        ValidationResult::valid()
    }
}

struct DefaultOrganizationValid;
impl ValidationRule for DefaultOrganizationValid {
    fn name(&self) -> &str {
        "scorm12-default-organization-valid"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        let Some(default_org) = manifest.default_organization.as_deref() else {
            return ValidationResult::valid();
        };
        if manifest.organization_ids.iter().any(|id| id == default_org) {
            return ValidationResult::valid();
        }
        ValidationResult::single(ValidationIssue::error(
            "SCORM12_DEFAULT_ORGANIZATION_INVALID",
            format!("<organizations default=\"{default_org}\"> references an unknown organization"),
            Location::element("imsmanifest.xml", "organizations"),
        ))
    }
}

struct ResourcesRequired;
impl ValidationRule for ResourcesRequired {
    fn name(&self) -> &str {
        "scorm12-resources-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if manifest.resources.is_empty() {
            return ValidationResult::single(ValidationIssue::error(
                "SCORM12_RESOURCES_REQUIRED",
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
        "scorm12-resource-reference-valid"
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
                        "SCORM12_MISSING_RESOURCE_REF",
                        format!(
                            "item `{}` references unknown resource `{reference}`",
                            item.identifier
                        ),
                        Location::element("organizations", &item.identifier),
                    )
                    .with_suggested_fix(format!(
                        "known resources: {}",
                        available.join(", ")
                    )),
                )
            })
            .collect();
        ValidationResult::from_issues(issues)
    }
}

struct ResourceHrefRequired;
impl ValidationRule for ResourceHrefRequired {
    fn name(&self) -> &str {
        "scorm12-resource-href-required"
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
                    "SCORM12_RESOURCE_HREF_REQUIRED",
                    format!("SCO resource `{}` has no href", r.identifier),
                    Location::element("resources", &r.identifier),
                )
            })
            .collect();
        ValidationResult::from_issues(issues)
    }
}

struct LaunchableResourceRequired;
impl ValidationRule for LaunchableResourceRequired {
    fn name(&self) -> &str {
        "scorm12-launchable-resource-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if manifest.resources.iter().any(|r| !is_blank(&r.href)) {
            return ValidationResult::valid();
        }
        ValidationResult::single(ValidationIssue::error(
            "SCORM12_LAUNCHABLE_RESOURCE_REQUIRED",
            "no resource in the manifest has a usable href",
            Location::element("imsmanifest.xml", "resources"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Item, ModuleType, Resource};

    fn valid_manifest() -> PackageManifest {
        let mut m = PackageManifest::new(ModuleType::Scorm12);
        m.identifier = Some("course_1".into());
        m.default_organization = Some("org_1".into());
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
    fn broken_resource_reference_is_reported() {
        let mut manifest = valid_manifest();
        manifest.items[0].identifierref = Some("SCO_ID1_RES".into());
        let result = ResourceReferenceValid.check(&manifest);
        assert!(result.has_errors());
        assert_eq!(result.issues()[0].code, "SCORM12_MISSING_RESOURCE_REF");
        assert!(result.issues()[0].message.contains("SCO_ID1_RES"));
    }

    #[test]
    fn missing_manifest_identifier_is_an_error() {
        let mut manifest = valid_manifest();
        manifest.identifier = None;
        assert!(ManifestIdentifierRequired.check(&manifest).has_errors());
    }

    #[test]
    fn sco_without_href_is_an_error() {
        let mut manifest = valid_manifest();
        manifest.resources[0].href = None;
        assert!(ResourceHrefRequired.check(&manifest).has_errors());
    }
}
