//! xAPI/TinCan-specific validation rules.

use crate::diagnostics::{Location, ValidationIssue, ValidationResult};
use crate::manifest::PackageManifest;
use crate::validation::{ValidationRule, is_blank};

pub fn rules() -> Vec<Box<dyn ValidationRule>> {
    vec![Box::new(ActivityRequired), Box::new(LaunchUrlRequired)]
}

struct ActivityRequired;
impl ValidationRule for ActivityRequired {
    fn name(&self) -> &str {
        "xapi-activity-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if manifest.resources.is_empty() {
            return ValidationResult::single(ValidationIssue::error(
                "XAPI_ACTIVITY_REQUIRED",
                "tincan.xml declares no <activity>",
                Location::element("tincan.xml", "activities"),
            ));
        }
        ValidationResult::valid()
    }
}

struct LaunchUrlRequired;
impl ValidationRule for LaunchUrlRequired {
    fn name(&self) -> &str {
        "xapi-launch-url-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if is_blank(&manifest.launch_url) {
            return ValidationResult::single(ValidationIssue::error(
                "XAPI_MISSING_LAUNCH_URL",
                "no activity declares a non-empty <launch>",
                Location::element("tincan.xml", "activity"),
            ));
        }
        ValidationResult::valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ModuleType, Resource};

    #[test]
    fn no_activities_is_an_error() {
        let manifest = PackageManifest::new(ModuleType::Xapi);
        assert!(ActivityRequired.check(&manifest).has_errors());
    }

    #[test]
    fn activity_without_launch_url_is_an_error() {
        let mut manifest = PackageManifest::new(ModuleType::Xapi);
        manifest.resources.push(Resource {
            identifier: "activity_1".into(),
            ..Default::default()
        });
        assert!(LaunchUrlRequired.check(&manifest).has_errors());
    }
}
