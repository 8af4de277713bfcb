//! AICC-specific validation rules.

use crate::diagnostics::{Location, ValidationIssue, ValidationResult};
use crate::manifest::PackageManifest;
use crate::validation::{ValidationRule, is_blank};

pub fn rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(CourseDescriptorRequired),
        Box::new(TitleRequired),
        Box::new(LaunchUrlRequired),
    ]
}

struct CourseDescriptorRequired;
impl ValidationRule for CourseDescriptorRequired {
    fn name(&self) -> &str {
        "aicc-course-descriptor-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if is_blank(&manifest.identifier) {
            return ValidationResult::single(ValidationIssue::error(
                "AICC_COURSE_DESCRIPTOR_REQUIRED",
                "no `[Course]` section with a Course_ID was found in any .crs file",
                Location::none(),
            ));
        }
        ValidationResult::valid()
    }
}

struct TitleRequired;
impl ValidationRule for TitleRequired {
    fn name(&self) -> &str {
        "aicc-title-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if is_blank(&manifest.title) {
            return ValidationResult::single(ValidationIssue::error(
                "AICC_TITLE_REQUIRED",
                "course descriptor has no Course_Title",
                Location::none(),
            ));
        }
        ValidationResult::valid()
    }
}

struct LaunchUrlRequired;
impl ValidationRule for LaunchUrlRequired {
    fn name(&self) -> &str {
        "aicc-launch-url-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if is_blank(&manifest.launch_url) {
            return ValidationResult::single(ValidationIssue::error(
                "AICC_MISSING_LAUNCH_URL",
                "no assignable unit declares a File_Name to launch",
                Location::none(),
            ));
        }
        ValidationResult::valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ModuleType;

    #[test]
    fn missing_course_id_is_an_error() {
        let manifest = PackageManifest::new(ModuleType::Aicc);
        assert!(CourseDescriptorRequired.check(&manifest).has_errors());
    }

    #[test]
    fn complete_manifest_passes() {
        let mut manifest = PackageManifest::new(ModuleType::Aicc);
        manifest.identifier = Some("course_1".into());
        manifest.title = Some("AICC Demo".into());
        manifest.launch_url = Some("launch.html".into());
        for rule in rules() {
            assert!(rule.check(&manifest).is_valid());
        }
    }
}
