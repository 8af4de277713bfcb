//! cmi5-specific validation rules.

use crate::diagnostics::{Location, ValidationIssue, ValidationResult};
use crate::manifest::PackageManifest;
use crate::validation::{ValidationRule, is_blank};

pub fn rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(CourseRequired),
        Box::new(CourseTitleRequired),
        Box::new(LaunchUrlRequired),
    ]
}

struct CourseRequired;
impl ValidationRule for CourseRequired {
    fn name(&self) -> &str {
        "cmi5-course-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if is_blank(&manifest.identifier) {
            return ValidationResult::single(ValidationIssue::error(
                "CMI5_COURSE_REQUIRED",
                "cmi5.xml has no <course> element",
                Location::element("cmi5.xml", "course"),
            ));
        }
        ValidationResult::valid()
    }
}

struct CourseTitleRequired;
impl ValidationRule for CourseTitleRequired {
    fn name(&self) -> &str {
        "cmi5-course-title-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        // Defers to CourseRequired when the course itself is absent.
        if is_blank(&manifest.identifier) {
            return ValidationResult::valid();
        }
        if is_blank(&manifest.title) {
            return ValidationResult::single(ValidationIssue::error(
                "CMI5_COURSE_TITLE_REQUIRED",
                "<course> has no non-empty title",
                Location::element("cmi5.xml", "course"),
            ));
        }
        ValidationResult::valid()
    }
}

struct LaunchUrlRequired;
impl ValidationRule for LaunchUrlRequired {
    fn name(&self) -> &str {
        "cmi5-launch-url-required"
    }
    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        if is_blank(&manifest.launch_url) {
            return ValidationResult::single(ValidationIssue::error(
                "CMI5_MISSING_LAUNCH_URL",
                "no <au> declares a non-empty <url>",
                Location::element("cmi5.xml", "au"),
            ));
        }
        ValidationResult::valid()
    }
}
