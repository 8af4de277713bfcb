//! Rules that apply across every standard: duplicate identifiers, unsafe
//! paths, and resources no item ever references.

use crate::diagnostics::{Location, ValidationIssue, ValidationResult};
use crate::manifest::PackageManifest;
use crate::validation::ValidationRule;
use std::collections::HashMap;

/// Every declared identifier (manifest, organizations, resources, items)
/// must be unique. A collision produces one error listing every location
/// the identifier appears at.
pub struct DuplicateIdentifier;

impl ValidationRule for DuplicateIdentifier {
    fn name(&self) -> &str {
        "duplicate-identifier"
    }

    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        let mut seen: HashMap<&str, Vec<&str>> = HashMap::new();

        if let Some(id) = manifest.identifier.as_deref() {
            seen.entry(id).or_default().push("manifest");
        }
        for org in &manifest.organization_ids {
            seen.entry(org.as_str()).or_default().push("organization");
        }
        for resource in &manifest.resources {
            seen.entry(resource.identifier.as_str())
                .or_default()
                .push("resource");
        }
        for item in manifest.all_items() {
            seen.entry(item.identifier.as_str()).or_default().push("item");
        }

        let issues = seen
            .into_iter()
            .filter(|(id, locations)| !id.is_empty() && locations.len() > 1)
            .map(|(id, locations)| {
                ValidationIssue::error(
                    "DUPLICATE_IDENTIFIER",
                    format!(
                        "identifier `{id}` is declared {} times ({})",
                        locations.len(),
                        locations.join(", ")
                    ),
                    Location::element("manifest", id),
                )
            })
            .collect();
        ValidationResult::from_issues(issues)
    }
}

/// Flags `href`s that escape the package, point outside it, or reference
/// content over the network instead of shipping it.
pub struct PathSecurity;

impl ValidationRule for PathSecurity {
    fn name(&self) -> &str {
        "path-security"
    }

    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        let mut issues = Vec::new();
        for resource in &manifest.resources {
            let mut paths: Vec<&str> = resource.href.as_deref().into_iter().collect();
            paths.extend(resource.files.iter().map(String::as_str));
            for path in paths {
                if let Some(issue) = check_path(path, &resource.identifier) {
                    issues.push(issue);
                }
            }
        }
        ValidationResult::from_issues(issues)
    }
}

fn check_path(path: &str, resource_id: &str) -> Option<ValidationIssue> {
    let location = Location::element("resources", resource_id);
    if path.contains('\0') {
        return Some(ValidationIssue::error(
            "UNSAFE_NULL_BYTE",
            format!("href `{path}` on resource `{resource_id}` contains a null byte"),
            location,
        ));
    }
    if path.contains("../") || path.contains("..\\") {
        return Some(ValidationIssue::error(
            "UNSAFE_PATH_TRAVERSAL",
            format!("href `{path}` on resource `{resource_id}` escapes the package root"),
            location,
        ));
    }
    if path.starts_with('/') || path.starts_with('\\') || looks_like_drive_letter(path) {
        return Some(ValidationIssue::error(
            "UNSAFE_ABSOLUTE_PATH",
            format!("href `{path}` on resource `{resource_id}` is an absolute path"),
            location,
        ));
    }
    let lower = path.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//") {
        return Some(ValidationIssue::error(
            "UNSAFE_EXTERNAL_URL",
            format!("href `{path}` on resource `{resource_id}` references external content"),
            location,
        ));
    }
    None
}

fn looks_like_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Resources no item ever references by `identifierref`. Non-fatal: a
/// resource-only package (an asset bundle, say) is unusual but not broken.
pub struct OrphanedResources;

impl ValidationRule for OrphanedResources {
    fn name(&self) -> &str {
        "orphaned-resources"
    }

    fn check(&self, manifest: &PackageManifest) -> ValidationResult {
        let referenced: std::collections::HashSet<&str> = manifest
            .all_items()
            .filter_map(|item| item.identifierref.as_deref())
            .collect();

        let issues = manifest
            .resources
            .iter()
            .filter(|r| !referenced.contains(r.identifier.as_str()))
            .map(|r| {
                ValidationIssue::warning(
                    "ORPHANED_RESOURCE",
                    format!("resource `{}` is never referenced by any item", r.identifier),
                    Location::element("resources", &r.identifier),
                )
            })
            .collect();
        ValidationResult::from_issues(issues)
    }
}
