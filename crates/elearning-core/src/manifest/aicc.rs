//! AICC package parsing. AICC courses are described by a small family of
//! descriptor files (`.crs`, `.au`, `.des`, `.cst`) rather than a single XML
//! manifest; this module reads the course descriptor (`.crs`) and the
//! assignable-unit descriptor (`.au`) to populate the normalized shape.

use crate::error::CoreError;
use crate::fs::FileAccess;
use crate::manifest::{Item, ModuleType, PackageManifest, Resource};

/// Find the `.crs` and `.au` files anywhere in the package (AICC detection
/// already established at least one of each exists).
pub fn descriptor_paths(access: &dyn FileAccess) -> (Vec<String>, Vec<String>) {
    let entries = access.list("");
    let crs = entries
        .iter()
        .filter(|p| p.to_ascii_lowercase().ends_with(".crs"))
        .cloned()
        .collect();
    let au = entries
        .iter()
        .filter(|p| p.to_ascii_lowercase().ends_with(".au"))
        .cloned()
        .collect();
    (crs, au)
}

pub fn parse(access: &dyn FileAccess) -> Result<PackageManifest, CoreError> {
    let (crs_paths, au_paths) = descriptor_paths(access);
    let mut manifest = PackageManifest::new(ModuleType::Aicc);

    if let Some(crs_path) = crs_paths.first() {
        let bytes = crate::fs::read_all(access, crs_path).map_err(CoreError::FileAccess)?;
        let text = String::from_utf8_lossy(&bytes);
        let course = parse_ini_section(&text, "Course");
        manifest.identifier = course.get("course_id").cloned();
        manifest.title = course.get("course_title").cloned();
    }

    for au_path in &au_paths {
        let bytes = crate::fs::read_all(access, au_path).map_err(CoreError::FileAccess)?;
        let text = String::from_utf8_lossy(&bytes);
        let au = parse_ini_section(&text, "Assignable_Unit");
        let id = au
            .get("system_id")
            .cloned()
            .unwrap_or_else(|| au_path.clone());
        let href = au.get("file_name").cloned();
        manifest.resources.push(Resource {
            identifier: id.clone(),
            scorm_type: None,
            href: href.clone(),
            files: href.clone().into_iter().collect(),
        });
        manifest.items.push(Item {
            identifier: format!("item_{id}"),
            identifierref: Some(id),
            title: au.get("au_title").cloned(),
            visible: true,
            children: Vec::new(),
        });
    }

    manifest.launch_url = manifest
        .resources
        .iter()
        .find(|r| r.href.is_some())
        .and_then(|r| r.href.clone());

    Ok(manifest)
}

/// A minimal `[Section]\nkey=value` INI reader, case-insensitive on both
/// section and key names -- AICC descriptors are conventionally this
/// format, not XML.
fn parse_ini_section(text: &str, section: &str) -> std::collections::HashMap<String, String> {
    let mut values = std::collections::HashMap::new();
    let mut in_section = false;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            in_section = name.eq_ignore_ascii_case(section);
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            values.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileAccess;

    const CRS: &str = "[Course]\nCourse_ID=course_1\nCourse_Title=AICC Demo\n";
    const AU: &str = "[Assignable_Unit]\nSystem_ID=au_1\nAU_Title=Lesson One\nFile_Name=launch.html\n";

    #[test]
    fn parses_course_descriptor_and_assignable_units() {
        let access = MockFileAccess::new()
            .with_file("course.crs", CRS)
            .with_file("course.au", AU);
        let manifest = parse(&access).unwrap();
        assert_eq!(manifest.identifier.as_deref(), Some("course_1"));
        assert_eq!(manifest.title.as_deref(), Some("AICC Demo"));
        assert_eq!(manifest.resources.len(), 1);
        assert_eq!(manifest.launch_url.as_deref(), Some("launch.html"));
    }

    #[test]
    fn missing_descriptors_yield_empty_manifest() {
        let access = MockFileAccess::new();
        let manifest = parse(&access).unwrap();
        assert!(manifest.identifier.is_none());
        assert!(manifest.resources.is_empty());
    }
}
