//! xAPI/TinCan `tincan.xml` parsing into the normalized manifest shape.

use crate::error::CoreError;
use crate::manifest::{Item, ModuleType, PackageManifest, Resource};
use crate::xml;

pub fn manifest_path(access: &dyn crate::fs::FileAccess) -> Option<String> {
    access.resolve_case("tincan.xml")
}

pub fn parse(bytes: &[u8], path: &str) -> Result<PackageManifest, CoreError> {
    let text = xml::decode_xml(bytes, path)?;
    let doc = xml::parse(&text, path)?;
    let root = doc.root_element();

    let mut manifest = PackageManifest::new(ModuleType::Xapi);

    let activities_container = xml::child(root, "activities").unwrap_or(root);
    for activity in xml::children(activities_container, "activity") {
        let id = xml::attr(activity, "id")
            .map(str::to_string)
            .unwrap_or_else(|| format!("activity_{}", manifest.items.len()));
        let name = xml::child(activity, "name").and_then(|n| xml::text_of(Some(n)));
        let launch = xml::child(activity, "launch").and_then(|n| xml::text_of(Some(n)));

        if manifest.title.is_none() {
            manifest.title = name.clone();
        }

        manifest.resources.push(Resource {
            identifier: id.clone(),
            scorm_type: None,
            href: launch.clone(),
            files: launch.clone().into_iter().collect(),
        });
        manifest.items.push(Item {
            identifier: format!("item_{id}"),
            identifierref: Some(id),
            title: name,
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

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"<?xml version="1.0"?>
<tincan>
  <activities>
    <activity id="https://example.com/activities/lesson-1" type="http://adlnet.gov/expapi/activities/lesson">
      <name>Lesson One</name>
      <launch lang="en-US">content/index.html</launch>
    </activity>
  </activities>
</tincan>"#;

    #[test]
    fn parses_activities() {
        let manifest = parse(VALID.as_bytes(), "tincan.xml").unwrap();
        assert_eq!(manifest.resources.len(), 1);
        assert_eq!(manifest.title.as_deref(), Some("Lesson One"));
        assert_eq!(manifest.launch_url.as_deref(), Some("content/index.html"));
    }

    #[test]
    fn no_activities_means_no_launch_url() {
        let manifest = parse(b"<tincan><activities/></tincan>", "tincan.xml").unwrap();
        assert!(manifest.launch_url.is_none());
    }
}
