//! SCORM 1.2 `imsmanifest.xml` parsing into the normalized manifest shape.

use crate::error::CoreError;
use crate::manifest::{Item, ModuleType, PackageManifest, Resource};
use crate::xml;

const MANIFEST_PATH_CANDIDATES: &[&str] = &["imsmanifest.xml"];

/// Locate the manifest file's actual stored path (case-insensitive).
pub fn manifest_path(access: &dyn crate::fs::FileAccess) -> Option<String> {
    MANIFEST_PATH_CANDIDATES
        .iter()
        .find_map(|p| access.resolve_case(p))
}

/// Parse SCORM 1.2 `imsmanifest.xml` bytes into a [`PackageManifest`].
pub fn parse(bytes: &[u8], path: &str) -> Result<PackageManifest, CoreError> {
    let text = xml::decode_xml(bytes, path)?;
    let doc = xml::parse(&text, path)?;
    let root = doc.root_element();

    let mut manifest = PackageManifest::new(ModuleType::Scorm12);
    manifest.identifier = xml::attr(root, "identifier").map(str::to_string);

    if let Some(organizations) = xml::child(root, "organizations") {
        manifest.default_organization = xml::attr(organizations, "default").map(str::to_string);
        for org in xml::children(organizations, "organization") {
            let org_id = xml::attr(org, "identifier").unwrap_or_default().to_string();
            manifest.organization_ids.push(org_id.clone());
            if manifest.title.is_none() {
                manifest.title = xml::text_of(xml::child(org, "title"));
            }
            let items: Vec<Item> = xml::children(org, "item").map(parse_item).collect();
            manifest.items.extend(items);
        }
    }

    if let Some(resources) = xml::child(root, "resources") {
        for res in xml::children(resources, "resource") {
            manifest.resources.push(parse_resource(res));
        }
    }

    manifest.launch_url = first_launchable_href(&manifest);
    manifest.lom_locations = xml::find_metadata_locations(root);
    Ok(manifest)
}

fn parse_item(node: roxmltree::Node) -> Item {
    Item {
        identifier: xml::attr(node, "identifier").unwrap_or_default().to_string(),
        identifierref: xml::attr(node, "identifierref").map(str::to_string),
        title: xml::text_of(xml::child(node, "title")),
        visible: true,
        children: xml::children(node, "item").map(parse_item).collect(),
    }
}

fn parse_resource(node: roxmltree::Node) -> Resource {
    let files = xml::children(node, "file")
        .filter_map(|f| xml::attr(f, "href").map(str::to_string))
        .collect();
    Resource {
        identifier: xml::attr(node, "identifier").unwrap_or_default().to_string(),
        scorm_type: node
            .attributes()
            .find(|a| a.name().eq_ignore_ascii_case("scormtype"))
            .map(|a| a.value().to_string()),
        href: xml::attr(node, "href").map(str::to_string),
        files,
    }
}

fn first_launchable_href(manifest: &PackageManifest) -> Option<String> {
    manifest
        .resources
        .iter()
        .find(|r| r.href.is_some())
        .and_then(|r| r.href.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"<?xml version="1.0"?>
<manifest identifier="course_1" xmlns="http://www.imsproject.org/xsd/imscp_rootv1p1p2" xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2">
  <organizations default="org_1">
    <organization identifier="org_1">
      <title>Intro Course</title>
      <item identifier="item_1" identifierref="resource_1">
        <title>Lesson 1</title>
      </item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="resource_1" adlcp:scormtype="sco" href="index.html">
      <file href="index.html"/>
    </resource>
  </resources>
</manifest>"#;

    #[test]
    fn parses_organizations_items_and_resources() {
        let manifest = parse(VALID.as_bytes(), "imsmanifest.xml").unwrap();
        assert_eq!(manifest.identifier.as_deref(), Some("course_1"));
        assert_eq!(manifest.default_organization.as_deref(), Some("org_1"));
        assert_eq!(manifest.title.as_deref(), Some("Intro Course"));
        assert_eq!(manifest.items.len(), 1);
        assert_eq!(manifest.items[0].identifierref.as_deref(), Some("resource_1"));
        assert_eq!(manifest.resources.len(), 1);
        assert_eq!(manifest.launch_url.as_deref(), Some("index.html"));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let result = parse(b"<manifest><unclosed></manifest>", "imsmanifest.xml");
        assert!(result.is_err());
    }
}
