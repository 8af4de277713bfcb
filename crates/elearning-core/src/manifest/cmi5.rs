//! cmi5 `cmi5.xml` parsing into the normalized manifest shape.

use crate::error::CoreError;
use crate::manifest::{Item, ModuleType, PackageManifest, Resource};
use crate::xml;

pub fn manifest_path(access: &dyn crate::fs::FileAccess) -> Option<String> {
    access.resolve_case("cmi5.xml")
}

pub fn parse(bytes: &[u8], path: &str) -> Result<PackageManifest, CoreError> {
    let text = xml::decode_xml(bytes, path)?;
    let doc = xml::parse(&text, path)?;
    let root = doc.root_element();

    let mut manifest = PackageManifest::new(ModuleType::Cmi5);

    let Some(course) = xml::child(root, "course") else {
        return Ok(manifest);
    };
    manifest.identifier = xml::attr(course, "id").map(str::to_string);
    manifest.title = localized_text(xml::child(course, "title"));

    for au in xml::children(root, "au") {
        let id = xml::attr(au, "id")
            .map(str::to_string)
            .unwrap_or_else(|| format!("au_{}", manifest.items.len()));
        let url = xml::text_of(xml::child(au, "url"));
        let title = localized_text(xml::child(au, "title"));

        manifest.resources.push(Resource {
            identifier: id.clone(),
            scorm_type: None,
            href: url.clone(),
            files: url.clone().into_iter().collect(),
        });
        manifest.items.push(Item {
            identifier: format!("item_{id}"),
            identifierref: Some(id),
            title,
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

/// cmi5 `<title>`/`<description>` elements wrap one or more
/// `<langstring lang="...">` children; the first non-empty one is used.
fn localized_text(node: Option<roxmltree::Node>) -> Option<String> {
    let node = node?;
    node.children()
        .find(|n| n.is_element() && n.tag_name().name().eq_ignore_ascii_case("langstring"))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"<?xml version="1.0"?>
<courseStructure>
  <course id="course_1">
    <title><langstring lang="en">cmi5 Demo</langstring></title>
  </course>
  <au id="au_1">
    <title><langstring lang="en">Lesson One</langstring></title>
    <url>content/index.html</url>
  </au>
</courseStructure>"#;

    const MISSING_URL: &str = r#"<?xml version="1.0"?>
<courseStructure>
  <course id="course_1">
    <title><langstring lang="en">cmi5 Demo</langstring></title>
  </course>
  <au id="au_1">
    <title><langstring lang="en">Lesson One</langstring></title>
  </au>
</courseStructure>"#;

    #[test]
    fn parses_course_and_au() {
        let manifest = parse(VALID.as_bytes(), "cmi5.xml").unwrap();
        assert_eq!(manifest.identifier.as_deref(), Some("course_1"));
        assert_eq!(manifest.title.as_deref(), Some("cmi5 Demo"));
        assert_eq!(manifest.launch_url.as_deref(), Some("content/index.html"));
    }

    #[test]
    fn missing_au_url_leaves_no_launch_url() {
        let manifest = parse(MISSING_URL.as_bytes(), "cmi5.xml").unwrap();
        assert!(manifest.launch_url.is_none());
    }
}
