//! SCORM 2004 `imsmanifest.xml` parsing into the normalized manifest shape,
//! plus derivation of its [`crate::activity_tree::ActivityTree`].

use crate::error::CoreError;
use crate::manifest::{Item, ModuleType, PackageManifest, Resource};
use crate::xml;

/// Whether the root element's namespaces mark this as a SCORM 2004 package,
/// used as the detector's fallback when `<schemaversion>` is silent or
/// absent. See [`crate::detection::scorm_version`] for the primary path.
pub fn looks_like_scorm2004_namespace(root: roxmltree::Node) -> bool {
    root.namespaces()
        .any(|ns| ns.uri().contains("adlcp_v1p3") || ns.uri().contains("adlcp_v1p2"))
}

pub fn parse(bytes: &[u8], path: &str) -> Result<PackageManifest, CoreError> {
    let text = xml::decode_xml(bytes, path)?;
    let doc = xml::parse(&text, path)?;
    let root = doc.root_element();

    let mut manifest = PackageManifest::new(ModuleType::Scorm2004);
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

    manifest.launch_url = manifest
        .resources
        .iter()
        .find(|r| r.href.is_some())
        .and_then(|r| r.href.clone());
    manifest.lom_locations = xml::find_metadata_locations(root);

    Ok(manifest)
}

/// Build the derived [`crate::activity_tree::ActivityTree`] from a
/// successfully parsed manifest's default organization.
pub fn build_activity_tree(manifest: &PackageManifest) -> Option<crate::activity_tree::ActivityTree> {
    let org_id = manifest.default_organization.as_deref()
        .or_else(|| manifest.organization_ids.first().map(String::as_str))?;
    Some(crate::activity_tree::ActivityTree::build_from(
        org_id,
        manifest.title.as_deref(),
        &manifest.items,
    ))
}

fn parse_item(node: roxmltree::Node) -> Item {
    let visible = node
        .attributes()
        .find(|a| a.name().eq_ignore_ascii_case("isvisible"))
        .map(|a| a.value() != "false")
        .unwrap_or(true);
    Item {
        identifier: xml::attr(node, "identifier").unwrap_or_default().to_string(),
        identifierref: xml::attr(node, "identifierref").map(str::to_string),
        title: xml::text_of(xml::child(node, "title")),
        visible,
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
