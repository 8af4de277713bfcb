//! Normalized package manifest: the shape every standard-specific parser
//! converges on before validation and activity-tree construction run.

pub mod aicc;
pub mod cmi5;
pub mod scorm12;
pub mod scorm2004;
pub mod xapi;

use std::fmt;

/// Which publishing standard a package conforms to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleType {
    Scorm12,
    Scorm2004,
    Aicc,
    Cmi5,
    Xapi,
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModuleType::Scorm12 => "SCORM 1.2",
            ModuleType::Scorm2004 => "SCORM 2004",
            ModuleType::Aicc => "AICC",
            ModuleType::Cmi5 => "cmi5",
            ModuleType::Xapi => "xAPI",
        };
        write!(f, "{name}")
    }
}

/// A course-tree node. `identifierref` is a weak reference to a
/// [`Resource`] by identifier only -- never a typed pointer -- so cyclic
/// authoring mistakes show up as ordinary string mismatches, not reference
/// cycles a tree-walker has to detect structurally.
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub identifier: String,
    pub title: Option<String>,
    pub identifierref: Option<String>,
    pub visible: bool,
    pub children: Vec<Item>,
}

impl Item {
    pub fn leaf(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            visible: true,
            ..Default::default()
        }
    }
}

impl Item {
    /// Depth-first iterator over this item and all of its descendants.
    pub fn iter(&self) -> ItemIter<'_> {
        ItemIter {
            stack: vec![self],
        }
    }
}

pub struct ItemIter<'a> {
    stack: Vec<&'a Item>,
}

impl<'a> Iterator for ItemIter<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<&'a Item> {
        let item = self.stack.pop()?;
        for child in item.children.iter().rev() {
            self.stack.push(child);
        }
        Some(item)
    }
}

/// A launchable or asset resource, owned by the manifest's resource list
/// and referenced from items only by identifier.
#[derive(Debug, Clone, Default)]
pub struct Resource {
    pub identifier: String,
    pub scorm_type: Option<String>,
    pub href: Option<String>,
    pub files: Vec<String>,
}

/// A lazily-loaded external metadata fragment (LOM or similar). The core
/// does not interpret its contents -- that vocabulary belongs to a
/// downstream consumer -- it only guarantees the referenced file was found
/// and is well-formed XML, or notes that it wasn't.
#[derive(Debug, Clone)]
pub struct LomFragment {
    pub location: String,
    pub raw_xml: String,
}

/// The normalized view every per-standard parser produces. Fields that
/// don't apply to a given standard are simply left empty/`None`.
#[derive(Debug, Clone, Default)]
pub struct PackageManifest {
    pub module_type: Option<ModuleType>,
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub launch_url: Option<String>,
    pub default_organization: Option<String>,
    pub organization_ids: Vec<String>,
    pub items: Vec<Item>,
    pub resources: Vec<Resource>,
    pub lom: Vec<LomFragment>,
    /// `location` strings collected from `<metadata>` elements during
    /// parsing, not yet resolved. [`crate::parser`] loads these through a
    /// [`crate::fs::FileAccess`] and appends the results to `lom`.
    pub lom_locations: Vec<String>,
}

impl PackageManifest {
    pub fn new(module_type: ModuleType) -> Self {
        Self {
            module_type: Some(module_type),
            ..Default::default()
        }
    }

    /// Depth-first iterator over every item across every organization.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().flat_map(Item::iter)
    }

    pub fn resource_by_id(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.identifier == id)
    }
}

/// The metadata half of a parse result: the normalized manifest plus the
/// activity tree SCORM 2004 packages derive from it.
#[derive(Debug, Clone)]
pub struct ModuleMetadata {
    pub manifest: PackageManifest,
    pub activity_tree: Option<crate::activity_tree::ActivityTree>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> Item {
        Item {
            identifier: id.to_string(),
            identifierref: Some(format!("res_{id}")),
            ..Default::default()
        }
    }

    #[test]
    fn item_iter_is_depth_first() {
        let tree = Item {
            identifier: "root".to_string(),
            children: vec![leaf("a"), Item {
                identifier: "b".to_string(),
                children: vec![leaf("b1")],
                ..Default::default()
            }],
            ..Default::default()
        };
        let ids: Vec<&str> = tree.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(ids, vec!["root", "a", "b", "b1"]);
    }

    #[test]
    fn resource_lookup_by_id() {
        let mut manifest = PackageManifest::new(ModuleType::Scorm12);
        manifest.resources.push(Resource {
            identifier: "res_1".to_string(),
            ..Default::default()
        });
        assert!(manifest.resource_by_id("res_1").is_some());
        assert!(manifest.resource_by_id("missing").is_none());
    }
}
