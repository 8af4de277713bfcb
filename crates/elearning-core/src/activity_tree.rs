//! Derives a SCORM 2004 activity tree from the normalized item hierarchy of
//! a package's default organization.

use crate::manifest::Item;
use std::collections::HashMap;

/// One node of the derived activity hierarchy.
#[derive(Debug, Clone)]
pub struct ActivityNode {
    pub identifier: String,
    pub title: Option<String>,
    pub resource_identifier: Option<String>,
    pub visible: bool,
    pub children: Vec<ActivityNode>,
}

impl ActivityNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An owned tree rooted at the synthesized organization node, with an
/// identifier index for O(1) lookup. Every non-root node has exactly one
/// parent by construction -- the tree is built bottom-up from the item
/// hierarchy, never assembled from loose references.
#[derive(Debug, Clone)]
pub struct ActivityTree {
    pub root: ActivityNode,
    index: HashMap<String, usize>,
    flat: Vec<ActivityNode>,
}

impl ActivityTree {
    /// Build a tree from the items belonging to one organization.
    /// `organization_id`/`organization_title` synthesize the root node.
    pub fn build_from(
        organization_id: &str,
        organization_title: Option<&str>,
        items: &[Item],
    ) -> Self {
        let children: Vec<ActivityNode> = items.iter().map(Self::convert_item).collect();
        let root = ActivityNode {
            identifier: organization_id.to_string(),
            title: organization_title.map(str::to_string),
            resource_identifier: None,
            visible: true,
            children,
        };

        let mut flat = Vec::new();
        let mut index = HashMap::new();
        Self::flatten(&root, &mut flat, &mut index);

        Self { root, index, flat }
    }

    fn convert_item(item: &Item) -> ActivityNode {
        ActivityNode {
            identifier: item.identifier.clone(),
            title: item.title.clone(),
            resource_identifier: item.identifierref.clone(),
            visible: item.visible,
            children: item.children.iter().map(Self::convert_item).collect(),
        }
    }

    fn flatten(node: &ActivityNode, flat: &mut Vec<ActivityNode>, index: &mut HashMap<String, usize>) {
        for child in &node.children {
            Self::flatten(child, flat, index);
        }
        index.insert(node.identifier.clone(), flat.len());
        flat.push(node.clone());
    }

    pub fn find(&self, identifier: &str) -> Option<&ActivityNode> {
        self.index.get(identifier).map(|&i| &self.flat[i])
    }

    /// Every node (anywhere in the tree) with no children.
    pub fn leaf_nodes(&self) -> impl Iterator<Item = &ActivityNode> {
        self.flat.iter().filter(|n| n.is_leaf())
    }

    pub fn node_count(&self) -> usize {
        self.flat.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, children: Vec<Item>) -> Item {
        Item {
            identifier: id.to_string(),
            children,
            visible: true,
            ..Default::default()
        }
    }

    #[test]
    fn builds_one_node_per_item_plus_synthesized_root() {
        let items = vec![item("a", vec![]), item("b", vec![item("b1", vec![])])];
        let tree = ActivityTree::build_from("org_1", Some("Course"), &items);
        // a, b, b1, plus the synthesized root itself = 4
        assert_eq!(tree.node_count(), 4);
        assert!(tree.find("org_1").is_some());
        assert!(tree.find("b1").is_some());
    }

    #[test]
    fn leaf_nodes_are_childless() {
        let items = vec![item("a", vec![]), item("b", vec![item("b1", vec![])])];
        let tree = ActivityTree::build_from("org_1", None, &items);
        let leaves: Vec<&str> = tree.leaf_nodes().map(|n| n.identifier.as_str()).collect();
        assert!(leaves.contains(&"a"));
        assert!(leaves.contains(&"b1"));
        assert!(!leaves.contains(&"b"));
    }

    #[test]
    fn find_looks_up_by_identifier() {
        let items = vec![item("a", vec![])];
        let tree = ActivityTree::build_from("org_1", None, &items);
        assert!(tree.find("a").is_some());
        assert!(tree.find("missing").is_none());
    }
}
