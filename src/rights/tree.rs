//! The declarative permission tree.
//!
//! Rights are declared once as a nested tree and flattened into the
//! process-lifetime catalog at startup. Flattening is a pure depth-first
//! walk; the flat list keeps declaration order.

use serde_json::{json, Value};

use super::level::Level;
use super::right::Right;

/// A node of the permission tree
#[derive(Debug, Clone, PartialEq)]
pub enum PermissionNode {
    Leaf(Right),
    Branch(Vec<PermissionNode>),
}

/// Flattens a tree into the ordered right list (depth-first, declaration
/// order).
pub fn flatten(nodes: &[PermissionNode]) -> Vec<Right> {
    let mut rights = Vec::new();
    for node in nodes {
        match node {
            PermissionNode::Leaf(right) => rights.push(right.clone()),
            PermissionNode::Branch(children) => rights.extend(flatten(children)),
        }
    }
    rights
}

/// Renders the nested tree itself, for the tree view of the rights listing.
pub fn tree_to_document(nodes: &[PermissionNode]) -> Value {
    Value::Array(
        nodes
            .iter()
            .map(|node| match node {
                PermissionNode::Leaf(right) => right_document(right),
                PermissionNode::Branch(children) => tree_to_document(children),
            })
            .collect(),
    )
}

fn right_document(right: &Right) -> Value {
    let mut doc = json!({
        "name": right.name,
        "level": u8::from(right.level),
    });
    if let Some(description) = &right.description {
        doc["description"] = json!(description);
    }
    doc
}

fn leaf(name: &str, level: Level, description: &str) -> PermissionNode {
    PermissionNode::Leaf(Right::with_description(name, level, description))
}

/// The static default catalog.
///
/// Declaration order is load-bearing: it fixes the flatten order and with
/// it the tie order of every sorted listing.
pub fn default_tree() -> Vec<PermissionNode> {
    vec![
        leaf("base.*", Level::Critical, "Master right for everything"),
        PermissionNode::Branch(vec![
            leaf(
                "base.framework.object.view",
                Level::Protected,
                "View objects",
            ),
            leaf("base.framework.object.add", Level::Secure, "Add objects"),
            leaf("base.framework.object.edit", Level::Secure, "Edit objects"),
            leaf(
                "base.framework.object.delete",
                Level::Secure,
                "Delete objects",
            ),
            leaf(
                "base.framework.object.activation",
                Level::Secure,
                "Activate or deactivate objects",
            ),
        ]),
        PermissionNode::Branch(vec![
            leaf("base.framework.type.view", Level::Protected, "View types"),
            leaf("base.framework.type.add", Level::Secure, "Add types"),
            leaf("base.framework.type.edit", Level::Secure, "Edit types"),
            leaf("base.framework.type.delete", Level::Secure, "Delete types"),
            leaf(
                "base.framework.type.clean",
                Level::Secure,
                "Clean type fields",
            ),
        ]),
        PermissionNode::Branch(vec![
            leaf(
                "base.framework.category.view",
                Level::Protected,
                "View categories",
            ),
            leaf(
                "base.framework.category.add",
                Level::Secure,
                "Add categories",
            ),
            leaf(
                "base.framework.category.edit",
                Level::Secure,
                "Edit categories",
            ),
            leaf(
                "base.framework.category.delete",
                Level::Secure,
                "Delete categories",
            ),
        ]),
        PermissionNode::Branch(vec![
            leaf("base.framework.log.view", Level::Protected, "View logs"),
            leaf("base.framework.log.reload", Level::Secure, "Reload logs"),
            leaf("base.framework.log.delete", Level::Danger, "Delete logs"),
        ]),
        leaf("base.export.*", Level::Protected, "Export objects and types"),
        leaf("base.import.*", Level::Protected, "Import objects and types"),
        PermissionNode::Branch(vec![
            leaf(
                "base.user-management.user.view",
                Level::Protected,
                "View users",
            ),
            leaf("base.user-management.user.add", Level::Secure, "Add users"),
            leaf(
                "base.user-management.user.edit",
                Level::Secure,
                "Edit users",
            ),
            leaf(
                "base.user-management.user.delete",
                Level::Secure,
                "Delete users",
            ),
            leaf(
                "base.user-management.group.view",
                Level::Protected,
                "View groups",
            ),
            leaf(
                "base.user-management.group.add",
                Level::Secure,
                "Add groups",
            ),
            leaf(
                "base.user-management.group.edit",
                Level::Secure,
                "Edit groups",
            ),
            leaf(
                "base.user-management.group.delete",
                Level::Secure,
                "Delete groups",
            ),
            leaf(
                "base.user-management.right.view",
                Level::Protected,
                "View rights",
            ),
        ]),
        PermissionNode::Branch(vec![
            leaf(
                "base.docapi.template.view",
                Level::Protected,
                "View document templates",
            ),
            leaf(
                "base.docapi.template.add",
                Level::Secure,
                "Add document templates",
            ),
            leaf(
                "base.docapi.template.edit",
                Level::Secure,
                "Edit document templates",
            ),
            leaf(
                "base.docapi.template.delete",
                Level::Secure,
                "Delete document templates",
            ),
        ]),
        PermissionNode::Branch(vec![
            leaf("base.system.view", Level::Protected, "View system settings"),
            leaf("base.system.edit", Level::Danger, "Edit system settings"),
            leaf("base.system.reload", Level::Danger, "Reload the system"),
        ]),
    ]
}
