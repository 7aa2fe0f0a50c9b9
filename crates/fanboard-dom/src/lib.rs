//! fanboard-dom — DOM snapshot tree
//!
//! The canonical in-memory representation of the rendered board surface.
//! The live list binder patches list containers in this tree by key; the
//! HTML renderer and the JSON snapshot wire format both consume it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single node in the rendered tree.
///
/// `key` is the stable identity the binder addresses containers by, and
/// what clients use for keyed DOM reuse. `events` maps a DOM event name to
/// a board action name ("click" → "toggle_like").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomNode {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DomNode>,
}

/// A complete snapshot wrapping the root node. This is the JSON payload
/// pushed to clients on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub root: DomNode,
}

impl DomNode {
    pub fn new(tag: impl Into<String>) -> Self {
        DomNode {
            tag: tag.into(),
            key: None,
            attrs: BTreeMap::new(),
            events: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// A leaf node carrying only text.
    pub fn text_node(tag: impl Into<String>, text: impl Into<String>) -> Self {
        DomNode::new(tag).text(text)
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn event(mut self, name: impl Into<String>, action: impl Into<String>) -> Self {
        self.events.insert(name.into(), action.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = DomNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn class(&self) -> Option<&str> {
        self.attrs.get("class").map(|s| s.as_str())
    }

    pub fn event_action(&self, name: &str) -> Option<&str> {
        self.events.get(name).map(|s| s.as_str())
    }

    /// Depth-first search for the node carrying `key`.
    pub fn find_by_key(&self, key: &str) -> Option<&DomNode> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_key(key))
    }

    /// Depth-first search for the node carrying `key`, mutable. This is how
    /// the binder swaps out a list container's children in place.
    pub fn find_by_key_mut(&mut self, key: &str) -> Option<&mut DomNode> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.find_by_key_mut(key))
    }
}

impl Snapshot {
    pub fn new(root: DomNode) -> Self {
        Snapshot { root }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("snapshot serializes")
    }
}

/// Parse a snapshot from its JSON wire form.
pub fn parse_snapshot(json: &str) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DomNode {
        DomNode::new("div").key("board").child(
            DomNode::new("div").key("posts").children([
                DomNode::new("div")
                    .key("post-a1")
                    .child(DomNode::text_node("p", "hello")),
                DomNode::new("button")
                    .key("like-a1")
                    .event("click", "toggle_like")
                    .text("Like (0)"),
            ]),
        )
    }

    #[test]
    fn find_by_key_walks_the_tree() {
        let tree = sample();
        assert_eq!(tree.find_by_key("posts").unwrap().children.len(), 2);
        assert_eq!(
            tree.find_by_key("like-a1").unwrap().event_action("click"),
            Some("toggle_like")
        );
        assert!(tree.find_by_key("missing").is_none());
    }

    #[test]
    fn find_by_key_mut_supports_container_swap() {
        let mut tree = sample();
        let posts = tree.find_by_key_mut("posts").unwrap();
        posts.children = vec![DomNode::new("div").key("post-b2")];
        assert_eq!(tree.find_by_key("posts").unwrap().children.len(), 1);
        assert!(tree.find_by_key("like-a1").is_none());
    }

    #[test]
    fn snapshot_json_round_trips() {
        let snap = Snapshot::new(sample());
        let json = snap.to_json();
        let parsed = parse_snapshot(&json).unwrap();
        assert_eq!(parsed, snap);
        // Single-line wire form — SSE frames carry it as one data line.
        assert!(!json.contains('\n'));
    }

    #[test]
    fn empty_collections_are_omitted_from_json() {
        let json = Snapshot::new(DomNode::text_node("p", "hi")).to_json();
        assert!(!json.contains("attrs"));
        assert!(!json.contains("children"));
        assert!(!json.contains("events"));
        assert!(!json.contains("key"));
    }
}
