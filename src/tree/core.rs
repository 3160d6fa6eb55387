use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::Result;

/// Component props. Key order is preserved on the wire.
pub type Props = Map<String, Value>;

/// Content nested under a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    Text(String),
    Number(Number),
    Nodes(Vec<ComponentNode>),
}

/// A named component with optional props and nested content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    pub component: String,
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
}

impl ComponentNode {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props: Props::new(),
            children: None,
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props.extend(props);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children = Some(Children::Text(text.into()));
        self
    }

    pub fn number(mut self, number: impl Into<Number>) -> Self {
        self.children = Some(Children::Number(number.into()));
        self
    }

    /// Append a child node, replacing any scalar content.
    pub fn child(mut self, node: ComponentNode) -> Self {
        match &mut self.children {
            Some(Children::Nodes(nodes)) => nodes.push(node),
            _ => self.children = Some(Children::Nodes(vec![node])),
        }
        self
    }

    /// Set the child list. An empty list is kept as an explicit empty sequence.
    pub fn children(mut self, nodes: impl IntoIterator<Item = ComponentNode>) -> Self {
        self.children = Some(Children::Nodes(nodes.into_iter().collect()));
        self
    }

    pub fn child_nodes(&self) -> &[ComponentNode] {
        match &self.children {
            Some(Children::Nodes(nodes)) => nodes,
            _ => &[],
        }
    }

    pub fn text_content(&self) -> Option<String> {
        match &self.children {
            Some(Children::Text(text)) => Some(text.clone()),
            Some(Children::Number(number)) => Some(number.to_string()),
            _ => None,
        }
    }

    /// Depth-first search for the first node named `component`, self included.
    pub fn find(&self, component: &str) -> Option<&ComponentNode> {
        if self.component == component {
            return Some(self);
        }
        self.child_nodes()
            .iter()
            .find_map(|child| child.find(component))
    }

    fn count(&self) -> usize {
        1 + self.child_nodes().iter().map(ComponentNode::count).sum::<usize>()
    }
}

/// Root sequence of component nodes; the complete wire payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentTree(Vec<ComponentNode>);

impl ComponentTree {
    pub fn new(nodes: Vec<ComponentNode>) -> Self {
        Self(nodes)
    }

    pub fn single(node: ComponentNode) -> Self {
        Self(vec![node])
    }

    pub fn nodes(&self) -> &[ComponentNode] {
        &self.0
    }

    pub fn into_nodes(self) -> Vec<ComponentNode> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total nodes at every depth.
    pub fn node_count(&self) -> usize {
        self.0.iter().map(ComponentNode::count).sum()
    }

    pub fn find(&self, component: &str) -> Option<&ComponentNode> {
        self.0.iter().find_map(|node| node.find(component))
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// blake3 digest of the compact JSON form, hex encoded.
    pub fn fingerprint(&self) -> Result<String> {
        let json = self.to_json()?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

impl From<Vec<ComponentNode>> for ComponentTree {
    fn from(nodes: Vec<ComponentNode>) -> Self {
        Self(nodes)
    }
}

impl IntoIterator for ComponentTree {
    type Item = ComponentNode;
    type IntoIter = std::vec::IntoIter<ComponentNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_props_and_missing_children_are_omitted() {
        let tree = ComponentTree::single(ComponentNode::new("Divider"));
        assert_eq!(tree.to_json().unwrap(), r#"[{"component":"Divider"}]"#);
    }

    #[test]
    fn nested_nodes_serialize_in_wire_shape() {
        let tree = ComponentTree::single(
            ComponentNode::new("TableContainer")
                .prop("component", "Paper")
                .child(ComponentNode::new("TableCell").text("Calories"))
                .child(ComponentNode::new("TableCell").number(262)),
        );

        assert_eq!(
            tree.to_value().unwrap(),
            json!([{
                "component": "TableContainer",
                "props": {"component": "Paper"},
                "children": [
                    {"component": "TableCell", "children": "Calories"},
                    {"component": "TableCell", "children": 262}
                ]
            }])
        );
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn empty_child_list_is_kept() {
        let node = ComponentNode::new("TableBody").children(Vec::new());
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({"component": "TableBody", "children": []}));
    }

    #[test]
    fn parses_client_payloads() {
        let tree = ComponentTree::from_json(
            r#"[{"component":"Table","children":[{"component":"TableCell","children":"x"}]}]"#,
        )
        .unwrap();
        let cell = tree.find("TableCell").unwrap();
        assert_eq!(cell.text_content().as_deref(), Some("x"));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = ComponentTree::single(ComponentNode::new("A").text("1"));
        let b = ComponentTree::single(ComponentNode::new("A").text("2"));
        assert_eq!(a.fingerprint().unwrap(), a.clone().fingerprint().unwrap());
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }
}
