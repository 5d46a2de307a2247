use std::fmt;

use serde::Serialize;

/// Why a node lists fewer children than its value has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Truncation {
	/// Depth budget exhausted.
	Depth,
	/// Pointer target already on the current path.
	Cycle,
	/// Pointer target could not be read.
	Unresolved,
	/// Children budget exhausted; the count of omitted children.
	MoreChildren(usize),
}

impl fmt::Display for Truncation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Truncation::Depth => f.write_str("..."),
			Truncation::Cycle => f.write_str("... (cycle)"),
			Truncation::Unresolved => f.write_str("... (unresolved)"),
			Truncation::MoreChildren(count) => write!(f, "... {count} more"),
		}
	}
}

/// One inspected value with its decoded children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
	/// Label assigned by the parent.
	pub label: String,
	/// Type spelling; absent for members with no interpretation.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub type_name: Option<String>,
	/// One-line rendering.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub summary: Option<String>,
	/// Failure scoped to this value.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Truncation marker.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub truncated: Option<Truncation>,
	/// Children in display order.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<Node>,
}

impl Node {
	/// Node with only a label and type.
	pub fn new(label: impl Into<String>, type_name: Option<String>) -> Self {
		Self {
			label: label.into(),
			type_name,
			summary: None,
			error: None,
			truncated: None,
			children: Vec::new(),
		}
	}

	/// First child with the given label.
	pub fn child(&self, label: &str) -> Option<&Node> {
		self.children.iter().find(|child| child.label == label)
	}

	/// Follow a `/`-separated chain of child labels.
	pub fn find(&self, path: &str) -> Option<&Node> {
		path.split('/').filter(|step| !step.is_empty()).try_fold(self, |node, step| node.child(step))
	}

	/// JSON rendering of the tree.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
	}

	fn render(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
		let pad = " ".repeat(indent);
		write!(f, "{pad}{}", self.label)?;
		if let Some(type_name) = &self.type_name {
			write!(f, " ({type_name})")?;
		}
		if let Some(summary) = &self.summary {
			write!(f, " = {summary}")?;
		}
		if let Some(error) = &self.error {
			write!(f, " <error: {error}>")?;
		}
		writeln!(f)?;

		for child in &self.children {
			child.render(f, indent + 2)?;
		}
		if let Some(truncated) = &self.truncated {
			writeln!(f, "{pad}  {truncated}")?;
		}
		Ok(())
	}
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.render(f, 0)
	}
}

#[cfg(test)]
mod tests {
	use super::{Node, Truncation};

	fn sample() -> Node {
		let mut root = Node::new("root", Some("complate::Value".to_owned()));
		root.summary = Some("{complate::Number}".to_owned());
		let mut inner = Node::new("[contained value]", Some("complate::Number".to_owned()));
		inner.summary = Some("{double} 2.5".to_owned());
		root.children.push(inner);
		root.truncated = Some(Truncation::MoreChildren(2));
		root
	}

	#[test]
	fn text_rendering_indents_children() {
		let text = sample().to_string();
		let lines: Vec<&str> = text.lines().collect();

		assert_eq!(lines[0], "root (complate::Value) = {complate::Number}");
		assert_eq!(lines[1], "  [contained value] (complate::Number) = {double} 2.5");
		assert_eq!(lines[2], "  ... 2 more");
	}

	#[test]
	fn json_omits_empty_members() {
		let json = sample().to_json();

		assert_eq!(json["type"], "complate::Value");
		assert_eq!(json["children"][0]["summary"], "{double} 2.5");
		assert!(json["children"][0].get("children").is_none());
		assert!(json.get("error").is_none());
		assert_eq!(json["truncated"]["more_children"], 2);
	}

	#[test]
	fn find_walks_labels() {
		let root = sample();
		assert_eq!(root.find("[contained value]").and_then(|node| node.summary.as_deref()), Some("{double} 2.5"));
		assert!(root.find("missing").is_none());
		assert_eq!(root.find("").map(|node| node.label.as_str()), Some("root"));
	}
}
