use crate::inspect::printers::{Child, Context};
use crate::inspect::variant::NO_INTERPRETATION;
use crate::inspect::{Demangler, InspectError, InspectOptions, Node, Oracle, PrinterRegistry, RawValue, Result, Truncation, TypeResolver};

/// One inspection session: oracle, demangler, printers and budgets for a single request.
///
/// The session keeps no state between [`Inspector::inspect`] calls; cycle tracking lives on the
/// stack of one call.
pub struct Inspector<'a> {
	oracle: &'a dyn Oracle,
	demangler: &'a dyn Demangler,
	registry: &'a PrinterRegistry,
	options: &'a InspectOptions,
}

impl<'a> Inspector<'a> {
	/// Create a session.
	pub fn new(oracle: &'a dyn Oracle, demangler: &'a dyn Demangler, registry: &'a PrinterRegistry, options: &'a InspectOptions) -> Self {
		Self {
			oracle,
			demangler,
			registry,
			options,
		}
	}

	/// Printer context for this session.
	pub fn context(&self) -> Context<'a> {
		let resolver = if self.options.demangler.enabled {
			TypeResolver::new(self.oracle, self.demangler)
		} else {
			TypeResolver::without_demangler(self.oracle)
		};
		Context {
			oracle: self.oracle,
			resolver,
			layout: &self.options.layout,
		}
	}

	/// One-line rendering of `value`: its printer's summary, or the oracle's leaf rendering.
	///
	/// Structs without a printer have no summary.
	pub fn summarize(&self, value: &RawValue) -> Result<Option<String>> {
		self.summary_with(&self.context(), value)
	}

	/// Children of `value`: its printer's children, or its members when unregistered.
	pub fn children(&self, value: &RawValue) -> Result<Vec<Child>> {
		self.children_with(&self.context(), value)
	}

	/// Build the display tree for `value`.
	pub fn inspect(&self, label: &str, value: &RawValue) -> Node {
		let cx = self.context();
		let mut stack = Vec::new();
		self.node(&cx, &mut stack, label, value, 0, self.options.expand_pointers)
	}

	fn summary_with(&self, cx: &Context<'_>, value: &RawValue) -> Result<Option<String>> {
		if let Some(printer) = self.registry.lookup(&value.ty) {
			return printer.summary(cx, value);
		}
		if !value.ty.is_pointer() && !self.oracle.field_names(value)?.is_empty() {
			return Ok(None);
		}
		self.oracle.format_value(value).map(Some)
	}

	fn children_with(&self, cx: &Context<'_>, value: &RawValue) -> Result<Vec<Child>> {
		if let Some(printer) = self.registry.lookup(&value.ty) {
			return printer.children(cx, value);
		}
		self.oracle
			.field_names(value)?
			.into_iter()
			.map(|name| {
				let member = self.oracle.read_field(value, &name)?;
				Ok(Child {
					label: name,
					value: Some(member),
				})
			})
			.collect()
	}

	fn node(&self, cx: &Context<'_>, stack: &mut Vec<u64>, label: &str, value: &RawValue, depth: u32, expand_left: u32) -> Node {
		let mut node = Node::new(label, Some(value.type_name()));

		match self.summary_with(cx, value) {
			Ok(summary) => node.summary = summary.map(|text| truncate(&text, self.options.max_text_len)),
			Err(err) => return failed(node, err),
		}

		if value.ty.is_pointer() {
			self.expand_pointer(cx, stack, &mut node, value, depth, expand_left);
			return node;
		}

		let children = match self.children_with(cx, value) {
			Ok(children) => children,
			Err(err) => return failed(node, err),
		};
		if children.is_empty() {
			return node;
		}
		if depth >= self.options.max_depth {
			node.truncated = Some(Truncation::Depth);
			return node;
		}

		let total = children.len();
		for child in children.into_iter().take(self.options.max_children) {
			let child_node = match &child.value {
				Some(member) => self.node(cx, stack, &child.label, member, depth + 1, expand_left),
				None => {
					let mut empty = Node::new(&*child.label, None);
					empty.summary = Some(NO_INTERPRETATION.to_owned());
					empty
				}
			};
			node.children.push(child_node);
		}
		if total > self.options.max_children {
			node.truncated = Some(Truncation::MoreChildren(total - self.options.max_children));
		}
		node
	}

	fn expand_pointer(&self, cx: &Context<'_>, stack: &mut Vec<u64>, node: &mut Node, value: &RawValue, depth: u32, expand_left: u32) {
		let address = match self.oracle.read_integer(value) {
			Ok(address) => address as u64,
			Err(err) => {
				node.error = Some(err.to_string());
				return;
			}
		};
		if address == 0 || expand_left == 0 {
			return;
		}
		if depth >= self.options.max_depth {
			node.truncated = Some(Truncation::Depth);
			return;
		}
		if stack.contains(&address) {
			node.truncated = Some(Truncation::Cycle);
			return;
		}

		let target = match self.oracle.dereference(value) {
			Ok(target) => target,
			Err(InspectError::IncompleteType { .. }) => return,
			Err(err) => {
				tracing::debug!(%err, address, "pointer target unresolved");
				node.truncated = Some(Truncation::Unresolved);
				return;
			}
		};

		stack.push(address);
		let pointee = self.node(cx, stack, "*", &target, depth + 1, expand_left - 1);
		stack.pop();
		node.children.push(pointee);
	}
}

fn failed(mut node: Node, err: InspectError) -> Node {
	tracing::debug!(label = %node.label, %err, "value not inspectable");
	node.error = Some(err.to_string());
	node
}

fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}
