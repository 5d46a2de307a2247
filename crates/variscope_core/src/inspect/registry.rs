use std::collections::HashMap;

use crate::inspect::printers::{MethodPrinter, NumberPrinter, Printer, PropertyPrinter, PrototypePrinter, ProxyPrinter, TextPrinter, ValuePrinter};
use crate::inspect::TypeDesc;

/// Printers keyed by exact structural type name.
#[derive(Default)]
pub struct PrinterRegistry {
	printers: HashMap<Box<str>, Box<dyn Printer>>,
}

impl PrinterRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry with the printers for complate's object model.
	pub fn complate() -> Self {
		let mut registry = Self::new();
		registry.register("complate::Prototype", PrototypePrinter);
		registry.register("complate::Property", PropertyPrinter);
		registry.register("complate::Method", MethodPrinter);
		registry.register("complate::Value", ValuePrinter);
		registry.register("complate::String", TextPrinter::new());
		registry.register("complate::Number", NumberPrinter::new());
		registry.register("complate::Proxy", ProxyPrinter { owning: true });
		registry.register("complate::ProxyWeak", ProxyPrinter { owning: false });
		registry
	}

	/// Register `printer` for `type_name`, returning any printer it replaces.
	pub fn register(&mut self, type_name: &str, printer: impl Printer + 'static) -> Option<Box<dyn Printer>> {
		self.printers.insert(normalize_type_name(type_name).into(), Box::new(printer))
	}

	/// Printer for a value of type `ty`. Pointers never match.
	pub fn lookup(&self, ty: &TypeDesc) -> Option<&dyn Printer> {
		if ty.is_pointer() {
			return None;
		}
		self.printers.get(normalize_type_name(ty.base_name())).map(|printer| printer.as_ref())
	}

	/// Return number of registered printers.
	pub fn len(&self) -> usize {
		self.printers.len()
	}

	/// Return whether nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.printers.is_empty()
	}
}

/// Strip whitespace and leading cv-qualifiers from a type spelling.
pub fn normalize_type_name(name: &str) -> &str {
	let mut name = name.trim();
	loop {
		let Some(rest) = name.strip_prefix("const ").or_else(|| name.strip_prefix("volatile ")) else {
			return name;
		};
		name = rest.trim_start();
	}
}
