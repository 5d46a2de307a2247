use std::cell::RefCell;
use std::collections::HashMap;

use crate::inspect::{Demangler, Oracle, TypeDesc};

/// Fallback step that produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStep {
	/// Name was in the type table as captured (minus quoting).
	Direct,
	/// Name resolved after dropping a leading run of decimal digits.
	LengthPrefix,
	/// Name resolved after running it through the demangler.
	Demangled,
}

/// Successful resolution together with the step that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
	/// Resolved descriptor.
	pub ty: TypeDesc,
	/// Step that produced `ty`.
	pub step: ResolveStep,
	/// Spelling that was finally looked up.
	pub spelling: String,
}

/// Maps runtime-captured type names to descriptors, trying fallbacks in a fixed order.
///
/// The same name against the same oracle state always yields the same descriptor. Demangler
/// output is remembered for the resolver's lifetime, so each distinct name reaches the
/// demangler at most once per resolver.
pub struct TypeResolver<'a> {
	oracle: &'a dyn Oracle,
	demangler: Option<&'a dyn Demangler>,
	demangled: RefCell<HashMap<Box<str>, Option<String>>>,
}

impl<'a> TypeResolver<'a> {
	/// Resolver with a demangling fallback.
	pub fn new(oracle: &'a dyn Oracle, demangler: &'a dyn Demangler) -> Self {
		Self {
			oracle,
			demangler: Some(demangler),
			demangled: RefCell::default(),
		}
	}

	/// Resolver that stops after the length-prefix step.
	pub fn without_demangler(oracle: &'a dyn Oracle) -> Self {
		Self {
			oracle,
			demangler: None,
			demangled: RefCell::default(),
		}
	}

	/// Resolve `name` to a descriptor; `None` is the expected outcome for unknown types.
	pub fn resolve(&self, name: &str) -> Option<TypeDesc> {
		self.resolve_traced(name).map(|resolved| resolved.ty)
	}

	/// Resolve `name` and report which step succeeded.
	pub fn resolve_traced(&self, name: &str) -> Option<Resolved> {
		let captured = strip_quotes(name);
		if captured.is_empty() {
			return None;
		}

		if let Some(ty) = self.oracle.lookup_type(captured) {
			return Some(found(ty, ResolveStep::Direct, captured));
		}

		let stripped = strip_length_prefix(captured);
		if let Some(stripped) = stripped
			&& let Some(ty) = self.oracle.lookup_type(stripped)
		{
			return Some(found(ty, ResolveStep::LengthPrefix, stripped));
		}

		let demangler = self.demangler?;
		let cached = self.demangled.borrow().get(captured).cloned();
		let demangled = match cached {
			Some(demangled) => demangled,
			None => {
				let demangled = demangler.demangle(captured);
				self.demangled.borrow_mut().insert(captured.into(), demangled.clone());
				demangled
			}
		};
		let Some(demangled) = demangled else {
			tracing::trace!(name = captured, "type unresolved, demangler gave nothing");
			return None;
		};
		let demangled = demangled.trim();
		if demangled.is_empty() || demangled == captured || Some(demangled) == stripped {
			tracing::trace!(name = captured, "type unresolved, demangler echoed input");
			return None;
		}

		match self.oracle.lookup_type(demangled) {
			Some(ty) => Some(found(ty, ResolveStep::Demangled, demangled)),
			None => {
				tracing::trace!(name = captured, demangled, "type unresolved after demangling");
				None
			}
		}
	}
}

fn found(ty: TypeDesc, step: ResolveStep, spelling: &str) -> Resolved {
	tracing::trace!(?step, spelling, "type resolved");
	Resolved {
		ty,
		step,
		spelling: spelling.to_owned(),
	}
}

/// Drop surrounding whitespace and the quotes a debugger adds when printing a string value.
pub fn strip_quotes(name: &str) -> &str {
	name.trim().trim_matches('"').trim()
}

/// Drop a leading run of ASCII digits, as left by length-prefixed (Itanium-style) type
/// encodings such as `7MyType`.
///
/// Returns `None` when there is no prefix or nothing would remain.
pub fn strip_length_prefix(name: &str) -> Option<&str> {
	let rest = name.trim_start_matches(|c: char| c.is_ascii_digit());
	if rest.len() == name.len() || rest.is_empty() {
		return None;
	}
	Some(rest)
}
