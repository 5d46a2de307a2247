use std::marker::PhantomData;

use crate::inspect::oracle::read_path;
use crate::inspect::variant::{Alternatives, NO_INTERPRETATION, NumberAlt, TextAlt, ValueAlt, decode_union, format_union};
use crate::inspect::{Oracle, RawValue, Result, StdLayout, TypeDesc, TypeResolver, unwrap_pimpl};

/// Collaborators shared by every printer during one inspection request.
pub struct Context<'a> {
	/// Value/type oracle.
	pub oracle: &'a dyn Oracle,
	/// Resolver for runtime-captured type names.
	pub resolver: TypeResolver<'a>,
	/// Standard-library member names.
	pub layout: &'a StdLayout,
}

/// One labelled child of a printed value; `None` marks a member with no interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
	/// Display label.
	pub label: Box<str>,
	/// Child value to drill into.
	pub value: Option<RawValue>,
}

impl Child {
	fn new(label: &str, value: RawValue) -> Self {
		Self {
			label: label.into(),
			value: Some(value),
		}
	}
}

/// Decoder pair registered per structural type name.
pub trait Printer {
	/// One-line summary, if this kind has one.
	fn summary(&self, _cx: &Context<'_>, _value: &RawValue) -> Result<Option<String>> {
		Ok(None)
	}

	/// Ordered children to drill into.
	fn children(&self, _cx: &Context<'_>, _value: &RawValue) -> Result<Vec<Child>> {
		Ok(Vec::new())
	}
}

/// `complate::Property`: `name, writable|readonly`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyPrinter;

impl PropertyPrinter {
	/// Implementation type behind the property's pimpl pointer.
	pub const IMPL: &'static str = "complate::Property::Impl";
}

impl Printer for PropertyPrinter {
	fn summary(&self, cx: &Context<'_>, value: &RawValue) -> Result<Option<String>> {
		let inner = unwrap_pimpl(cx.oracle, cx.layout, value, Self::IMPL)?;
		let name = cx.oracle.format_value(&cx.oracle.read_field(&inner, "m_name")?)?;
		let setter = cx.oracle.read_field(&inner, "m_setter")?;
		let engaged = cx.oracle.read_integer(&read_path(cx.oracle, &setter, &cx.layout.optional_engaged)?)? != 0;
		Ok(Some(format!("{name}, {}", if engaged { "writable" } else { "readonly" })))
	}
}

/// `complate::Method`: its name.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodPrinter;

impl MethodPrinter {
	/// Implementation type behind the method's pimpl pointer.
	pub const IMPL: &'static str = "complate::Method::Impl";
}

impl Printer for MethodPrinter {
	fn summary(&self, cx: &Context<'_>, value: &RawValue) -> Result<Option<String>> {
		let inner = unwrap_pimpl(cx.oracle, cx.layout, value, Self::IMPL)?;
		let name = cx.oracle.read_field(&inner, "m_name")?;
		Ok(Some(cx.oracle.format_value(&name)?))
	}
}

/// `complate::Prototype`: name, methods and properties as children.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrototypePrinter;

impl PrototypePrinter {
	/// Implementation type behind the prototype's pimpl pointer.
	pub const IMPL: &'static str = "complate::Prototype::Impl";
}

impl Printer for PrototypePrinter {
	fn children(&self, cx: &Context<'_>, value: &RawValue) -> Result<Vec<Child>> {
		let inner = unwrap_pimpl(cx.oracle, cx.layout, value, Self::IMPL)?;
		Ok(vec![
			Child::new("name", cx.oracle.read_field(&inner, "m_name")?),
			Child::new("methods", cx.oracle.read_field(&inner, "m_methods")?),
			Child::new("properties", cx.oracle.read_field(&inner, "m_properties")?),
		])
	}
}

/// Decoded proxy handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyView {
	/// Label distinguishing owning from weak proxies.
	pub label: &'static str,
	/// Captured type-name member.
	pub name: RawValue,
	/// Captured type name as text, when readable.
	pub name_text: Option<String>,
	/// Object reference, retyped when the name resolved.
	pub object: RawValue,
	/// Resolved object type, if any.
	pub resolved: Option<TypeDesc>,
}

/// Read a proxy handle and retype its object reference through the resolver.
pub fn decode_proxy(cx: &Context<'_>, handle: &RawValue, owning: bool) -> Result<ProxyView> {
	let name = cx.oracle.read_field(handle, "m_name")?;
	let object = cx.oracle.read_field(handle, "m_object")?;

	let name_text = match cx.oracle.format_value(&name) {
		Ok(text) => Some(text),
		Err(err) => {
			tracing::debug!(%err, "proxy type name unreadable");
			None
		}
	};
	let resolved = name_text.as_deref().and_then(|text| cx.resolver.resolve(text));
	let retyped = resolved.as_ref().map(|ty| cx.oracle.reinterpret(&object, &ty.pointer()));
	let (object, resolved) = match retyped {
		Some(Ok(retyped)) => (retyped, resolved),
		Some(Err(err)) => {
			tracing::debug!(%err, "proxy object keeps its untyped reference");
			(object, None)
		}
		None => (object, None),
	};

	Ok(ProxyView {
		label: if owning { "proxy" } else { "weak proxy" },
		name,
		name_text,
		object,
		resolved,
	})
}

/// `complate::Proxy` / `complate::ProxyWeak`.
#[derive(Debug, Clone, Copy)]
pub struct ProxyPrinter {
	/// Whether the handle owns its object.
	pub owning: bool,
}

impl Printer for ProxyPrinter {
	fn summary(&self, cx: &Context<'_>, value: &RawValue) -> Result<Option<String>> {
		let view = decode_proxy(cx, value, self.owning)?;
		Ok(Some(match view.name_text {
			Some(name) => format!("{} {name}", view.label),
			None => view.label.to_owned(),
		}))
	}

	fn children(&self, cx: &Context<'_>, value: &RawValue) -> Result<Vec<Child>> {
		let view = decode_proxy(cx, value, self.owning)?;
		Ok(vec![Child::new("name", view.name), Child::new("object", view.object)])
	}
}

/// Leaf union printed as `{alternative} content`.
#[derive(Debug, Clone, Copy)]
pub struct UnionSummaryPrinter<A>(PhantomData<A>);

impl<A> UnionSummaryPrinter<A> {
	/// Create the printer.
	pub fn new() -> Self {
		Self(PhantomData)
	}
}

impl<A> Default for UnionSummaryPrinter<A> {
	fn default() -> Self {
		Self::new()
	}
}

impl<A: Alternatives> Printer for UnionSummaryPrinter<A> {
	fn summary(&self, cx: &Context<'_>, value: &RawValue) -> Result<Option<String>> {
		Ok(Some(format_union::<A>(cx.oracle, cx.layout, value)))
	}
}

/// `complate::String`.
pub type TextPrinter = UnionSummaryPrinter<TextAlt>;

/// `complate::Number`.
pub type NumberPrinter = UnionSummaryPrinter<NumberAlt>;

/// `complate::Value`: the active member as a drillable child.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuePrinter;

impl ValuePrinter {
	/// Label of the single child.
	pub const CHILD: &'static str = "[contained value]";
}

impl Printer for ValuePrinter {
	fn summary(&self, cx: &Context<'_>, value: &RawValue) -> Result<Option<String>> {
		let tag = match decode_union::<ValueAlt>(cx.oracle, cx.layout, value) {
			Some(active) => format!("{{{}}}", active.alt.type_name()),
			None => NO_INTERPRETATION.to_owned(),
		};
		Ok(Some(tag))
	}

	fn children(&self, cx: &Context<'_>, value: &RawValue) -> Result<Vec<Child>> {
		let active = decode_union::<ValueAlt>(cx.oracle, cx.layout, value);
		Ok(vec![Child {
			label: Self::CHILD.into(),
			value: active.map(|active| active.value),
		}])
	}
}
