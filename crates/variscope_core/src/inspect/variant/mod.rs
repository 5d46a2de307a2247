use std::fmt;

use crate::inspect::{Oracle, RawValue, Result, StdLayout};

/// Placeholder shown when a union's active member cannot be interpreted.
pub const NO_INTERPRETATION: &str = "<no interpretation>";

/// Closed set of alternatives of one tagged-union kind.
pub trait Alternatives: Copy + Eq + fmt::Debug + 'static {
	/// Structural type name of the union wrapper.
	const UNION: &'static str;

	/// All alternatives in discriminant order.
	const ALL: &'static [Self];

	/// Map a runtime discriminant to its alternative; `None` for anything unrecognized.
	fn from_discriminant(discriminant: i64) -> Option<Self>;

	/// Discriminant value of this alternative.
	fn discriminant(self) -> i64;

	/// Type the union storage holds when this alternative is active.
	fn type_name(self) -> &'static str;
}

/// Two-way text union: owned buffer or borrowed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlt {
	/// `std::string`.
	Owned,
	/// `std::string_view`.
	View,
}

impl Alternatives for TextAlt {
	const UNION: &'static str = "complate::String";
	const ALL: &'static [Self] = &[Self::Owned, Self::View];

	fn from_discriminant(discriminant: i64) -> Option<Self> {
		match discriminant {
			0 => Some(Self::Owned),
			1 => Some(Self::View),
			_ => None,
		}
	}

	fn discriminant(self) -> i64 {
		self as i64
	}

	fn type_name(self) -> &'static str {
		match self {
			Self::Owned => "std::string",
			Self::View => "std::string_view",
		}
	}
}

/// Four-way numeric union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberAlt {
	/// Signed 32-bit integer.
	Int32,
	/// Unsigned 32-bit integer.
	UInt32,
	/// Signed 64-bit integer.
	Int64,
	/// Double precision float.
	Double,
}

impl Alternatives for NumberAlt {
	const UNION: &'static str = "complate::Number";
	const ALL: &'static [Self] = &[Self::Int32, Self::UInt32, Self::Int64, Self::Double];

	fn from_discriminant(discriminant: i64) -> Option<Self> {
		match discriminant {
			0 => Some(Self::Int32),
			1 => Some(Self::UInt32),
			2 => Some(Self::Int64),
			3 => Some(Self::Double),
			_ => None,
		}
	}

	fn discriminant(self) -> i64 {
		self as i64
	}

	fn type_name(self) -> &'static str {
		match self {
			Self::Int32 => "int32_t",
			Self::UInt32 => "uint32_t",
			Self::Int64 => "int64_t",
			Self::Double => "double",
		}
	}
}

/// Ten-way general value union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueAlt {
	/// No value.
	Undefined,
	/// Explicit null.
	Null,
	/// Boolean.
	Bool,
	/// Nested numeric union.
	Number,
	/// Nested text union.
	Text,
	/// Sequence of values.
	Array,
	/// String-keyed mapping of values.
	Object,
	/// Callable.
	Function,
	/// Owning proxy handle.
	Proxy,
	/// Non-owning proxy handle.
	ProxyWeak,
}

impl Alternatives for ValueAlt {
	const UNION: &'static str = "complate::Value";
	const ALL: &'static [Self] = &[
		Self::Undefined,
		Self::Null,
		Self::Bool,
		Self::Number,
		Self::Text,
		Self::Array,
		Self::Object,
		Self::Function,
		Self::Proxy,
		Self::ProxyWeak,
	];

	fn from_discriminant(discriminant: i64) -> Option<Self> {
		match discriminant {
			0 => Some(Self::Undefined),
			1 => Some(Self::Null),
			2 => Some(Self::Bool),
			3 => Some(Self::Number),
			4 => Some(Self::Text),
			5 => Some(Self::Array),
			6 => Some(Self::Object),
			7 => Some(Self::Function),
			8 => Some(Self::Proxy),
			9 => Some(Self::ProxyWeak),
			_ => None,
		}
	}

	fn discriminant(self) -> i64 {
		self as i64
	}

	fn type_name(self) -> &'static str {
		match self {
			Self::Undefined => "std::monostate",
			Self::Null => "nullptr_t",
			Self::Bool => "bool",
			Self::Number => "complate::Number",
			Self::Text => "complate::String",
			Self::Array => "complate::Array",
			Self::Object => "complate::Object",
			Self::Function => "complate::Function",
			Self::Proxy => "complate::Proxy",
			Self::ProxyWeak => "complate::ProxyWeak",
		}
	}
}

/// The active member of a union, retyped to its alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Active<A> {
	/// Selected alternative.
	pub alt: A,
	/// Union storage interpreted as the alternative's type.
	pub value: RawValue,
}

/// Read the storage handle and discriminant of a union wrapper.
pub fn read_variant(oracle: &dyn Oracle, layout: &StdLayout, wrapper: &RawValue) -> Result<(RawValue, i64)> {
	let storage = oracle.read_field(wrapper, &layout.variant_field)?;
	let index = oracle.read_field(&storage, &layout.variant_index)?;
	Ok((storage, oracle.read_integer(&index)?))
}

/// Select the active alternative for `discriminant` and retype `storage` as it.
pub fn decode_active<A: Alternatives>(oracle: &dyn Oracle, storage: &RawValue, discriminant: i64) -> Option<Active<A>> {
	let Some(alt) = A::from_discriminant(discriminant) else {
		tracing::debug!(union = A::UNION, discriminant, "unrecognized discriminant");
		return None;
	};
	let Some(ty) = oracle.lookup_type(alt.type_name()) else {
		tracing::debug!(union = A::UNION, alternative = alt.type_name(), "alternative type not found");
		return None;
	};

	match oracle.reinterpret(storage, &ty) {
		Ok(value) => Some(Active { alt, value }),
		Err(err) => {
			tracing::debug!(union = A::UNION, %err, "alternative reinterpret failed");
			None
		}
	}
}

/// Format the active member as `{alternative} content`.
pub fn format_active<A: Alternatives>(oracle: &dyn Oracle, storage: &RawValue, discriminant: i64) -> Option<String> {
	let active = decode_active::<A>(oracle, storage, discriminant)?;
	match oracle.format_value(&active.value) {
		Ok(content) => Some(format!("{{{}}} {content}", active.alt.type_name())),
		Err(err) => {
			tracing::debug!(union = A::UNION, %err, "active member unreadable");
			None
		}
	}
}

/// Decode a union wrapper; unreadable wrappers decode to `None`.
pub fn decode_union<A: Alternatives>(oracle: &dyn Oracle, layout: &StdLayout, wrapper: &RawValue) -> Option<Active<A>> {
	let (storage, discriminant) = read_wrapper::<A>(oracle, layout, wrapper)?;
	decode_active(oracle, &storage, discriminant)
}

/// Format a union wrapper, falling back to [`NO_INTERPRETATION`].
pub fn format_union<A: Alternatives>(oracle: &dyn Oracle, layout: &StdLayout, wrapper: &RawValue) -> String {
	read_wrapper::<A>(oracle, layout, wrapper)
		.and_then(|(storage, discriminant)| format_active::<A>(oracle, &storage, discriminant))
		.unwrap_or_else(|| NO_INTERPRETATION.to_owned())
}

fn read_wrapper<A: Alternatives>(oracle: &dyn Oracle, layout: &StdLayout, wrapper: &RawValue) -> Option<(RawValue, i64)> {
	match read_variant(oracle, layout, wrapper) {
		Ok(parts) => Some(parts),
		Err(err) => {
			tracing::debug!(union = A::UNION, %err, "union wrapper unreadable");
			None
		}
	}
}
