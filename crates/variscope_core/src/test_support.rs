//! In-memory complate object model laid out the way libstdc++ builds it.

use std::collections::HashMap;

use crate::inspect::{FieldDef, Primitive, RawValue, Snapshot, SnapshotBuilder, TypeDesc, TypeKind};

const HEAP_START: u64 = 0x0010_0000;
const HEAP_ALIGN: u64 = 0x100;

pub(crate) const VALUE_SIZE: usize = 56;
pub(crate) const PROXY_SIZE: usize = 24;

/// Snapshot builder preloaded with complate's types.
pub(crate) struct Fixture {
	builder: SnapshotBuilder,
	types: HashMap<String, TypeDesc>,
	missing: Vec<String>,
	next_heap: u64,
}

impl Fixture {
	pub(crate) fn new() -> Self {
		Self::with_missing(&[])
	}

	/// Fixture whose type table leaves out `missing`, as when debug info is stripped.
	pub(crate) fn with_missing(missing: &[&str]) -> Self {
		let mut fx = Self {
			builder: SnapshotBuilder::new(),
			types: HashMap::new(),
			missing: missing.iter().map(|name| (*name).to_owned()).collect(),
			next_heap: HEAP_START,
		};

		for (name, primitive) in [
			("bool", Primitive::Bool),
			("unsigned char", Primitive::U8),
			("int32_t", Primitive::I32),
			("uint32_t", Primitive::U32),
			("int64_t", Primitive::I64),
			("double", Primitive::F64),
			("nullptr_t", Primitive::Null),
			("void", Primitive::Void),
		] {
			fx.define(name, TypeKind::Primitive(primitive));
		}
		fx.define("std::monostate", TypeKind::Opaque { size: 1 });
		fx.define("std::string", TypeKind::Text);
		fx.define("std::string_view", TypeKind::Text);
		fx.define("complate::Array", TypeKind::Opaque { size: 24 });
		fx.define("complate::Object", TypeKind::Opaque { size: 48 });
		fx.define("complate::Function", TypeKind::Opaque { size: 32 });

		fx.variant("std::variant<std::string, std::string_view>", "complate::String", 16);
		fx.variant("std::variant<int32_t, uint32_t, int64_t, double>", "complate::Number", 8);

		let string = fx.ty("std::string");
		let void_ptr = fx.ty("void").pointer();
		for name in ["complate::Proxy", "complate::ProxyWeak"] {
			fx.structure(
				name,
				PROXY_SIZE,
				vec![FieldDef::new("m_name", 0, string.clone()), FieldDef::new("m_object", 16, void_ptr.clone())],
			);
		}
		fx.variant("std::variant<complate::Undefined, ...>", "complate::Value", 48);

		fx.pimpl("complate::Method", vec![FieldDef::new("m_name", 0, string.clone())], 16);

		let engaged = fx.ty("bool");
		let payload = fx.structure("std::_Optional_payload<complate::Property::Setter>", 40, vec![FieldDef::new("_M_engaged", 32, engaged)]);
		let optional = fx.structure("std::optional<complate::Property::Setter>", 40, vec![FieldDef::new("_M_payload", 0, payload)]);
		fx.pimpl(
			"complate::Property",
			vec![FieldDef::new("m_name", 0, string.clone()), FieldDef::new("m_setter", 16, optional)],
			56,
		);

		fx.define("std::vector<complate::Method>", TypeKind::Opaque { size: 24 });
		fx.define("std::vector<complate::Property>", TypeKind::Opaque { size: 24 });
		let methods = fx.ty("std::vector<complate::Method>");
		let properties = fx.ty("std::vector<complate::Property>");
		fx.pimpl(
			"complate::Prototype",
			vec![
				FieldDef::new("m_name", 0, string),
				FieldDef::new("m_methods", 16, methods),
				FieldDef::new("m_properties", 40, properties),
			],
			64,
		);

		fx
	}

	pub(crate) fn ty(&self, name: &str) -> TypeDesc {
		self.types.get(name).cloned().unwrap_or_else(|| panic!("fixture type {name} is defined"))
	}

	pub(crate) fn build(self) -> Snapshot {
		self.builder.build()
	}

	/// Define an extra type, e.g. a proxy target.
	pub(crate) fn define(&mut self, name: &str, kind: TypeKind) -> TypeDesc {
		if self.missing.iter().any(|missing| missing == name) {
			return TypeDesc::new(u32::MAX, name);
		}
		let ty = self.builder.define(name, kind).expect("fixture type defines");
		self.types.insert(name.to_owned(), ty.clone());
		ty
	}

	pub(crate) fn declare(&mut self, name: &str) -> TypeDesc {
		let ty = self.builder.declare(name).expect("fixture type declares");
		self.types.insert(name.to_owned(), ty.clone());
		ty
	}

	pub(crate) fn structure(&mut self, name: &str, size: usize, fields: Vec<FieldDef>) -> TypeDesc {
		self.define(name, TypeKind::Struct { size, fields })
	}

	fn variant(&mut self, variant_name: &str, wrapper_name: &str, index_offset: usize) {
		let index = self.ty("unsigned char");
		let variant = self.structure(variant_name, index_offset + 8, vec![FieldDef::new("_M_index", index_offset, index)]);
		self.structure(wrapper_name, index_offset + 8, vec![FieldDef::new("m_data", 0, variant)]);
	}

	fn pimpl(&mut self, owner: &str, impl_fields: Vec<FieldDef>, impl_size: usize) {
		let impl_name = format!("{owner}::Impl");
		self.structure(&impl_name, impl_size, impl_fields);
		let void_ptr = self.ty("void").pointer();
		let unique = self.structure(&format!("std::unique_ptr<{impl_name}>"), 8, vec![FieldDef::new("_M_t", 0, void_ptr)]);
		self.structure(owner, 8, vec![FieldDef::new("m_impl", 0, unique)]);
	}

	/// Map a zeroed region.
	pub(crate) fn map(&mut self, at: u64, len: usize) {
		self.builder.map_zeroed(at, len).expect("fixture region maps");
	}

	/// Allocate a fresh zeroed heap block.
	pub(crate) fn alloc(&mut self, len: usize) -> u64 {
		let at = self.next_heap;
		self.map(at, len.max(1));
		self.next_heap += (len as u64).div_ceil(HEAP_ALIGN).max(1) * HEAP_ALIGN;
		at
	}

	pub(crate) fn write(&mut self, at: u64, bytes: &[u8]) {
		self.builder.write(at, bytes).expect("fixture write lands in a mapped region");
	}

	pub(crate) fn write_u64(&mut self, at: u64, value: u64) {
		self.write(at, &value.to_le_bytes());
	}

	/// Write a text header at `at` pointing to a fresh heap copy of `text`.
	pub(crate) fn write_text(&mut self, at: u64, text: &str) {
		let data = self.alloc(text.len());
		self.write(data, text.as_bytes());
		self.write_u64(at, data);
		self.write_u64(at + 8, text.len() as u64);
	}

	pub(crate) fn write_string(&mut self, at: u64, index: u8, text: &str) {
		self.write_text(at, text);
		self.write(at + 16, &[index]);
	}

	pub(crate) fn write_number(&mut self, at: u64, index: u8, storage: &[u8]) {
		self.write(at, storage);
		self.write(at + 8, &[index]);
	}

	pub(crate) fn write_proxy(&mut self, at: u64, name: &str, object: u64) {
		self.write_text(at, name);
		self.write_u64(at + 16, object);
	}

	pub(crate) fn string(&mut self, at: u64, index: u8, text: &str) -> RawValue {
		self.map(at, 24);
		self.write_string(at, index, text);
		RawValue::new(at, self.ty("complate::String"))
	}

	pub(crate) fn number(&mut self, at: u64, index: u8, storage: &[u8]) -> RawValue {
		self.map(at, 16);
		self.write_number(at, index, storage);
		RawValue::new(at, self.ty("complate::Number"))
	}

	/// Map a `complate::Value` with the given discriminant and let `init` fill its storage.
	pub(crate) fn value(&mut self, at: u64, index: u8, init: impl FnOnce(&mut Self, u64)) -> RawValue {
		self.map(at, VALUE_SIZE);
		init(self, at);
		self.write(at + 48, &[index]);
		RawValue::new(at, self.ty("complate::Value"))
	}

	pub(crate) fn proxy(&mut self, at: u64, weak: bool, name: &str, object: u64) -> RawValue {
		self.map(at, PROXY_SIZE);
		self.write_proxy(at, name, object);
		let ty = if weak { "complate::ProxyWeak" } else { "complate::Proxy" };
		RawValue::new(at, self.ty(ty))
	}

	pub(crate) fn method(&mut self, at: u64, name: &str) -> RawValue {
		let inner = self.alloc(16);
		self.write_text(inner, name);
		self.owner(at, inner, "complate::Method")
	}

	pub(crate) fn property(&mut self, at: u64, name: &str, writable: bool) -> RawValue {
		let inner = self.alloc(56);
		self.write_text(inner, name);
		self.write(inner + 16 + 32, &[u8::from(writable)]);
		self.owner(at, inner, "complate::Property")
	}

	pub(crate) fn prototype(&mut self, at: u64, name: &str) -> RawValue {
		let inner = self.alloc(64);
		self.write_text(inner, name);
		self.owner(at, inner, "complate::Prototype")
	}

	fn owner(&mut self, at: u64, inner: u64, owner: &str) -> RawValue {
		self.map(at, 8);
		self.write_u64(at, inner);
		RawValue::new(at, self.ty(owner))
	}
}
