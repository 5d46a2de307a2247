use std::collections::{HashMap, HashSet};

use crate::inspect::bytes::Cursor;
use crate::inspect::memory::{MemoryIndex, Region};
use crate::inspect::{InspectError, Oracle, RawValue, Result, TypeDesc};

const POINTER_SIZE: usize = 8;
const TEXT_SIZE: usize = 16;
const MAX_TEXT_BYTES: usize = 1 << 16;

/// Scalar layouts understood by [`Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
	/// One-byte boolean.
	Bool,
	/// Unsigned 8-bit integer.
	U8,
	/// Signed 32-bit integer.
	I32,
	/// Unsigned 32-bit integer.
	U32,
	/// Signed 64-bit integer.
	I64,
	/// Unsigned 64-bit integer.
	U64,
	/// IEEE 754 double.
	F64,
	/// Null pointer constant type, stored as one pointer-sized zero.
	Null,
	/// `void`; only meaningful behind a pointer.
	Void,
}

impl Primitive {
	/// Size in bytes.
	pub fn size(self) -> usize {
		match self {
			Primitive::Bool | Primitive::U8 => 1,
			Primitive::I32 | Primitive::U32 => 4,
			Primitive::I64 | Primitive::U64 | Primitive::F64 | Primitive::Null => 8,
			Primitive::Void => 0,
		}
	}
}

/// Layout category of one type table entry.
#[derive(Debug, Clone)]
pub enum TypeKind {
	/// Scalar value.
	Primitive(Primitive),
	/// Aggregate with named members at fixed offsets.
	Struct {
		/// Total size in bytes.
		size: usize,
		/// Members in declaration order.
		fields: Vec<FieldDef>,
	},
	/// Text stored as a data pointer followed by a byte length.
	Text,
	/// Sized blob with no inspectable members (storage unions, containers, closures).
	Opaque {
		/// Total size in bytes.
		size: usize,
	},
}

/// One struct member.
#[derive(Debug, Clone)]
pub struct FieldDef {
	/// Member name.
	pub name: Box<str>,
	/// Byte offset from the start of the struct.
	pub offset: usize,
	/// Member type.
	pub ty: TypeDesc,
}

impl FieldDef {
	/// Create a member declaration.
	pub fn new(name: impl Into<Box<str>>, offset: usize, ty: TypeDesc) -> Self {
		Self {
			name: name.into(),
			offset,
			ty,
		}
	}
}

/// One named entry of the type table.
#[derive(Debug, Clone)]
pub struct TypeDef {
	/// Exact type spelling.
	pub name: Box<str>,
	/// Layout.
	pub kind: TypeKind,
}

/// [`Oracle`] over a captured memory image and its type table.
#[derive(Debug, Default)]
pub struct Snapshot {
	types: Vec<TypeDef>,
	by_name: HashMap<Box<str>, u32>,
	memory: MemoryIndex,
}

/// Incremental constructor for [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
	inner: Snapshot,
	declared: HashSet<u32>,
}

impl SnapshotBuilder {
	/// Start an empty snapshot.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a named type and return its descriptor.
	///
	/// Completes an earlier [`declare`](Self::declare) of the same name.
	pub fn define(&mut self, name: &str, kind: TypeKind) -> Result<TypeDesc> {
		let name: Box<str> = name.trim().into();
		if let Some(&id) = self.inner.by_name.get(&name) {
			if !self.declared.remove(&id) {
				return Err(InspectError::DuplicateType { name: name.into_string() });
			}
			self.inner.types[id as usize].kind = kind;
			return Ok(TypeDesc::new(id, name));
		}

		let id = self.inner.types.len() as u32;
		self.inner.by_name.insert(name.clone(), id);
		self.inner.types.push(TypeDef { name: name.clone(), kind });
		Ok(TypeDesc::new(id, name))
	}

	/// Reserve a name so self-referential structs can point at themselves before [`define`](Self::define).
	pub fn declare(&mut self, name: &str) -> Result<TypeDesc> {
		let ty = self.define(name, TypeKind::Opaque { size: 0 })?;
		self.declared.insert(ty.id());
		Ok(ty)
	}

	/// Register a scalar type.
	pub fn primitive(&mut self, name: &str, primitive: Primitive) -> Result<TypeDesc> {
		self.define(name, TypeKind::Primitive(primitive))
	}

	/// Register a struct type.
	pub fn structure(&mut self, name: &str, size: usize, fields: Vec<FieldDef>) -> Result<TypeDesc> {
		self.define(name, TypeKind::Struct { size, fields })
	}

	/// Map a zero-filled region.
	pub fn map_zeroed(&mut self, start: u64, len: usize) -> Result<()> {
		self.map(start, vec![0_u8; len])
	}

	/// Map a region with the given contents.
	pub fn map(&mut self, start: u64, bytes: impl Into<Box<[u8]>>) -> Result<()> {
		self.inner.memory.insert(Region { start, bytes: bytes.into() })
	}

	/// Overwrite bytes inside an already mapped region.
	pub fn write(&mut self, address: u64, data: &[u8]) -> Result<()> {
		self.inner.memory.write(address, data)
	}

	/// Write a little-endian `u64`.
	pub fn write_u64(&mut self, address: u64, value: u64) -> Result<()> {
		self.write(address, &value.to_le_bytes())
	}

	/// Finish building.
	pub fn build(self) -> Snapshot {
		self.inner
	}
}

impl Snapshot {
	/// Start building a snapshot.
	pub fn builder() -> SnapshotBuilder {
		SnapshotBuilder::new()
	}

	/// Look up the table entry behind a descriptor's base type.
	pub fn type_def(&self, ty: &TypeDesc) -> Result<&TypeDef> {
		self.types.get(ty.id() as usize).ok_or_else(|| InspectError::UnknownTypeId {
			id: ty.id(),
			name: ty.spelling(),
		})
	}

	/// Size in bytes of a value of type `ty`.
	pub fn size_of(&self, ty: &TypeDesc) -> Result<usize> {
		if ty.is_pointer() {
			return Ok(POINTER_SIZE);
		}
		Ok(match &self.type_def(ty)?.kind {
			TypeKind::Primitive(primitive) => primitive.size(),
			TypeKind::Struct { size, .. } | TypeKind::Opaque { size } => *size,
			TypeKind::Text => TEXT_SIZE,
		})
	}

	fn read_bytes(&self, value: &RawValue) -> Result<&[u8]> {
		let size = self.size_of(&value.ty)?;
		self.memory.read(value.address, size)
	}

	fn read_pointer(&self, value: &RawValue) -> Result<u64> {
		let bytes = self.memory.read(value.address, POINTER_SIZE)?;
		Cursor::new(bytes, value.address).read_u64_le()
	}

	fn read_text(&self, value: &RawValue) -> Result<String> {
		let header = self.memory.read(value.address, TEXT_SIZE)?;
		let mut cursor = Cursor::new(header, value.address);
		let data = cursor.read_u64_le()?;
		let len = usize::try_from(cursor.read_u64_le()?).unwrap_or(usize::MAX).min(MAX_TEXT_BYTES);
		if len == 0 {
			return Ok(String::new());
		}
		let bytes = self.memory.read(data, len)?;
		Ok(String::from_utf8_lossy(bytes).into_owned())
	}
}

impl Oracle for Snapshot {
	fn lookup_type(&self, name: &str) -> Option<TypeDesc> {
		let (base, ptr_depth) = split_pointer_suffix(name);
		let id = *self.by_name.get(base)?;
		let mut ty = TypeDesc::new(id, self.types[id as usize].name.clone());
		for _ in 0..ptr_depth {
			ty = ty.pointer();
		}
		Some(ty)
	}

	fn read_field(&self, value: &RawValue, field: &str) -> Result<RawValue> {
		let not_struct = || InspectError::NotAStruct { type_name: value.type_name() };
		if value.ty.is_pointer() {
			return Err(not_struct());
		}
		let TypeKind::Struct { fields, .. } = &self.type_def(&value.ty)?.kind else {
			return Err(not_struct());
		};

		let found = fields.iter().find(|item| item.name.as_ref() == field).ok_or_else(|| InspectError::MissingField {
			type_name: value.type_name(),
			field: field.to_owned(),
		})?;
		Ok(RawValue::new(value.address.wrapping_add(found.offset as u64), found.ty.clone()))
	}

	fn dereference(&self, value: &RawValue) -> Result<RawValue> {
		let Some(pointee) = value.ty.pointee() else {
			return Err(InspectError::NotAPointer { type_name: value.type_name() });
		};
		if !pointee.is_pointer() && matches!(self.type_def(&pointee)?.kind, TypeKind::Primitive(Primitive::Void)) {
			return Err(InspectError::IncompleteType { type_name: value.type_name() });
		}

		let target = self.read_pointer(value)?;
		if target == 0 {
			return Err(InspectError::NullDereference { type_name: value.type_name() });
		}
		Ok(RawValue::new(target, pointee))
	}

	fn read_integer(&self, value: &RawValue) -> Result<i64> {
		if value.ty.is_pointer() {
			return Ok(self.read_pointer(value)? as i64);
		}
		let TypeKind::Primitive(primitive) = self.type_def(&value.ty)?.kind else {
			return Err(InspectError::NotAnInteger { type_name: value.type_name() });
		};

		let bytes = self.read_bytes(value)?;
		let mut cursor = Cursor::new(bytes, value.address);
		match primitive {
			Primitive::Bool | Primitive::U8 => Ok(i64::from(cursor.read_u8()?)),
			Primitive::I32 => Ok(i64::from(cursor.read_i32_le()?)),
			Primitive::U32 => Ok(i64::from(cursor.read_u32_le()?)),
			Primitive::I64 => cursor.read_i64_le(),
			Primitive::U64 => Ok(cursor.read_u64_le()? as i64),
			Primitive::F64 | Primitive::Null | Primitive::Void => Err(InspectError::NotAnInteger { type_name: value.type_name() }),
		}
	}

	fn format_value(&self, value: &RawValue) -> Result<String> {
		if value.ty.is_pointer() {
			return Ok(format!("0x{:016x}", self.read_pointer(value)?));
		}

		let def = self.type_def(&value.ty)?;
		match def.kind {
			TypeKind::Primitive(primitive) => {
				let bytes = self.read_bytes(value)?;
				let mut cursor = Cursor::new(bytes, value.address);
				Ok(match primitive {
					Primitive::Bool => (cursor.read_u8()? != 0).to_string(),
					Primitive::U8 => cursor.read_u8()?.to_string(),
					Primitive::I32 => cursor.read_i32_le()?.to_string(),
					Primitive::U32 => cursor.read_u32_le()?.to_string(),
					Primitive::I64 => cursor.read_i64_le()?.to_string(),
					Primitive::U64 => cursor.read_u64_le()?.to_string(),
					Primitive::F64 => cursor.read_f64_le()?.to_string(),
					Primitive::Null => "0x0".to_owned(),
					Primitive::Void => "void".to_owned(),
				})
			}
			TypeKind::Text => self.read_text(value),
			TypeKind::Struct { .. } | TypeKind::Opaque { .. } => {
				self.read_bytes(value)?;
				Ok("{...}".to_owned())
			}
		}
	}

	fn field_names(&self, value: &RawValue) -> Result<Vec<Box<str>>> {
		if value.ty.is_pointer() {
			return Ok(Vec::new());
		}
		Ok(match &self.type_def(&value.ty)?.kind {
			TypeKind::Struct { fields, .. } => fields.iter().map(|field| field.name.clone()).collect(),
			_ => Vec::new(),
		})
	}
}

/// Split `"Foo * *"` into (`"Foo"`, 2).
fn split_pointer_suffix(name: &str) -> (&str, u8) {
	let mut base = name.trim();
	let mut depth = 0_u8;
	while let Some(stripped) = base.strip_suffix('*') {
		base = stripped.trim_end();
		depth = depth.saturating_add(1);
	}
	(base, depth)
}
