use std::fmt;

/// Resolved handle for reinterpreting inspected memory as a concrete type.
///
/// `id` is assigned by the oracle that produced the descriptor and is only meaningful to it.
/// Pointer types share the id of their base type and carry the indirection count separately,
/// so `Widget` and `Widget*` compare as the same underlying type at different depths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDesc {
	id: u32,
	ptr_depth: u8,
	base: Box<str>,
}

impl TypeDesc {
	/// Create a non-pointer descriptor.
	pub fn new(id: u32, base: impl Into<Box<str>>) -> Self {
		Self {
			id,
			ptr_depth: 0,
			base: base.into(),
		}
	}

	/// Oracle-specific id of the base type.
	pub fn id(&self) -> u32 {
		self.id
	}

	/// Base type spelling without pointer suffixes.
	pub fn base_name(&self) -> &str {
		&self.base
	}

	/// Pointer nesting depth.
	pub fn ptr_depth(&self) -> u8 {
		self.ptr_depth
	}

	/// Return whether this descriptor is a pointer type.
	pub fn is_pointer(&self) -> bool {
		self.ptr_depth > 0
	}

	/// Descriptor for a pointer to this type.
	pub fn pointer(&self) -> Self {
		Self {
			id: self.id,
			ptr_depth: self.ptr_depth.saturating_add(1),
			base: self.base.clone(),
		}
	}

	/// Descriptor of the pointed-to type, if this is a pointer.
	pub fn pointee(&self) -> Option<Self> {
		if self.ptr_depth == 0 {
			return None;
		}
		Some(Self {
			id: self.id,
			ptr_depth: self.ptr_depth - 1,
			base: self.base.clone(),
		})
	}

	/// Full spelling including pointer suffixes, e.g. `Widget*`.
	pub fn spelling(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for TypeDesc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.base)?;
		for _ in 0..self.ptr_depth {
			f.write_str("*")?;
		}
		Ok(())
	}
}

/// A typed location in inspected memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
	/// Address of the first byte of the value.
	pub address: u64,
	/// How the bytes at `address` are interpreted.
	pub ty: TypeDesc,
}

impl RawValue {
	/// Create a value handle.
	pub fn new(address: u64, ty: TypeDesc) -> Self {
		Self { address, ty }
	}

	/// Same location interpreted as `ty`.
	pub fn retyped(&self, ty: TypeDesc) -> Self {
		Self { address: self.address, ty }
	}

	/// Full type spelling of this value.
	pub fn type_name(&self) -> String {
		self.ty.spelling()
	}
}
