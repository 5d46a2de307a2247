use crate::inspect::{RawValue, Result, TypeDesc};

/// Read-only access to the inspected process: type table lookup plus typed memory reads.
///
/// Implementations wrap whatever actually owns the inspected state (a debugger session, a
/// captured [`Snapshot`](crate::inspect::Snapshot)). Nothing in this crate writes through it.
pub trait Oracle {
	/// Look up a type by its exact spelling. Absence is an expected outcome.
	fn lookup_type(&self, name: &str) -> Option<TypeDesc>;

	/// Reinterpret the same location as another type.
	fn reinterpret(&self, value: &RawValue, ty: &TypeDesc) -> Result<RawValue> {
		Ok(value.retyped(ty.clone()))
	}

	/// Access a named member of a struct-typed value.
	fn read_field(&self, value: &RawValue, field: &str) -> Result<RawValue>;

	/// Follow a pointer-typed value to its pointee.
	fn dereference(&self, value: &RawValue) -> Result<RawValue>;

	/// Read an integral (or boolean) value, sign-extended to `i64`.
	fn read_integer(&self, value: &RawValue) -> Result<i64>;

	/// Render a value the way the debugger would print it as a leaf.
	fn format_value(&self, value: &RawValue) -> Result<String>;

	/// Member names of a struct-typed value in declaration order; empty for leaves.
	fn field_names(&self, value: &RawValue) -> Result<Vec<Box<str>>>;
}

/// Follow a dotted chain of member names, e.g. `["_M_payload", "_M_engaged"]`.
pub fn read_path<S: AsRef<str>>(oracle: &dyn Oracle, value: &RawValue, path: &[S]) -> Result<RawValue> {
	let mut current = value.clone();
	for step in path {
		current = oracle.read_field(&current, step.as_ref())?;
	}
	Ok(current)
}
