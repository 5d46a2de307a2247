use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, InspectError>;

/// Errors produced while resolving types and reading inspected values.
#[derive(Debug, Error)]
pub enum InspectError {
	/// Private implementation type of an opaque object is not in the type table.
	#[error("implementation type not found: {name}")]
	MissingImplType {
		/// Requested implementation type name.
		name: String,
	},
	/// Type descriptor refers to an id the oracle does not know.
	#[error("unknown type id {id} ({name})")]
	UnknownTypeId {
		/// Oracle-specific type id.
		id: u32,
		/// Spelling carried by the descriptor.
		name: String,
	},
	/// Requested field does not exist on the value's type.
	#[error("missing field {field} on {type_name}")]
	MissingField {
		/// Type the field was requested on.
		type_name: String,
		/// Requested field name.
		field: String,
	},
	/// Field access attempted on a value that has no fields.
	#[error("{type_name} has no fields")]
	NotAStruct {
		/// Type the field access was attempted on.
		type_name: String,
	},
	/// Read touched memory outside every captured region.
	#[error("unmapped read at 0x{address:016x}, need {len} bytes")]
	UnmappedAddress {
		/// Start of the attempted read.
		address: u64,
		/// Requested byte count.
		len: usize,
	},
	/// Dereference of a null pointer.
	#[error("null dereference of {type_name}")]
	NullDereference {
		/// Pointer type being dereferenced.
		type_name: String,
	},
	/// Dereference of a value that is not a pointer.
	#[error("{type_name} is not a pointer")]
	NotAPointer {
		/// Offending value type.
		type_name: String,
	},
	/// Dereference of a pointer whose pointee has no layout (e.g. `void*`).
	#[error("cannot dereference {type_name}: pointee type is incomplete")]
	IncompleteType {
		/// Pointer type being dereferenced.
		type_name: String,
	},
	/// Integer read on a value that has no integral representation.
	#[error("{type_name} is not an integer")]
	NotAnInteger {
		/// Offending value type.
		type_name: String,
	},
	/// Two types with the same name were registered in one snapshot.
	#[error("duplicate type name {name}")]
	DuplicateType {
		/// Conflicting type name.
		name: String,
	},
	/// A memory region overlaps a previously mapped one.
	#[error("region at 0x{start:016x} (len {len}) overlaps an existing region")]
	RegionOverlap {
		/// Region start address.
		start: u64,
		/// Region length in bytes.
		len: usize,
	},
	/// Demangler executable could not be started.
	#[error("demangler spawn failed: {0}")]
	DemanglerSpawn(#[source] std::io::Error),
	/// Demangler exited unsuccessfully.
	#[error("demangler exited with {status}")]
	DemanglerExit {
		/// Rendered exit status.
		status: String,
	},
	/// Demangler did not finish before the deadline.
	#[error("demangler timed out after {timeout_ms} ms")]
	DemanglerTimeout {
		/// Configured deadline.
		timeout_ms: u64,
	},
	/// Demangler output was empty or not UTF-8.
	#[error("demangler produced malformed output")]
	DemanglerOutput,
	/// Inspector options could not be parsed.
	#[error("invalid inspector options: {0}")]
	Options(#[from] serde_json::Error),
}
