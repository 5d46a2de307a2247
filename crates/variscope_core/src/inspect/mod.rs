mod bytes;
mod demangle;
mod error;
mod memory;
mod node;
mod options;
mod oracle;
mod pimpl;
mod printers;
mod registry;
mod resolve;
mod session;
mod snapshot;
mod types;
mod variant;

/// Demangler seam, the no-op demangler and the `c++filt` subprocess.
pub use demangle::{CxxFilt, Demangler, NoDemangler};
/// Error and result aliases.
pub use error::{InspectError, Result};
/// Display tree produced by an inspection.
pub use node::{Node, Truncation};
/// Session budgets, demangler settings and standard-library layout.
pub use options::{DemanglerOptions, InspectOptions, StdLayout};
/// Value/type oracle seam.
pub use oracle::{Oracle, read_path};
/// Opaque-object unwrapping.
pub use pimpl::unwrap_pimpl;
/// Per-kind value printers.
pub use printers::{
	Child, Context, MethodPrinter, NumberPrinter, Printer, PropertyPrinter, PrototypePrinter, ProxyPrinter, ProxyView, TextPrinter, UnionSummaryPrinter,
	ValuePrinter, decode_proxy,
};
/// Printer lookup by structural type name.
pub use registry::{PrinterRegistry, normalize_type_name};
/// Runtime type-name resolution.
pub use resolve::{ResolveStep, Resolved, TypeResolver, strip_length_prefix, strip_quotes};
/// Inspection session driver.
pub use session::Inspector;
/// Captured-memory oracle and its builder.
pub use snapshot::{FieldDef, Primitive, Snapshot, SnapshotBuilder, TypeDef, TypeKind};
/// Type descriptors and raw value handles.
pub use types::{RawValue, TypeDesc};
/// Tagged-union alternative tables and decoding.
pub use variant::{
	Active, Alternatives, NO_INTERPRETATION, NumberAlt, TextAlt, ValueAlt, decode_active, decode_union, format_active, format_union, read_variant,
};
