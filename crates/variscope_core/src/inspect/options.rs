use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::inspect::Result;

/// Budgets and collaborator settings for one inspector session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectOptions {
	/// Maximum node depth below the inspected root.
	pub max_depth: u32,
	/// Maximum children listed per node.
	pub max_children: usize,
	/// Pointer expansions allowed along one path from the root.
	pub expand_pointers: u32,
	/// Maximum characters kept in a rendered summary.
	pub max_text_len: usize,
	/// External demangler settings.
	pub demangler: DemanglerOptions,
	/// Standard-library member names used by the decoders.
	pub layout: StdLayout,
}

impl Default for InspectOptions {
	fn default() -> Self {
		Self {
			max_depth: 8,
			max_children: 64,
			expand_pointers: 2,
			max_text_len: 200,
			demangler: DemanglerOptions::default(),
			layout: StdLayout::default(),
		}
	}
}

impl InspectOptions {
	/// Preset for one-line hover style views.
	pub fn shallow() -> Self {
		Self {
			max_depth: 2,
			max_children: 16,
			expand_pointers: 0,
			max_text_len: 80,
			..Self::default()
		}
	}

	/// Parse options from JSON; missing keys keep their defaults.
	pub fn from_json(text: &str) -> Result<Self> {
		Ok(serde_json::from_str(text)?)
	}
}

/// Settings for the subprocess demangler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemanglerOptions {
	/// Whether the demangling fallback runs at all.
	pub enabled: bool,
	/// Executable to spawn.
	pub program: PathBuf,
	/// Arguments placed before the name.
	pub args: Vec<String>,
	/// Deadline for one invocation.
	pub timeout_ms: u64,
}

impl Default for DemanglerOptions {
	fn default() -> Self {
		Self {
			enabled: true,
			program: PathBuf::from("c++filt"),
			args: vec!["-t".to_owned()],
			timeout_ms: 2000,
		}
	}
}

/// Member names of the host's standard library types (libstdc++ by default).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StdLayout {
	/// Member of a tagged-union wrapper holding the `std::variant`.
	pub variant_field: String,
	/// Discriminant member inside the `std::variant`.
	pub variant_index: String,
	/// Owning implementation pointer member of a pimpl object.
	pub pimpl_field: String,
	/// Path from the owning pointer wrapper to the raw pointer.
	pub pimpl_pointer: Vec<String>,
	/// Path from a `std::optional` to its engaged flag.
	pub optional_engaged: Vec<String>,
}

impl Default for StdLayout {
	fn default() -> Self {
		Self {
			variant_field: "m_data".to_owned(),
			variant_index: "_M_index".to_owned(),
			pimpl_field: "m_impl".to_owned(),
			pimpl_pointer: vec!["_M_t".to_owned()],
			optional_engaged: vec!["_M_payload".to_owned(), "_M_engaged".to_owned()],
		}
	}
}
