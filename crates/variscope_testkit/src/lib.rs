//! Shared test helpers for workspace crates.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Executable shell script living in its own scratch directory.
///
/// The directory is removed when the script is dropped.
pub struct ScratchScript {
	dir: TempDir,
	path: PathBuf,
}

impl ScratchScript {
	/// Write `body` under a `#!/bin/sh` line and mark it executable.
	pub fn new(name: &str, body: &str) -> std::io::Result<Self> {
		let dir = tempfile::tempdir()?;
		let path = dir.path().join(name);
		fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
		make_executable(&path)?;
		Ok(Self { dir, path })
	}

	/// Path of the script.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Scratch directory holding the script.
	pub fn dir(&self) -> &Path {
		self.dir.path()
	}
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
	use std::os::unix::fs::PermissionsExt;

	let mut permissions = fs::metadata(path)?.permissions();
	permissions.set_mode(0o755);
	fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
	Ok(())
}
