use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::inspect::{DemanglerOptions, InspectError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Recovers a source-level spelling from a compiler-encoded type name.
///
/// `None` covers every failure mode; callers treat it as "unresolved".
pub trait Demangler {
	/// Demangle `name`, or return `None` when that is not possible.
	fn demangle(&self, name: &str) -> Option<String>;
}

impl<F> Demangler for F
where
	F: Fn(&str) -> Option<String>,
{
	fn demangle(&self, name: &str) -> Option<String> {
		self(name)
	}
}

/// Demangler that never produces a result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDemangler;

impl Demangler for NoDemangler {
	fn demangle(&self, _name: &str) -> Option<String> {
		None
	}
}

/// Demangler backed by an external `c++filt`-compatible executable.
#[derive(Debug, Clone)]
pub struct CxxFilt {
	program: PathBuf,
	args: Vec<String>,
	timeout: Duration,
}

impl CxxFilt {
	/// Build from inspector options.
	pub fn from_options(options: &DemanglerOptions) -> Self {
		Self {
			program: options.program.clone(),
			args: options.args.clone(),
			timeout: Duration::from_millis(options.timeout_ms),
		}
	}

	/// Run the helper once; every failure is reported as an error.
	pub fn run(&self, name: &str) -> Result<String> {
		let mut child = Command::new(&self.program)
			.args(&self.args)
			.arg(name)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::null())
			.spawn()
			.map_err(InspectError::DemanglerSpawn)?;

		let Some(mut stdout) = child.stdout.take() else {
			let _ = child.kill();
			let _ = child.wait();
			return Err(InspectError::DemanglerOutput);
		};
		let (tx, rx) = mpsc::channel();
		thread::spawn(move || {
			let mut buf = Vec::new();
			let _ = stdout.read_to_end(&mut buf);
			let _ = tx.send(buf);
		});

		let start = Instant::now();
		let status = loop {
			if let Some(status) = child.try_wait().map_err(InspectError::DemanglerSpawn)? {
				break status;
			}
			if start.elapsed() >= self.timeout {
				let _ = child.kill();
				let _ = child.wait();
				return Err(self.timed_out());
			}
			thread::sleep(POLL_INTERVAL);
		};

		// A grandchild can keep stdout open after the child exits.
		let remaining = self.timeout.saturating_sub(start.elapsed());
		let out = match rx.recv_timeout(remaining) {
			Ok(out) => out,
			Err(mpsc::RecvTimeoutError::Timeout) => return Err(self.timed_out()),
			Err(mpsc::RecvTimeoutError::Disconnected) => return Err(InspectError::DemanglerOutput),
		};
		if !status.success() {
			return Err(InspectError::DemanglerExit { status: status.to_string() });
		}

		let text = String::from_utf8(out).map_err(|_| InspectError::DemanglerOutput)?;
		let line = text.lines().next().unwrap_or_default().trim();
		if line.is_empty() {
			return Err(InspectError::DemanglerOutput);
		}
		Ok(line.to_owned())
	}

	fn timed_out(&self) -> InspectError {
		InspectError::DemanglerTimeout {
			timeout_ms: self.timeout.as_millis() as u64,
		}
	}
}

impl Default for CxxFilt {
	fn default() -> Self {
		Self::from_options(&DemanglerOptions::default())
	}
}

impl Demangler for CxxFilt {
	fn demangle(&self, name: &str) -> Option<String> {
		match self.run(name) {
			Ok(demangled) => Some(demangled),
			Err(err) => {
				tracing::debug!(name, program = %self.program.display(), %err, "demangler failed");
				None
			}
		}
	}
}
