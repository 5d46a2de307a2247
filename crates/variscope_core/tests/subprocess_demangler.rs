#![cfg(unix)]
#![allow(missing_docs)]

use std::time::{Duration, Instant};

use variscope::inspect::{CxxFilt, Demangler, DemanglerOptions, InspectError, ResolveStep, SnapshotBuilder, TypeKind, TypeResolver};
use variscope_testkit::ScratchScript;

fn filter(script: &ScratchScript, timeout_ms: u64) -> CxxFilt {
	CxxFilt::from_options(&DemanglerOptions {
		enabled: true,
		program: script.path().to_path_buf(),
		args: vec!["-t".to_owned()],
		timeout_ms,
	})
}

#[test]
fn first_output_line_is_trimmed() {
	let script = ScratchScript::new("fake-filt", r#"printf '  Widget<int>  \nsecond line\n'"#).expect("script");
	let demangled = filter(&script, 2000).run("_Z6WidgetIiE").expect("runs");
	assert_eq!(demangled, "Widget<int>");
}

#[test]
fn program_receives_flags_then_name() {
	let script = ScratchScript::new("echo-filt", r#"echo "$1|$2""#).expect("script");
	assert_eq!(filter(&script, 2000).demangle("N3app6GadgetE").as_deref(), Some("-t|N3app6GadgetE"));
}

#[test]
fn nonzero_exit_is_unresolved() {
	let script = ScratchScript::new("failing-filt", "echo Widget\nexit 3").expect("script");
	let filt = filter(&script, 2000);

	assert!(matches!(filt.run("Widget"), Err(InspectError::DemanglerExit { .. })));
	assert!(filt.demangle("Widget").is_none());
}

#[test]
fn empty_output_is_unresolved() {
	let script = ScratchScript::new("silent-filt", "exit 0").expect("script");
	assert!(matches!(filter(&script, 2000).run("Widget"), Err(InspectError::DemanglerOutput)));
}

#[test]
fn hung_program_is_killed_at_deadline() {
	let script = ScratchScript::new("slow-filt", "exec sleep 5").expect("script");
	let filt = filter(&script, 100);

	let start = Instant::now();
	let err = filt.run("Widget").expect_err("times out");
	assert!(matches!(err, InspectError::DemanglerTimeout { timeout_ms: 100 }));
	assert!(start.elapsed() < Duration::from_secs(4), "took {:?}", start.elapsed());
}

#[test]
fn lingering_stdout_holder_is_bounded_by_deadline() {
	let script = ScratchScript::new("forking-filt", "echo Widget\nsleep 5 &\nexit 0").expect("script");
	let filt = filter(&script, 200);

	let start = Instant::now();
	let err = filt.run("Widget").expect_err("output never closes");
	assert!(matches!(err, InspectError::DemanglerTimeout { timeout_ms: 200 }));
	assert!(start.elapsed() < Duration::from_secs(4), "took {:?}", start.elapsed());
	assert!(filt.demangle("Widget").is_none());
}

#[test]
fn missing_program_is_a_spawn_error() {
	let script = ScratchScript::new("present-filt", "exit 0").expect("script");
	let filt = CxxFilt::from_options(&DemanglerOptions {
		program: script.dir().join("does-not-exist"),
		..DemanglerOptions::default()
	});

	assert!(matches!(filt.run("Widget"), Err(InspectError::DemanglerSpawn(_))));
	assert!(filt.demangle("Widget").is_none());
}

#[test]
fn resolver_falls_back_to_subprocess() {
	let mut builder = SnapshotBuilder::new();
	builder.define("app::Gadget", TypeKind::Opaque { size: 8 }).expect("type");
	let snapshot = builder.build();

	let script = ScratchScript::new("gadget-filt", "echo app::Gadget").expect("script");
	let filt = filter(&script, 2000);
	let resolved = TypeResolver::new(&snapshot, &filt).resolve_traced("N3app6GadgetE").expect("resolves");
	assert_eq!(resolved.step, ResolveStep::Demangled);
	assert_eq!(resolved.ty.spelling(), "app::Gadget");

	let failing = ScratchScript::new("failing-filt", "exit 1").expect("script");
	let filt = filter(&failing, 2000);
	assert!(TypeResolver::new(&snapshot, &filt).resolve("N3app6GadgetE").is_none());
}
