use crate::inspect::oracle::read_path;
use crate::inspect::{InspectError, Oracle, RawValue, Result, StdLayout};

/// Follow a pimpl object's owning pointer to its private implementation.
///
/// The implementation type is looked up by exact name only. Its absence means the inspected
/// binary lacks symbols for the library's private types, so it is reported instead of degraded.
pub fn unwrap_pimpl(oracle: &dyn Oracle, layout: &StdLayout, value: &RawValue, impl_type: &str) -> Result<RawValue> {
	let ty = oracle
		.lookup_type(impl_type)
		.ok_or_else(|| InspectError::MissingImplType { name: impl_type.to_owned() })?;

	let owner = oracle.read_field(value, &layout.pimpl_field)?;
	let raw = read_path(oracle, &owner, &layout.pimpl_pointer)?;
	let ptr = oracle.reinterpret(&raw, &ty.pointer())?;
	oracle.dereference(&ptr)
}

#[cfg(test)]
mod tests {
	use super::unwrap_pimpl;
	use crate::inspect::{InspectError, Oracle, StdLayout};
	use crate::test_support::Fixture;

	#[test]
	fn unwrap_reaches_impl_fields() {
		let mut fx = Fixture::new();
		let method = fx.method(0x1000, "render");
		let snapshot = fx.build();

		let inner = unwrap_pimpl(&snapshot, &StdLayout::default(), &method, "complate::Method::Impl").expect("unwraps");
		assert_eq!(inner.ty.spelling(), "complate::Method::Impl");

		let name = snapshot.read_field(&inner, "m_name").expect("name field");
		assert_eq!(snapshot.format_value(&name).expect("name text"), "render");
	}

	#[test]
	fn missing_impl_type_is_surfaced() {
		let mut fx = Fixture::new();
		let method = fx.method(0x1000, "render");
		let snapshot = fx.build();

		let err = unwrap_pimpl(&snapshot, &StdLayout::default(), &method, "complate::Method::Hidden").expect_err("impl type is absent");
		assert!(matches!(err, InspectError::MissingImplType { ref name } if name == "complate::Method::Hidden"));
	}
}
