//! Public library API for inspecting complate object-model values in a live or captured process.

/// Type resolution, tagged-union decoding, pimpl unwrapping, and value printers.
pub mod inspect;

#[cfg(test)]
mod test_support;
