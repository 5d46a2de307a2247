use crate::inspect::{InspectError, Result};

/// Bounded little-endian cursor over bytes read from inspected memory.
pub(crate) struct Cursor<'a> {
	bytes: &'a [u8],
	base: u64,
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor over `bytes`, which were read starting at address `base`.
	pub(crate) fn new(bytes: &'a [u8], base: u64) -> Self {
		Self { bytes, base, pos: 0 }
	}

	/// Return remaining unread bytes.
	pub(crate) fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub(crate) fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(InspectError::UnmappedAddress {
				address: self.base.saturating_add(self.pos as u64),
				len: n,
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut buf = [0_u8; N];
		buf.copy_from_slice(raw);
		Ok(buf)
	}

	pub(crate) fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	pub(crate) fn read_u32_le(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	pub(crate) fn read_i32_le(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	pub(crate) fn read_u64_le(&mut self) -> Result<u64> {
		Ok(u64::from_le_bytes(self.read_array()?))
	}

	pub(crate) fn read_i64_le(&mut self) -> Result<i64> {
		Ok(i64::from_le_bytes(self.read_array()?))
	}

	pub(crate) fn read_f64_le(&mut self) -> Result<f64> {
		Ok(f64::from_le_bytes(self.read_array()?))
	}
}

#[cfg(test)]
mod tests {
	use super::Cursor;
	use crate::inspect::InspectError;

	#[test]
	fn short_read_reports_absolute_address() {
		let bytes = [1_u8, 0, 0, 0];
		let mut cursor = Cursor::new(&bytes, 0x1000);
		assert_eq!(cursor.read_u32_le().expect("u32 fits"), 1);

		let err = cursor.read_u64_le().expect_err("nothing left");
		assert!(matches!(err, InspectError::UnmappedAddress { address: 0x1004, len: 8 }));
	}
}
