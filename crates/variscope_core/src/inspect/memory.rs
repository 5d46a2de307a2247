use crate::inspect::{InspectError, Result};

/// One captured range of inspected memory.
#[derive(Debug, Clone)]
pub(crate) struct Region {
	/// Address of the first captured byte.
	pub(crate) start: u64,
	/// Captured bytes.
	pub(crate) bytes: Box<[u8]>,
}

impl Region {
	/// Exclusive end address.
	pub(crate) fn end(&self) -> u64 {
		self.start.saturating_add(self.bytes.len() as u64)
	}
}

/// Sorted range index for resolving addresses to captured regions.
#[derive(Debug, Default)]
pub(crate) struct MemoryIndex {
	starts: Vec<u64>,
	regions: Vec<Region>,
}

impl MemoryIndex {
	/// Insert a region, rejecting overlaps with existing ones.
	pub(crate) fn insert(&mut self, region: Region) -> Result<()> {
		let overlap = InspectError::RegionOverlap {
			start: region.start,
			len: region.bytes.len(),
		};
		let idx = self.starts.partition_point(|start| *start <= region.start);
		if idx > 0 && self.regions[idx - 1].end() > region.start {
			return Err(overlap);
		}
		if let Some(next) = self.regions.get(idx)
			&& next.start < region.end()
		{
			return Err(overlap);
		}

		self.starts.insert(idx, region.start);
		self.regions.insert(idx, region);
		Ok(())
	}

	/// Resolve `len` bytes starting at `address`; the range must sit inside one region.
	pub(crate) fn read(&self, address: u64, len: usize) -> Result<&[u8]> {
		let unmapped = InspectError::UnmappedAddress { address, len };
		let idx = self.starts.partition_point(|start| *start <= address);
		if idx == 0 {
			return Err(unmapped);
		}

		let region = &self.regions[idx - 1];
		let offset = usize::try_from(address - region.start).map_err(|_| InspectError::UnmappedAddress { address, len })?;
		let end = offset.checked_add(len).ok_or(InspectError::UnmappedAddress { address, len })?;
		region.bytes.get(offset..end).ok_or(unmapped)
	}

	/// Overwrite bytes inside one mapped region.
	pub(crate) fn write(&mut self, address: u64, data: &[u8]) -> Result<()> {
		let len = data.len();
		let idx = self.starts.partition_point(|start| *start <= address);
		let region = idx
			.checked_sub(1)
			.and_then(|idx| self.regions.get_mut(idx))
			.ok_or(InspectError::UnmappedAddress { address, len })?;
		let offset = usize::try_from(address - region.start).map_err(|_| InspectError::UnmappedAddress { address, len })?;
		let end = offset.checked_add(len).ok_or(InspectError::UnmappedAddress { address, len })?;
		let target = region.bytes.get_mut(offset..end).ok_or(InspectError::UnmappedAddress { address, len })?;
		target.copy_from_slice(data);
		Ok(())
	}
}
