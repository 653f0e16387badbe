//! Named region overlay stamped on top of the address space.

use rustc_hash::FxHashMap;

use crate::memory::AddressSpaceModel;

/// Inclusive address range recorded for an active region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RegionSpan {
    /// Inclusive start address.
    pub start: usize,
    /// Inclusive end address.
    pub end: usize,
    /// Decorative tag derived from the region name.
    pub style_tag: String,
}

impl RegionSpan {
    /// Returns `true` when `address` lies inside the span.
    #[must_use]
    pub const fn contains(&self, address: usize) -> bool {
        address >= self.start && address <= self.end
    }
}

/// Converts a `CamelCase` region name into its kebab-case style tag.
///
/// A hyphen is inserted between every lowercase letter that is directly
/// followed by an uppercase letter, then the whole name is lowercased.
#[must_use]
pub fn kebab_case(name: &str) -> String {
    let mut tag = String::with_capacity(name.len() + 4);
    let mut previous_lower = false;
    for ch in name.chars() {
        if previous_lower && ch.is_ascii_uppercase() {
            tag.push('-');
        }
        previous_lower = ch.is_ascii_lowercase();
        tag.extend(ch.to_lowercase());
    }
    tag
}

/// Regions keyed by their identifier.
///
/// Overlap is not prevented; the last region stamped onto a cell wins.
#[derive(Debug, Clone, Default)]
pub struct RegionOverlay {
    regions: FxHashMap<String, RegionSpan>,
}

impl RegionOverlay {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps a region onto `memory` and records it under `id`.
    ///
    /// Each covered cell gets `initial_values[address]` (or zero) as its value
    /// and the kebab-cased `name` as its region tag. The part of the range
    /// beyond the end of the address space is dropped. A region already
    /// recorded under `id` is removed first. Returns every address whose
    /// region state changed.
    pub fn add_region(
        &mut self,
        memory: &mut AddressSpaceModel,
        id: &str,
        name: &str,
        start: usize,
        end: usize,
        initial_values: Option<&[u16]>,
    ) -> Vec<usize> {
        if start > end {
            log::debug!("ignoring region {id}: start {start:#06X} is past end {end:#06X}");
            return Vec::new();
        }
        let Some(last) = memory.size().checked_sub(1) else {
            return Vec::new();
        };
        if start > last {
            log::debug!("ignoring region {id}: starts outside the address space");
            return Vec::new();
        }
        let clamped_end = end.min(last);
        if clamped_end < end {
            log::debug!("region {id} truncated to {clamped_end:#06X}");
        }

        let mut dirty = if self.regions.contains_key(id) {
            self.remove_region(memory, id)
        } else {
            Vec::new()
        };
        let style_tag = kebab_case(name);
        for address in start..=clamped_end {
            let value = initial_values
                .and_then(|values| values.get(address).copied())
                .unwrap_or(0);
            memory.stamp_region(address, value, &style_tag);
        }

        self.regions.insert(
            id.to_owned(),
            RegionSpan {
                start,
                end: clamped_end,
                style_tag,
            },
        );
        dirty.extend(start..=clamped_end);
        dirty
    }

    /// Removes the region recorded under `id` and clears its tag from the
    /// covered cells. Cell values are left as they are. Cells since stamped
    /// by another region keep that region's tag.
    ///
    /// Returns the cleared addresses, or an empty list for an unknown id.
    pub fn remove_region(&mut self, memory: &mut AddressSpaceModel, id: &str) -> Vec<usize> {
        let Some(span) = self.regions.remove(id) else {
            log::debug!("ignoring removal of unknown region {id}");
            return Vec::new();
        };
        let cleared: Vec<usize> = (span.start..=span.end)
            .filter(|&address| {
                memory
                    .cell(address)
                    .and_then(|cell| cell.region_style())
                    .is_some_and(|tag| tag == span.style_tag)
            })
            .collect();
        for &address in &cleared {
            memory.clear_region(address);
        }
        cleared
    }

    /// Returns the span recorded under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RegionSpan> {
        self.regions.get(id)
    }

    /// Number of recorded regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` when no region is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates over recorded regions in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionSpan)> {
        self.regions.iter().map(|(id, span)| (id.as_str(), span))
    }
}
