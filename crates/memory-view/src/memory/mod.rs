//! Per-cell address-space model and the region overlay stamped on it.

/// Named region overlay and kebab-case style tags.
pub mod region;

pub use region::{kebab_case, RegionOverlay, RegionSpan};

use crate::layout::format_hex;
use crate::CellStyle;

/// One addressable byte of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    address: usize,
    value: u8,
    style: Option<CellStyle>,
    is_memory_region: bool,
    region_style: Option<String>,
    is_instruction: bool,
}

impl Cell {
    const fn new(address: usize) -> Self {
        Self {
            address,
            value: 0,
            style: None,
            is_memory_region: false,
            region_style: None,
            is_instruction: false,
        }
    }

    /// Fixed address of this cell.
    #[must_use]
    pub const fn address(&self) -> usize {
        self.address
    }

    /// Current byte value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Two-digit uppercase hex rendering of the value.
    #[must_use]
    pub fn display_value(&self) -> String {
        format_hex(usize::from(self.value), 2)
    }

    /// Cached resolved style.
    #[must_use]
    pub const fn style(&self) -> Option<CellStyle> {
        self.style
    }

    /// Class string of the cached style, with region styles resolved to the
    /// cell's region tag.
    #[must_use]
    pub fn style_class(&self) -> Option<&str> {
        match self.style? {
            CellStyle::Region => self.region_style.as_deref(),
            style => Some(style.class_name()),
        }
    }

    /// Returns `true` when a region covers this cell.
    #[must_use]
    pub const fn is_memory_region(&self) -> bool {
        self.is_memory_region
    }

    /// Tag of the region covering this cell.
    #[must_use]
    pub fn region_style(&self) -> Option<&str> {
        self.region_style.as_deref()
    }

    /// Returns `true` when the cell holds a mapped instruction.
    #[must_use]
    pub const fn is_instruction(&self) -> bool {
        self.is_instruction
    }

    /// Borrowed read-only rendering view of this cell.
    #[must_use]
    pub fn view(&self) -> CellView<'_> {
        CellView {
            address: self.address,
            value: self.value,
            display_value: self.display_value(),
            style: self.style_class(),
        }
    }
}

/// Read-only per-cell data handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CellView<'a> {
    /// Cell address.
    pub address: usize,
    /// Byte value.
    pub value: u8,
    /// Two-digit uppercase hex value.
    pub display_value: String,
    /// Resolved style class, if any.
    pub style: Option<&'a str>,
}

/// Flat array of cells indexed by address.
///
/// Mutators silently skip addresses outside `0..size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSpaceModel {
    cells: Vec<Cell>,
}

impl AddressSpaceModel {
    /// Allocates `size` zeroed, unstyled cells.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            cells: (0..size).map(Cell::new).collect(),
        }
    }

    /// Number of cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// All cells in address order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at `address`.
    #[must_use]
    pub fn cell(&self, address: usize) -> Option<&Cell> {
        self.cells.get(address)
    }

    fn cell_mut(&mut self, address: usize) -> Option<&mut Cell> {
        let cell = self.cells.get_mut(address);
        if cell.is_none() {
            log::debug!("dropping write to out-of-range address {address:#06X}");
        }
        cell
    }

    /// Stores the low eight bits of `value` at `address`.
    pub fn write_byte(&mut self, address: usize, value: u16) {
        if let Some(cell) = self.cell_mut(address) {
            cell.value = value.to_be_bytes()[1];
        }
    }

    /// Stores `value` big-endian at `address` and `address + 1`.
    pub fn write_word(&mut self, address: usize, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.write_byte(address, u16::from(high));
        self.write_byte(address.saturating_add(1), u16::from(low));
    }

    /// Writes `values[i]` to `start + i` for `i` in `0..len`.
    ///
    /// Missing values (including an absent slice) are written as zero.
    pub fn write_bytes(&mut self, start: usize, len: usize, values: Option<&[u16]>) {
        for offset in 0..len {
            let value = values
                .and_then(|values| values.get(offset).copied())
                .unwrap_or(0);
            self.write_byte(start.saturating_add(offset), value);
        }
    }

    /// Zeroes every cell that is not covered by a region.
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| !cell.is_memory_region) {
            cell.value = 0;
        }
    }

    pub(crate) fn stamp_region(&mut self, address: usize, value: u16, style_tag: &str) {
        self.write_byte(address, value);
        if let Some(cell) = self.cells.get_mut(address) {
            cell.is_memory_region = true;
            cell.region_style = Some(style_tag.to_owned());
        }
    }

    pub(crate) fn clear_region(&mut self, address: usize) {
        if let Some(cell) = self.cells.get_mut(address) {
            cell.is_memory_region = false;
            cell.region_style = None;
        }
    }

    /// Sets the instruction flag and reports whether it changed.
    pub fn set_instruction(&mut self, address: usize, is_instruction: bool) -> bool {
        match self.cells.get_mut(address) {
            Some(cell) if cell.is_instruction != is_instruction => {
                cell.is_instruction = is_instruction;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_style(&mut self, address: usize, style: Option<CellStyle>) {
        if let Some(cell) = self.cells.get_mut(address) {
            cell.style = style;
        }
    }

    /// Addresses of every instruction-flagged cell.
    #[must_use]
    pub fn instruction_addresses(&self) -> Vec<usize> {
        self.cells
            .iter()
            .filter(|cell| cell.is_instruction)
            .map(Cell::address)
            .collect()
    }
}
