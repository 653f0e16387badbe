//! Style precedence resolution for a single cell.

use crate::memory::AddressSpaceModel;
use crate::{
    PointerRegister, RegisterAliasTable, StackPointer, StackTracker, StatusRegister, ViewConfig,
};

/// Resolved presentation of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStyle {
    /// Decorated with the tag of the covering region.
    Region,
    /// Holds a mapped instruction.
    Instruction,
    /// Member of a stack.
    Stacked(StackPointer),
    /// Target of a register pointer.
    Marker(PointerRegister),
}

impl CellStyle {
    /// CSS class string rendered for this style.
    ///
    /// [`CellStyle::Region`] has no fixed class; it renders as the covering
    /// region's tag (see [`crate::Cell::style_class`]).
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Instruction => "instr-bg",
            Self::Stacked(StackPointer::Supervisor) => "ssp-stack-bg",
            Self::Stacked(StackPointer::User) => "usp-stack-bg",
            Self::Marker(PointerRegister::A) => "marker marker-a",
            Self::Marker(PointerRegister::B) => "marker marker-b",
            Self::Marker(PointerRegister::C) => "marker marker-c",
            Self::Marker(PointerRegister::D) => "marker marker-d",
            Self::Marker(PointerRegister::Ssp) => "marker marker-ssp",
            Self::Marker(PointerRegister::Usp) => "marker marker-usp",
            Self::Marker(PointerRegister::Ip) => "marker marker-ip",
        }
    }
}

/// Immutable view of every input that decides a cell's style.
#[derive(Debug, Clone, Copy)]
pub struct StyleSnapshot<'a> {
    /// Per-cell region and instruction flags.
    pub memory: &'a AddressSpaceModel,
    /// Current register pointer values.
    pub registers: &'a RegisterAliasTable,
    /// Status register; its supervisor bit selects the visible stack pointer marker.
    pub status: StatusRegister,
    /// Stack membership sets.
    pub stacks: &'a StackTracker,
    /// Marker visibility.
    pub config: &'a ViewConfig,
}

impl StyleSnapshot<'_> {
    fn points_at(&self, register: PointerRegister, address: usize) -> bool {
        usize::from(self.registers.get(register)) == address
    }

    /// Resolves the style of `address`.
    ///
    /// Rules in decreasing precedence (first match wins):
    ///
    /// 1. instruction pointer target
    /// 2. `SSP` target while in supervisor mode
    /// 3. `USP` target while in user mode
    /// 4. register A, B, C, then D target, each only when displayed
    /// 5. membership in the supervisor stack, then in the user stack
    /// 6. mapped instruction, when instructions are shown
    /// 7. covering region
    ///
    /// Returns `None` for an unstyled cell and for addresses outside the
    /// address space.
    #[must_use]
    pub fn resolve(&self, address: usize) -> Option<CellStyle> {
        let cell = self.memory.cell(address)?;
        let supervisor = self.status.is_supervisor();

        if self.points_at(PointerRegister::Ip, address) {
            return Some(CellStyle::Marker(PointerRegister::Ip));
        }
        if supervisor && self.points_at(PointerRegister::Ssp, address) {
            return Some(CellStyle::Marker(PointerRegister::Ssp));
        }
        if !supervisor && self.points_at(PointerRegister::Usp, address) {
            return Some(CellStyle::Marker(PointerRegister::Usp));
        }
        if let Some(register) = PointerRegister::GENERAL
            .into_iter()
            .find(|&register| self.config.displays(register) && self.points_at(register, address))
        {
            return Some(CellStyle::Marker(register));
        }

        if let Some(stack) = [StackPointer::Supervisor, StackPointer::User]
            .into_iter()
            .find(|&stack| self.stacks.contains(stack, address))
        {
            return Some(CellStyle::Stacked(stack));
        }

        if self.config.show_instructions && cell.is_instruction() {
            return Some(CellStyle::Instruction);
        }
        if cell.is_memory_region() && cell.region_style().is_some() {
            return Some(CellStyle::Region);
        }
        None
    }
}
