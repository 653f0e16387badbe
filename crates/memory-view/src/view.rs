//! Operation dispatch and the queryable per-cell view model.

use rustc_hash::FxHashSet;

use crate::edit::{parse_cell_value, EditSlots, ErrorNotifier, MemoryStore};
use crate::layout::{column_labels, row_labels, COLUMNS};
use crate::memory::{AddressSpaceModel, Cell, CellView, RegionOverlay};
use crate::{
    ClickModifiers, ClickOutcome, EditError, MemoryOperation, PointerRegister, RegisterAlias,
    RegisterAliasTable, RegisterId, RegisterOperation, RegisterSnapshot, StackPointer,
    StackTracker, StatusRegister, StyleSnapshot, ViewConfig, ViewError,
};

/// Direction of a stack pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackMove {
    Push,
    Pop,
}

/// Cell-level view state kept in sync with memory and register operations.
///
/// Every mutation recomputes the cached style of exactly the cells it can
/// have affected.
#[derive(Debug, Clone)]
pub struct MemoryView {
    memory: AddressSpaceModel,
    regions: RegionOverlay,
    registers: RegisterAliasTable,
    status: StatusRegister,
    stacks: StackTracker,
    config: ViewConfig,
    edits: EditSlots,
    column_labels: Vec<String>,
    row_labels: Vec<String>,
}

impl MemoryView {
    /// Creates a view over `size` cells seeded with the register `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidSize`] when `size` is zero or not a
    /// multiple of 16.
    pub fn new(
        size: usize,
        snapshot: &RegisterSnapshot,
        config: ViewConfig,
    ) -> Result<Self, ViewError> {
        if size == 0 || size % COLUMNS != 0 {
            return Err(ViewError::InvalidSize { size });
        }

        let mut view = Self {
            memory: AddressSpaceModel::new(size),
            regions: RegionOverlay::new(),
            registers: RegisterAliasTable::from_snapshot(snapshot),
            status: StatusRegister::new(snapshot.sr),
            stacks: StackTracker::new(),
            config,
            edits: EditSlots::default(),
            column_labels: column_labels(),
            row_labels: row_labels(size),
        };
        for register in PointerRegister::ALL {
            view.recompute_pointer(register);
        }
        Ok(view)
    }

    /// Number of cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.memory.size()
    }

    /// Returns the cell at `address`.
    #[must_use]
    pub fn cell(&self, address: usize) -> Option<&Cell> {
        self.memory.cell(address)
    }

    /// All cells in address order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        self.memory.cells()
    }

    /// Rendering views of every cell in address order.
    pub fn cell_views(&self) -> impl Iterator<Item = CellView<'_>> {
        self.memory.cells().iter().map(Cell::view)
    }

    /// Current value of a canonical pointer register.
    #[must_use]
    pub const fn register(&self, register: PointerRegister) -> u16 {
        self.registers.get(register)
    }

    /// Reads any register identity, byte aliases and status register included.
    #[must_use]
    pub const fn read_register(&self, id: RegisterId) -> u16 {
        match id.alias() {
            Some(alias) => self.registers.read(alias),
            None => self.status.raw(),
        }
    }

    /// Current status register.
    #[must_use]
    pub const fn status(&self) -> StatusRegister {
        self.status
    }

    /// Addresses currently stacked on `stack`, ascending.
    #[must_use]
    pub fn stacked_addresses(&self, stack: StackPointer) -> Vec<usize> {
        self.stacks.members(stack)
    }

    /// Active regions.
    #[must_use]
    pub const fn regions(&self) -> &RegionOverlay {
        &self.regions
    }

    /// Current display configuration.
    #[must_use]
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Labels of the 16 grid columns.
    #[must_use]
    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    /// Labels of the grid rows.
    #[must_use]
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Immutable snapshot of every style input.
    #[must_use]
    pub const fn style_snapshot(&self) -> StyleSnapshot<'_> {
        StyleSnapshot {
            memory: &self.memory,
            registers: &self.registers,
            status: self.status,
            stacks: &self.stacks,
            config: &self.config,
        }
    }

    /// Recomputes the cached style of `address`; out-of-range addresses are
    /// ignored.
    pub fn recompute_style(&mut self, address: usize) {
        if address >= self.memory.size() {
            log::trace!("skipping style recompute for out-of-range address {address:#06X}");
            return;
        }
        let style = self.style_snapshot().resolve(address);
        self.memory.set_style(address, style);
    }

    fn recompute_all(&mut self, addresses: impl IntoIterator<Item = usize>) {
        for address in addresses {
            self.recompute_style(address);
        }
    }

    fn recompute_pointer(&mut self, register: PointerRegister) {
        self.recompute_style(usize::from(self.registers.get(register)));
    }

    /// Recomputes the two stack pointer cells, whose markers depend on the
    /// supervisor bit.
    fn recompute_mode_dependent(&mut self) {
        self.recompute_pointer(PointerRegister::Ssp);
        self.recompute_pointer(PointerRegister::Usp);
    }

    /// Applies one memory operation and its dependent style updates.
    pub fn apply_memory_operation(&mut self, operation: &MemoryOperation) {
        log::trace!("memory operation {}", operation.kind());
        match operation {
            MemoryOperation::AddRegion {
                region_id,
                name,
                start_address,
                end_address,
                initial_values,
            } => {
                let dirty = self.regions.add_region(
                    &mut self.memory,
                    region_id,
                    name,
                    *start_address,
                    *end_address,
                    initial_values.as_deref(),
                );
                self.recompute_all(dirty);
            }
            MemoryOperation::RemoveRegion { region_id } => {
                let dirty = self.regions.remove_region(&mut self.memory, region_id);
                self.recompute_all(dirty);
            }
            MemoryOperation::StoreByte { address, value } => {
                self.memory.write_byte(*address, *value);
                self.recompute_style(*address);
            }
            MemoryOperation::StoreBytes {
                initial_address,
                size,
                values,
            } => {
                self.memory
                    .write_bytes(*initial_address, *size, values.as_deref());
                let end = initial_address.saturating_add(*size);
                self.recompute_all(*initial_address..end.min(self.memory.size()));
            }
            MemoryOperation::StoreWord { address, value } => {
                self.memory.write_word(*address, *value);
                self.recompute_style(*address);
                self.recompute_style(address.saturating_add(1));
            }
            MemoryOperation::Reset => {
                self.memory.reset();
                let flushed = self.stacks.reset();
                self.recompute_all(flushed);
            }
            MemoryOperation::Unknown => {
                log::debug!("ignoring unrecognized memory operation");
            }
        }
    }

    /// Applies one register operation and its dependent style updates.
    pub fn apply_register_operation(&mut self, operation: &RegisterOperation) {
        log::trace!("register operation {}", operation.kind());
        match *operation {
            RegisterOperation::Write { index, value } => self.write_register(index, value),
            RegisterOperation::WriteBit {
                index,
                bit_number,
                value,
            } => self.write_register_bit(index, bit_number, value),
            RegisterOperation::Push { index, value } => {
                self.move_stack_pointer(index, value, StackMove::Push);
            }
            RegisterOperation::Pop { index, value } => {
                self.move_stack_pointer(index, value, StackMove::Pop);
            }
            RegisterOperation::Unknown => {
                log::debug!("ignoring unrecognized register operation");
            }
        }
    }

    fn write_register(&mut self, index: RegisterId, value: u16) {
        let Some(alias) = index.alias() else {
            self.status.set_raw(value);
            self.recompute_mode_dependent();
            return;
        };
        let (previous, current) = self.write_alias(alias, value);
        self.recompute_style(usize::from(previous));
        self.recompute_style(usize::from(current));
    }

    fn write_register_bit(&mut self, index: RegisterId, bit_number: u8, value: u16) {
        if index != RegisterId::Sr {
            log::debug!("ignoring bit write to {index:?}");
            return;
        }
        if self.status.write_bit(bit_number, value) {
            self.recompute_mode_dependent();
        } else {
            log::debug!("ignoring write to status bit {bit_number}");
        }
    }

    fn write_alias(&mut self, alias: RegisterAlias, value: u16) -> (u16, u16) {
        let previous = self.registers.write(alias, value);
        (previous, self.registers.get(alias.register))
    }

    fn move_stack_pointer(&mut self, index: RegisterId, value: u16, direction: StackMove) {
        let Some(alias) = index.alias() else {
            log::debug!("ignoring stack move of {index:?}");
            return;
        };
        let (previous, current) = self.write_alias(alias, value);

        match StackPointer::from_register(alias.register) {
            Some(stack) => {
                let dirty = match direction {
                    StackMove::Push => self.stacks.push(stack, previous, current),
                    StackMove::Pop => self.stacks.pop(stack, previous, current),
                };
                self.recompute_all(dirty);
            }
            None => log::debug!("{index:?} is not a stack pointer; membership unchanged"),
        }

        self.recompute_style(usize::from(previous));
        self.recompute_style(usize::from(current));
    }

    /// Replaces the set of addresses flagged as mapped instructions.
    ///
    /// Cells that leave or join the mapping are recomputed; out-of-range
    /// addresses are ignored.
    pub fn set_instruction_mapping(&mut self, addresses: impl IntoIterator<Item = usize>) {
        let mapped: FxHashSet<usize> = addresses.into_iter().collect();
        let mut dirty = Vec::new();

        for address in self.memory.instruction_addresses() {
            if !mapped.contains(&address) && self.memory.set_instruction(address, false) {
                dirty.push(address);
            }
        }
        for &address in &mapped {
            if self.memory.set_instruction(address, true) {
                dirty.push(address);
            }
        }
        self.recompute_all(dirty);
    }

    /// Shows or hides the pointer marker of a general register.
    pub fn set_register_display(&mut self, register: PointerRegister, visible: bool) {
        if self.config.displays(register) == visible {
            return;
        }
        if self.config.set_display(register, visible) {
            self.recompute_pointer(register);
        }
    }

    /// Shows or hides mapped-instruction highlighting.
    pub fn set_show_instructions(&mut self, visible: bool) {
        if self.config.show_instructions == visible {
            return;
        }
        self.config.show_instructions = visible;
        let flagged = self.memory.instruction_addresses();
        self.recompute_all(flagged);
    }

    /// Handles a click on `address` in view pane `view`.
    pub fn click(
        &mut self,
        view: usize,
        address: usize,
        modifiers: ClickModifiers,
    ) -> ClickOutcome {
        let Some(cell) = self.memory.cell(address) else {
            return ClickOutcome::Ignored;
        };
        if !modifiers.starts_edit() {
            return ClickOutcome::Selected { address };
        }
        let text = cell.display_value();
        if self.edits.open(view, address) {
            ClickOutcome::EditStarted {
                view,
                address,
                text,
            }
        } else {
            ClickOutcome::Ignored
        }
    }

    /// Address being edited in view pane `view`.
    #[must_use]
    pub fn editing(&self, view: usize) -> Option<usize> {
        self.edits.editing(view)
    }

    /// Closes the edit in `view` without storing anything.
    pub fn cancel_edit(&mut self, view: usize) {
        self.edits.close(view);
    }

    /// Closes the edit in `view` and validates `text` against it.
    ///
    /// Returns the target address and parsed value; nothing else changes.
    ///
    /// # Errors
    ///
    /// Returns an [`EditError`] when no edit is open, the text is not a hex
    /// byte, or the address is outside the address space.
    pub fn take_edit(&mut self, view: usize, text: &str) -> Result<(usize, u8), EditError> {
        let address = self
            .edits
            .close(view)
            .ok_or(EditError::NoActiveEdit { view })?;
        let size = self.memory.size();
        if address >= size {
            return Err(EditError::AddressOutOfRange { address, size });
        }
        let value = parse_cell_value(text)?;
        Ok((address, value))
    }

    /// Marks a successfully stored edit: the cell no longer holds a mapped
    /// instruction.
    pub fn finish_edit(&mut self, address: usize) {
        if self.memory.set_instruction(address, false) {
            self.recompute_style(address);
        }
    }

    /// Commits the edit open in `view` through `store`.
    ///
    /// The new value reaches the cell through the memory operation stream;
    /// on any failure `notifier` receives the message and the view is left
    /// unchanged apart from the closed edit.
    ///
    /// # Errors
    ///
    /// Returns the [`EditError`] that was also sent to `notifier`.
    pub fn commit_edit<S, N>(
        &mut self,
        view: usize,
        text: &str,
        store: &mut S,
        notifier: &mut N,
    ) -> Result<(), EditError>
    where
        S: MemoryStore + ?Sized,
        N: ErrorNotifier + ?Sized,
    {
        let result = self.take_edit(view, text).and_then(|(address, value)| {
            store.store_byte(address, value, false)?;
            Ok(address)
        });
        match result {
            Ok(address) => {
                self.finish_edit(address);
                Ok(())
            }
            Err(error) => {
                notifier.notify_error(&error.to_string());
                Err(error)
            }
        }
    }
}
