//! Click handling and inline cell editing.

use crate::{EditError, StoreError};

/// Number of view panes that can hold an open edit (split memory area).
pub const EDIT_VIEW_COUNT: usize = 2;

/// Store primitive of the simulation engine used to commit edits.
pub trait MemoryStore {
    /// Stores `value` at `address`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the address is invalid, the value is out
    /// of range or the target is write-protected.
    fn store_byte(&mut self, address: usize, value: u8, flag: bool) -> Result<(), StoreError>;
}

/// Sink for user-facing error messages.
pub trait ErrorNotifier {
    /// Displays `message` to the user.
    fn notify_error(&mut self, message: &str);
}

/// Keyboard modifiers held during a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ClickModifiers {
    /// Control key.
    pub ctrl: bool,
    /// Meta / command key.
    pub meta: bool,
}

impl ClickModifiers {
    /// Returns `true` when the click should open an inline edit.
    #[must_use]
    pub const fn starts_edit(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Result of clicking a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum ClickOutcome {
    /// Plain click; the rendering layer decides what selecting means.
    Selected {
        /// Clicked address.
        address: usize,
    },
    /// An inline edit was opened.
    EditStarted {
        /// View pane holding the edit.
        view: usize,
        /// Edited address.
        address: usize,
        /// Initial editor text (the cell's hex value).
        text: String,
    },
    /// Click was outside the address space or on an unknown view pane.
    Ignored,
}

/// Open edit per view pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditSlots {
    slots: [Option<usize>; EDIT_VIEW_COUNT],
}

impl EditSlots {
    /// Address being edited in `view`.
    #[must_use]
    pub fn editing(&self, view: usize) -> Option<usize> {
        self.slots.get(view).copied().flatten()
    }

    /// Opens an edit; returns `false` for an unknown view pane.
    pub fn open(&mut self, view: usize, address: usize) -> bool {
        self.slots.get_mut(view).is_some_and(|slot| {
            *slot = Some(address);
            true
        })
    }

    /// Closes the edit in `view`, returning its address.
    pub fn close(&mut self, view: usize) -> Option<usize> {
        self.slots.get_mut(view).and_then(Option::take)
    }
}

/// Parses the editor text as a hexadecimal byte.
///
/// # Errors
///
/// Returns [`EditError::InvalidHex`] for empty or non-hex text and
/// [`EditError::ValueOutOfRange`] for values above `0xFF`.
pub fn parse_cell_value(text: &str) -> Result<u8, EditError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let value = u32::from_str_radix(digits, 16).map_err(|_| EditError::InvalidHex {
        text: text.to_owned(),
    })?;
    u8::try_from(value).map_err(|_| EditError::ValueOutOfRange { value })
}
