use thiserror::Error;

/// Construction failures for a memory view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ViewError {
    /// The address space must be a non-zero multiple of the grid width.
    #[error("address space size {size} is not a non-zero multiple of 16")]
    InvalidSize {
        /// Rejected size.
        size: usize,
    },
}

/// Failure reported by the simulation engine's store primitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum StoreError {
    /// Address is not part of simulated memory.
    #[error("invalid address {address:#06X}")]
    InvalidAddress {
        /// Rejected address.
        address: usize,
    },
    /// Value does not fit in a byte.
    #[error("value {value:#X} does not fit in a byte")]
    ValueOutOfRange {
        /// Rejected value.
        value: u16,
    },
    /// Target lies in protected memory.
    #[error("address {address:#06X} is write-protected")]
    WriteProtected {
        /// Rejected address.
        address: usize,
    },
    /// Host-specific failure.
    #[error("{0}")]
    Rejected(String),
}

/// Failure committing an inline cell edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum EditError {
    /// No edit is open in the given view pane.
    #[error("no cell is being edited in view {view}")]
    NoActiveEdit {
        /// View pane index.
        view: usize,
    },
    /// Entered text is not a hexadecimal number.
    #[error("invalid hexadecimal value '{text}'")]
    InvalidHex {
        /// Text as entered.
        text: String,
    },
    /// Edited address is outside the address space.
    #[error("address {address:#06X} is outside memory of size {size}")]
    AddressOutOfRange {
        /// Edited address.
        address: usize,
        /// Address-space size.
        size: usize,
    },
    /// Entered value does not fit in a byte.
    #[error("value {value:#X} does not fit in a byte")]
    ValueOutOfRange {
        /// Parsed value.
        value: u32,
    },
    /// The simulation engine refused the store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::{EditError, StoreError, ViewError};

    #[test]
    fn messages_render_addresses_in_hex() {
        assert_eq!(
            StoreError::WriteProtected { address: 0x1F }.to_string(),
            "address 0x001F is write-protected"
        );
        assert_eq!(
            ViewError::InvalidSize { size: 20 }.to_string(),
            "address space size 20 is not a non-zero multiple of 16"
        );
    }

    #[test]
    fn store_errors_pass_through_edit_errors() {
        let error = EditError::from(StoreError::Rejected("memory is read-only".to_owned()));
        assert_eq!(error.to_string(), "memory is read-only");
        assert_eq!(
            EditError::InvalidHex {
                text: "zz".to_owned()
            }
            .to_string(),
            "invalid hexadecimal value 'zz'"
        );
    }
}
