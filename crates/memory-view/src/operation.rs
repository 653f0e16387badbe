//! Memory and register operation taxonomies consumed by the view.
//!
//! With the `serde` feature, operations travel as `{operationType, data}`
//! envelopes (for example
//! `{"operationType":"STORE_BYTE","data":{"address":16,"value":255}}`).
//! An unrecognized `operationType` without a `data` payload decodes to the
//! `Unknown` variant.

use crate::RegisterId;

/// Mutation of the simulated address space.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        tag = "operationType",
        content = "data",
        rename_all = "SCREAMING_SNAKE_CASE",
        rename_all_fields = "camelCase"
    )
)]
pub enum MemoryOperation {
    /// Declares a named region over `start_address..=end_address`.
    AddRegion {
        /// Key under which the region is recorded.
        #[cfg_attr(feature = "serde", serde(rename = "regionID"))]
        region_id: String,
        /// Display name; its kebab-cased form becomes the style tag.
        name: String,
        /// Inclusive start address.
        start_address: usize,
        /// Inclusive end address.
        end_address: usize,
        /// Memory image indexed by absolute address.
        initial_values: Option<Vec<u16>>,
    },
    /// Drops a previously added region.
    RemoveRegion {
        /// Key given when the region was added.
        #[cfg_attr(feature = "serde", serde(rename = "regionID"))]
        region_id: String,
    },
    /// Stores one byte.
    StoreByte {
        /// Target address.
        address: usize,
        /// Value; only the low byte is kept.
        value: u16,
    },
    /// Stores `size` consecutive bytes starting at `initial_address`.
    StoreBytes {
        /// First target address.
        initial_address: usize,
        /// Number of bytes written.
        size: usize,
        /// Values indexed from zero; missing entries are written as zero.
        values: Option<Vec<u16>>,
    },
    /// Stores a big-endian word at `address` and `address + 1`.
    StoreWord {
        /// Address of the high byte.
        address: usize,
        /// Word value.
        value: u16,
    },
    /// Clears live memory and both stacks.
    Reset,
    /// Operation kind this view does not handle.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

/// Mutation of the simulated register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        tag = "operationType",
        content = "data",
        rename_all = "SCREAMING_SNAKE_CASE",
        rename_all_fields = "camelCase"
    )
)]
pub enum RegisterOperation {
    /// Writes a register (or byte alias).
    Write {
        /// Target register.
        index: RegisterId,
        /// New value at the register's width.
        value: u16,
    },
    /// Sets or clears a single bit.
    WriteBit {
        /// Target register; only the status register is affected.
        index: RegisterId,
        /// Bit position.
        bit_number: u8,
        /// Zero clears the bit, anything else sets it.
        value: u16,
    },
    /// Stack pointer moved down by a push.
    Push {
        /// Stack pointer register.
        index: RegisterId,
        /// New pointer value.
        value: u16,
    },
    /// Stack pointer moved up by a pop.
    Pop {
        /// Stack pointer register.
        index: RegisterId,
        /// New pointer value.
        value: u16,
    },
    /// Operation kind this view does not handle.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl MemoryOperation {
    /// Short stable name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddRegion { .. } => "ADD_REGION",
            Self::RemoveRegion { .. } => "REMOVE_REGION",
            Self::StoreByte { .. } => "STORE_BYTE",
            Self::StoreBytes { .. } => "STORE_BYTES",
            Self::StoreWord { .. } => "STORE_WORD",
            Self::Reset => "RESET",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl RegisterOperation {
    /// Short stable name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Write { .. } => "WRITE",
            Self::WriteBit { .. } => "WRITE_BIT",
            Self::Push { .. } => "PUSH",
            Self::Pop { .. } => "POP",
            Self::Unknown => "UNKNOWN",
        }
    }
}
