//! Incremental cell-level view model for a simulated address space.
//!
//! A [`MemoryView`] mirrors memory and register operations emitted by a
//! simulation engine and keeps a resolved style per cell (pointer markers,
//! stack membership, mapped instructions and named regions). Only the cells an
//! operation can affect are recomputed. [`MemoryViewEngine`] wires a view to
//! two [`OperationStream`]s.

/// Per-cell address-space model and named regions.
pub mod memory;
pub use memory::{kebab_case, AddressSpaceModel, Cell, CellView, RegionOverlay, RegionSpan};

/// Register file, status register and stack membership.
pub mod state;
pub use state::{
    PointerRegister, RegisterAlias, RegisterAliasTable, RegisterId, RegisterSnapshot,
    RegisterWidth, StackPointer, StackTracker, StatusRegister, POINTER_REGISTER_COUNT,
    STATUS_REGISTER_BITS, SUPERVISOR_BIT,
};

/// Grid geometry and hex label formatting.
pub mod layout;
pub use layout::{column_labels, format_hex, row_labels, COLUMNS};

/// Marker visibility configuration.
pub mod config;
pub use config::ViewConfig;

/// Cell style precedence.
pub mod style;
pub use style::{CellStyle, StyleSnapshot};

/// Memory and register operation types.
pub mod operation;
pub use operation::{MemoryOperation, RegisterOperation};

/// Error types.
pub mod error;
pub use error::{EditError, StoreError, ViewError};

/// Click handling and inline editing.
pub mod edit;
pub use edit::{
    parse_cell_value, ClickModifiers, ClickOutcome, EditSlots, ErrorNotifier, MemoryStore,
    EDIT_VIEW_COUNT,
};

/// Operation dispatch into the view model.
pub mod view;
pub use view::MemoryView;

/// Publish/subscribe plumbing.
pub mod stream;
pub use stream::{Handler, OperationBus, OperationStream, Subscription};

/// Stream-bound view lifecycle.
pub mod engine;
pub use engine::MemoryViewEngine;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use serde_json as _;
