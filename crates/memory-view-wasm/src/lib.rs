use js_sys::Function;
use memory_view::{
    CellView, ClickModifiers, ErrorNotifier, MemoryOperation, MemoryStore, MemoryView,
    MemoryViewEngine, OperationBus, PointerRegister, RegisterId, RegisterOperation,
    RegisterSnapshot, StackPointer, StoreError, ViewConfig,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&JsValue::from_str(&format!($($t)*))))
}

/// JS-compatible register file snapshot.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasmRegisters {
    pub a: u16,
    pub b: u16,
    pub c: u16,
    pub d: u16,
    pub ssp: u16,
    pub usp: u16,
    pub ip: u16,
    pub sr: u16,
    pub supervisor: bool,
}

/// JS-compatible stack membership.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasmStacks {
    pub supervisor: Vec<usize>,
    pub user: Vec<usize>,
}

/// Decodes an optional JS object, treating `undefined`/`null` as the default.
fn decode_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn register_name<T: DeserializeOwned>(name: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(JsValue::from_str(name))
        .map_err(|_| JsValue::from_str(&format!("unknown register '{name}'")))
}

/// Host store callback: `(address, value, flag) => void`, throwing to reject.
struct JsStore<'a>(&'a Function);

impl MemoryStore for JsStore<'_> {
    fn store_byte(&mut self, address: usize, value: u8, flag: bool) -> Result<(), StoreError> {
        self.0
            .call3(
                &JsValue::NULL,
                &JsValue::from(address),
                &JsValue::from(value),
                &JsValue::from_bool(flag),
            )
            .map(|_| ())
            .map_err(|err| {
                StoreError::Rejected(err.as_string().unwrap_or_else(|| format!("{err:?}")))
            })
    }
}

/// Host notifier callback: `(message) => void`.
struct JsNotifier<'a>(&'a Function);

impl ErrorNotifier for JsNotifier<'_> {
    fn notify_error(&mut self, message: &str) {
        if self
            .0
            .call1(&JsValue::NULL, &JsValue::from_str(message))
            .is_err()
        {
            console_log!("error notifier threw while reporting: {}", message);
        }
    }
}

#[wasm_bindgen]
pub struct WasmMemoryView {
    memory_operations: OperationBus<MemoryOperation>,
    register_operations: OperationBus<RegisterOperation>,
    engine: MemoryViewEngine,
}

#[wasm_bindgen]
impl WasmMemoryView {
    /// Creates a view of `size` cells.
    ///
    /// `registers` and `config` are optional objects shaped like
    /// `{ a, b, c, d, ssp, usp, ip, sr }` and
    /// `{ displayA, displayB, displayC, displayD, showInstructions }`.
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize, registers: JsValue, config: JsValue) -> Result<Self, JsValue> {
        console_error_panic_hook::set_once();
        let snapshot: RegisterSnapshot = decode_or_default(registers)?;
        let config: ViewConfig = decode_or_default(config)?;
        let view = MemoryView::new(size, &snapshot, config)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        let memory_operations = OperationBus::new();
        let register_operations = OperationBus::new();
        let engine = MemoryViewEngine::attach(view, &memory_operations, &register_operations);
        console_log!("Memory view attached over {} bytes", size);

        Ok(Self {
            memory_operations,
            register_operations,
            engine,
        })
    }

    /// Feeds one memory operation (`{ operationType, data }`).
    /// Returns `false` when the object cannot be decoded.
    pub fn push_memory_operation(&self, operation: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<MemoryOperation>(operation) {
            Ok(operation) => {
                self.memory_operations.publish(&operation);
                true
            }
            Err(err) => {
                console_log!("Dropping undecodable memory operation: {}", err);
                false
            }
        }
    }

    /// Feeds one register operation (`{ operationType, data: { index, ... } }`).
    /// Returns `false` when the object cannot be decoded.
    pub fn push_register_operation(&self, operation: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<RegisterOperation>(operation) {
            Ok(operation) => {
                self.register_operations.publish(&operation);
                true
            }
            Err(err) => {
                console_log!("Dropping undecodable register operation: {}", err);
                false
            }
        }
    }

    pub fn size(&self) -> usize {
        self.engine.view().size()
    }

    /// Returns every cell as `{ address, value, displayValue, style }`.
    pub fn cells(&self) -> Result<JsValue, JsValue> {
        let view = self.engine.view();
        let cells: Vec<CellView<'_>> = view.cell_views().collect();
        encode(&cells)
    }

    /// Returns one cell, or `undefined` outside the address space.
    pub fn cell(&self, address: usize) -> Result<JsValue, JsValue> {
        let view = self.engine.view();
        match view.cell(address) {
            Some(cell) => encode(&cell.view()),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn column_labels(&self) -> Result<JsValue, JsValue> {
        encode(self.engine.view().column_labels())
    }

    pub fn row_labels(&self) -> Result<JsValue, JsValue> {
        encode(self.engine.view().row_labels())
    }

    /// Returns the register file as a JSON object.
    pub fn registers(&self) -> Result<JsValue, JsValue> {
        let view = self.engine.view();
        encode(&WasmRegisters {
            a: view.register(PointerRegister::A),
            b: view.register(PointerRegister::B),
            c: view.register(PointerRegister::C),
            d: view.register(PointerRegister::D),
            ssp: view.register(PointerRegister::Ssp),
            usp: view.register(PointerRegister::Usp),
            ip: view.register(PointerRegister::Ip),
            sr: view.status().raw(),
            supervisor: view.status().is_supervisor(),
        })
    }

    /// Reads a register by name (`"A"`, `"AH"`, `"SSP"`, `"SR"`, ...).
    pub fn read_register(&self, name: &str) -> Result<u16, JsValue> {
        let id: RegisterId = register_name(name)?;
        Ok(self.engine.view().read_register(id))
    }

    pub fn stacks(&self) -> Result<JsValue, JsValue> {
        let view = self.engine.view();
        encode(&WasmStacks {
            supervisor: view.stacked_addresses(StackPointer::Supervisor),
            user: view.stacked_addresses(StackPointer::User),
        })
    }

    /// Replaces the addresses highlighted as mapped instructions.
    pub fn set_instruction_mapping(&self, addresses: &[u32]) {
        self.engine.view_mut().set_instruction_mapping(
            addresses
                .iter()
                .filter_map(|&address| usize::try_from(address).ok()),
        );
    }

    /// Shows or hides the marker of register `"A"`..`"D"`.
    pub fn set_register_display(&self, register: &str, visible: bool) -> Result<(), JsValue> {
        let register: PointerRegister = register_name(register)?;
        self.engine
            .view_mut()
            .set_register_display(register, visible);
        Ok(())
    }

    pub fn set_show_instructions(&self, visible: bool) {
        self.engine.view_mut().set_show_instructions(visible);
    }

    /// Handles a click; `modifiers` is `{ ctrl, meta }`.
    /// Returns `{ kind: "selected" | "editStarted" | "ignored", ... }`.
    pub fn click(
        &self,
        view: usize,
        address: usize,
        modifiers: JsValue,
    ) -> Result<JsValue, JsValue> {
        let modifiers: ClickModifiers = decode_or_default(modifiers)?;
        let outcome = self.engine.view_mut().click(view, address, modifiers);
        encode(&outcome)
    }

    pub fn cancel_edit(&self, view: usize) {
        self.engine.view_mut().cancel_edit(view);
    }

    /// Commits the open edit of pane `view` through the host `store`
    /// callback. Failures are passed to `notifier` and yield `false`.
    pub fn commit_edit(
        &self,
        view: usize,
        text: &str,
        store: &Function,
        notifier: &Function,
    ) -> bool {
        self.engine
            .commit_edit(view, text, &mut JsStore(store), &mut JsNotifier(notifier))
            .is_ok()
    }

    /// Detaches the view from its operation streams.
    pub fn dispose(&mut self) {
        self.engine.dispose();
        console_log!("Memory view detached");
    }
}
