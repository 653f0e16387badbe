//! Stream-driven engine behaviour: delivery, teardown and inline edits.

#![allow(clippy::pedantic, clippy::nursery)]

use std::cell::RefCell;
use std::rc::Rc;

use log as _;
use memory_view::{
    ClickModifiers, ClickOutcome, EditError, ErrorNotifier, MemoryOperation, MemoryStore,
    MemoryView, MemoryViewEngine, OperationBus, OperationStream, PointerRegister, RegisterId,
    RegisterOperation, RegisterSnapshot, StoreError, ViewConfig,
};
use proptest as _;
use rstest::{fixture, rstest};
use rustc_hash as _;
#[cfg(feature = "serde")]
use serde as _;
use serde_json as _;
use thiserror as _;

const CTRL: ClickModifiers = ClickModifiers {
    ctrl: true,
    meta: false,
};

struct Harness {
    memory: Rc<OperationBus<MemoryOperation>>,
    registers: OperationBus<RegisterOperation>,
    engine: MemoryViewEngine,
}

#[fixture]
fn harness() -> Harness {
    let memory = Rc::new(OperationBus::new());
    let registers = OperationBus::new();
    let snapshot = RegisterSnapshot {
        ip: 0xFF,
        ssp: 0xFE,
        usp: 0xFD,
        ..RegisterSnapshot::default()
    };
    let view = MemoryView::new(256, &snapshot, ViewConfig::all_markers()).expect("valid size");
    let engine = MemoryViewEngine::attach(view, memory.as_ref(), &registers);
    Harness {
        memory,
        registers,
        engine,
    }
}

/// Store that forwards accepted writes onto the memory stream, like a live
/// simulation engine would.
struct EchoStore {
    memory: Rc<OperationBus<MemoryOperation>>,
    protected_from: usize,
    calls: Vec<(usize, u8, bool)>,
}

impl MemoryStore for EchoStore {
    fn store_byte(&mut self, address: usize, value: u8, flag: bool) -> Result<(), StoreError> {
        self.calls.push((address, value, flag));
        if address >= self.protected_from {
            return Err(StoreError::WriteProtected { address });
        }
        self.memory.publish(&MemoryOperation::StoreByte {
            address,
            value: u16::from(value),
        });
        Ok(())
    }
}

#[derive(Default)]
struct Messages(Vec<String>);

impl ErrorNotifier for Messages {
    fn notify_error(&mut self, message: &str) {
        self.0.push(message.to_owned());
    }
}

fn echo_store(harness: &Harness) -> EchoStore {
    EchoStore {
        memory: Rc::clone(&harness.memory),
        protected_from: 0x80,
        calls: Vec::new(),
    }
}

#[rstest]
fn published_operations_reach_the_view(harness: Harness) {
    harness.memory.publish(&MemoryOperation::StoreWord {
        address: 0x10,
        value: 0xCAFE,
    });
    harness.registers.publish(&RegisterOperation::Write {
        index: RegisterId::Ip,
        value: 0x10,
    });

    let view = harness.engine.view();
    assert_eq!(view.cell(0x10).map(|cell| cell.value()), Some(0xCA));
    assert_eq!(view.cell(0x11).map(|cell| cell.value()), Some(0xFE));
    assert_eq!(view.register(PointerRegister::Ip), 0x10);
    assert_eq!(
        view.cell(0x10).and_then(|cell| cell.style_class()),
        Some("marker marker-ip")
    );
}

#[rstest]
fn operations_published_while_the_view_is_borrowed_are_applied_later(harness: Harness) {
    {
        let held = harness.engine.view();
        harness.memory.publish(&MemoryOperation::StoreByte {
            address: 3,
            value: 0x42,
        });
        harness.registers.publish(&RegisterOperation::Write {
            index: RegisterId::A,
            value: 3,
        });
        harness.memory.publish(&MemoryOperation::StoreByte {
            address: 3,
            value: 0x43,
        });

        assert_eq!(held.cell(3).map(|cell| cell.value()), Some(0));
        assert_eq!(harness.engine.deferred_count(), 3);
    }

    let view = harness.engine.view();
    assert_eq!(harness.engine.deferred_count(), 0);
    assert_eq!(view.cell(3).map(|cell| cell.value()), Some(0x43));
    assert_eq!(view.register(PointerRegister::A), 3);
    assert_eq!(
        view.cell(3).and_then(|cell| cell.style_class()),
        Some("marker marker-a")
    );
}

#[rstest]
fn deferred_operations_apply_before_the_next_delivery(harness: Harness) {
    {
        let _held = harness.engine.view_mut();
        harness.memory.publish(&MemoryOperation::StoreWord {
            address: 0x40,
            value: 0x1111,
        });
    }
    harness.memory.publish(&MemoryOperation::StoreByte {
        address: 0x41,
        value: 0x22,
    });

    assert_eq!(harness.engine.deferred_count(), 0);
    let view = harness.engine.view();
    assert_eq!(view.cell(0x40).map(|cell| cell.value()), Some(0x11));
    assert_eq!(view.cell(0x41).map(|cell| cell.value()), Some(0x22));
}

#[rstest]
fn dispose_unsubscribes_and_freezes_the_view(mut harness: Harness) {
    assert_eq!(harness.memory.subscriber_count(), 1);
    assert_eq!(harness.registers.subscriber_count(), 1);

    harness.engine.dispose();
    harness.engine.dispose();

    assert!(!harness.engine.is_active());
    assert_eq!(harness.memory.subscriber_count(), 0);
    assert_eq!(harness.registers.subscriber_count(), 0);
    assert_eq!(
        harness.memory.publish(&MemoryOperation::StoreByte {
            address: 0,
            value: 1
        }),
        0
    );
    assert_eq!(harness.engine.view().cell(0).map(|cell| cell.value()), Some(0));
}

#[test]
fn deliveries_in_flight_after_dispose_are_ignored() {
    let memory = OperationBus::<MemoryOperation>::new();
    let registers = OperationBus::<RegisterOperation>::new();
    let slot: Rc<RefCell<Option<MemoryViewEngine>>> = Rc::new(RefCell::new(None));

    // Runs before the engine's own handler for the same delivery.
    let teardown = Rc::clone(&slot);
    let _subscription = registers.subscribe(Box::new(move |_| {
        if let Some(engine) = teardown.borrow_mut().as_mut() {
            engine.dispose();
        }
    }));

    let view = MemoryView::new(32, &RegisterSnapshot::default(), ViewConfig::default())
        .expect("valid size");
    *slot.borrow_mut() = Some(MemoryViewEngine::attach(view, &memory, &registers));

    registers.publish(&RegisterOperation::Write {
        index: RegisterId::A,
        value: 4,
    });

    let engine = slot.borrow();
    let engine = engine.as_ref().expect("engine attached");
    assert!(!engine.is_active());
    assert_eq!(engine.view().register(PointerRegister::A), 0);
    assert_eq!(memory.subscriber_count(), 0);
}

#[rstest]
fn ctrl_click_edit_commits_through_the_store(harness: Harness) {
    let mut store = echo_store(&harness);
    let mut messages = Messages::default();
    harness.engine.view_mut().set_instruction_mapping([0x20]);

    let outcome = harness.engine.view_mut().click(0, 0x20, CTRL);
    assert_eq!(
        outcome,
        ClickOutcome::EditStarted {
            view: 0,
            address: 0x20,
            text: "00".to_owned(),
        }
    );

    harness
        .engine
        .commit_edit(0, "a5", &mut store, &mut messages)
        .expect("edit accepted");

    assert_eq!(store.calls, vec![(0x20, 0xA5, false)]);
    assert!(messages.0.is_empty());
    let view = harness.engine.view();
    let cell = view.cell(0x20).expect("in range");
    assert_eq!(cell.value(), 0xA5);
    assert!(!cell.is_instruction());
    assert_eq!(cell.style(), None);
    assert_eq!(view.editing(0), None);
}

#[rstest]
#[case("zz", "invalid hexadecimal value 'zz'")]
#[case("1FF", "value 0x1FF does not fit in a byte")]
fn invalid_text_is_reported_and_not_stored(
    harness: Harness,
    #[case] text: &str,
    #[case] message: &str,
) {
    let mut store = echo_store(&harness);
    let mut messages = Messages::default();
    harness.engine.view_mut().click(1, 0x30, CTRL);

    let result = harness.engine.commit_edit(1, text, &mut store, &mut messages);

    assert!(result.is_err());
    assert!(store.calls.is_empty());
    assert_eq!(messages.0, vec![message.to_owned()]);
    assert_eq!(harness.engine.view().editing(1), None);
}

#[rstest]
fn store_rejection_leaves_the_cell_unchanged(harness: Harness) {
    let mut store = echo_store(&harness);
    let mut messages = Messages::default();
    harness.engine.view_mut().set_instruction_mapping([0x90]);
    harness.engine.view_mut().click(0, 0x90, CTRL);

    let result = harness
        .engine
        .commit_edit(0, "12", &mut store, &mut messages);

    assert_eq!(
        result,
        Err(EditError::Store(StoreError::WriteProtected { address: 0x90 }))
    );
    assert_eq!(messages.0, vec!["address 0x0090 is write-protected".to_owned()]);
    let view = harness.engine.view();
    let cell = view.cell(0x90).expect("in range");
    assert_eq!(cell.value(), 0);
    assert!(cell.is_instruction());
}

#[rstest]
fn plain_click_selects_and_cancel_discards(harness: Harness) {
    let mut store = echo_store(&harness);
    let mut messages = Messages::default();
    let mut view = harness.engine.view_mut();

    assert_eq!(
        view.click(0, 0x44, ClickModifiers::default()),
        ClickOutcome::Selected { address: 0x44 }
    );
    assert_eq!(view.click(0, 0x400, CTRL), ClickOutcome::Ignored);
    assert_eq!(view.click(2, 0x44, CTRL), ClickOutcome::Ignored);

    view.click(0, 0x44, ClickModifiers { ctrl: false, meta: true });
    assert_eq!(view.editing(0), Some(0x44));
    view.cancel_edit(0);
    assert_eq!(
        view.commit_edit(0, "01", &mut store, &mut messages),
        Err(EditError::NoActiveEdit { view: 0 })
    );
    assert_eq!(messages.0, vec!["no cell is being edited in view 0".to_owned()]);
}

#[rstest]
fn trait_objects_work_as_streams(harness: Harness) {
    let stream: &dyn OperationStream<RegisterOperation> = &harness.registers;
    let seen = Rc::new(std::cell::Cell::new(0));
    let counter = Rc::clone(&seen);
    let mut subscription = stream.subscribe(Box::new(move |_| counter.set(counter.get() + 1)));

    harness.registers.publish(&RegisterOperation::Unknown);
    subscription.unsubscribe();
    harness.registers.publish(&RegisterOperation::Unknown);

    assert_eq!(seen.get(), 1);
    assert_eq!(harness.registers.subscriber_count(), 1);
}
