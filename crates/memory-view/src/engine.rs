//! Binds a [`MemoryView`] to live operation streams.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::edit::{ErrorNotifier, MemoryStore};
use crate::stream::{Handler, OperationStream, Subscription};
use crate::{EditError, MemoryOperation, MemoryView, RegisterOperation};

/// Operation that arrived while the view was borrowed.
#[derive(Debug)]
enum Deferred {
    Memory(MemoryOperation),
    Register(RegisterOperation),
}

impl Deferred {
    fn apply(&self, view: &mut MemoryView) {
        match self {
            Self::Memory(operation) => view.apply_memory_operation(operation),
            Self::Register(operation) => view.apply_register_operation(operation),
        }
    }
}

type Backlog = Rc<RefCell<VecDeque<Deferred>>>;

/// Applies every deferred operation, oldest first.
fn drain(backlog: &RefCell<VecDeque<Deferred>>, view: &mut MemoryView) {
    loop {
        let next = backlog.borrow_mut().pop_front();
        let Some(operation) = next else {
            break;
        };
        operation.apply(view);
    }
}

/// A view subscribed to memory and register operation streams.
///
/// Every delivered operation is applied to the view before the publisher
/// returns. An operation delivered while the host holds a borrow of the view
/// is kept in arrival order and applied before the next delivery or the next
/// call to [`MemoryViewEngine::view`]. After [`MemoryViewEngine::dispose`]
/// new deliveries are ignored, including those already in flight.
#[derive(Debug)]
pub struct MemoryViewEngine {
    view: Rc<RefCell<MemoryView>>,
    backlog: Backlog,
    active: Rc<Cell<bool>>,
    subscriptions: Vec<Subscription>,
}

impl MemoryViewEngine {
    /// Subscribes `view` to both streams.
    pub fn attach<M, R>(view: MemoryView, memory: &M, registers: &R) -> Self
    where
        M: OperationStream<MemoryOperation> + ?Sized,
        R: OperationStream<RegisterOperation> + ?Sized,
    {
        let view = Rc::new(RefCell::new(view));
        let backlog = Backlog::default();
        let active = Rc::new(Cell::new(true));

        let subscriptions = vec![
            memory.subscribe(Self::handler(
                Rc::downgrade(&view),
                Rc::clone(&backlog),
                Rc::clone(&active),
                MemoryView::apply_memory_operation,
                |operation| Deferred::Memory(operation.clone()),
            )),
            registers.subscribe(Self::handler(
                Rc::downgrade(&view),
                Rc::clone(&backlog),
                Rc::clone(&active),
                MemoryView::apply_register_operation,
                |operation| Deferred::Register(*operation),
            )),
        ];
        log::debug!("memory view attached to operation streams");

        Self {
            view,
            backlog,
            active,
            subscriptions,
        }
    }

    fn handler<T: 'static>(
        view: Weak<RefCell<MemoryView>>,
        backlog: Backlog,
        active: Rc<Cell<bool>>,
        apply: fn(&mut MemoryView, &T),
        defer: fn(&T) -> Deferred,
    ) -> Handler<T> {
        Box::new(move |operation| {
            if !active.get() {
                log::debug!("ignoring operation delivered after dispose");
                return;
            }
            let Some(view) = view.upgrade() else {
                return;
            };
            let borrowed = view.try_borrow_mut();
            if let Ok(mut view) = borrowed {
                drain(&backlog, &mut view);
                apply(&mut view, operation);
            } else {
                log::debug!("view is borrowed; deferring operation");
                backlog.borrow_mut().push_back(defer(operation));
            }
        })
    }

    /// Applies deferred operations when the view is free.
    fn flush(&self) {
        if self.backlog.borrow().is_empty() {
            return;
        }
        if let Ok(mut view) = self.view.try_borrow_mut() {
            drain(&self.backlog, &mut view);
        }
    }

    /// Number of operations waiting for the view to be released.
    #[must_use]
    pub fn deferred_count(&self) -> usize {
        self.backlog.borrow().len()
    }

    /// Returns `true` until the engine is disposed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Stops applying operations and cancels both subscriptions.
    ///
    /// Calling it again does nothing.
    pub fn dispose(&mut self) {
        if !self.active.replace(false) {
            return;
        }
        for subscription in &mut self.subscriptions {
            subscription.unsubscribe();
        }
        log::debug!("memory view detached from operation streams");
    }

    /// Borrows the view for queries, first applying any deferred operations.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a stream handler while an operation is
    /// being applied.
    #[must_use]
    pub fn view(&self) -> Ref<'_, MemoryView> {
        self.flush();
        self.view.borrow()
    }

    /// Borrows the view for display changes and clicks, first applying any
    /// deferred operations.
    ///
    /// # Panics
    ///
    /// Panics when the view is already borrowed.
    #[must_use]
    pub fn view_mut(&self) -> RefMut<'_, MemoryView> {
        let mut view = self.view.borrow_mut();
        drain(&self.backlog, &mut view);
        view
    }

    /// Commits the edit open in pane `view` through `store`.
    ///
    /// The view is not borrowed while `store` runs, so a store that publishes
    /// the resulting memory operation synchronously updates the cell before
    /// this returns.
    ///
    /// # Errors
    ///
    /// Returns the [`EditError`] that was also sent to `notifier`.
    pub fn commit_edit<S, N>(
        &self,
        view: usize,
        text: &str,
        store: &mut S,
        notifier: &mut N,
    ) -> Result<(), EditError>
    where
        S: MemoryStore + ?Sized,
        N: ErrorNotifier + ?Sized,
    {
        let taken = self.view_mut().take_edit(view, text);
        let result = taken.and_then(|(address, value)| {
            store.store_byte(address, value, false)?;
            Ok(address)
        });
        match result {
            Ok(address) => {
                self.view_mut().finish_edit(address);
                Ok(())
            }
            Err(error) => {
                log::debug!("cell edit rejected: {error}");
                notifier.notify_error(&error.to_string());
                Err(error)
            }
        }
    }
}

impl Drop for MemoryViewEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
