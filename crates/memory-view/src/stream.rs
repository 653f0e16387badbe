//! Single-threaded publish/subscribe plumbing for operation streams.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked for every published item.
pub type Handler<T> = Box<dyn FnMut(&T)>;

/// Source of operations a view can subscribe to.
pub trait OperationStream<T> {
    /// Registers `handler`; it receives every item published until the
    /// returned [`Subscription`] is cancelled.
    fn subscribe(&self, handler: Handler<T>) -> Subscription;
}

/// Handle to a live subscription.
///
/// Dropping the handle does not cancel the subscription; call
/// [`Subscription::unsubscribe`].
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Creates a handle that runs `cancel` on the first unsubscribe.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancels the subscription. Calling it again does nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Returns `true` until [`Subscription::unsubscribe`] has run.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

type SharedHandler<T> = Rc<RefCell<Handler<T>>>;

struct Subscribers<T> {
    next_id: u64,
    handlers: Vec<(u64, SharedHandler<T>)>,
}

/// In-process stream that delivers published items synchronously, in
/// subscription order.
pub struct OperationBus<T> {
    subscribers: Rc<RefCell<Subscribers<T>>>,
    pending: RefCell<VecDeque<T>>,
    dispatching: Cell<bool>,
}

impl<T> OperationBus<T> {
    /// Creates a bus without subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Subscribers {
                next_id: 0,
                handlers: Vec::new(),
            })),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().handlers.len()
    }

    fn deliver(&self, item: &T) -> usize {
        let handlers: Vec<SharedHandler<T>> = self
            .subscribers
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        let mut delivered = 0;
        for handler in handlers {
            if let Ok(mut handler) = handler.try_borrow_mut() {
                handler(item);
                delivered += 1;
            } else {
                log::warn!("skipping re-entrant delivery to a busy subscriber");
            }
        }
        delivered
    }
}

impl<T: Clone> OperationBus<T> {
    /// Delivers `item` to every subscriber and returns how many received it.
    ///
    /// Handlers may subscribe, unsubscribe or publish while being called.
    /// Items published from inside a handler are queued and delivered in
    /// order once the current item has reached every subscriber; such nested
    /// calls return `0`.
    pub fn publish(&self, item: &T) -> usize {
        if self.dispatching.replace(true) {
            log::trace!("queueing item published during delivery");
            self.pending.borrow_mut().push_back(item.clone());
            return 0;
        }

        let delivered = self.deliver(item);
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(next) = next else {
                break;
            };
            self.deliver(&next);
        }
        self.dispatching.set(false);
        delivered
    }
}

impl<T> Default for OperationBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for OperationBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T: 'static> OperationStream<T> for OperationBus<T> {
    fn subscribe(&self, handler: Handler<T>) -> Subscription {
        let id = {
            let mut subscribers = self.subscribers.borrow_mut();
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers
                .handlers
                .push((id, Rc::new(RefCell::new(handler))));
            id
        };

        let subscribers: Weak<RefCell<Subscribers<T>>> = Rc::downgrade(&self.subscribers);
        Subscription::new(move || {
            if let Some(subscribers) = subscribers.upgrade() {
                subscribers
                    .borrow_mut()
                    .handlers
                    .retain(|(handler_id, _)| *handler_id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{OperationBus, OperationStream};

    #[test]
    fn delivers_in_subscription_order() {
        let bus = OperationBus::<u8>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        let _a = bus.subscribe(Box::new(move |item| first.borrow_mut().push(("a", *item))));
        let second = Rc::clone(&seen);
        let _b = bus.subscribe(Box::new(move |item| second.borrow_mut().push(("b", *item))));

        assert_eq!(bus.publish(&7), 2);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let bus = OperationBus::<u8>::new();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let mut subscription = bus.subscribe(Box::new(move |_| *counter.borrow_mut() += 1));

        bus.publish(&1);
        subscription.unsubscribe();
        subscription.unsubscribe();
        bus.publish(&2);

        assert!(!subscription.is_active());
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn unsubscribe_after_bus_dropped_is_harmless() {
        let bus = OperationBus::<u8>::new();
        let mut subscription = bus.subscribe(Box::new(|_| {}));
        drop(bus);
        subscription.unsubscribe();
        assert!(!subscription.is_active());
    }

    #[test]
    fn nested_publish_is_delivered_after_the_current_item() {
        let bus = Rc::new(OperationBus::<u8>::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner_bus = Rc::clone(&bus);
        let inner_seen = Rc::clone(&seen);
        let _first = bus.subscribe(Box::new(move |item| {
            inner_seen.borrow_mut().push(("a", *item));
            if *item == 1 {
                assert_eq!(inner_bus.publish(&2), 0);
                assert_eq!(inner_bus.publish(&3), 0);
            }
        }));
        let second_seen = Rc::clone(&seen);
        let _second = bus.subscribe(Box::new(move |item| {
            second_seen.borrow_mut().push(("b", *item));
        }));

        assert_eq!(bus.publish(&1), 2);
        assert_eq!(
            *seen.borrow(),
            vec![("a", 1), ("b", 1), ("a", 2), ("b", 2), ("a", 3), ("b", 3)]
        );
        assert_eq!(bus.publish(&4), 2);
    }
}
