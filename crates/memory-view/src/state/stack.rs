//! Stack membership tracking derived from stack-pointer deltas.

use rustc_hash::FxHashSet;

use crate::PointerRegister;

/// One of the two hardware stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StackPointer {
    /// Supervisor stack, addressed by `SSP`.
    Supervisor,
    /// User stack, addressed by `USP`.
    User,
}

impl StackPointer {
    /// Maps a canonical register to the stack it addresses, if any.
    #[must_use]
    pub const fn from_register(register: PointerRegister) -> Option<Self> {
        match register {
            PointerRegister::Ssp => Some(Self::Supervisor),
            PointerRegister::Usp => Some(Self::User),
            PointerRegister::A
            | PointerRegister::B
            | PointerRegister::C
            | PointerRegister::D
            | PointerRegister::Ip => None,
        }
    }

    /// Canonical register holding this stack's pointer.
    #[must_use]
    pub const fn register(self) -> PointerRegister {
        match self {
            Self::Supervisor => PointerRegister::Ssp,
            Self::User => PointerRegister::Usp,
        }
    }

}

/// Per-stack sets of addresses currently covered by pushed data.
///
/// Stacks grow toward lower addresses. Membership only changes through
/// [`StackTracker::push`], [`StackTracker::pop`] and [`StackTracker::reset`].
#[derive(Debug, Clone, Default)]
pub struct StackTracker {
    supervisor: FxHashSet<usize>,
    user: FxHashSet<usize>,
}

impl StackTracker {
    /// Creates a tracker with both stacks empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn set(&self, stack: StackPointer) -> &FxHashSet<usize> {
        match stack {
            StackPointer::Supervisor => &self.supervisor,
            StackPointer::User => &self.user,
        }
    }

    fn set_mut(&mut self, stack: StackPointer) -> &mut FxHashSet<usize> {
        match stack {
            StackPointer::Supervisor => &mut self.supervisor,
            StackPointer::User => &mut self.user,
        }
    }

    /// Returns `true` when `address` is a member of `stack`.
    #[must_use]
    pub fn contains(&self, stack: StackPointer, address: usize) -> bool {
        self.set(stack).contains(&address)
    }

    /// Number of stacked addresses in `stack`.
    #[must_use]
    pub fn len(&self, stack: StackPointer) -> usize {
        self.set(stack).len()
    }

    /// Returns `true` when neither stack holds any address.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.supervisor.is_empty() && self.user.is_empty()
    }

    /// Members of `stack`, in ascending address order.
    #[must_use]
    pub fn members(&self, stack: StackPointer) -> Vec<usize> {
        let mut members: Vec<usize> = self.set(stack).iter().copied().collect();
        members.sort_unstable();
        members
    }

    /// Records a push that moved the pointer from `previous` down to `new`.
    ///
    /// Every address in `new + 1 ..= previous` becomes stacked; the new top
    /// itself is not a member. Returns the addresses whose style is dirty.
    /// A pointer that did not move down changes nothing.
    pub fn push(&mut self, stack: StackPointer, previous: u16, new: u16) -> Vec<usize> {
        if new >= previous {
            return Vec::new();
        }
        let covered: Vec<usize> = (usize::from(new) + 1..=usize::from(previous))
            .rev()
            .collect();
        self.set_mut(stack).extend(covered.iter().copied());
        covered
    }

    /// Records a pop that moved the pointer from `previous` up to `new`.
    ///
    /// Every address in `previous + 1 ..= new` stops being stacked. Returns
    /// the addresses whose style is dirty.
    pub fn pop(&mut self, stack: StackPointer, previous: u16, new: u16) -> Vec<usize> {
        if new <= previous {
            return Vec::new();
        }
        let released: Vec<usize> = (usize::from(previous) + 1..=usize::from(new)).collect();
        let set = self.set_mut(stack);
        for address in &released {
            set.remove(address);
        }
        released
    }

    /// Empties both stacks and returns every address that was a member.
    pub fn reset(&mut self) -> Vec<usize> {
        let mut flushed: Vec<usize> = self.supervisor.drain().collect();
        flushed.extend(self.user.drain());
        flushed.sort_unstable();
        flushed.dedup();
        flushed
    }
}
