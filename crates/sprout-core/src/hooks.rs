//! Hook store
//!
//! Component state lives in hook cells matched by call position. Every cell
//! at one position of one fiber lineage shares a [`StateSlot`]; setters push
//! actions onto the slot, so an action always reaches whichever cell is
//! committed when the next render reads it.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::Element;

type Action = Rc<dyn Fn(&dyn Any) -> Option<Rc<dyn Any>>>;

/// Pending actions for one hook position
#[derive(Default)]
pub(crate) struct StateSlot {
    queue: RefCell<Vec<Action>>,
}

impl StateSlot {
    fn push(&self, action: Action) {
        self.queue.borrow_mut().push(action);
    }

    /// Apply queued actions from `from` onwards to `state`.
    ///
    /// The queue is left intact: a render that gets discarded must not lose
    /// updates. Returns the new state and how many actions it covers.
    fn fold(&self, mut state: Rc<dyn Any>, from: usize) -> (Rc<dyn Any>, usize) {
        let pending: Vec<Action> = {
            let queue = self.queue.borrow();
            queue.iter().skip(from).cloned().collect()
        };
        for action in &pending {
            if let Some(next) = action(&*state) {
                state = next;
            }
        }
        (state, from + pending.len())
    }

    /// Drop the first `applied` actions
    fn compact(&self, applied: usize) {
        let mut queue = self.queue.borrow_mut();
        let applied = applied.min(queue.len());
        queue.drain(..applied);
    }

    fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

/// State recorded by one `use_state` call of one render
#[derive(Clone)]
pub(crate) struct HookCell {
    slot: Rc<StateSlot>,
    state: Rc<dyn Any>,
    applied: usize,
}

impl HookCell {
    fn fresh(state: Rc<dyn Any>) -> Self {
        Self {
            slot: Rc::default(),
            state,
            applied: 0,
        }
    }

    /// Called when the owning fiber is committed
    pub(crate) fn settle(&mut self) {
        self.slot.compact(self.applied);
        self.applied = 0;
    }
}

impl fmt::Debug for HookCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookCell")
            .field("applied", &self.applied)
            .field("queued", &self.slot.pending())
            .finish()
    }
}

/// Re-render requests raised by setters, consumed by the work loop
#[derive(Debug, Clone, Default)]
pub(crate) struct RerenderSignal(Rc<Cell<u64>>);

impl RerenderSignal {
    fn request(&self) {
        self.0.set(self.0.get() + 1);
    }

    /// Number of requests since the last call
    pub(crate) fn take(&self) -> u64 {
        self.0.replace(0)
    }

    pub(crate) fn pending(&self) -> bool {
        self.0.get() > 0
    }
}

/// Per-render context handed to a component
pub struct RenderScope<'a> {
    component: &'a str,
    previous: &'a [HookCell],
    hooks: Vec<HookCell>,
    signal: &'a RerenderSignal,
    children: &'a [Element],
}

impl<'a> RenderScope<'a> {
    pub(crate) fn new(
        component: &'a str,
        previous: &'a [HookCell],
        signal: &'a RerenderSignal,
        children: &'a [Element],
    ) -> Self {
        Self {
            component,
            previous,
            hooks: Vec::with_capacity(previous.len()),
            signal,
            children,
        }
    }

    /// Children passed to the component element
    pub fn children(&self) -> &[Element] {
        self.children
    }

    /// Position of the next hook call
    pub fn hook_index(&self) -> usize {
        self.hooks.len()
    }

    /// State that persists across renders of this component.
    ///
    /// Hooks are matched by call order, so a component must call `use_state`
    /// the same number of times, in the same order, on every render.
    pub fn use_state<T: Clone + 'static>(&mut self, initial: T) -> (T, SetState<T>) {
        let index = self.hooks.len();
        let mut cell = match self.previous.get(index) {
            Some(old) => {
                let (state, applied) = old.slot.fold(Rc::clone(&old.state), old.applied);
                HookCell {
                    slot: Rc::clone(&old.slot),
                    state,
                    applied,
                }
            }
            None => HookCell::fresh(Rc::new(initial.clone())),
        };

        let value = match cell.state.downcast_ref::<T>() {
            Some(value) => value.clone(),
            None => {
                tracing::warn!(
                    "Hook #{} of <{}> changed type between renders; resetting it",
                    index,
                    self.component
                );
                cell = HookCell::fresh(Rc::new(initial.clone()));
                initial
            }
        };

        let setter = SetState {
            slot: Rc::clone(&cell.slot),
            signal: self.signal.clone(),
            _marker: PhantomData,
        };
        self.hooks.push(cell);
        (value, setter)
    }

    pub(crate) fn finish(self) -> Vec<HookCell> {
        self.hooks
    }
}

/// State setter returned by [`RenderScope::use_state`]
pub struct SetState<T> {
    slot: Rc<StateSlot>,
    signal: RerenderSignal,
    _marker: PhantomData<fn(T)>,
}

impl<T: 'static> SetState<T> {
    /// Queue `f` and request a re-render from the committed tree
    pub fn update(&self, f: impl Fn(&T) -> T + 'static) {
        let action: Action = Rc::new(move |state: &dyn Any| {
            state.downcast_ref::<T>().map(|value| Rc::new(f(value)) as Rc<dyn Any>)
        });
        self.slot.push(action);
        self.signal.request();
    }

    /// Queue a replacement value
    pub fn set(&self, value: T)
    where
        T: Clone,
    {
        self.update(move |_| value.clone());
    }
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
            signal: self.signal.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState")
            .field("queued", &self.slot.pending())
            .finish()
    }
}
