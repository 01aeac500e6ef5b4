/// Frame callbacks and pointer listeners with cancellable handles.
///
/// Everything runs on one thread: a view registers closures that share its
/// state through `Rc<RefCell<_>>`, keeps the returned handles, and cancels
/// them when it is torn down so nothing writes into a dead view.
use std::time::Duration;

use nalgebra::Point2;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a registered callback
    pub struct CallbackId;
}

/// What a callback wants after it has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

type Callback<E> = Box<dyn FnMut(&E) -> Flow>;

/// Registry of callbacks for one event type
pub struct Dispatcher<E> {
    callbacks: SlotMap<CallbackId, Callback<E>>,
}

impl<E> Dispatcher<E> {
    pub fn new() -> Self {
        Self {
            callbacks: SlotMap::with_key(),
        }
    }

    pub fn subscribe<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&E) -> Flow + 'static,
    {
        self.callbacks.insert(Box::new(callback))
    }

    /// Remove a callback. Returns false if it was already gone.
    pub fn cancel(&mut self, id: CallbackId) -> bool {
        self.callbacks.remove(id).is_some()
    }

    pub fn is_registered(&self, id: CallbackId) -> bool {
        self.callbacks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Run every callback once; those returning [`Flow::Stop`] are dropped
    pub fn dispatch(&mut self, event: &E) {
        self.callbacks
            .retain(|_, callback| callback(event) == Flow::Continue);
    }
}

impl<E> Default for Dispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// One display frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Time since the frame clock started
    pub now: Duration,
    pub frame: u64,
}

/// Pointer input in element-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point2<f64> },
    Move { position: Point2<f64> },
    Up { position: Point2<f64>, now: Duration },
    Leave,
}

pub type FrameScheduler = Dispatcher<FrameTick>;
pub type PointerListeners = Dispatcher<PointerEvent>;

/// Handles owned by a mounted view
#[derive(Debug, Default)]
pub struct Mount {
    frame: Option<CallbackId>,
    pointer: Option<CallbackId>,
}

impl Mount {
    pub fn new(frame: CallbackId, pointer: CallbackId) -> Self {
        Self {
            frame: Some(frame),
            pointer: Some(pointer),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.frame.is_some() || self.pointer.is_some()
    }

    /// Cancel the frame callback and pointer listener together.
    /// Safe to call more than once.
    pub fn unmount(&mut self, frames: &mut FrameScheduler, pointers: &mut PointerListeners) {
        if let Some(id) = self.frame.take() {
            frames.cancel(id);
        }
        if let Some(id) = self.pointer.take() {
            pointers.cancel(id);
        }
        tracing::trace!("view unmounted");
    }
}
