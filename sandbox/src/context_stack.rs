//! Per-thread stack of active contract invocations.
//!
//! A nested call from a contract re-enters the sandbox on the same thread, so
//! invocations form a stack. Each invocation pushes a [`Frame`] before
//! instantiation and the returned [`FrameGuard`] pops it when dropped, on every
//! exit path. Host functions never consult this stack to find their
//! interface; the store hands it to them directly. The stack tracks nesting
//! depth and identifies the innermost invocation for diagnostics.

use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// One active invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Zero for a top-level invocation.
    pub depth: usize,
    /// Gas available when the invocation began.
    pub gas_limit: u64,
}

/// Pops its frame when dropped. Not `Send`: the frame lives on this thread.
#[must_use = "the frame is popped as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FrameGuard {
    depth: usize,
    _thread_bound: PhantomData<*const ()>,
}

impl FrameGuard {
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Push a frame for a new invocation on the current thread.
pub fn push(gas_limit: u64) -> FrameGuard {
    FRAMES.with(|frames| {
        let mut frames = frames.borrow_mut();
        let depth = frames.len();
        frames.push(Frame { depth, gas_limit });
        FrameGuard {
            depth,
            _thread_bound: PhantomData,
        }
    })
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        // try_with: the thread-local may already be gone during thread exit.
        let _ = FRAMES.try_with(|frames| {
            let mut frames = frames.borrow_mut();
            debug_assert_eq!(frames.len(), self.depth + 1, "frames released out of order");
            frames.truncate(self.depth);
        });
    }
}

/// Number of active invocations on this thread.
pub fn depth() -> usize {
    FRAMES.with(|frames| frames.borrow().len())
}

/// The innermost active invocation, if any.
pub fn top() -> Option<Frame> {
    FRAMES.with(|frames| frames.borrow().last().copied())
}
