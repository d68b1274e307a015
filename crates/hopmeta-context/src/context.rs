use std::fmt;
use std::sync::Arc;

use hopmeta_chain::Chain;

use crate::backward::BackwardValues;
use crate::transit::TransitStore;

/// Everything a context carries. Frames are immutable once wrapped in an
/// `Arc`; deriving a context clones the frame (a handful of pointers) and
/// replaces one part.
#[derive(Clone, Default)]
pub(crate) struct Frame {
    pub(crate) transit: TransitStore,
    pub(crate) persistent: Chain,
    pub(crate) recv: Option<Arc<BackwardValues>>,
    pub(crate) send: Option<Arc<BackwardValues>>,
}

/// An immutable, request-scoped metadata context.
///
/// A `Context` is cheap to clone and safe to share between threads. Every
/// write returns a new context derived from the receiver; the receiver and
/// every other context derived from it are left unchanged. The only state
/// shared between a context and its descendants is the pair of backward
/// containers, which are reached by reference and guarded by a lock.
///
/// ```
/// use hopmeta_context::Context;
///
/// let ctx = Context::background().with_value("tenant", "acme");
/// let next = ctx.transfer_forward();
/// assert_eq!(next.get_value("tenant"), Some("acme"));
/// assert_eq!(next.transfer_forward().get_value("tenant"), None);
/// ```
#[derive(Clone, Default)]
pub struct Context {
    frame: Arc<Frame>,
}

impl Context {
    /// The empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns `true` if `a` and `b` are the same context value, not merely
    /// equal ones.
    pub fn ptr_eq(a: &Context, b: &Context) -> bool {
        Arc::ptr_eq(&a.frame, &b.frame)
    }

    pub(crate) fn frame(&self) -> &Frame {
        &self.frame
    }

    pub(crate) fn derive<F>(&self, update: F) -> Context
    where
        F: FnOnce(&mut Frame),
    {
        let mut frame = Frame::clone(&self.frame);
        update(&mut frame);
        Context {
            frame: Arc::new(frame),
        }
    }

    /// Derive a context with a new transit store, or return `self` if the
    /// write did not produce a new layer.
    pub(crate) fn with_transit(&self, transit: TransitStore) -> Context {
        if TransitStore::ptr_eq(&self.frame.transit, &transit) {
            return self.clone();
        }
        self.derive(|f| f.transit = transit)
    }

    pub(crate) fn with_persistent(&self, persistent: Chain) -> Context {
        if Chain::ptr_eq(&self.frame.persistent, &persistent) {
            return self.clone();
        }
        self.derive(|f| f.persistent = persistent)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("transit", &self.frame.transit)
            .field("persistent", &self.frame.persistent)
            .field("recv", &self.frame.recv.is_some())
            .field("send", &self.frame.send.is_some())
            .finish()
    }
}
