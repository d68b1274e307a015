use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::context::Context;

/// Which of the two backward containers an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Values a callee reported back to this context.
    Recv,
    /// Values this context will report back to its caller.
    Send,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Recv => f.write_str("recv"),
            Direction::Send => f.write_str("send"),
        }
    }
}

/// Lock-protected map shared by every context derived after installation.
///
/// Writes keep the latest value per key. Reads hand out owned copies, so a
/// snapshot never aliases the live map.
#[derive(Debug, Default)]
pub struct BackwardValues {
    values: Mutex<HashMap<String, String>>,
}

impl BackwardValues {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half-written
    // (every mutation is a single insert), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store one pair; pairs with an empty side are ignored.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        if key.is_empty() || value.is_empty() {
            return;
        }
        self.lock().insert(key, value);
    }

    /// Store every pair under a single lock acquisition.
    pub fn set_many<I, K, V>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .collect();
        if pairs.is_empty() {
            return;
        }
        self.lock().extend(pairs);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Owned copy of the current contents.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Context {
    fn backward(&self, direction: Direction) -> Option<&Arc<BackwardValues>> {
        match direction {
            Direction::Recv => self.frame().recv.as_ref(),
            Direction::Send => self.frame().send.as_ref(),
        }
    }

    fn install_backward(&self, direction: Direction) -> Context {
        if self.backward(direction).is_some() {
            return self.clone();
        }
        debug!(%direction, "installing backward container");
        let values = Some(Arc::new(BackwardValues::new()));
        self.derive(|frame| match direction {
            Direction::Recv => frame.recv = values,
            Direction::Send => frame.send = values,
        })
    }

    fn write_backward<F>(&self, direction: Direction, write: F) -> bool
    where
        F: FnOnce(&BackwardValues),
    {
        match self.backward(direction) {
            Some(values) => {
                write(values);
                true
            }
            None => {
                debug!(%direction, "no backward container installed; values dropped");
                false
            }
        }
    }

    fn read_backward(&self, direction: Direction, key: &str) -> Option<String> {
        self.backward(direction).and_then(|values| values.get(key))
    }

    fn snapshot_backward(&self, direction: Direction) -> HashMap<String, String> {
        self.backward(direction)
            .map(|values| values.snapshot())
            .unwrap_or_default()
    }

    /// Returns `true` if a container for `direction` is reachable.
    pub fn has_backward_values(&self, direction: Direction) -> bool {
        self.backward(direction).is_some()
    }

    /// Install the container that receives values sent back by callees.
    ///
    /// If one is already reachable the identical context is returned, so
    /// every context of the tree keeps writing into the same container.
    pub fn with_backward_values(&self) -> Context {
        self.install_backward(Direction::Recv)
    }

    /// Install the container whose contents the transport sends back to the
    /// caller when this call returns.
    pub fn with_backward_values_to_send(&self) -> Context {
        self.install_backward(Direction::Send)
    }

    /// Record a value received from a callee. Returns `false`, storing
    /// nothing, when no receive container is installed.
    pub fn set_backward_value(&self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.write_backward(Direction::Recv, |values| values.set(key, value))
    }

    pub fn set_backward_values<I, K, V>(&self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.write_backward(Direction::Recv, |values| values.set_many(pairs))
    }

    pub fn set_backward_values_from_map(&self, map: &HashMap<String, String>) -> bool {
        self.set_backward_values(map.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn get_backward_value(&self, key: &str) -> Option<String> {
        self.read_backward(Direction::Recv, key)
    }

    pub fn get_all_backward_values(&self) -> HashMap<String, String> {
        self.snapshot_backward(Direction::Recv)
    }

    /// Same container as [`get_backward_value`](Self::get_backward_value).
    pub fn recv_backward_value(&self, key: &str) -> Option<String> {
        self.read_backward(Direction::Recv, key)
    }

    pub fn recv_all_backward_values(&self) -> HashMap<String, String> {
        self.snapshot_backward(Direction::Recv)
    }

    /// Queue a value for the caller. Returns `false`, storing nothing, when
    /// no send container is installed.
    pub fn send_backward_value(&self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.write_backward(Direction::Send, |values| values.set(key, value))
    }

    pub fn send_backward_values<I, K, V>(&self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.write_backward(Direction::Send, |values| values.set_many(pairs))
    }

    pub fn send_backward_values_from_map(&self, map: &HashMap<String, String>) -> bool {
        self.send_backward_values(map.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Snapshot of everything queued for the caller.
    pub fn all_backward_values_to_send(&self) -> HashMap<String, String> {
        self.snapshot_backward(Direction::Send)
    }
}
