/// A single key decision recorded in a [`Layer`](crate::Chain).
///
/// An entry either binds `key` to a value or, when `value` is `None`, is a
/// tombstone that masks every older entry for the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    key: String,
    value: Option<String>,
}

impl Entry {
    /// Create a value entry. Returns `None` if either side is empty.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let value = value.into();
        if key.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self {
            key,
            value: Some(value),
        })
    }

    /// Create a tombstone for `key`. Returns `None` if the key is empty.
    pub fn tombstone(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.is_empty() {
            return None;
        }
        Some(Self { key, value: None })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The bound value, or `None` for a tombstone.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }
}
