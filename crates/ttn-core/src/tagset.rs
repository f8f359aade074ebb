//! Tag sets attached to tensors.

use std::collections::BTreeSet;
use std::sync::Arc;

/// Sorted set of string tags.
///
/// The storage is wrapped in an `Arc`, so cloning is a reference count
/// increment. Mutation clones the underlying set only if it is shared, which
/// keeps copies of a network independent of each other.
///
/// # Example
/// ```
/// use ttn_core::TagSet;
///
/// let mut tags = TagSet::from_tags(["_LAYER0", "I1", "I0"]);
/// assert!(tags.has_tag("I0"));
/// assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["I0", "I1", "_LAYER0"]);
///
/// let copy = tags.clone();
/// tags.add_tag("I2");
/// assert!(!copy.has_tag("I2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct TagSet(Arc<BTreeSet<String>>);

impl TagSet {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tag set from any collection of tags.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Arc::new(tags.into_iter().map(Into::into).collect()))
    }

    /// Check if a tag is present.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Add a tag. Returns true if the tag was not present before.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        Arc::make_mut(&mut self.0).insert(tag.to_string())
    }

    /// Get the number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the tag set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_tags(iter)
    }
}
