// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallvec::SmallVec;
use strum_macros::AsRefStr;

/// One destination a write request can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum TargetStream {
    /// The process standard output stream.
    StdOut,
    /// The process standard error stream.
    StdErr,
    /// A sink that performs no I/O. Useful for silencing a request without
    /// changing the code that produces it.
    Suppressed,
}

impl TargetStream {
    /// Position of this stream in the canonical dispatch order.
    fn rank(self) -> u8 {
        match self {
            TargetStream::StdOut => 0,
            TargetStream::StdErr => 1,
            TargetStream::Suppressed => 2,
        }
    }
}

/// The set of [`TargetStream`]s one write request goes to.
///
/// This is a set, not a list: inserting a stream twice has no effect, and
/// iteration order is always the canonical dispatch order (`StdOut`,
/// `StdErr`, `Suppressed`) regardless of insertion order. Backed by an
/// inline [`SmallVec`] since there are at most 3 members, so no heap
/// allocation ever happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    items: SmallVec<[TargetStream; 3]>,
}

impl Default for TargetSet {
    /// The default destination for a write request is `stdout` alone.
    fn default() -> Self { Self::from(TargetStream::StdOut) }
}

impl TargetSet {
    /// An empty set. Note that a request constructed with an empty set is
    /// re-targeted to [`TargetSet::default`]; see
    /// [`crate::OutputContext::from_text`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn of(streams: impl IntoIterator<Item = TargetStream>) -> Self {
        let mut acc = Self::new();
        for stream in streams {
            acc.insert(stream);
        }
        acc
    }

    pub fn insert(&mut self, stream: TargetStream) {
        if self.contains(stream) {
            return;
        }
        self.items.push(stream);
        self.items.sort_unstable_by_key(|item| item.rank());
    }

    #[must_use]
    pub fn contains(&self, stream: TargetStream) -> bool { self.items.contains(&stream) }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.items.len() }

    pub fn iter(&self) -> impl Iterator<Item = TargetStream> + '_ {
        self.items.iter().copied()
    }
}

impl From<TargetStream> for TargetSet {
    fn from(stream: TargetStream) -> Self {
        let mut acc = Self::new();
        acc.insert(stream);
        acc
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = TargetStream;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, TargetStream>>;

    fn into_iter(self) -> Self::IntoIter { self.items.iter().copied() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_is_stdout_only() {
        let set = TargetSet::default();
        assert!(set.contains(TargetStream::StdOut));
        assert!(!set.contains(TargetStream::StdErr));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = TargetSet::new();
        set.insert(TargetStream::StdErr);
        set.insert(TargetStream::StdErr);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iteration_order_is_canonical() {
        let reversed = TargetSet::of([
            TargetStream::Suppressed,
            TargetStream::StdErr,
            TargetStream::StdOut,
        ]);
        let in_order = TargetSet::of([
            TargetStream::StdOut,
            TargetStream::StdErr,
            TargetStream::Suppressed,
        ]);
        assert_eq!(reversed, in_order);
        assert_eq!(
            reversed.iter().collect::<Vec<_>>(),
            vec![
                TargetStream::StdOut,
                TargetStream::StdErr,
                TargetStream::Suppressed
            ]
        );
    }

    #[test]
    fn test_empty_set_is_empty() {
        let set = TargetSet::new();
        assert!(set.is_empty());
    }
}
