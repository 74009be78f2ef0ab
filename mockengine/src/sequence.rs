// vim: tw=80
//! Ordered groups of setups

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::setup::SetupId;

static NEXT_SEQUENCE: AtomicUsize = AtomicUsize::new(0);

/// Used to enforce that calls must happen in the order their setups were
/// registered.
///
/// Setups registered with [`Mock::in_sequence`](crate::Mock::in_sequence)
/// under the same `Sequence` form one ordered group.  Only the earliest
/// unconsumed setup of the group can match a call.  Once it has matched, the
/// next one becomes eligible.
///
/// # Examples
/// ```
/// # use mockengine::*;
/// let mock = Mock::loose("IMyInterface");
/// let seq = Sequence::new();
/// mock.in_sequence(&seq, Setup::call("DoTheThing", args!["B"]).returns(Some("1")));
/// mock.in_sequence(&seq, Setup::call("DoTheThing", args!["A"]).returns(Some("2")));
///
/// // "A" is not next in line, so it doesn't match
/// assert_eq!(mock.invoke::<Option<&str>>("DoTheThing", args!["A"]).unwrap(), None);
/// assert_eq!(mock.invoke::<Option<&str>>("DoTheThing", args!["B"]).unwrap(), Some("1"));
/// assert_eq!(mock.invoke::<Option<&str>>("DoTheThing", args!["A"]).unwrap(), Some("2"));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Sequence(usize);

impl Sequence {
    pub fn new() -> Self {
        Sequence(NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence::new()
    }
}

/// Tracks progress through one [`Sequence`] within one mock.
#[derive(Debug)]
pub(crate) struct SequenceCursor {
    sequence: Sequence,
    members: Vec<SetupId>,
    head: usize,
}

impl SequenceCursor {
    pub(crate) fn new(sequence: Sequence) -> Self {
        SequenceCursor{sequence, members: Vec::new(), head: 0}
    }

    pub(crate) fn sequence(&self) -> Sequence {
        self.sequence
    }

    pub(crate) fn push(&mut self, id: SetupId) {
        self.members.push(id);
    }

    /// The only member currently eligible to match, if any remain.
    pub(crate) fn head(&self) -> Option<SetupId> {
        self.members.get(self.head).copied()
    }

    /// Move on to the next member.  Must only be called after the head
    /// matched.
    pub(crate) fn advance(&mut self) {
        debug_assert!(self.head < self.members.len());
        self.head += 1;
    }

    pub(crate) fn position(&self) -> usize {
        self.head
    }
}
