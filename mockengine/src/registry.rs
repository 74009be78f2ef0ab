// vim: tw=80
//! Storage and resolution of a mock's setups

use tracing::{debug, trace};

use crate::{
    arg::Arg,
    sequence::{Sequence, SequenceCursor},
    setup::{Callback, Exhaustion, Matcher, Response, ResponseQueue, Setup, SetupId},
};

/// A registered setup and its bookkeeping.
pub(crate) struct Entry {
    id: SetupId,
    matcher: Matcher,
    queue: ResponseQueue,
    callbacks: Vec<Callback>,
    verifiable: bool,
    match_count: usize,
    verified: bool,
    superseded: bool,
}

impl Entry {
    /// `Type x => x.Method(args)`
    pub(crate) fn describe(&self, type_name: &str) -> String {
        format!("{} {}", type_name, self.matcher.describe())
    }

    fn is_live(&self) -> bool {
        !self.superseded
    }

    fn respond(&mut self, args: &[Arg]) -> Option<Response> {
        self.match_count += 1;
        for cb in self.callbacks.iter_mut() {
            cb(args);
        }
        self.queue.next(args)
    }
}

/// Outcome of [`SetupRegistry::resolve`].
pub(crate) enum MatchResult {
    /// The call matched a setup.  A `None` response means the setup had
    /// nothing queued, so the caller gets its default value.
    Matched(SetupId, Option<Response>),
    Unmatched,
}

/// Owns every setup of one mock.
///
/// Unordered setups live in a pool of slots.  Registering a setup whose
/// matcher is structurally equal to a live pool member replaces that member in
/// its slot; the old setup is superseded for good.  Sequenced setups are never
/// superseded; they are reached only through their group's cursor.
#[derive(Default)]
pub(crate) struct SetupRegistry {
    /// Every setup ever registered, indexed by `SetupId`
    entries: Vec<Entry>,
    /// Live unordered setups
    pool: Vec<SetupId>,
    /// One per sequence, in order of first use
    cursors: Vec<SequenceCursor>,
}

impl SetupRegistry {
    pub(crate) fn register(&mut self, setup: Setup, sequence: Option<Sequence>,
                           exhaustion: Exhaustion) -> SetupId
    {
        let id = SetupId(self.entries.len());
        let (matcher, queue, callbacks, verifiable) = setup.into_parts(exhaustion);
        let entry = Entry {
            id,
            matcher,
            queue,
            callbacks,
            verifiable,
            match_count: 0,
            verified: false,
            superseded: false,
        };
        debug!("registering setup {:?} in {:?}: {:?}", id, sequence, entry.matcher);
        match sequence {
            None => {
                let slot = self.pool.iter()
                    .position(|old| self.entries[old.0].matcher.same_as(&entry.matcher));
                match slot {
                    Some(i) => {
                        let old = self.pool[i];
                        debug!("setup {:?} overrides setup {:?}", id, old);
                        self.entries[old.0].superseded = true;
                        self.pool[i] = id;
                    },
                    None => self.pool.push(id)
                }
            },
            Some(seq) => {
                let i = match self.cursors.iter()
                    .position(|c| c.sequence() == seq)
                {
                    Some(i) => i,
                    None => {
                        self.cursors.push(SequenceCursor::new(seq));
                        self.cursors.len() - 1
                    }
                };
                self.cursors[i].push(id);
            }
        }
        self.entries.push(entry);
        id
    }

    /// Find the setup that a call to `method` with `args` belongs to, and
    /// produce its response.
    ///
    /// Sequence heads are consulted before the unordered pool.  Members behind
    /// a head are never consulted at all.  If several pool setups accept the
    /// call, the most recently registered one wins.
    pub(crate) fn resolve(&mut self, method: &str, args: &[Arg]) -> MatchResult {
        let entries = &mut self.entries;
        for cursor in self.cursors.iter_mut() {
            let Some(head) = cursor.head() else { continue };
            if entries[head.0].matcher.matches(method, args) {
                cursor.advance();
                trace!("{} matched setup {:?}, sequence position {}",
                    method, head, cursor.position());
                let response = entries[head.0].respond(args);
                return MatchResult::Matched(head, response);
            }
        }
        // Newest registration wins among overlapping pool setups
        let found = self.pool.iter()
            .copied()
            .filter(|id| entries[id.0].matcher.matches(method, args))
            .max();
        match found {
            Some(id) => {
                trace!("{} matched setup {:?}", method, id);
                let response = entries[id.0].respond(args);
                MatchResult::Matched(id, response)
            },
            None => MatchResult::Unmatched
        }
    }

    /// Live setups, in registration order.
    fn live(&self) -> impl Iterator<Item=&Entry> {
        self.entries.iter().filter(|e| e.is_live())
    }

    /// Live setups subject to verification that have never matched.  With
    /// `all`, every live setup is subject to verification.
    pub(crate) fn unmatched(&self, all: bool) -> impl Iterator<Item=&Entry> {
        self.live()
            .filter(move |e| all || e.verifiable)
            .filter(|e| e.match_count == 0)
    }

    /// Flag every matched setup subject to verification as verified, and
    /// return their ids.
    pub(crate) fn mark_verified(&mut self, all: bool) -> Vec<SetupId> {
        self.entries.iter_mut()
            .filter(|e| e.is_live() && (all || e.verifiable))
            .filter(|e| e.match_count > 0)
            .map(|e| {
                e.verified = true;
                e.id
            }).collect()
    }

    /// How many calls resolved to `id`, or `None` if it has been superseded.
    pub(crate) fn match_count(&self, id: SetupId) -> Option<usize> {
        self.entries.get(id.0)
            .filter(|e| e.is_live())
            .map(|e| e.match_count)
    }

    /// Has a verification pass accounted for `id`?
    pub(crate) fn is_verified(&self, id: SetupId) -> bool {
        self.entries.get(id.0).is_some_and(|e| e.verified)
    }
}
