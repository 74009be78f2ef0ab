// vim: tw=80
//! The mock object itself

use std::{
    any,
    sync::{
        Mutex,
        MutexGuard,
        PoisonError,
        atomic::{AtomicUsize, Ordering}
    }
};
use tracing::debug;

use crate::{
    arg::Arg,
    error::{FailureKind, InvocationFailure, VerificationFailure, Violation},
    invocation::{Invocation, InvocationLog, Resolution},
    registry::{MatchResult, SetupRegistry},
    sequence::Sequence,
    setup::{Exhaustion, Matcher, Setup, SetupId},
    times::Times,
};

static NEXT_MOCK: AtomicUsize = AtomicUsize::new(1);

/// How a mock treats calls that no setup accepts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Behavior {
    /// Fail the call immediately.
    Strict,
    /// Record the call and return the default value.
    #[default]
    Loose,
}

struct State {
    registry: SetupRegistry,
    log: InvocationLog,
}

/// A test double for one interface.
///
/// A test registers [`Setup`]s, simulates calls with
/// [`invoke`](#method.invoke), and finally checks the call history with
/// [`verify`](#method.verify) and
/// [`verify_no_other_calls`](#method.verify_no_other_calls).
///
/// All state lives behind a single `Mutex`, so a `Mock` can be shared between
/// threads.  Each operation is one critical section.  Calls are still matched
/// in the order they acquire the lock, so concurrent callers should not rely
/// on sequences.  Callbacks and response closures run while the lock is held
/// and must not call back into the same mock.
pub struct Mock {
    type_name: String,
    instance: usize,
    behavior: Behavior,
    state: Mutex<State>,
}

impl Mock {
    /// Create a mock of the interface named `type_name`.  The name only
    /// appears in diagnostics.
    pub fn new<S: Into<String>>(type_name: S, behavior: Behavior) -> Self {
        let state = State {
            registry: SetupRegistry::default(),
            log: InvocationLog::default(),
        };
        Mock {
            type_name: type_name.into(),
            instance: NEXT_MOCK.fetch_add(1, Ordering::Relaxed),
            behavior,
            state: Mutex::new(state),
        }
    }

    /// Shortcut for `Mock::new(type_name, Behavior::Strict)`
    pub fn strict<S: Into<String>>(type_name: S) -> Self {
        Mock::new(type_name, Behavior::Strict)
    }

    /// Shortcut for `Mock::new(type_name, Behavior::Loose)`
    pub fn loose<S: Into<String>>(type_name: S) -> Self {
        Mock::new(type_name, Behavior::Loose)
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// This mock's identity as printed in verification failures, like
    /// `Mock<IMyInterface:3>`.
    pub fn name(&self) -> String {
        format!("Mock<{}:{}>", self.type_name, self.instance)
    }

    // A panic inside a user's response closure must not wedge the mock
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an unordered setup.
    ///
    /// If a live unordered setup has the same method and equal literal
    /// arguments, the new one replaces it for good.  The old one will neither
    /// match calls nor be reported by [`verify`](#method.verify).
    ///
    /// The setup's last response is repeated once the others are used up.
    pub fn setup(&self, setup: Setup) -> SetupId {
        self.lock().registry.register(setup, None, Exhaustion::RepeatLast)
    }

    /// Register an unordered setup whose responses are each given once, in
    /// order.  After that, matching calls get the default value.
    ///
    /// # Examples
    /// ```
    /// # use mockengine::*;
    /// let mock = Mock::strict("IMyInterface");
    /// mock.setup_sequence(Setup::call("DoTheThing", args!["A"])
    ///     .returns(1u32)
    ///     .returns(2u32));
    /// assert_eq!(mock.invoke::<u32>("DoTheThing", args!["A"]), Ok(1));
    /// assert_eq!(mock.invoke::<u32>("DoTheThing", args!["A"]), Ok(2));
    /// assert_eq!(mock.invoke::<u32>("DoTheThing", args!["A"]), Ok(0));
    /// ```
    pub fn setup_sequence(&self, setup: Setup) -> SetupId {
        self.lock().registry.register(setup, None, Exhaustion::Default)
    }

    /// Register a setup as the next member of `seq`.  It can only match once
    /// every earlier member of `seq` has matched, and it matches only once.
    pub fn in_sequence(&self, seq: &Sequence, setup: Setup) -> SetupId {
        self.lock().registry.register(setup, Some(*seq), Exhaustion::RepeatLast)
    }

    /// Simulate a call of `method` with `args`, declared to return `R`.
    ///
    /// Returns the matched setup's response, or `R::default()` if the setup
    /// has none left.  An unmatched call is recorded either way; a Strict mock
    /// then fails it, a Loose mock returns `R::default()`.
    ///
    /// # Panics
    ///
    /// If the matched setup's response is not an `R`.
    pub fn invoke<R>(&self, method: &str, args: Vec<Arg>)
        -> Result<R, InvocationFailure>
        where R: Default + 'static
    {
        let outcome = {
            let mut guard = self.lock();
            let State{registry, log} = &mut *guard;
            match registry.resolve(method, &args) {
                MatchResult::Matched(id, response) => {
                    log.append(method, args, Resolution::Matched(id));
                    Ok(response)
                },
                MatchResult::Unmatched => {
                    let call = log.append(method, args, Resolution::Unmatched)
                        .render(&self.type_name);
                    Err(call)
                }
            }
        };
        match outcome {
            Ok(None) => Ok(R::default()),
            Ok(Some(response)) => {
                let type_name = response.type_name;
                match response.value.downcast::<R>() {
                    Ok(r) => Ok(*r),
                    Err(_) => panic!(
                        "{}.{} returned a {}, but the caller expected a {}",
                        self.type_name, method, type_name,
                        any::type_name::<R>())
                }
            },
            Err(call) => match self.behavior {
                Behavior::Strict => {
                    debug!("{}: rejecting {}", self.name(), call);
                    Err(InvocationFailure::new(call))
                },
                Behavior::Loose => {
                    debug!("{}: no setup for {}, returning default",
                        self.name(), call);
                    Ok(R::default())
                }
            }
        }
    }

    /// Check that every verifiable setup was matched at least once.
    ///
    /// Setups not marked [`verifiable`](Setup::verifiable) are ignored, so with
    /// none marked this always succeeds.  On success, the calls that matched
    /// verifiable setups count as verified for
    /// [`verify_no_other_calls`](#method.verify_no_other_calls).
    pub fn verify(&self) -> Result<(), VerificationFailure> {
        self.verify_setups(false)
    }

    /// Like [`verify`](#method.verify), but every live setup is checked,
    /// verifiable or not.
    pub fn verify_all(&self) -> Result<(), VerificationFailure> {
        self.verify_setups(true)
    }

    fn verify_setups(&self, all: bool) -> Result<(), VerificationFailure> {
        let mut guard = self.lock();
        let State{registry, log} = &mut *guard;
        let violations = registry.unmatched(all)
            .map(|e| Violation::SetupNotMatched {
                setup: e.describe(&self.type_name)
            }).collect::<Vec<_>>();
        if !violations.is_empty() {
            debug!("{}: {} setup(s) not matched", self.name(), violations.len());
            return Err(VerificationFailure::new(&self.name(), FailureKind::Setups,
                violations));
        }
        for id in registry.mark_verified(all) {
            log.verify_matched(id);
        }
        Ok(())
    }

    /// Check that `method` was called with `args` the expected number of
    /// times, no matter which setup, if any, those calls resolved to.
    ///
    /// On success the counted calls count as verified.
    ///
    /// # Examples
    /// ```
    /// # use mockengine::*;
    /// let mock = Mock::loose("IMyInterface");
    /// mock.invoke::<()>("DoTheThing", args!["A"]).unwrap();
    /// mock.verify_call("DoTheThing", args!["A"], Times::once()).unwrap();
    /// mock.verify_no_other_calls().unwrap();
    /// ```
    pub fn verify_call(&self, method: &str, args: Vec<Arg>, times: Times)
        -> Result<(), VerificationFailure>
    {
        self.verify_call_with(&Matcher::literal(method, args), times)
    }

    /// Like [`verify_call`](#method.verify_call), with any [`Matcher`].
    pub fn verify_call_with(&self, matcher: &Matcher, times: Times)
        -> Result<(), VerificationFailure>
    {
        let mut guard = self.lock();
        let numbers = guard.log.iter()
            .filter(|i| matcher.matches(i.method(), i.args()))
            .map(Invocation::sequence_number)
            .collect::<Vec<_>>();
        if times.contains(numbers.len()) {
            guard.log.verify_numbers(&numbers);
            Ok(())
        } else {
            let v = Violation::CallCount {
                setup: format!("{} {}", self.type_name, matcher.describe()),
                expected: times,
                actual: numbers.len()
            };
            Err(VerificationFailure::new(&self.name(), FailureKind::Setups,
                vec![v]))
        }
    }

    /// Check that every recorded call has been accounted for by an earlier
    /// verification.
    ///
    /// Reports, in call order, both calls that matched no setup and calls
    /// that matched a setup no verification covered.  Never changes any
    /// state.
    pub fn verify_no_other_calls(&self) -> Result<(), VerificationFailure> {
        let guard = self.lock();
        let violations = guard.log.unverified()
            .map(|i| Violation::UnverifiedInvocation {
                call: i.render(&self.type_name)
            }).collect::<Vec<_>>();
        if violations.is_empty() {
            Ok(())
        } else {
            debug!("{}: {} unverified invocation(s)", self.name(),
                violations.len());
            Err(VerificationFailure::new(&self.name(),
                FailureKind::UnverifiedInvocations, violations))
        }
    }

    /// Every call recorded so far, in call order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.lock().log.snapshot()
    }

    /// How many calls matched the setup `id`.  `None` if `id` has been
    /// overridden by a later setup.
    pub fn match_count(&self, id: SetupId) -> Option<usize> {
        self.lock().registry.match_count(id)
    }

    /// Has a successful verification covered the setup `id`?
    pub fn is_verified(&self, id: SetupId) -> bool {
        self.lock().registry.is_verified(id)
    }
}

impl Default for Mock {
    fn default() -> Self {
        Mock::new("Mock", Behavior::default())
    }
}

impl std::fmt::Debug for Mock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Mock")
            .field("name", &self.name())
            .field("behavior", &self.behavior)
            .finish()
    }
}
