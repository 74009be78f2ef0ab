// vim: tw=80
//! A decision engine for mock objects.
//!
//! Mockengine records what calls a test expects (*setups*), decides for each
//! simulated call (*invocation*) whether it is allowed and what it returns,
//! and afterwards checks the full call history against the expectations.
//! Intercepting calls on a real trait is left to the caller; here a call is
//! just a method name and a list of [`Arg`]s.
//!
//! # Getting started
//! ```
//! use mockengine::*;
//!
//! let mock = Mock::strict("IMyInterface");
//! mock.setup(Setup::call("DoTheThing", args!["A"]).returns("1").verifiable());
//! mock.setup(Setup::call("DoTheThing", args!["B"]).returns("2").verifiable());
//!
//! assert_eq!(mock.invoke::<&str>("DoTheThing", args!["A"]).unwrap(), "1");
//! assert_eq!(mock.invoke::<&str>("DoTheThing", args!["B"]).unwrap(), "2");
//! let e = mock.invoke::<&str>("DoTheThing", args!["C"]).unwrap_err();
//! assert_eq!(e.to_string(),
//!     "IMyInterface.DoTheThing(\"C\") invocation failed with mock behavior Strict.\n\
//!      All invocations on the mock must have a corresponding setup.");
//!
//! mock.verify().unwrap();
//! let e = mock.verify_no_other_calls().unwrap_err();
//! assert!(e.to_string().ends_with("   IMyInterface.DoTheThing(\"C\")"));
//! ```
//!
//! # Behavior
//!
//! A [`Behavior::Strict`] mock fails any call that no setup accepts, right at
//! the call site.  A [`Behavior::Loose`] mock records the call and returns the
//! default value of the declared result type instead.  Either way the call
//! stays in the history, where
//! [`verify_no_other_calls`](Mock::verify_no_other_calls) will find it.
//!
//! # Matching
//!
//! [`Setup::call`] matches a method name and literal arguments by structural
//! equality.  [`Setup::with`] takes any [`Predicate`] over the argument list
//! instead.
//!
//! Registering a literal setup identical to an existing unordered one
//! *replaces* it.  The old setup is gone for good: it matches nothing and
//! [`verify`](Mock::verify) never reports it.
//! ```
//! # use mockengine::*;
//! let mock = Mock::strict("IMyInterface");
//! mock.setup(Setup::call("DoTheThing", args!["A"]).returns("1").verifiable());
//! mock.setup(Setup::call("DoTheThing", args!["A"]).returns("2").verifiable());
//! assert_eq!(mock.invoke::<&str>("DoTheThing", args!["A"]).unwrap(), "2");
//! mock.verify().unwrap();
//! ```
//!
//! # Responses
//!
//! A setup answers with its queued responses in order.  A setup registered
//! with [`Mock::setup`] repeats its last response forever; one registered with
//! [`Mock::setup_sequence`] answers with the default value once they run out.
//! A setup with no response answers with the default value.
//!
//! # Sequences
//!
//! Setups registered with [`Mock::in_sequence`] under one [`Sequence`] must be
//! matched in registration order, each exactly once.  A call that only
//! matches a later member is treated as unmatched, and does not disturb the
//! sequence.  Sequences are consulted before unordered setups.
//!
//! # Verification
//!
//! [`Mock::verify`] checks that every [`verifiable`](Setup::verifiable) setup
//! was used, and marks the calls they matched as verified.
//! [`Mock::verify_no_other_calls`] then reports every call that is still
//! unverified: calls that matched nothing, and calls that matched setups that
//! weren't verifiable.  [`Mock::verify_call`] checks a call count directly.
//! Every failure lists all violations, not just the first.
//!
//! # Logging
//!
//! Registration, overrides, and verification results are logged with
//! [`tracing`](https://docs.rs/tracing) at `debug` level, and per-call
//! matching at `trace` level.

mod arg;
mod error;
mod invocation;
mod mock;
mod registry;
mod sequence;
mod setup;
mod times;

pub use crate::arg::{Arg, ArgValue};
pub use crate::error::{
    FailureKind,
    InvocationFailure,
    MockError,
    VerificationFailure,
    Violation
};
pub use crate::invocation::{Invocation, Resolution};
pub use crate::mock::{Behavior, Mock};
pub use crate::sequence::Sequence;
pub use crate::setup::{Matcher, Setup, SetupId};
pub use crate::times::Times;
pub use predicates::prelude::{Predicate, predicate};

/// Build the argument list of a call.
///
/// # Examples
/// ```
/// # use mockengine::*;
/// let args = args!["A", 42, String::from("b")];
/// assert_eq!(format!("{:?}", args), r#"["A", 42, "b"]"#);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::new($arg)),+]
    };
}
