// vim: tw=80
//! Failures raised by a mock

use std::fmt;

use crate::times::Times;

/// A Strict mock received a call that no live setup accepts.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{call} invocation failed with mock behavior Strict.\nAll invocations on the mock must have a corresponding setup.")]
pub struct InvocationFailure {
    call: String,
}

impl InvocationFailure {
    pub(crate) fn new(call: String) -> Self {
        InvocationFailure{call}
    }

    /// The offending call, rendered as `Type.Method("arg")`.
    pub fn call(&self) -> &str {
        &self.call
    }
}

/// Which verification found the violations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// Declared setups were not used as expected.
    Setups,
    /// Calls were made that no verification accounted for.
    UnverifiedInvocations,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailureKind::Setups =>
                f.write_str("This mock failed verification due to the following:"),
            FailureKind::UnverifiedInvocations =>
                f.write_str("This mock failed verification due to the following unverified invocations:"),
        }
    }
}

/// One reason a verification failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Violation {
    /// A setup that was never matched by any call.
    SetupNotMatched {
        setup: String
    },
    /// A call that no verification accounted for.
    UnverifiedInvocation {
        call: String
    },
    /// A call was made the wrong number of times.
    CallCount {
        setup: String,
        expected: Times,
        actual: usize
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Violation::SetupNotMatched{setup} =>
                write!(f, "   {}:\n   This setup was not matched.", setup),
            Violation::UnverifiedInvocation{call} => write!(f, "   {}", call),
            Violation::CallCount{setup, expected, actual} =>
                write!(f,
                    "   Expected invocation on the mock {}, but was {} times: {}",
                    expected, actual, setup),
        }
    }
}

/// A verification found at least one violation.  All of them are listed, not
/// just the first.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct VerificationFailure {
    kind: FailureKind,
    violations: Vec<Violation>,
    message: String,
}

impl VerificationFailure {
    pub(crate) fn new(mock: &str, kind: FailureKind, violations: Vec<Violation>)
        -> Self
    {
        let lines = violations.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let message = format!("{}:\n{}\n\n{}", mock, kind, lines);
        VerificationFailure{kind, violations, message}
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// Either kind of mock failure, for callers that propagate both with `?`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum MockError {
    #[error(transparent)]
    Invocation(#[from] InvocationFailure),
    #[error(transparent)]
    Verification(#[from] VerificationFailure),
}
