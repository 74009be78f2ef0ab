// vim: tw=80
//! The record of every call made to a mock

use crate::{arg::{self, Arg}, setup::SetupId};

/// How an [`Invocation`] was resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// The call matched this setup.
    Matched(SetupId),
    /// No live setup accepted the call.
    Unmatched,
}

/// One observed call.
#[derive(Clone, Debug)]
pub struct Invocation {
    method: String,
    args: Vec<Arg>,
    sequence_number: usize,
    resolution: Resolution,
    verified: bool,
}

impl Invocation {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Position of this call within the mock's lifetime, starting at 0.
    pub fn sequence_number(&self) -> usize {
        self.sequence_number
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Has a verification pass accounted for this call?
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Render as `Type.Method("arg1", "arg2")`.
    pub fn render(&self, type_name: &str) -> String {
        format!("{}.{}({})", type_name, self.method, arg::render(&self.args))
    }
}

/// Append-only list of [`Invocation`]s, in call order.
#[derive(Debug, Default)]
pub(crate) struct InvocationLog(Vec<Invocation>);

impl InvocationLog {
    pub(crate) fn append(&mut self, method: &str, args: Vec<Arg>,
                         resolution: Resolution) -> &Invocation
    {
        let sequence_number = self.0.len();
        self.0.push(Invocation {
            method: method.to_owned(),
            args,
            sequence_number,
            resolution,
            verified: false
        });
        &self.0[sequence_number]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item=&Invocation> {
        self.0.iter()
    }

    /// Mark every call resolved to `id` as verified.  Verification is never
    /// revoked.
    pub(crate) fn verify_matched(&mut self, id: SetupId) {
        for i in self.0.iter_mut() {
            if i.resolution == Resolution::Matched(id) {
                i.verified = true;
            }
        }
    }

    /// Mark the calls with these sequence numbers as verified.
    pub(crate) fn verify_numbers(&mut self, numbers: &[usize]) {
        for &n in numbers {
            if let Some(i) = self.0.get_mut(n) {
                i.verified = true;
            }
        }
    }

    /// Every call that no verification pass has accounted for, in call order.
    pub(crate) fn unverified(&self) -> impl Iterator<Item=&Invocation> {
        self.0.iter().filter(|i| !i.verified)
    }

    pub(crate) fn snapshot(&self) -> Vec<Invocation> {
        self.0.clone()
    }
}

#[cfg(test)]
mod t {
    use super::*;

    #[test]
    fn sequence_numbers_count_up() {
        let mut log = InvocationLog::default();
        log.append("f", vec![], Resolution::Unmatched);
        let i = log.append("g", vec![Arg::new(1)], Resolution::Matched(SetupId(0)));
        assert_eq!(i.sequence_number(), 1);
        assert_eq!(i.method(), "g");
    }

    #[test]
    fn verify_matched_leaves_others_alone() {
        let mut log = InvocationLog::default();
        log.append("f", vec![], Resolution::Matched(SetupId(0)));
        log.append("f", vec![], Resolution::Matched(SetupId(1)));
        log.append("f", vec![], Resolution::Unmatched);
        log.verify_matched(SetupId(0));
        let unverified = log.unverified()
            .map(Invocation::sequence_number)
            .collect::<Vec<_>>();
        assert_eq!(unverified, vec![1, 2]);
    }

    #[test]
    fn render() {
        let mut log = InvocationLog::default();
        let i = log.append("DoTheThing", vec![Arg::new("C"), Arg::new(5u8)],
                           Resolution::Unmatched);
        assert_eq!(i.render("IMyInterface"), r#"IMyInterface.DoTheThing("C", 5)"#);
    }
}
