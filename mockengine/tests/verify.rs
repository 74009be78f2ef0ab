// vim: tw=80
//! `verify`, `verify_all`, and `verify_call`
#![deny(warnings)]

use mockengine::*;
use pretty_assertions::assert_eq;

#[test]
fn nothing_verifiable_always_succeeds() {
    let mock = Mock::loose("IMyInterface");
    mock.setup(Setup::call("DoTheThing", args!["A"]).returns(1));
    mock.setup(Setup::call("DoTheThing", args!["B"]).returns(2));
    mock.invoke::<i32>("DoTheThing", args!["Z"]).unwrap();

    mock.verify().unwrap();
    mock.verify().unwrap();
}

#[test]
fn empty_mock() {
    let mock = Mock::strict("IMyInterface");
    mock.verify().unwrap();
    mock.verify_all().unwrap();
    mock.verify_no_other_calls().unwrap();
}

/// Every unmatched setup is listed, in registration order
#[test]
fn lists_every_unmatched_setup() {
    let mock = Mock::loose("IMyInterface");
    mock.setup(Setup::call("DoTheThing", args!["A"]).verifiable());
    mock.setup(Setup::call("DoTheThing", args!["B"]).verifiable());
    mock.setup(Setup::call("Count", args![3u8]).verifiable());
    mock.invoke::<()>("DoTheThing", args!["B"]).unwrap();

    let e = mock.verify().unwrap_err();
    assert_eq!(e.to_string(), format!("{}:\n\
        This mock failed verification due to the following:\n\
        \n   IMyInterface x => x.DoTheThing(\"A\"):\
        \n   This setup was not matched.\
        \n   IMyInterface x => x.Count(3):\
        \n   This setup was not matched.", mock.name()));
}

/// A failed verify marks nothing, so nothing is cleared for
/// verify_no_other_calls
#[test]
fn failure_verifies_nothing() {
    let mock = Mock::loose("IMyInterface");
    let a = mock.setup(Setup::call("DoTheThing", args!["A"]).verifiable());
    mock.setup(Setup::call("DoTheThing", args!["B"]).verifiable());
    mock.invoke::<()>("DoTheThing", args!["A"]).unwrap();

    mock.verify().unwrap_err();
    assert!(!mock.is_verified(a));
    assert!(mock.invocations().iter().all(|i| !i.is_verified()));
}

#[test]
fn marks_only_verifiable_matches() {
    let mock = Mock::loose("IMyInterface");
    let a = mock.setup(Setup::call("DoTheThing", args!["A"]).verifiable());
    let b = mock.setup(Setup::call("DoTheThing", args!["B"]));
    mock.invoke::<()>("DoTheThing", args!["A"]).unwrap();
    mock.invoke::<()>("DoTheThing", args!["B"]).unwrap();
    mock.invoke::<()>("DoTheThing", args!["C"]).unwrap();

    for _ in 0..3 {
        mock.verify().unwrap();
        let verified = mock.invocations()
            .iter()
            .map(Invocation::is_verified)
            .collect::<Vec<_>>();
        assert_eq!(verified, vec![true, false, false]);
    }
    assert!(mock.is_verified(a));
    assert!(!mock.is_verified(b));
}

/// Verification, once granted, is never taken back
#[test]
fn verification_is_monotonic() {
    let mock = Mock::loose("IMyInterface");
    mock.setup(Setup::call("DoTheThing", args!["A"]).verifiable());
    mock.invoke::<()>("DoTheThing", args!["A"]).unwrap();
    mock.verify().unwrap();

    mock.setup(Setup::call("DoTheThing", args!["B"]).verifiable());
    mock.verify().unwrap_err();
    assert!(mock.invocations()[0].is_verified());
}

mod verify_all {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn checks_unverifiable_setups_too() {
        let mock = Mock::loose("IMyInterface");
        mock.setup(Setup::call("DoTheThing", args!["A"]));
        mock.setup(Setup::call("DoTheThing", args!["B"]));
        mock.invoke::<()>("DoTheThing", args!["A"]).unwrap();

        mock.verify().unwrap();
        let e = mock.verify_all().unwrap_err();
        assert_eq!(e.violations(), &[Violation::SetupNotMatched {
            setup: "IMyInterface x => x.DoTheThing(\"B\")".to_owned()
        }]);
    }

    #[test]
    fn clears_every_matched_call() {
        let mock = Mock::loose("IMyInterface");
        mock.setup(Setup::call("DoTheThing", args!["A"]));
        let seq = Sequence::new();
        mock.in_sequence(&seq, Setup::call("DoTheThing", args!["B"]));
        mock.invoke::<()>("DoTheThing", args!["A"]).unwrap();
        mock.invoke::<()>("DoTheThing", args!["B"]).unwrap();
        mock.invoke::<()>("DoTheThing", args!["C"]).unwrap();

        mock.verify_all().unwrap();
        let e = mock.verify_no_other_calls().unwrap_err();
        assert_eq!(e.violations(), &[Violation::UnverifiedInvocation {
            call: "IMyInterface.DoTheThing(\"C\")".to_owned()
        }]);
    }
}

mod verify_call {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_matched_and_unmatched_calls() {
        let mock = Mock::loose("IMyInterface");
        mock.setup(Setup::call("DoTheThing", args!["A"]).returns(1u8));
        mock.invoke::<u8>("DoTheThing", args!["A"]).unwrap();
        mock.invoke::<u8>("DoTheThing", args!["B"]).unwrap();
        mock.invoke::<u8>("DoTheThing", args!["B"]).unwrap();

        mock.verify_call("DoTheThing", args!["A"], Times::once()).unwrap();
        mock.verify_call("DoTheThing", args!["B"], Times::exactly(2)).unwrap();
        mock.verify_call("DoTheThing", args!["C"], Times::never()).unwrap();
        mock.verify_no_other_calls().unwrap();
    }

    #[test]
    fn wrong_count() {
        let mock = Mock::loose("IMyInterface");
        mock.invoke::<()>("DoTheThing", args!["A"]).unwrap();
        mock.invoke::<()>("DoTheThing", args!["A"]).unwrap();

        let e = mock.verify_call("DoTheThing", args!["A"], Times::once())
            .unwrap_err();
        assert_eq!(e.to_string(), format!("{}:\n\
            This mock failed verification due to the following:\n\
            \n   Expected invocation on the mock once, but was 2 times: \
            IMyInterface x => x.DoTheThing(\"A\")", mock.name()));
    }

    /// A failed count leaves the calls unverified
    #[test]
    fn failure_verifies_nothing() {
        let mock = Mock::loose("IMyInterface");
        mock.invoke::<()>("DoTheThing", args!["A"]).unwrap();

        mock.verify_call("DoTheThing", args!["A"], Times::never()).unwrap_err();
        mock.verify_no_other_calls().unwrap_err();
    }

    #[test]
    fn with_a_predicate() {
        let mock = Mock::loose("Calc");
        mock.invoke::<i32>("Add", args![1, 2]).unwrap();
        mock.invoke::<i32>("Add", args![3, 4]).unwrap();
        mock.invoke::<i32>("Sub", args![3, 4]).unwrap();

        let any_add = Matcher::predicate("Add", predicate::always());
        mock.verify_call_with(&any_add, Times::at_least(2)).unwrap();
        let e = mock.verify_no_other_calls().unwrap_err();
        assert_eq!(e.violations(), &[Violation::UnverifiedInvocation {
            call: "Calc.Sub(3, 4)".to_owned()
        }]);
    }
}
