// vim: tw=80
//! Declared expectations: what a call must look like, and how to answer it

use downcast::{downcast, Any};
use fragile::Fragile;
use predicates::prelude::Predicate;
use predicates_tree::CaseTreeExt;
use std::{any, collections::VecDeque, fmt};
use tracing::trace;

use crate::arg::{self, Arg};

/// Identifies one registered [`Setup`].  Ids are handed out in registration
/// order and are never reused within one mock.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SetupId(pub(crate) usize);

/// Type-erased return value of a mocked method.
#[doc(hidden)]
pub trait AnyResponse: Any {}
downcast!(dyn AnyResponse);

impl<T: 'static> AnyResponse for T {}

/// A value produced for one matched call, along with the name of its type
/// for diagnosing a mismatch against the caller's declared result type.
pub(crate) struct Response {
    pub(crate) value: Box<dyn AnyResponse>,
    pub(crate) type_name: &'static str,
}

impl Response {
    fn new<R: 'static>(r: R) -> Self {
        Response{value: Box::new(r), type_name: any::type_name::<R>()}
    }
}

type Producer = Box<dyn FnMut(&[Arg]) -> Response + Send>;
pub(crate) type Callback = Box<dyn FnMut(&[Arg]) + Send>;

enum ArgsMatcher {
    Literal(Vec<Arg>),
    Pred(Box<dyn Predicate<[Arg]> + Send + Sync>),
}

/// Decides whether a call belongs to a setup.
pub struct Matcher {
    method: String,
    args: ArgsMatcher,
}

impl Matcher {
    /// Match calls to `method` whose arguments equal `args`, element by
    /// element.
    pub fn literal<S: Into<String>>(method: S, args: Vec<Arg>) -> Self {
        Matcher{method: method.into(), args: ArgsMatcher::Literal(args)}
    }

    /// Match calls to `method` whose argument list satisfies `pred`.
    pub fn predicate<S, P>(method: S, pred: P) -> Self
        where S: Into<String>,
              P: Predicate<[Arg]> + Send + Sync + 'static
    {
        Matcher{method: method.into(), args: ArgsMatcher::Pred(Box::new(pred))}
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Does a call to `method` with `args` satisfy this matcher?
    pub fn matches(&self, method: &str, args: &[Arg]) -> bool {
        if self.method != method {
            return false;
        }
        match &self.args {
            ArgsMatcher::Literal(expected) => expected.as_slice() == args,
            ArgsMatcher::Pred(p) => {
                let ok = p.eval(args);
                if !ok {
                    if let Some(case) = p.find_case(false, args) {
                        trace!("{} rejected arguments:\n{}", self.describe(),
                            case.tree());
                    }
                }
                ok
            }
        }
    }

    /// Structural equality, used to decide whether a new setup overrides an
    /// old one.  Predicate matchers are never structurally equal to anything.
    pub(crate) fn same_as(&self, other: &Matcher) -> bool {
        match (&self.args, &other.args) {
            (ArgsMatcher::Literal(a), ArgsMatcher::Literal(b)) =>
                self.method == other.method && a == b,
            _ => false
        }
    }

    /// Lambda-like rendering, e.g. `x => x.DoTheThing("B")`.
    pub fn describe(&self) -> String {
        match &self.args {
            ArgsMatcher::Literal(args) =>
                format!("x => x.{}({})", self.method, arg::render(args)),
            ArgsMatcher::Pred(p) => format!("x => x.{}({})", self.method, p),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// What happens once every queued response has been handed out.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Exhaustion {
    /// Keep answering with the last response.
    RepeatLast,
    /// Answer with the caller's default value.
    Default,
}

/// Ordered response producers of one setup.
pub(crate) struct ResponseQueue {
    producers: VecDeque<Producer>,
    exhaustion: Exhaustion,
}

impl ResponseQueue {
    fn new(producers: VecDeque<Producer>, exhaustion: Exhaustion) -> Self {
        ResponseQueue{producers, exhaustion}
    }

    /// Produce the answer for one matched call.  `None` means "use the
    /// default value".
    pub(crate) fn next(&mut self, args: &[Arg]) -> Option<Response> {
        if self.exhaustion == Exhaustion::RepeatLast && self.producers.len() == 1
        {
            return self.producers.front_mut().map(|f| f(args));
        }
        self.producers.pop_front().map(|mut f| f(args))
    }
}

/// One declared expectation: a matcher, the responses to give, and flags.
///
/// A `Setup` is a plain record.  Nothing happens until it is registered with
/// [`Mock::setup`](crate::Mock::setup),
/// [`Mock::setup_sequence`](crate::Mock::setup_sequence), or
/// [`Mock::in_sequence`](crate::Mock::in_sequence).
///
/// # Examples
/// ```
/// # use mockengine::*;
/// let mock = Mock::strict("IMyInterface");
/// mock.setup(Setup::call("DoTheThing", args!["A"]).returns("1").verifiable());
/// assert_eq!(mock.invoke::<&str>("DoTheThing", args!["A"]).unwrap(), "1");
/// ```
pub struct Setup {
    matcher: Matcher,
    producers: VecDeque<Producer>,
    callbacks: Vec<Callback>,
    verifiable: bool,
}

impl Setup {
    /// Expect a call to `method` with exactly these arguments.
    pub fn call<S: Into<String>>(method: S, args: Vec<Arg>) -> Self {
        Setup::matching(Matcher::literal(method, args))
    }

    /// Expect a call to `method` whose arguments satisfy `pred`.
    ///
    /// # Examples
    /// ```
    /// # use mockengine::*;
    /// use mockengine::predicate;
    /// let mock = Mock::strict("Calc");
    /// mock.setup(Setup::with("Add", predicate::function(|a: &[Arg]| a.len() == 2))
    ///     .returns(0i32));
    /// assert_eq!(mock.invoke::<i32>("Add", args![1, 2]).unwrap(), 0);
    /// ```
    pub fn with<S, P>(method: S, pred: P) -> Self
        where S: Into<String>,
              P: Predicate<[Arg]> + Send + Sync + 'static
    {
        Setup::matching(Matcher::predicate(method, pred))
    }

    /// Expect a call accepted by an already built [`Matcher`].
    pub fn matching(matcher: Matcher) -> Self {
        Setup {
            matcher,
            producers: VecDeque::new(),
            callbacks: Vec::new(),
            verifiable: false,
        }
    }

    /// Run `f` on every call this setup matches, before the response is
    /// produced.
    pub fn callback<F>(mut self, f: F) -> Self
        where F: FnMut(&[Arg]) + Send + 'static
    {
        self.callbacks.push(Box::new(f));
        self
    }

    /// Queue a constant response.  It is cloned each time it is returned.
    pub fn returns<R>(self, r: R) -> Self
        where R: Clone + Send + 'static
    {
        self.returning(move |_| r.clone())
    }

    /// Queue a response computed from the call's arguments.
    pub fn returning<R, F>(mut self, mut f: F) -> Self
        where R: 'static,
              F: FnMut(&[Arg]) -> R + Send + 'static
    {
        self.producers.push_back(Box::new(move |args: &[Arg]| {
            Response::new(f(args))
        }));
        self
    }

    /// Single-threaded version of [`returning`](#method.returning).  Can be
    /// used when the closure isn't `Send`.
    ///
    /// It is a runtime error to call the mock method from a different thread
    /// than the one that registered this response.
    pub fn returning_st<R, F>(mut self, f: F) -> Self
        where R: 'static,
              F: FnMut(&[Arg]) -> R + 'static
    {
        let mut fragile = Fragile::new(f);
        let fmut = move |args: &[Arg]| Response::new((fragile.get_mut())(args));
        self.producers.push_back(Box::new(fmut));
        self
    }

    /// Subject this setup to [`Mock::verify`](crate::Mock::verify).
    pub fn verifiable(mut self) -> Self {
        self.verifiable = true;
        self
    }

    pub fn is_verifiable(&self) -> bool {
        self.verifiable
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Split into the parts the registry tracks separately.
    pub(crate) fn into_parts(self, exhaustion: Exhaustion)
        -> (Matcher, ResponseQueue, Vec<Callback>, bool)
    {
        let queue = ResponseQueue::new(self.producers, exhaustion);
        (self.matcher, queue, self.callbacks, self.verifiable)
    }
}

impl fmt::Debug for Setup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Setup")
            .field("matcher", &self.matcher)
            .field("responses", &self.producers.len())
            .field("verifiable", &self.verifiable)
            .finish()
    }
}
