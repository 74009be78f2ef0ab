// vim: tw=80
//! Type-erased call arguments

use downcast::{downcast, Any};
use std::fmt;

/// Any value that can be passed to a mocked method.
///
/// Implemented for every `'static` type that is `Debug`, `PartialEq`, and
/// `Clone`.  There is no need to implement it by hand.
pub trait ArgValue: Any + fmt::Debug + Send + Sync {
    #[doc(hidden)]
    fn eq_value(&self, other: &dyn ArgValue) -> bool;

    #[doc(hidden)]
    fn clone_value(&self) -> Box<dyn ArgValue>;
}

downcast!(dyn ArgValue);

impl<T> ArgValue for T
    where T: fmt::Debug + PartialEq + Clone + Send + Sync + 'static
{
    fn eq_value(&self, other: &dyn ArgValue) -> bool {
        match other.downcast_ref::<T>() {
            Ok(o) => self == o,
            Err(_) => false
        }
    }

    fn clone_value(&self) -> Box<dyn ArgValue> {
        Box::new(self.clone())
    }
}

/// One argument of a call made to, or expected by, a [`Mock`](crate::Mock).
///
/// Two `Arg`s are equal when they hold the same concrete type and the held
/// values compare equal.  An `Arg` formats exactly like the value it holds, so
/// string arguments print with quotes.
///
/// # Examples
/// ```
/// # use mockengine::*;
/// assert_eq!(Arg::new("A"), Arg::new("A"));
/// assert_ne!(Arg::new("A"), Arg::new(String::from("A")));
/// assert_eq!(format!("{:?}", Arg::new("A")), "\"A\"");
/// ```
pub struct Arg(Box<dyn ArgValue>);

impl Arg {
    pub fn new<T: ArgValue>(value: T) -> Self {
        Arg(Box::new(value))
    }

    /// Borrow the held value, if it has type `T`.
    pub fn downcast_ref<T: ArgValue>(&self) -> Option<&T> {
        (*self.0).downcast_ref::<T>().ok()
    }

    /// Does this `Arg` hold a `T`?
    pub fn is<T: ArgValue>(&self) -> bool {
        (*self.0).is::<T>()
    }
}

impl Clone for Arg {
    fn clone(&self) -> Self {
        Arg(self.0.clone_value())
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Arg) -> bool {
        self.0.eq_value(other.0.as_ref())
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Render an argument list the way it appears inside a call's parentheses.
pub(crate) fn render(args: &[Arg]) -> String {
    args.iter()
        .map(|a| format!("{:?}", a))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod t {
    use super::*;

    #[test]
    fn different_types_are_unequal() {
        assert_ne!(Arg::new(5u32), Arg::new(5i32));
    }

    #[test]
    fn downcast() {
        let a = Arg::new(42u16);
        assert!(a.is::<u16>());
        assert_eq!(a.downcast_ref::<u16>(), Some(&42));
        assert_eq!(a.downcast_ref::<u32>(), None);
    }

    #[test]
    fn render_quotes_strings() {
        let args = vec![Arg::new("A"), Arg::new(7), Arg::new(String::from("b"))];
        assert_eq!(render(&args), r#""A", 7, "b""#);
    }

    #[test]
    fn clone_is_equal() {
        let a = Arg::new(vec![1, 2, 3]);
        assert_eq!(a.clone(), a);
    }
}
