use std::fmt;

/// Untrusted request data that must go through a [`Sanitizer`](crate::Sanitizer)
/// before use.
///
/// Request bodies, path segments and query values enter the crate as
/// `Tainted<T>`. The inner value is not reachable from outside the crate.
///
/// # Examples
///
/// ```
/// use hostel_access::{Sanitizer, Tainted, TextSanitizer};
///
/// let name = Tainted::new("  Hostel A  ".to_string());
/// let verified = TextSanitizer::single_line(100).sanitize(name).unwrap();
/// assert_eq!(verified.as_ref(), "Hostel A");
/// ```
#[derive(Clone)]
pub struct Tainted<T> {
    // Must stay private: reaching the value without a sanitizer defeats the wrapper.
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Hands the raw value to a sanitizer.
    ///
    /// Only sanitizers may call this, and only to validate the value before
    /// wrapping it in [`Verified`](crate::Verified).
    pub(crate) fn into_inner(self) -> T {
        self.inner
    }

    /// Applies an infallible transformation without untainting.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Tainted<U> {
        Tainted::new(f(self.inner))
    }
}

impl Tainted<String> {
    /// Borrows the text without untainting it.
    pub fn as_str(&self) -> Tainted<&str> {
        Tainted::new(self.inner.as_str())
    }
}

// No Deref, AsRef, Borrow or Into<T>: each would let raw input skip validation.

impl<T: fmt::Debug> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tainted")
            .field("inner", &self.inner)
            .finish()
    }
}
