/// Data that has passed a [`Sanitizer`](crate::Sanitizer).
///
/// There is no public constructor and no `From<T>`: the only way to obtain a
/// `Verified<T>` is to sanitize a [`Tainted`](crate::Tainted) value.
///
/// ```compile_fail
/// use hostel_access::Verified;
///
/// let verified = Verified::new("data".to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    inner: T,
}

impl<T> Verified<T> {
    /// Wraps a value a sanitizer has just validated.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the wrapper and returns the value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Verified<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
