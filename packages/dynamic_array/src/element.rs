use std::mem;

use thiserror::Error;

/// Describes why a fallible element operation did not complete.
///
/// Carried by [`Error::Element`][crate::Error::Element] when an element-level
/// operation fails inside a [`DynamicArray`][crate::DynamicArray] call.
/// Downstream [`Element`] implementations construct these to report their own
/// failure conditions; the array never inspects the contents beyond passing
/// them along.
#[derive(Debug, Error)]
#[error("element {operation} failed: {reason}")]
pub struct ElementError {
    /// Name of the element operation that failed.
    operation: &'static str,

    /// A human-readable description of the problem.
    reason: String,
}

impl ElementError {
    /// Creates a new error for the named element operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_array::ElementError;
    ///
    /// let error = ElementError::new("duplicate", "backing handle is exhausted");
    /// assert_eq!(error.operation(), "duplicate");
    /// ```
    #[must_use]
    pub fn new(operation: &'static str, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }

    /// The element operation that failed, e.g. `"fresh"` or `"duplicate"`.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

/// The contract a [`DynamicArray`][crate::DynamicArray] requires from its
/// element type.
///
/// Every lifecycle operation of an element is modeled as fallible: creating a
/// default value, duplicating an existing one, transferring ownership out of
/// one, and overwriting one with another. The array builds its failure-safety
/// guarantees entirely around tolerating errors from these operations without
/// corrupting its own bookkeeping.
///
/// # Relocation policy
///
/// The two associated consts are capability queries evaluated once per array
/// instantiation. When [`TRANSFER_CANNOT_FAIL`][Self::TRANSFER_CANNOT_FAIL]
/// is `true`, or when [`SUPPORTS_DUPLICATION`][Self::SUPPORTS_DUPLICATION] is
/// `false`, growth relocates elements by ownership transfer. Otherwise growth
/// duplicates every element into the new region, specifically so that a
/// failure partway through relocation leaves the original region fully
/// intact: a partially completed transfer cannot be rolled back because the
/// already-transferred sources have been drained.
///
/// # Moved-from state
///
/// [`transfer`][Self::transfer] and
/// [`transfer_assign`][Self::transfer_assign] leave their source live, in a
/// valid but unspecified state. The source will still be assigned over or
/// dropped later; it must tolerate both.
///
/// # Examples
///
/// Implementations for the std scalar types and `String` ship with the crate:
///
/// ```
/// use dynamic_array::Element;
///
/// let mut source = String::from("payload");
/// let transferred = String::transfer(&mut source).unwrap();
///
/// assert_eq!(transferred, "payload");
/// assert_eq!(source, ""); // valid, contents unspecified (here: drained)
/// ```
pub trait Element: Sized {
    /// Whether [`transfer`][Self::transfer] and
    /// [`transfer_assign`][Self::transfer_assign] are guaranteed never to
    /// fail.
    ///
    /// Declaring this `true` while shipping a fallible transfer forfeits the
    /// array's relocation guarantees, so only do so when transfer genuinely
    /// cannot fail.
    const TRANSFER_CANNOT_FAIL: bool = true;

    /// Whether the type supports duplication at all.
    ///
    /// When `false`, [`duplicate`][Self::duplicate] and
    /// [`assign`][Self::assign] are expected to return an error, relocation
    /// always transfers ownership, and whole-array duplication fails cleanly.
    const SUPPORTS_DUPLICATION: bool = true;

    /// Produces a fresh default value.
    fn fresh() -> Result<Self, ElementError>;

    /// Produces an independent copy of `self`.
    fn duplicate(&self) -> Result<Self, ElementError>;

    /// Takes the contents of `source`, leaving it in a valid but unspecified
    /// state.
    fn transfer(source: &mut Self) -> Result<Self, ElementError>;

    /// Overwrites `self` with a copy of `source`.
    ///
    /// The default implementation duplicates and replaces; types with cheaper
    /// in-place assignment can override it.
    fn assign(&mut self, source: &Self) -> Result<(), ElementError> {
        *self = source.duplicate()?;
        Ok(())
    }

    /// Overwrites `self` with the contents of `source`, leaving `source` in a
    /// valid but unspecified state.
    fn transfer_assign(&mut self, source: &mut Self) -> Result<(), ElementError> {
        *self = Self::transfer(source)?;
        Ok(())
    }
}

/// Implements [`Element`] for `Copy` types whose lifecycle operations cannot
/// fail.
macro_rules! implement_copy_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                fn fresh() -> Result<Self, ElementError> {
                    Ok(Self::default())
                }

                fn duplicate(&self) -> Result<Self, ElementError> {
                    Ok(*self)
                }

                fn transfer(source: &mut Self) -> Result<Self, ElementError> {
                    Ok(mem::take(source))
                }

                fn assign(&mut self, source: &Self) -> Result<(), ElementError> {
                    *self = *source;
                    Ok(())
                }
            }
        )*
    };
}

implement_copy_element!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char,
);

impl Element for String {
    fn fresh() -> Result<Self, ElementError> {
        Ok(Self::new())
    }

    fn duplicate(&self) -> Result<Self, ElementError> {
        Ok(self.clone())
    }

    fn transfer(source: &mut Self) -> Result<Self, ElementError> {
        Ok(mem::take(source))
    }

    fn assign(&mut self, source: &Self) -> Result<(), ElementError> {
        self.clone_from(source);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(ElementError: Send, Sync, Debug);

    #[test]
    fn scalar_lifecycle_is_infallible() {
        assert_eq!(u32::fresh().unwrap(), 0);

        let original = 42_u32;
        assert_eq!(original.duplicate().unwrap(), 42);

        let mut source = 7_u32;
        assert_eq!(u32::transfer(&mut source).unwrap(), 7);
    }

    #[test]
    fn string_transfer_drains_source() {
        let mut source = String::from("payload");
        let transferred = String::transfer(&mut source).unwrap();

        assert_eq!(transferred, "payload");
        assert_eq!(source, "");
    }

    #[test]
    fn default_assign_duplicates() {
        let mut target = String::from("old");
        let source = String::from("new");

        target.assign(&source).unwrap();

        assert_eq!(target, "new");
        assert_eq!(source, "new");
    }

    #[test]
    fn default_transfer_assign_drains_source() {
        let mut target = String::from("old");
        let mut source = String::from("new");

        target.transfer_assign(&mut source).unwrap();

        assert_eq!(target, "new");
        assert_eq!(source, "");
    }

    #[test]
    fn error_reports_operation_and_reason() {
        let error = ElementError::new("transfer", "handle is poisoned");

        assert_eq!(error.operation(), "transfer");
        assert_eq!(
            error.to_string(),
            "element transfer failed: handle is poisoned"
        );
    }

    #[test]
    fn scalar_capability_consts() {
        assert!(u32::TRANSFER_CANNOT_FAIL);
        assert!(u32::SUPPORTS_DUPLICATION);
        assert!(String::TRANSFER_CANNOT_FAIL);
    }
}
