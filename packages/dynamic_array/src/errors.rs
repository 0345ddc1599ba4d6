use thiserror::Error;

use crate::ElementError;

/// Errors that can occur when acquiring raw storage or operating on a
/// [`DynamicArray`][crate::DynamicArray].
///
/// Which state the array is left in after an error depends on the operation:
/// strong-guarantee paths leave the receiver exactly as it was before the
/// call, basic-guarantee paths leave it valid but possibly partially
/// modified. Each operation documents its tier.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The underlying allocator could not provide a region for the requested
    /// number of element slots. Never partially applied: the caller observes
    /// no region at all.
    #[error("failed to acquire a memory region for {slots} element slots")]
    RegionAcquisition {
        /// Number of element slots the region was requested for.
        slots: usize,
    },

    /// The byte size of a region for this many element slots does not fit in
    /// a valid memory layout.
    #[error("a region of {slots} element slots exceeds the addressable size limit")]
    CapacityOverflow {
        /// Number of element slots the region was requested for.
        slots: usize,
    },

    /// An element-level operation (construction, duplication, transfer or
    /// assignment) reported a failure.
    #[error(transparent)]
    Element(#[from] ElementError),
}

/// A specialized `Result` type for dynamic array operations, returning the
/// crate's [`Error`] type as the error value unless overridden.
pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn region_acquisition_mentions_slot_count() {
        let error = Error::RegionAcquisition { slots: 12 };

        assert!(error.to_string().contains("12"));
    }

    #[test]
    fn element_error_converts_transparently() {
        let error: Error = ElementError::new("fresh", "no entropy available").into();

        assert_eq!(error.to_string(), "element fresh failed: no entropy available");
    }
}
