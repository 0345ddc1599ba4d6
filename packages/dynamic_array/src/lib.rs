//! A growable array built directly on raw memory, with explicit failure-safety
//! guarantees for every operation.
//!
//! The crate separates the two concerns that a growable array has to juggle:
//!
//! * [`RawBuffer`] owns a span of uninitialized memory sized for a fixed
//!   number of element slots. It acquires and releases the region but never
//!   constructs or destroys elements.
//! * [`DynamicArray`] layers element lifecycle management on top: exactly the
//!   slots in `[0, len)` hold live elements, and every construction,
//!   duplication, transfer and destruction is initiated by the array.
//!
//! Element types implement the [`Element`] trait, which models every
//! lifecycle operation as fallible. Each array operation documents which of
//! two tiers it offers when an element operation fails: **strong** (the array
//! is exactly as it was before the call) or **basic** (the array stays valid
//! and leak-free but may be partially modified). Growth picks between
//! relocating elements by ownership transfer and by duplication per element
//! type, based on the trait's capability queries; see
//! [`DynamicArray::RELOCATES_BY_TRANSFER`].
//!
//! # Example
//!
//! ```
//! use dynamic_array::DynamicArray;
//!
//! let mut values = DynamicArray::new();
//!
//! for value in [10_i64, 20, 30] {
//!     values.push_back(value)?;
//! }
//!
//! values.insert(1, 15)?;
//! values.erase(0)?;
//!
//! assert_eq!(values.as_slice(), &[15, 20, 30]);
//!
//! // Element access goes through a plain slice.
//! let total: i64 = values.iter().sum();
//! assert_eq!(total, 65);
//! # Ok::<(), dynamic_array::Error>(())
//! ```
//!
//! Implementations of [`Element`] for the std scalar types and `String` are
//! provided; domain types implement the trait themselves and decide which
//! operations can fail:
//!
//! ```
//! use dynamic_array::{DynamicArray, Element, ElementError};
//!
//! /// A handle that can be moved but never copied.
//! #[derive(Debug, Default)]
//! struct Session {
//!     token: u64,
//! }
//!
//! impl Element for Session {
//!     const SUPPORTS_DUPLICATION: bool = false;
//!
//!     fn fresh() -> Result<Self, ElementError> {
//!         Ok(Self::default())
//!     }
//!
//!     fn duplicate(&self) -> Result<Self, ElementError> {
//!         Err(ElementError::new("duplicate", "sessions cannot be copied"))
//!     }
//!
//!     fn transfer(source: &mut Self) -> Result<Self, ElementError> {
//!         Ok(std::mem::take(source))
//!     }
//! }
//!
//! let mut sessions = DynamicArray::new();
//! sessions.push_back(Session { token: 7 })?;
//!
//! // Growth relocates by transfer because duplication is unavailable.
//! assert!(DynamicArray::<Session>::RELOCATES_BY_TRANSFER);
//! assert!(sessions.duplicate().is_err());
//! # Ok::<(), dynamic_array::Error>(())
//! ```

mod dynamic_array;
mod element;
mod errors;
mod raw_buffer;

pub use dynamic_array::*;
pub use element::*;
pub use errors::*;
pub use raw_buffer::*;
