//! Error types.
//!
//! Two kinds of failure are reported as values:
//!
//! - [`RangeError`]: a range descriptor that cannot describe a run of slots
//!   (null, misaligned, reversed or unreachable bounds), or two ranges that
//!   were required to be disjoint but overlap.
//! - [`ConstructError`]: an element constructor of a `try_*` algorithm failed.
//!   The slots constructed before the failure stay live.
//!
//! Panics raised by element constructors are never caught, and misuse during
//! constant evaluation is rejected by the compiler; neither has an error type.

use core::{fmt, ops::Range};

use snafu::{GenerateImplicitData, Snafu};

/// A source code location captured with `#[track_caller]`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location(&'static core::panic::Location<'static>);

impl Default for Location {
    #[track_caller]
    fn default() -> Self {
        Self(core::panic::Location::caller())
    }
}

impl GenerateImplicitData for Location {
    #[track_caller]
    fn generate() -> Self {
        Self::default()
    }
}

impl Location {
    /// Returns the file name of the location.
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    /// Returns the line number of the location.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.0.line()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The kinds of errors that can occur when describing a range of slots.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[non_exhaustive]
pub enum RangeErrorKind {
    #[display("null slot pointer given")]
    NullPointer,
    #[display(
        "unaligned slot pointer given: address={address:#x}, \
         expected_alignment={expected_alignment}"
    )]
    UnalignedPointer {
        address: usize,
        expected_alignment: usize,
    },
    #[display("range end precedes its start: first={first:#x}, last={last:#x}")]
    Reversed { first: usize, last: usize },
    #[display(
        "range end is not reachable from its start: distance={distance}, \
         element_size={element_size}"
    )]
    Unreachable {
        distance: usize,
        element_size: usize,
    },
    #[display(
        "ranges overlap: first={:#x}..{:#x}, second={:#x}..{:#x}",
        first.start, first.end, second.start, second.end,
    )]
    Overlap {
        first: Range<usize>,
        second: Range<usize>,
    },
}

define_error!(
    /// The error type returned when a range of slots is malformed.
    pub struct RangeError {
        kind: RangeErrorKind,
    }
);

/// Returns an error if the byte spans of two ranges intersect.
///
/// Copy and move require their input and output to be disjoint. The
/// algorithms do not check this themselves (outside of debug assertions);
/// callers that cannot prove it statically can check it here first.
///
/// # Examples
///
/// ```
/// use placement::{RawRange, RangeErrorKind, error};
///
/// let mut buf = [0_u32; 8];
/// let base = buf.as_mut_ptr();
/// let (a, b, c) = unsafe {
///     (
///         RawRange::from_count(base, 4),
///         RawRange::from_count(base.add(4), 4),
///         RawRange::from_count(base.add(2), 4),
///     )
/// };
///
/// assert!(error::ensure_disjoint(&a, &b).is_ok());
/// let err = error::ensure_disjoint(&a, &c).unwrap_err();
/// assert!(matches!(err.kind(), RangeErrorKind::Overlap { .. }));
/// ```
#[track_caller]
pub fn ensure_disjoint<T, U>(
    first: &crate::RawRange<T>,
    second: &crate::RawRange<U>,
) -> Result<(), RangeError> {
    ensure!(
        !first.overlaps(second),
        RangeErrorKind::Overlap {
            first: first.byte_span(),
            second: second.byte_span(),
        }
    );
    Ok(())
}

/// The error type returned when an element constructor fails in a `try_*`
/// algorithm.
///
/// The algorithms never roll back: the first [`constructed`] slots of the
/// destination hold live objects that the caller now owns.
///
/// [`constructed`]: ConstructError::constructed
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(display("failed to construct element after {constructed} slot(s) were constructed"))]
pub struct ConstructError<E>
where
    E: core::error::Error + 'static,
{
    source: E,
    constructed: usize,
    #[snafu(implicit)]
    location: Location,
}

impl<E> ConstructError<E>
where
    E: core::error::Error + 'static,
{
    /// Returns the number of slots that were constructed before the failure.
    #[must_use]
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    /// Returns the location of the failed call.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Returns the error raised by the element constructor.
    #[must_use]
    pub fn source_ref(&self) -> &E {
        &self.source
    }

    /// Consumes the error, returning the error raised by the element
    /// constructor.
    #[must_use]
    pub fn into_source(self) -> E {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use core::error::Error as _;

    use snafu::IntoError as _;

    use super::*;

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    #[display("no more input")]
    struct Exhausted;

    #[test]
    fn test_range_error_display() {
        let err = RangeError::new(RangeErrorKind::UnalignedPointer {
            address: 0x1001,
            expected_alignment: 4,
        });
        assert_eq!(
            err.to_string(),
            "unaligned slot pointer given: address=0x1001, expected_alignment=4"
        );

        let err = RangeError::from(RangeErrorKind::Overlap {
            first: 0x10..0x20,
            second: 0x18..0x28,
        });
        assert_eq!(
            err.to_string(),
            "ranges overlap: first=0x10..0x20, second=0x18..0x28"
        );
        assert!(err.source().is_none());
    }

    #[cfg(feature = "error-with-location")]
    #[test]
    fn test_range_error_location() {
        let line = line!() + 1;
        let err = RangeError::new(RangeErrorKind::NullPointer);
        assert_eq!(err.location().line(), line);
        assert!(err.location().file().ends_with("error.rs"));
    }

    #[test]
    fn test_construct_error() {
        let line = line!() + 1;
        let err = ConstructSnafu { constructed: 3_usize }.into_error(Exhausted);
        assert_eq!(err.constructed(), 3);
        assert_eq!(err.location().line(), line);
        assert_eq!(
            err.to_string(),
            "failed to construct element after 3 slot(s) were constructed"
        );
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("no more input"));
        let Exhausted = err.into_source();
    }
}
