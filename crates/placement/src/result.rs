//! Result types of the two-range algorithms.

/// The positions reached by an algorithm that walks an input and an output
/// range in lock-step.
///
/// Copy and move stop as soon as either range ends, so the two ranges may
/// have been consumed to different extents. Comparing [`input`] with the end of
/// the input range (or [`output`] with the end of the output range) tells the
/// caller which bound stopped the walk.
///
/// [`input`]: InOutResult::input
/// [`output`]: InOutResult::output
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::{RawRange, ranges};
///
/// let source = [1_u64, 2, 3];
/// let mut slots = [MaybeUninit::<u64>::uninit(); 5];
///
/// let input = RawRange::from_slice(&source);
/// let output = RawRange::from_uninit_slice(&mut slots);
/// let result = unsafe { ranges::uninitialized_copy(input, output) };
///
/// // The input ran out first.
/// assert_eq!(result.input, input.last().cast_const());
/// assert_eq!(result.output, unsafe { output.first().add(3) });
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InOutResult<I, O> {
    /// Position reached in the input range.
    pub input: I,
    /// Position reached in the output range.
    pub output: O,
}

impl<I, O> InOutResult<I, O> {
    /// Creates a result from the two positions.
    #[must_use]
    pub const fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Splits the result into `(input, output)`.
    #[must_use]
    pub fn into_parts(self) -> (I, O) {
        (self.input, self.output)
    }

    /// Maps the input position, keeping the output position.
    #[must_use]
    pub fn map_input<J, F>(self, f: F) -> InOutResult<J, O>
    where
        F: FnOnce(I) -> J,
    {
        InOutResult::new(f(self.input), self.output)
    }

    /// Maps the output position, keeping the input position.
    #[must_use]
    pub fn map_output<P, F>(self, f: F) -> InOutResult<I, P>
    where
        F: FnOnce(O) -> P,
    {
        InOutResult::new(self.input, f(self.output))
    }
}

impl<I, O> From<InOutResult<I, O>> for (I, O) {
    fn from(result: InOutResult<I, O>) -> Self {
        result.into_parts()
    }
}
