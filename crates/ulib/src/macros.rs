// SPDX-License-Identifier: Apache-2.0

//! Formatted output macros

/// Prints formatted output to standard output of a [`Handler`](crate::Handler).
///
/// The first argument is a mutable reference to the handler. Evaluates to
/// [`Result<()>`](crate::Result).
///
/// ```
/// use ulib::scripted::Scripted;
///
/// let mut h = Scripted::new(b"");
/// ulib::printf!(&mut h, "failed to write character (r = {})\n", 0).unwrap();
/// assert_eq!(h.stdout(), b"failed to write character (r = 0)\n");
/// ```
#[macro_export]
macro_rules! printf {
    ($h:expr, $($arg:tt)*) => {
        $crate::Handler::print_fmt(&mut *$h, format_args!($($arg)*))
    };
}
