/*!
Macro helpers for the decoder.

Reads from the decode window go through `window_byte!`, which is unchecked in regular
builds and checked in tests or when the `checked` cfg is enabled, so an off-by-one in
the scanner shows up as a panic rather than as UB.
*/

macro_rules! window_byte {
    ($window:expr, $index:expr) => {{
        #[cfg(any(all(test, debug), checked))]
        {
            *($window)
                .get($index)
                .expect("attempt to read past the decode window")
        }

        #[cfg(not(any(all(test, debug), checked)))]
        {
            // SAFETY: callers only read below `length`, which never exceeds the window size
            #[allow(unused_unsafe)]
            unsafe {
                *($window).get_unchecked($index)
            }
        }
    }};
}

macro_rules! test_assert {
    ($($tokens:tt)*) => {{
        #[cfg(test)]
        {
            debug_assert!($($tokens)*);
        }
    }};
}

macro_rules! test_assert_eq {
    ($($tokens:tt)*) => {{
        #[cfg(test)]
        {
            debug_assert_eq!($($tokens)*);
        }
    }};
}
