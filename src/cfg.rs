/// Keeps the given items only when the `tracing` feature is enabled.
macro_rules! cfg_tracing {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "tracing")]
            $item
        )*
    };
}

/// Keeps the given items only when the `log` feature is enabled.
macro_rules! cfg_log {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "log")]
            $item
        )*
    };
}

/// Emits the same message through whichever of `log` and `tracing` is enabled.
///
/// Pool code only logs through this macro, so the two backends always agree.
macro_rules! diag {
    ($level:ident, $($arg:tt)+) => {
        cfg_log! {
            log::$level!($($arg)+);
        }

        cfg_tracing! {
            tracing::$level!($($arg)+);
        }
    };
}
