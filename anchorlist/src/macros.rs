// Logging shims. With `feature = "tracing"` these forward to `tracing` under the
// `anchorlist` target; without it they expand to nothing.

#[cfg(feature = "tracing")]
macro_rules! vtrace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "anchorlist", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! vtrace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! vdebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "anchorlist", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! vdebug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! vwarn {
    ($($tt:tt)*) => {
        tracing::warn!(target: "anchorlist", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! vwarn {
    ($($tt:tt)*) => {};
}

/// Logs a collaborator contract violation at `warn` and evaluates to `Err(error)`.
macro_rules! reject {
    ($err:expr) => {{
        let err: $crate::Error = $err;
        vwarn!(error = %err, "rejected");
        Err(err)
    }};
}
