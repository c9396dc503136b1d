#[cfg(feature = "tracing")]
macro_rules! fltrace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "fastlist", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! fltrace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! fldebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "fastlist", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! fldebug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! flwarn {
    ($($tt:tt)*) => {
        tracing::warn!(target: "fastlist", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! flwarn {
    ($($tt:tt)*) => {};
}

/// Whether per-render diagnostics (viewport diagrams) are worth building.
#[cfg(feature = "tracing")]
macro_rules! fltrace_enabled {
    () => {
        tracing::enabled!(target: "fastlist", tracing::Level::TRACE)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! fltrace_enabled {
    () => {
        false
    };
}
