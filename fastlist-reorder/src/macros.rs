#[cfg(feature = "tracing")]
macro_rules! rotrace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "fastlist::reorder", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! rotrace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! rodebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "fastlist::reorder", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! rodebug {
    ($($tt:tt)*) => {};
}
