#[cfg(all(debug_assertions, feature = "debug"))]
macro_rules! tracing {
    ($( $args:expr ),*) => { tracing::trace!( $( $args ),* ); }
}

#[cfg(not(all(debug_assertions, feature = "debug")))]
macro_rules! tracing {
    ($( $args:expr ),*) => {};
}

/// Invoke a libc function and convert a `-1` return into
/// `io::Error::last_os_error()`.
#[cfg(unix)]
macro_rules! syscall {
    ($fn:ident ( $($arg:expr),* $(,)? )) => {{
        let res = unsafe { libc::$fn($($arg),*) };
        if res == -1 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(res)
        }
    }};
}
