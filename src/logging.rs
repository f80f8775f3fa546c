//! Logging macros shared by device and host builds.
//!
//! On the device these forward to `defmt`. Host builds (tests) print to stdout,
//! which the test harness captures.
//!
//! Format strings must stay within the subset both back ends understand: plain `{}`
//! placeholders, with arguments that implement both `defmt::Format` and `Display`.

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(not(feature = "host"))]
        ::defmt::info!($($arg)*);

        #[cfg(feature = "host")]
        ::std::println!("[INFO] {}", ::core::format_args!($($arg)*));
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(not(feature = "host"))]
        ::defmt::warn!($($arg)*);

        #[cfg(feature = "host")]
        ::std::println!("[WARN] {}", ::core::format_args!($($arg)*));
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(not(feature = "host"))]
        ::defmt::debug!($($arg)*);

        #[cfg(feature = "host")]
        ::std::println!("[DEBUG] {}", ::core::format_args!($($arg)*));
    }};
}

macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(not(feature = "host"))]
        ::defmt::trace!($($arg)*);

        // One line per servo per tick; too chatty for host test output.
        #[cfg(feature = "host")]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

pub(crate) use {log_debug, log_info, log_trace, log_warn};
