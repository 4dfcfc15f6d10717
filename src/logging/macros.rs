//! Call-site capturing log macros.
//!
//! Each macro builds a [`LogMessage`](crate::LogMessage) tagged with
//! `file!()`, `line!()` and the enclosing function, formats into it and
//! drops it, which hands the text to the logger. Formatting is skipped when
//! the severity is filtered out.

/// Unqualified name of the enclosing function. Closures report the function
/// that contains them.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let mut name = type_name_of(f);
        name = name.strip_suffix("::f").unwrap_or(name);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name.rsplit("::").next().unwrap_or(name)
    }};
}

#[macro_export]
macro_rules! sn_log_to {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {{
        let __logger: &$crate::Logger = &$logger;
        let __severity: $crate::Severity = $severity;
        if __logger.is_enabled(__severity) {
            let mut __message = $crate::LogMessage::new(
                __logger,
                __severity,
                ::std::file!(),
                $crate::function_name!(),
                ::std::line!(),
            );
            let _ = ::std::fmt::Write::write_fmt(&mut __message, ::std::format_args!($($arg)+));
        }
    }};
}

/// Logs through the process-wide logger.
#[macro_export]
macro_rules! sn_log {
    ($severity:expr, $($arg:tt)+) => {
        $crate::sn_log_to!($crate::Logger::global(), $severity, $($arg)+)
    };
}

#[macro_export]
macro_rules! sn_trace {
    ($($arg:tt)+) => { $crate::sn_log!($crate::Severity::Trace, $($arg)+) };
}

#[macro_export]
macro_rules! sn_debug {
    ($($arg:tt)+) => { $crate::sn_log!($crate::Severity::Debug, $($arg)+) };
}

#[macro_export]
macro_rules! sn_info {
    ($($arg:tt)+) => { $crate::sn_log!($crate::Severity::Info, $($arg)+) };
}

#[macro_export]
macro_rules! sn_warn {
    ($($arg:tt)+) => { $crate::sn_log!($crate::Severity::Warn, $($arg)+) };
}

#[macro_export]
macro_rules! sn_error {
    ($($arg:tt)+) => { $crate::sn_log!($crate::Severity::Error, $($arg)+) };
}

/// Logs at FATAL, which aborts the process unless output is disabled.
#[macro_export]
macro_rules! sn_fatal {
    ($($arg:tt)+) => { $crate::sn_log!($crate::Severity::Fatal, $($arg)+) };
}

/// Debug-build assertion that logs `Assertion Failed: <expr> :: <message>`
/// at FATAL. The expression is not evaluated in release builds.
#[macro_export]
macro_rules! sn_assert {
    ($expr:expr $(,)?) => {
        $crate::sn_assert!($expr, "")
    };
    ($expr:expr, $($arg:tt)+) => {{
        if ::std::cfg!(debug_assertions) && !($expr) {
            $crate::sn_fatal!(
                "Assertion Failed: {} :: {}",
                ::std::stringify!($expr),
                ::std::format_args!($($arg)+)
            );
        }
    }};
}
