// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Capture the source location of the call site as a [`Location`](crate::Location).
///
/// # Examples
///
/// ```
/// let location = logscribe::location!();
/// assert_eq!(location.file, file!());
/// ```
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(
            ::std::module_path!(),
            ::std::file!(),
            $crate::location::__function_name({
                fn __f() {}
                fn __type_name_of<T>(_: T) -> &'static str {
                    ::std::any::type_name::<T>()
                }
                __type_name_of(__f)
            }),
            ::std::line!(),
            ::std::column!(),
        )
    };
}

/// Log at the given level through a [`Logger`](crate::Logger) or a [`Scoped`](crate::Scoped)
/// view.
///
/// Prefix the format string with `at:` to also render the location of the call site.
///
/// # Examples
///
/// ```
/// use logscribe::Level;
///
/// let logger = logscribe::Config::default().quiet(true).build().unwrap();
/// logscribe::log!(logger, Level::Info, "{} + {} = {}", 1, 2, 3);
/// logscribe::log!(logger.scoped("net"), Level::Debug, at: "connected");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, at: $($arg:tt)+) => {
        $logger.emit_at($level, &$crate::location!(), ::std::format_args!($($arg)+))
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.emit($level, ::std::format_args!($($arg)+))
    };
}

/// Log at the error level; see [`log!`](crate::log).
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log at the warning level; see [`log!`](crate::log).
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Log at the info level; see [`log!`](crate::log).
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log at the debug level; see [`log!`](crate::log).
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}
