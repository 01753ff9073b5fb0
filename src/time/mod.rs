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

//! Time rendering for the `%t` placeholder.
//!
//! Two pattern languages are supported: jiff's strftime dialect ([`TimeFormat::Strftime`]) and the
//! reference layout language ([`TimeFormat::Reference`], see [`reference`]). The constants of this
//! module are reference layouts for common formats.

use std::fs;
use std::path::Path;

use jiff::Timestamp;
use jiff::Zoned;
use jiff::tz::TimeZone;

use crate::Error;
use crate::env::Environment;

pub mod reference;

pub use self::reference::ReferenceLayout;

/// The layout of C's `asctime`.
pub const ANSIC: &str = "Mon Jan _2 15:04:05 2006";
/// The layout of the Unix `date` command.
pub const UNIX_DATE: &str = "Mon Jan _2 15:04:05 MST 2006";
/// The layout of Ruby's `Time#to_s`.
pub const RUBY_DATE: &str = "Mon Jan 02 15:04:05 -0700 2006";
/// RFC822 with a zone abbreviation.
pub const RFC822: &str = "02 Jan 06 15:04 MST";
/// RFC822 with a numeric zone.
pub const RFC822Z: &str = "02 Jan 06 15:04 -0700";
/// RFC850.
pub const RFC850: &str = "Monday, 02-Jan-06 15:04:05 MST";
/// RFC1123 with a zone abbreviation.
pub const RFC1123: &str = "Mon, 02 Jan 2006 15:04:05 MST";
/// RFC1123 with a numeric zone.
pub const RFC1123Z: &str = "Mon, 02 Jan 2006 15:04:05 -0700";
/// RFC3339 at second precision.
pub const RFC3339: &str = "2006-01-02T15:04:05Z07:00";
/// RFC3339 with fractional seconds, trailing zeros trimmed.
pub const RFC3339_NANO: &str = "2006-01-02T15:04:05.999999999Z07:00";
/// Alias of [`RFC3339`].
pub const ISO8601: &str = RFC3339;
/// Twelve-hour clock, e.g. `3:04PM`.
pub const KITCHEN: &str = "3:04PM";
/// A short timestamp without the year.
pub const STAMP: &str = "Jan _2 15:04:05";
/// [`STAMP`] with milliseconds.
pub const STAMP_MILLI: &str = "Jan _2 15:04:05.000";
/// [`STAMP`] with microseconds.
pub const STAMP_MICRO: &str = "Jan _2 15:04:05.000000";
/// [`STAMP`] with nanoseconds.
pub const STAMP_NANO: &str = "Jan _2 15:04:05.000000000";
/// Date and time, e.g. `2006-01-02 15:04:05`.
pub const DATE_TIME: &str = "2006-01-02 15:04:05";
/// The date alone.
pub const DATE_ONLY: &str = "2006-01-02";
/// The time of day alone.
pub const TIME_ONLY: &str = "15:04:05";

/// How the `%t` placeholder is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimeFormat {
    /// No time is captured; `%t` is rejected in the line format.
    #[default]
    Disabled,
    /// A strftime pattern, e.g. `%Y-%m-%dT%H:%M:%S%:z`.
    Strftime(String),
    /// A reference layout, e.g. [`RFC3339`].
    Reference(String),
}

impl TimeFormat {
    /// A strftime pattern, rendered with [`jiff::fmt::strtime`].
    pub fn strftime(pattern: impl Into<String>) -> Self {
        TimeFormat::Strftime(pattern.into())
    }

    /// A reference layout, such as one of the presets of this module.
    pub fn reference(layout: impl Into<String>) -> Self {
        TimeFormat::Reference(layout.into())
    }

    /// Whether time is captured at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, TimeFormat::Disabled)
    }

    fn pattern(&self) -> &str {
        match self {
            TimeFormat::Disabled => "",
            TimeFormat::Strftime(pattern) | TimeFormat::Reference(pattern) => pattern,
        }
    }
}

/// A time format ready to render.
#[derive(Debug, Clone)]
pub(crate) enum CompiledTime {
    Strftime(String),
    Reference(ReferenceLayout),
}

impl CompiledTime {
    /// Compile `format` and render it once against a fixed instant, so that invalid patterns are
    /// reported before the first call. Return `None` if time is disabled.
    pub(crate) fn compile(format: &TimeFormat) -> Result<Option<Self>, Error> {
        let compiled = match format {
            TimeFormat::Disabled => return Ok(None),
            TimeFormat::Strftime(pattern) => CompiledTime::Strftime(pattern.clone()),
            TimeFormat::Reference(layout) => {
                CompiledTime::Reference(ReferenceLayout::compile(layout))
            }
        };

        let sample = Timestamp::UNIX_EPOCH.to_zoned(TimeZone::UTC);
        compiled.render(&sample, &mut String::new()).map_err(|err| {
            Error::config("invalid time format")
                .with_context("time", format.pattern())
                .with_source(err)
        })?;

        Ok(Some(compiled))
    }

    pub(crate) fn render(&self, zoned: &Zoned, out: &mut String) -> Result<(), jiff::Error> {
        match self {
            CompiledTime::Strftime(pattern) => {
                let text = jiff::fmt::strtime::format(pattern, zoned)?;
                out.push_str(&text);
            }
            CompiledTime::Reference(layout) => layout.format(zoned, out),
        }
        Ok(())
    }
}

/// The time zone and format of a logger with time enabled.
#[derive(Debug, Clone)]
pub(crate) struct Clock {
    tz: TimeZone,
    format: CompiledTime,
}

impl Clock {
    pub(crate) fn new(format: CompiledTime, env: Option<&Environment>) -> Result<Self, Error> {
        let tz = resolve_timezone(env)?;
        Ok(Self { tz, format })
    }

    /// Capture the current instant.
    pub(crate) fn capture(&self) -> Timestamp {
        Timestamp::now()
    }

    /// Render `ts` in the logger's time zone.
    pub(crate) fn render(&self, ts: Timestamp) -> Result<String, Error> {
        let zoned = ts.to_zoned(self.tz.clone());
        let mut text = String::new();
        self.format.render(&zoned, &mut text).map_err(|err| {
            Error::new(crate::ErrorKind::Render, "failed to render time")
                .with_context("timestamp", ts)
                .with_source(err)
        })?;
        Ok(text)
    }
}

/// Resolve the time zone of a logger.
///
/// With a `TZ` override, the zone is loaded from `TZDIR/<TZ>` if `TZDIR` is set, or from an
/// absolute path, or looked up in the time zone database; a name the database does not know is
/// parsed as a POSIX TZ string. Without an override, the system time zone is used.
///
/// # Errors
///
/// Return an [`ErrorKind::Init`](crate::ErrorKind::Init) error if the zone cannot be resolved.
pub fn resolve_timezone(env: Option<&Environment>) -> Result<TimeZone, Error> {
    let Some(name) = env.and_then(Environment::tz) else {
        return TimeZone::try_system()
            .map_err(|err| Error::init("failed to detect the system time zone").with_source(err));
    };

    let failed = |err: anyhow::Error| {
        Error::init("failed to resolve time zone")
            .with_context("tz", name)
            .with_source(err)
    };

    let path = match env.and_then(Environment::tzdir) {
        Some(dir) => Some(Path::new(dir).join(name)),
        None if Path::new(name).is_absolute() => Some(Path::new(name).to_path_buf()),
        None => None,
    };

    match path {
        Some(path) => {
            let data = fs::read(&path).map_err(|err| {
                failed(err.into()).with_context("path", path.display())
            })?;
            TimeZone::tzif(name, &data).map_err(|err| failed(err.into()))
        }
        None => TimeZone::get(name)
            .or_else(|err| TimeZone::posix(name).map_err(|_| err))
            .map_err(|err| failed(err.into())),
    }
}
