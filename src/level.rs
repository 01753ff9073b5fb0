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

//! Log levels and the level gate.

use std::fmt;
use std::str::FromStr;

pub use log::LevelFilter;

use crate::Error;

/// The scope of log calls that carry no explicit scope.
///
/// The default scope renders as nothing: the whole scope sub-template disappears.
pub const DEFAULT_SCOPE: &str = "default";

/// An enum representing the available verbosity levels of the logger.
///
/// Levels are ordered from the most severe to the most verbose, so `Error < Debug`.
#[repr(usize)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Level {
    /// Designates very serious errors.
    Error = 0,
    /// Designates hazardous situations.
    Warning = 1,
    /// Designates useful information.
    Info = 2,
    /// Designates lower priority information.
    Debug = 3,
}

impl Level {
    /// All levels, from the most severe to the most verbose.
    pub const ALL: [Level; 4] = [Level::Error, Level::Warning, Level::Info, Level::Debug];

    /// Return the conventional lowercase name of the `Level`.
    ///
    /// This is also the default display text of the level in rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Convert to the equivalent [`log::Level`].
    pub fn to_log_level(self) -> log::Level {
        match self {
            Level::Error => log::Level::Error,
            Level::Warning => log::Level::Warn,
            Level::Info => log::Level::Info,
            Level::Debug => log::Level::Debug,
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .or_else(|| s.eq_ignore_ascii_case("warn").then_some(Level::Warning))
            .ok_or_else(|| Error::config("unknown log level").with_context("level", s))
    }
}

/// The ambient level policy, checked before any other work in a log call.
///
/// A gate is a [`env_filter::Filter`] where the scope of a call plays the role of the target, so
/// `"info,net=debug"` enables `info` and more severe for every scope, and everything for the
/// `net` scope and its `net::*` children.
#[derive(Debug)]
pub(crate) struct LevelGate {
    filter: env_filter::Filter,
}

impl LevelGate {
    pub(crate) fn new(
        max_level: LevelFilter,
        scopes: &[(String, LevelFilter)],
        directives: Option<&str>,
    ) -> Result<Self, Error> {
        let mut builder = env_filter::Builder::new();
        builder.filter_level(max_level);
        for (scope, level) in scopes {
            builder.filter_module(scope, *level);
        }
        if let Some(directives) = directives {
            builder.try_parse(directives).map_err(|err| {
                Error::config("failed to parse level directives")
                    .with_context("directives", directives)
                    .with_source(anyhow::anyhow!("{err}"))
            })?;
        }

        Ok(Self {
            filter: builder.build(),
        })
    }

    #[inline]
    pub(crate) fn enabled(&self, level: Level, scope: &str) -> bool {
        let metadata = log::Metadata::builder()
            .level(level.to_log_level())
            .target(scope)
            .build();
        self.filter.enabled(&metadata)
    }

    /// The most verbose level any scope may emit.
    pub(crate) fn max_level(&self) -> LevelFilter {
        self.filter.filter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order() {
        assert!(Level::Error < Level::Warning);
        assert!(Level::Warning < Level::Info);
        assert!(Level::Info < Level::Debug);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("Debug".parse::<Level>().unwrap(), Level::Debug);
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_gate_per_scope() {
        let scopes = vec![("net".to_string(), LevelFilter::Debug)];
        let gate = LevelGate::new(LevelFilter::Warn, &scopes, None).unwrap();

        assert!(gate.enabled(Level::Error, DEFAULT_SCOPE));
        assert!(gate.enabled(Level::Warning, DEFAULT_SCOPE));
        assert!(!gate.enabled(Level::Info, DEFAULT_SCOPE));
        assert!(gate.enabled(Level::Debug, "net"));
        assert!(gate.enabled(Level::Debug, "net::tcp"));
        assert!(!gate.enabled(Level::Debug, "disk"));
        assert_eq!(gate.max_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_gate_directives() {
        let gate = LevelGate::new(LevelFilter::Debug, &[], Some("error,db=info")).unwrap();
        assert!(!gate.enabled(Level::Warning, DEFAULT_SCOPE));
        assert!(gate.enabled(Level::Info, "db"));
        assert!(!gate.enabled(Level::Debug, "db"));
    }
}
