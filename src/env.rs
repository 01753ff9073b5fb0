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

//! Environment signals consumed when a logger is initialized.

/// Disables color under [`ColorChoice::Auto`](crate::color::ColorChoice::Auto) when non-empty.
pub const NO_COLOR: &str = "NO_COLOR";
/// Forces color under [`ColorChoice::Auto`](crate::color::ColorChoice::Auto) when non-empty and
/// not `0`.
pub const FORCE_COLOR: &str = "FORCE_COLOR";
/// Alias of [`FORCE_COLOR`].
pub const CLICOLOR_FORCE: &str = "CLICOLOR_FORCE";
/// The time zone name, or a POSIX TZ string.
pub const TZ: &str = "TZ";
/// The directory searched for TZif files.
pub const TZDIR: &str = "TZDIR";

/// A snapshot of the environment variables a logger cares about.
///
/// A snapshot is only read while a logger is initialized and never retained.
///
/// # Examples
///
/// ```
/// use logscribe::Environment;
///
/// let env = Environment::from_vars([("NO_COLOR", "1"), ("TZ", "Asia/Shanghai")]);
/// assert!(env.no_color());
/// assert_eq!(env.tz(), Some("Asia/Shanghai"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    no_color: Option<String>,
    force_color: Option<String>,
    tz: Option<String>,
    tzdir: Option<String>,
}

impl Environment {
    /// An empty snapshot: no overrides at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the relevant variables of the current process.
    pub fn capture() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build a snapshot from name/value pairs; unrelated names are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut env = Self::default();
        for (name, value) in vars {
            let slot = match name.as_ref() {
                NO_COLOR => &mut env.no_color,
                // FORCE_COLOR takes precedence over CLICOLOR_FORCE
                FORCE_COLOR => &mut env.force_color,
                CLICOLOR_FORCE if env.force_color.is_none() => &mut env.force_color,
                TZ => &mut env.tz,
                TZDIR => &mut env.tzdir,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        env
    }

    /// Whether color is disabled: `NO_COLOR` is present with a non-empty value.
    pub fn no_color(&self) -> bool {
        self.no_color.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Whether color is forced: `FORCE_COLOR` is present, non-empty and not `0`.
    pub fn force_color(&self) -> bool {
        self.force_color
            .as_deref()
            .is_some_and(|v| !v.is_empty() && v != "0")
    }

    /// The time zone override, with the optional leading `:` of the POSIX convention removed.
    pub fn tz(&self) -> Option<&str> {
        self.tz
            .as_deref()
            .map(|tz| tz.strip_prefix(':').unwrap_or(tz))
            .filter(|tz| !tz.is_empty())
    }

    /// The time zone database directory override.
    pub fn tzdir(&self) -> Option<&str> {
        self.tzdir.as_deref().filter(|dir| !dir.is_empty())
    }

    /// Set a variable on the snapshot; unrelated names are ignored.
    #[must_use]
    pub fn with_var(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match name {
            NO_COLOR => self.no_color = value,
            FORCE_COLOR => self.force_color = value,
            // FORCE_COLOR takes precedence over CLICOLOR_FORCE
            CLICOLOR_FORCE if self.force_color.is_none() => self.force_color = value,
            CLICOLOR_FORCE => {}
            TZ => self.tz = value,
            TZDIR => self.tzdir = value,
            _ => {}
        }
        self
    }
}
