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

//! Logger configuration.

use std::sync::Arc;

use crate::Error;
use crate::Level;
use crate::LevelFilter;
use crate::Logger;
use crate::color::Color;
use crate::color::ColorChoice;
use crate::color::Style;
use crate::color::StyleSet;
use crate::env::Environment;
use crate::layout::DEFAULT_LINE_FORMAT;
use crate::layout::DEFAULT_LOCATION_FORMAT;
use crate::layout::DEFAULT_SCOPE_FORMAT;
use crate::layout::Layout;
use crate::layout::LinePlaceholder;
use crate::layout::Styles;
use crate::layout::Template;
use crate::level::LevelGate;
use crate::lock::Concurrency;
use crate::sink::Sink;
use crate::time::CompiledTime;
use crate::time::TimeFormat;
use crate::trap::DiscardTrap;
use crate::trap::Trap;

/// The default capacity of the per-call buffer, in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// A declarative logger configuration.
///
/// A configuration is compiled once with [`Config::compile`]; every template, style and time
/// format is validated at that point, so a compiled configuration cannot fail at log time.
///
/// # Examples
///
/// ```
/// use logscribe::Config;
/// use logscribe::Level;
/// use logscribe::color::ColorChoice;
/// use logscribe::time;
/// use logscribe::time::TimeFormat;
///
/// let compiled = Config::default()
///     .line_format("%t %l%s: %m\n")
///     .time(TimeFormat::reference(time::RFC3339))
///     .color(ColorChoice::Never)
///     .level_text(Level::Warning, "warn")
///     .compile()
///     .unwrap();
/// ```
#[must_use = "call `compile` to validate the configuration or `build` to create a logger"]
#[derive(Debug, Clone)]
pub struct Config {
    line_format: String,
    scope_format: String,
    location_format: String,
    color: ColorChoice,
    level_styles: [Vec<Style>; 4],
    scope_style: Vec<Style>,
    time_style: Vec<Style>,
    location_style: Vec<Style>,
    message_style: Vec<Style>,
    level_text: [String; 4],
    time: TimeFormat,
    buffered: bool,
    buffer_capacity: usize,
    concurrency: Concurrency,
    stdout: bool,
    stderr: bool,
    quiet: bool,
    max_level: LevelFilter,
    scope_levels: Vec<(String, LevelFilter)>,
    directives: Option<String>,
    trap: Arc<dyn Trap>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_format: DEFAULT_LINE_FORMAT.to_string(),
            scope_format: DEFAULT_SCOPE_FORMAT.to_string(),
            location_format: DEFAULT_LOCATION_FORMAT.to_string(),
            color: ColorChoice::Auto,
            level_styles: [
                vec![Style::Fg(Color::Red)],
                vec![Style::Fg(Color::Yellow)],
                vec![Style::Fg(Color::Green)],
                vec![Style::Fg(Color::Blue)],
            ],
            scope_style: vec![],
            time_style: vec![],
            location_style: vec![],
            message_style: vec![],
            level_text: Level::ALL.map(|level| level.as_str().to_string()),
            time: TimeFormat::Disabled,
            buffered: true,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            concurrency: Concurrency::Mutex,
            stdout: false,
            stderr: true,
            quiet: false,
            max_level: LevelFilter::Trace,
            scope_levels: vec![],
            directives: None,
            trap: Arc::new(DiscardTrap::default()),
        }
    }
}

impl Config {
    /// Set the line format.
    ///
    /// Placeholders: `%l` level, `%s` scope, `%t` time, `%L` location, `%m` message, `%%` a
    /// literal `%`. Default to `%l%s: %L%m\n`.
    pub fn line_format(mut self, format: impl Into<String>) -> Self {
        self.line_format = format.into();
        self
    }

    /// Set the format `%s` expands to for a named scope. The default scope renders nothing.
    ///
    /// Placeholders: `%s` the scope name, `%%`. Default to `(%s)`.
    pub fn scope_format(mut self, format: impl Into<String>) -> Self {
        self.scope_format = format.into();
        self
    }

    /// Set the format `%L` expands to when a location is supplied.
    ///
    /// Placeholders: `%M` module, `%f` file, `%F` function, `%l` line, `%c` column, `%%`.
    /// Default to `%f:%l:%c: `.
    pub fn location_format(mut self, format: impl Into<String>) -> Self {
        self.location_format = format.into();
        self
    }

    /// Set when output is colored. Default to [`ColorChoice::Auto`].
    pub fn color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set the styles of a level's text.
    pub fn level_style(mut self, level: Level, styles: impl Into<Vec<Style>>) -> Self {
        self.level_styles[level.index()] = styles.into();
        self
    }

    /// Set the styles of the rendered scope decoration.
    pub fn scope_style(mut self, styles: impl Into<Vec<Style>>) -> Self {
        self.scope_style = styles.into();
        self
    }

    /// Set the styles of the rendered time.
    pub fn time_style(mut self, styles: impl Into<Vec<Style>>) -> Self {
        self.time_style = styles.into();
        self
    }

    /// Set the styles of the rendered location.
    pub fn location_style(mut self, styles: impl Into<Vec<Style>>) -> Self {
        self.location_style = styles.into();
        self
    }

    /// Set the styles of the message.
    pub fn message_style(mut self, styles: impl Into<Vec<Style>>) -> Self {
        self.message_style = styles.into();
        self
    }

    /// Remove every style, including the default level colors.
    pub fn unstyled(mut self) -> Self {
        self.level_styles = Default::default();
        self.scope_style.clear();
        self.time_style.clear();
        self.location_style.clear();
        self.message_style.clear();
        self
    }

    /// Set the text `%l` renders for a level.
    pub fn level_text(mut self, level: Level, text: impl Into<String>) -> Self {
        self.level_text[level.index()] = text.into();
        self
    }

    /// Set how `%t` is rendered. Default to [`TimeFormat::Disabled`].
    pub fn time(mut self, time: TimeFormat) -> Self {
        self.time = time;
        self
    }

    /// Set whether each call is rendered into a buffer and written with one flush.
    ///
    /// Default to `true`.
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    /// Set the capacity of the per-call buffer. Default to [`DEFAULT_BUFFER_CAPACITY`].
    ///
    /// A record larger than the buffer is written in several pieces.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set how concurrent calls are serialized. Default to [`Concurrency::Mutex`].
    pub fn concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set whether the built-in stdout sink is attached. Default to `false`.
    pub fn stdout(mut self, enabled: bool) -> Self {
        self.stdout = enabled;
        self
    }

    /// Set whether the built-in stderr sink is attached. Default to `true`.
    pub fn stderr(mut self, enabled: bool) -> Self {
        self.stderr = enabled;
        self
    }

    /// Detach both built-in sinks, whatever [`Config::stdout`] and [`Config::stderr`] say.
    ///
    /// Sinks passed to [`CompiledConfig::init`] are not affected.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the most verbose level logged. Default to everything.
    pub fn max_level(mut self, level: LevelFilter) -> Self {
        self.max_level = level;
        self
    }

    /// Override the most verbose level for a scope and its `scope::*` children.
    pub fn scope_level(mut self, scope: impl Into<String>, level: LevelFilter) -> Self {
        self.scope_levels.push((scope.into(), level));
        self
    }

    /// Add level directives in the `RUST_LOG` syntax, where the scope plays the role of the
    /// target, e.g. `info,net=debug`. Directives take precedence over [`Config::max_level`] and
    /// [`Config::scope_level`].
    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    /// Set the receiver of per-sink write failures. Default to [`DiscardTrap`].
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Validate and compile the configuration.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::Config`](crate::ErrorKind::Config) error if a template is
    /// malformed, if the line format uses `%t` while time is disabled, if the time format is
    /// invalid, or if the level directives cannot be parsed.
    pub fn compile(&self) -> Result<CompiledConfig, Error> {
        let line = Template::compile(&self.line_format)?;
        let scope = Template::compile(&self.scope_format)?;
        let location = Template::compile(&self.location_format)?;

        if line.contains(LinePlaceholder::Time) && !self.time.is_enabled() {
            return Err(Error::config("time placeholder used while time is disabled")
                .with_context("template", "line format")
                .with_context("input", &self.line_format));
        }

        let time = CompiledTime::compile(&self.time)?;

        let styles = Styles {
            level: self.level_styles.clone().map(StyleSet::new),
            scope: StyleSet::new(self.scope_style.clone()),
            time: StyleSet::new(self.time_style.clone()),
            location: StyleSet::new(self.location_style.clone()),
            message: StyleSet::new(self.message_style.clone()),
        };

        let gate = LevelGate::new(
            self.max_level,
            &self.scope_levels,
            self.directives.as_deref(),
        )?;

        let layout = Layout {
            line,
            scope,
            location,
            level_text: self.level_text.clone(),
            styles,
        };

        Ok(CompiledConfig {
            layout: Arc::new(layout),
            time,
            gate: Arc::new(gate),
            color: self.color,
            buffer_capacity: self.buffered.then_some(self.buffer_capacity),
            concurrency: self.concurrency.clone(),
            stdout: self.stdout && !self.quiet,
            stderr: self.stderr && !self.quiet,
            trap: self.trap.clone(),
        })
    }

    /// Compile the configuration and create a logger with only the built-in sinks, reading the
    /// environment of the current process.
    ///
    /// # Errors
    ///
    /// See [`Config::compile`] and [`CompiledConfig::init`].
    pub fn build(&self) -> Result<Logger, Error> {
        self.compile()?.init(vec![], Some(&Environment::capture()))
    }
}

/// A validated configuration, ready to create any number of loggers.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub(crate) layout: Arc<Layout>,
    pub(crate) time: Option<CompiledTime>,
    pub(crate) gate: Arc<LevelGate>,
    pub(crate) color: ColorChoice,
    pub(crate) buffer_capacity: Option<usize>,
    pub(crate) concurrency: Concurrency,
    pub(crate) stdout: bool,
    pub(crate) stderr: bool,
    pub(crate) trap: Arc<dyn Trap>,
}

impl CompiledConfig {
    /// Create a logger writing to the enabled built-in sinks followed by `sinks`.
    ///
    /// `env` is only read during the call, for the color and time zone overrides. Without an
    /// environment the color overrides do not apply, and the time zone is the system time zone
    /// as detected by [`jiff::tz::TimeZone::try_system`], which itself honors the process `TZ`.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::Init`](crate::ErrorKind::Init) error if the time zone or a console
    /// cannot be resolved, or an [`ErrorKind::Config`](crate::ErrorKind::Config) error if a
    /// true-color style would be rendered on a legacy console.
    pub fn init(
        &self,
        sinks: Vec<Arc<dyn Sink>>,
        env: Option<&Environment>,
    ) -> Result<Logger, Error> {
        Logger::new(self, sinks, env)
    }
}
