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

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::Error;
use crate::color::Console;
use crate::env::Environment;

/// When to color output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Color terminals only, honoring the `NO_COLOR` and `FORCE_COLOR` conventions.
    #[default]
    Auto,
    /// Always color, even when writing to files or pipes.
    Always,
    /// Never color.
    Never,
}

impl FromStr for ColorChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(Error::config("unknown color choice").with_context("color", s)),
        }
    }
}

/// What a sink is connected to, as far as coloring is concerned.
#[derive(Clone, Default)]
pub enum Terminal {
    /// A file, a pipe, an in-memory buffer, a socket: anything but an interactive terminal.
    #[default]
    None,
    /// An interactive terminal that interprets escape codes.
    Ansi,
    /// An interactive console that only understands character attributes.
    Legacy(Arc<dyn Console>),
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::None => f.write_str("None"),
            Terminal::Ansi => f.write_str("Ansi"),
            Terminal::Legacy(console) => f.debug_tuple("Legacy").field(console).finish(),
        }
    }
}

/// A legacy console together with the attributes to restore after styled text.
#[derive(Debug, Clone)]
pub struct ConsoleTarget {
    pub(crate) console: Arc<dyn Console>,
    pub(crate) baseline: u16,
}

impl ConsoleTarget {
    /// The attributes captured when the console was detected.
    pub fn baseline(&self) -> u16 {
        self.baseline
    }
}

/// How styled text is rendered on one sink.
#[derive(Debug, Clone, Default)]
pub enum Backend {
    /// Styles are dropped.
    #[default]
    NoColor,
    /// Styles are rendered as ANSI escape codes.
    EscapeCodes,
    /// Styles are rendered by mutating console attributes.
    ConsoleAttributes(ConsoleTarget),
}

impl Backend {
    /// Whether this backend renders styles at all.
    pub fn is_colored(&self) -> bool {
        !matches!(self, Backend::NoColor)
    }
}

/// Decide how a sink connected to `terminal` renders styles.
///
/// This is done once per sink when the logger is initialized.
///
/// # Errors
///
/// Return an [`ErrorKind::Init`](crate::ErrorKind::Init) error if the attributes of a legacy
/// console cannot be captured.
pub fn resolve(
    choice: ColorChoice,
    terminal: &Terminal,
    env: Option<&Environment>,
) -> Result<Backend, Error> {
    match choice {
        ColorChoice::Never => Ok(Backend::NoColor),
        ColorChoice::Always => escalate(terminal),
        ColorChoice::Auto => {
            if env.is_some_and(Environment::no_color) {
                return Ok(Backend::NoColor);
            }
            if env.is_some_and(Environment::force_color) {
                return escalate(terminal);
            }
            match terminal {
                Terminal::None => Ok(Backend::NoColor),
                Terminal::Ansi => Ok(Backend::EscapeCodes),
                Terminal::Legacy(console) => capture(console),
            }
        }
    }
}

fn escalate(terminal: &Terminal) -> Result<Backend, Error> {
    match terminal {
        Terminal::Legacy(console) => capture(console),
        Terminal::None | Terminal::Ansi => Ok(Backend::EscapeCodes),
    }
}

fn capture(console: &Arc<dyn Console>) -> Result<Backend, Error> {
    let baseline = console.attributes().map_err(|err| {
        Error::init("failed to read console attributes")
            .with_context("console", format!("{console:?}"))
            .with_source(err)
    })?;

    Ok(Backend::ConsoleAttributes(ConsoleTarget {
        console: console.clone(),
        baseline,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::console::testing::RecordingConsole;

    fn env(vars: &[(&str, &str)]) -> Environment {
        Environment::from_vars(vars.iter().copied())
    }

    #[test]
    fn test_never_wins() {
        let env = env(&[("FORCE_COLOR", "1")]);
        let backend = resolve(ColorChoice::Never, &Terminal::Ansi, Some(&env)).unwrap();
        assert!(matches!(backend, Backend::NoColor));
    }

    #[test]
    fn test_auto_follows_terminal() {
        let backend = resolve(ColorChoice::Auto, &Terminal::None, None).unwrap();
        assert!(matches!(backend, Backend::NoColor));
        let backend = resolve(ColorChoice::Auto, &Terminal::Ansi, None).unwrap();
        assert!(matches!(backend, Backend::EscapeCodes));
    }

    #[test]
    fn test_no_color_beats_terminal_and_force() {
        let env = env(&[("NO_COLOR", "1"), ("FORCE_COLOR", "1")]);
        let backend = resolve(ColorChoice::Auto, &Terminal::Ansi, Some(&env)).unwrap();
        assert!(matches!(backend, Backend::NoColor));

        // an empty NO_COLOR is ignored
        let env = Environment::from_vars([("NO_COLOR", "")]);
        let backend = resolve(ColorChoice::Auto, &Terminal::Ansi, Some(&env)).unwrap();
        assert!(matches!(backend, Backend::EscapeCodes));
    }

    #[test]
    fn test_force_color_escalates_non_terminals() {
        let env = env(&[("FORCE_COLOR", "1")]);
        let backend = resolve(ColorChoice::Auto, &Terminal::None, Some(&env)).unwrap();
        assert!(matches!(backend, Backend::EscapeCodes));
    }

    #[test]
    fn test_legacy_console_captures_baseline() {
        let console: Arc<dyn Console> = Arc::new(RecordingConsole::new(0x1f));
        let terminal = Terminal::Legacy(console);

        for choice in [ColorChoice::Auto, ColorChoice::Always] {
            match resolve(choice, &terminal, None).unwrap() {
                Backend::ConsoleAttributes(target) => assert_eq!(target.baseline(), 0x1f),
                other => panic!("unexpected backend: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!("ALWAYS".parse::<ColorChoice>().unwrap(), ColorChoice::Always);
        assert!("sometimes".parse::<ColorChoice>().is_err());
    }
}
