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

//! Color utilities.

use std::io;
use std::io::Write;

pub use colored::Color;

pub mod console;
mod policy;
mod style;

pub use self::console::Console;
#[cfg(windows)]
pub use self::console::WindowsConsole;
pub use self::policy::Backend;
pub use self::policy::ColorChoice;
pub use self::policy::ConsoleTarget;
pub use self::policy::Terminal;
pub use self::policy::resolve;
pub use self::style::Style;
pub use self::style::StyleSet;

/// Write the output of `body` styled with `styles` on `backend`.
///
/// With the console attribute backend, pending bytes are flushed before the attributes change and
/// again before they are restored, so the styled text reaches the console while the attributes are
/// in effect. The baseline is restored even if `body` fails.
pub(crate) fn paint<W, F>(backend: &Backend, styles: &StyleSet, w: &mut W, body: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut W) -> io::Result<()>,
{
    if styles.is_empty() {
        return body(w);
    }

    match backend {
        Backend::NoColor => body(w),
        Backend::EscapeCodes => {
            w.write_all(styles.open().as_bytes())?;
            body(w)?;
            w.write_all(styles.close().as_bytes())
        }
        Backend::ConsoleAttributes(target) => {
            w.flush()?;
            target
                .console
                .set_attributes(styles.console_attributes(target.baseline))?;
            let result = body(w).and_then(|_| w.flush());
            let restored = target.console.set_attributes(target.baseline);
            result.and(restored)
        }
    }
}

/// Render `text` styled with `styles` on `backend` into a string.
///
/// The console attribute backend cannot be captured in a string and renders plain text.
///
/// # Examples
///
/// ```
/// use logscribe::color::Backend;
/// use logscribe::color::Color;
/// use logscribe::color::Style;
/// use logscribe::color::StyleSet;
///
/// let styles = StyleSet::new(vec![Style::Bold, Style::Fg(Color::Red)]);
/// assert_eq!(
///     logscribe::color::render(&Backend::EscapeCodes, &styles, "oops"),
///     "\x1b[1m\x1b[31moops\x1b[39m\x1b[22m"
/// );
/// assert_eq!(logscribe::color::render(&Backend::NoColor, &styles, "oops"), "oops");
/// ```
pub fn render(backend: &Backend, styles: &StyleSet, text: &str) -> String {
    match backend {
        Backend::EscapeCodes if !styles.is_empty() => {
            format!("{}{text}{}", styles.open(), styles.close())
        }
        _ => text.to_string(),
    }
}
