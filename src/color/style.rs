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

use std::borrow::Cow;
use std::str::FromStr;

use colored::Color;

use crate::Error;
use crate::color::console;

const CSI: &str = "\x1b[";

/// A single style directive.
///
/// Text attributes and colors are rendered as ANSI SGR escape sequences, or, on a legacy Windows
/// console, as character attribute bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Bold or increased intensity.
    Bold,
    /// Faint or decreased intensity.
    Dim,
    /// Italic.
    Italic,
    /// Single underline.
    Underline,
    /// Slow blink.
    Blink,
    /// Swap foreground and background colors.
    Inverse,
    /// Concealed text.
    Hidden,
    /// Crossed-out text.
    Strikethrough,
    /// Double underline.
    DoubleUnderline,
    /// Overline.
    Overline,
    /// Foreground color.
    Fg(Color),
    /// Background color.
    Bg(Color),
}

impl Style {
    /// A 24-bit foreground color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Style::Fg(Color::TrueColor { r, g, b })
    }

    /// A 24-bit background color.
    pub const fn bg_rgb(r: u8, g: u8, b: u8) -> Self {
        Style::Bg(Color::TrueColor { r, g, b })
    }

    /// A 24-bit foreground color from a 3- or 6-digit hex string, with or without a leading `#`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logscribe::color::Style;
    ///
    /// assert_eq!(Style::hex("#f80").unwrap(), Style::rgb(0xff, 0x88, 0x00));
    /// assert_eq!(Style::hex("0a0b0c").unwrap(), Style::rgb(0x0a, 0x0b, 0x0c));
    /// assert!(Style::hex("#12345").is_err());
    /// ```
    pub fn hex(hex: &str) -> Result<Self, Error> {
        let (r, g, b) = parse_hex(hex)?;
        Ok(Style::rgb(r, g, b))
    }

    /// A 24-bit background color from a 3- or 6-digit hex string.
    pub fn bg_hex(hex: &str) -> Result<Self, Error> {
        let (r, g, b) = parse_hex(hex)?;
        Ok(Style::bg_rgb(r, g, b))
    }

    /// The SGR parameters that turn this style on.
    pub fn open_code(&self) -> Cow<'static, str> {
        match self {
            Style::Bold => "1".into(),
            Style::Dim => "2".into(),
            Style::Italic => "3".into(),
            Style::Underline => "4".into(),
            Style::Blink => "5".into(),
            Style::Inverse => "7".into(),
            Style::Hidden => "8".into(),
            Style::Strikethrough => "9".into(),
            Style::DoubleUnderline => "21".into(),
            Style::Overline => "53".into(),
            Style::Fg(Color::TrueColor { r, g, b }) => format!("38;2;{r};{g};{b}").into(),
            Style::Bg(Color::TrueColor { r, g, b }) => format!("48;2;{r};{g};{b}").into(),
            Style::Fg(color) => color.to_fg_str(),
            Style::Bg(color) => color.to_bg_str(),
        }
    }

    /// The SGR parameters that turn this style off without touching other open styles.
    pub fn close_code(&self) -> &'static str {
        match self {
            Style::Bold | Style::Dim => "22",
            Style::Italic => "23",
            Style::Underline | Style::DoubleUnderline => "24",
            Style::Blink => "25",
            Style::Inverse => "27",
            Style::Hidden => "28",
            Style::Strikethrough => "29",
            Style::Overline => "55",
            Style::Fg(_) => "39",
            Style::Bg(_) => "49",
        }
    }

    /// The full escape sequence that turns this style on.
    pub fn open(&self) -> String {
        format!("{CSI}{}m", self.open_code())
    }

    /// The full escape sequence that turns this style off.
    pub fn close(&self) -> String {
        format!("{CSI}{}m", self.close_code())
    }

    /// Whether this style needs a terminal with 24-bit color support.
    pub fn is_true_color(&self) -> bool {
        matches!(
            self,
            Style::Fg(Color::TrueColor { .. }) | Style::Bg(Color::TrueColor { .. })
        )
    }
}

impl FromStr for Style {
    type Err = Error;

    /// Parse a style name: `bold`, `dim`, `red`, `bright_blue`, `on_yellow`, `#ff8800`,
    /// `on_#222`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");

        if let Some(bg) = name.strip_prefix("on_") {
            return if bg.starts_with('#') {
                Style::bg_hex(bg)
            } else {
                color_by_name(bg)
                    .map(Style::Bg)
                    .ok_or_else(|| Error::config("unknown style").with_context("style", s))
            };
        }
        if name.starts_with('#') {
            return Style::hex(&name);
        }

        let style = match name.as_str() {
            "bold" => Style::Bold,
            "dim" | "faint" => Style::Dim,
            "italic" => Style::Italic,
            "underline" => Style::Underline,
            "blink" => Style::Blink,
            "inverse" | "reverse" => Style::Inverse,
            "hidden" | "conceal" => Style::Hidden,
            "strikethrough" | "crossed_out" => Style::Strikethrough,
            "double_underline" => Style::DoubleUnderline,
            "overline" => Style::Overline,
            other => match color_by_name(other) {
                Some(color) => Style::Fg(color),
                None => return Err(Error::config("unknown style").with_context("style", s)),
            },
        };
        Ok(style)
    }
}

fn color_by_name(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "bright_black" | "gray" | "grey" => Color::BrightBlack,
        "bright_red" => Color::BrightRed,
        "bright_green" => Color::BrightGreen,
        "bright_yellow" => Color::BrightYellow,
        "bright_blue" => Color::BrightBlue,
        "bright_magenta" | "bright_purple" => Color::BrightMagenta,
        "bright_cyan" => Color::BrightCyan,
        "bright_white" => Color::BrightWhite,
        _ => return None,
    };
    Some(color)
}

fn parse_hex(hex: &str) -> Result<(u8, u8, u8), Error> {
    let invalid = || Error::config("invalid hex color").with_context("hex", hex);

    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    match digits.len() {
        3 => {
            let r = channel(&digits[0..1])?;
            let g = channel(&digits[1..2])?;
            let b = channel(&digits[2..3])?;
            Ok((r * 0x11, g * 0x11, b * 0x11))
        }
        6 => Ok((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => Err(invalid()),
    }
}

/// An ordered list of styles with its renderings computed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSet {
    styles: Vec<Style>,
    open: String,
    close: String,
    console_fg: Option<u16>,
    console_flags: u16,
}

impl StyleSet {
    /// Compile a list of styles.
    pub fn new(styles: Vec<Style>) -> Self {
        let open = styles.iter().map(Style::open).collect();
        // last applied closes first
        let close = styles.iter().rev().map(Style::close).collect();

        let mut console_fg = None;
        let mut console_flags = 0;
        for style in &styles {
            match console::bits(style) {
                console::Bits::Foreground(bits) => console_fg = Some(bits),
                console::Bits::Flags(bits) => console_flags |= bits,
                console::Bits::None => {}
            }
        }

        Self {
            styles,
            open,
            close,
            console_fg,
            console_flags,
        }
    }

    /// The styles in application order.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Whether no style is applied.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Concatenated open sequences, in application order.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// Concatenated close sequences, in reverse application order.
    pub fn close(&self) -> &str {
        &self.close
    }

    /// Whether any style needs 24-bit color support.
    pub fn has_true_color(&self) -> bool {
        self.styles.iter().any(Style::is_true_color)
    }

    /// The console attributes to apply on top of `baseline`.
    pub fn console_attributes(&self, baseline: u16) -> u16 {
        let mut attributes = baseline;
        if let Some(fg) = self.console_fg {
            attributes = (attributes & !console::FOREGROUND_MASK) | fg;
        }
        attributes | self.console_flags
    }
}

impl From<Vec<Style>> for StyleSet {
    fn from(styles: Vec<Style>) -> Self {
        StyleSet::new(styles)
    }
}
