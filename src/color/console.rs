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

//! The legacy console attribute backend.
//!
//! Consoles without escape code support are colored by mutating the character attributes of the
//! console directly. The bit layout follows the Windows console API.

use std::fmt;
use std::io;

use colored::Color;

use crate::color::Style;

/// Blue foreground bit.
pub const FOREGROUND_BLUE: u16 = 0x0001;
/// Green foreground bit.
pub const FOREGROUND_GREEN: u16 = 0x0002;
/// Red foreground bit.
pub const FOREGROUND_RED: u16 = 0x0004;
/// Bright foreground bit.
pub const FOREGROUND_INTENSITY: u16 = 0x0008;
/// Swaps foreground and background.
pub const REVERSE_VIDEO: u16 = 0x4000;
/// Underlined text.
pub const UNDERSCORE: u16 = 0x8000;

/// Bits owned by the foreground color; a foreground style replaces them all.
pub const FOREGROUND_MASK: u16 =
    FOREGROUND_BLUE | FOREGROUND_GREEN | FOREGROUND_RED | FOREGROUND_INTENSITY;

/// A console whose character attributes can be read and written.
pub trait Console: fmt::Debug + Send + Sync + 'static {
    /// The attributes currently in effect.
    fn attributes(&self) -> io::Result<u16>;

    /// Replace the attributes used for subsequently written text.
    fn set_attributes(&self, attributes: u16) -> io::Result<()>;
}

pub(crate) enum Bits {
    Foreground(u16),
    Flags(u16),
    None,
}

pub(crate) fn bits(style: &Style) -> Bits {
    match style {
        Style::Bold | Style::Dim | Style::Italic | Style::Blink => {
            Bits::Flags(FOREGROUND_INTENSITY)
        }
        Style::Underline | Style::DoubleUnderline | Style::Strikethrough | Style::Overline => {
            Bits::Flags(UNDERSCORE)
        }
        Style::Inverse => Bits::Flags(REVERSE_VIDEO),
        Style::Hidden => Bits::None,
        Style::Fg(color) => match foreground(*color) {
            Some(bits) => Bits::Foreground(bits),
            None => Bits::None,
        },
        Style::Bg(_) => Bits::None,
    }
}

fn foreground(color: Color) -> Option<u16> {
    const R: u16 = FOREGROUND_RED;
    const G: u16 = FOREGROUND_GREEN;
    const B: u16 = FOREGROUND_BLUE;
    const I: u16 = FOREGROUND_INTENSITY;

    let bits = match color {
        Color::Black => 0,
        Color::Red => R,
        Color::Green => G,
        Color::Yellow => R | G,
        Color::Blue => B,
        Color::Magenta => R | B,
        Color::Cyan => G | B,
        Color::White => R | G | B,
        Color::BrightBlack => I,
        Color::BrightRed => R | I,
        Color::BrightGreen => G | I,
        Color::BrightYellow => R | G | I,
        Color::BrightBlue => B | I,
        Color::BrightMagenta => R | B | I,
        Color::BrightCyan => G | B | I,
        Color::BrightWhite => R | G | B | I,
        _ => return None,
    };
    Some(bits)
}

#[cfg(windows)]
pub use self::windows::WindowsConsole;

#[cfg(windows)]
mod windows {
    use std::io;
    use std::os::windows::io::AsRawHandle;
    use std::os::windows::io::RawHandle;

    use windows_sys::Win32::Foundation::HANDLE;
    use windows_sys::Win32::System::Console::CONSOLE_SCREEN_BUFFER_INFO;
    use windows_sys::Win32::System::Console::ENABLE_VIRTUAL_TERMINAL_PROCESSING;
    use windows_sys::Win32::System::Console::GetConsoleMode;
    use windows_sys::Win32::System::Console::GetConsoleScreenBufferInfo;
    use windows_sys::Win32::System::Console::SetConsoleTextAttribute;

    use super::Console;

    /// A Windows console screen buffer, addressed by its handle.
    #[derive(Debug)]
    pub struct WindowsConsole {
        handle: usize,
    }

    impl WindowsConsole {
        /// Wrap the handle of a standard stream.
        pub fn new(stream: &impl AsRawHandle) -> Self {
            let handle: RawHandle = stream.as_raw_handle();
            Self {
                handle: handle as usize,
            }
        }

        fn handle(&self) -> HANDLE {
            self.handle as HANDLE
        }

        /// Whether the console interprets escape codes itself.
        pub fn supports_escape_codes(&self) -> bool {
            let mut mode = 0;
            // SAFETY: the handle belongs to a standard stream that lives as long as the process
            let ok = unsafe { GetConsoleMode(self.handle(), &mut mode) };
            ok != 0 && mode & ENABLE_VIRTUAL_TERMINAL_PROCESSING != 0
        }
    }

    impl Console for WindowsConsole {
        fn attributes(&self) -> io::Result<u16> {
            // SAFETY: the struct is plain old data and fully written by the call on success
            let mut info: CONSOLE_SCREEN_BUFFER_INFO = unsafe { std::mem::zeroed() };
            // SAFETY: see `supports_escape_codes`
            let ok = unsafe { GetConsoleScreenBufferInfo(self.handle(), &mut info) };
            if ok == 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(info.wAttributes)
        }

        fn set_attributes(&self, attributes: u16) -> io::Result<()> {
            // SAFETY: see `supports_escape_codes`
            let ok = unsafe { SetConsoleTextAttribute(self.handle(), attributes) };
            if ok == 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }
    }
}
