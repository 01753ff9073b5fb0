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

use std::io;
use std::io::IsTerminal;
use std::io::Write;

use crate::color::Terminal;
use crate::sink::Sink;

/// A sink that writes to stdout.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Stdout {}

impl Sink for Stdout {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write(buf)
    }

    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        io::stdout().write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().flush()
    }

    fn terminal(&self) -> Terminal {
        probe(&io::stdout())
    }
}

/// A sink that writes to stderr.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Stderr {}

impl Sink for Stderr {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write(buf)
    }

    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        io::stderr().write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().flush()
    }

    fn terminal(&self) -> Terminal {
        probe(&io::stderr())
    }
}

#[cfg(not(windows))]
fn probe(stream: &impl IsTerminal) -> Terminal {
    if stream.is_terminal() {
        Terminal::Ansi
    } else {
        Terminal::None
    }
}

#[cfg(windows)]
fn probe<S>(stream: &S) -> Terminal
where
    S: IsTerminal + std::os::windows::io::AsRawHandle,
{
    use std::sync::Arc;

    use crate::color::WindowsConsole;

    if !stream.is_terminal() {
        return Terminal::None;
    }

    let console = WindowsConsole::new(stream);
    if console.supports_escape_codes() {
        Terminal::Ansi
    } else {
        Terminal::Legacy(Arc::new(console))
    }
}
