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

use parking_lot::Mutex;

use crate::color::Terminal;
use crate::sink::Sink;

/// A sink that keeps everything written to it in memory.
///
/// # Examples
///
/// ```
/// use logscribe::sink::Capture;
/// use logscribe::sink::Sink;
///
/// let capture = Capture::new();
/// capture.write_all(b"hello").unwrap();
/// assert_eq!(capture.contents(), "hello");
/// ```
#[derive(Debug, Default)]
pub struct Capture {
    buf: Mutex<Vec<u8>>,
    terminal: Terminal,
}

impl Capture {
    /// An empty capture that is not a terminal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `terminal` when probed, e.g. to exercise coloring.
    #[must_use]
    pub fn with_terminal(mut self, terminal: Terminal) -> Self {
        self.terminal = terminal;
        self
    }

    /// The captured bytes.
    pub fn bytes(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    /// The captured bytes as text, with invalid UTF-8 replaced.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Return the captured bytes as text and clear the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.buf.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Sink for Capture {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn terminal(&self) -> Terminal {
        self.terminal.clone()
    }
}
