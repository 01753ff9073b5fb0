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

//! Destinations of formatted log output.

use std::fmt;
use std::io;

use crate::color::Terminal;

mod capture;
mod stdio;
mod writer;

pub use self::capture::Capture;
pub use self::stdio::Stderr;
pub use self::stdio::Stdout;
pub use self::writer::Writer;

/// A destination that accepts bytes.
///
/// Sinks are shared with the logger and never closed by it.
pub trait Sink: fmt::Debug + Send + Sync + 'static {
    /// Write some bytes, returning how many were accepted.
    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Write all of `buf`.
    fn write_all(&self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.write(buf) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => buf = &buf[n..],
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Flush any buffered bytes.
    ///
    /// Default to a no-op.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// What the sink is connected to; probed once when a logger is initialized.
    ///
    /// Default to [`Terminal::None`].
    fn terminal(&self) -> Terminal {
        Terminal::None
    }
}

/// Adapt a shared sink to [`io::Write`].
pub(crate) struct SinkWriter<'a> {
    sink: &'a dyn Sink,
}

impl<'a> SinkWriter<'a> {
    pub(crate) fn new(sink: &'a dyn Sink) -> Self {
        Self { sink }
    }
}

impl io::Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.sink.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}
