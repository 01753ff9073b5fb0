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
use std::io;
use std::io::Write;

use parking_lot::Mutex;

use crate::sink::Sink;

/// A sink over any [`io::Write`], such as a file or a socket.
///
/// # Examples
///
/// ```
/// use logscribe::sink::Sink;
/// use logscribe::sink::Writer;
///
/// let writer = Writer::new(Vec::new());
/// writer.write_all(b"hello").unwrap();
/// assert_eq!(writer.into_inner(), b"hello");
/// ```
pub struct Writer<W> {
    inner: Mutex<W>,
}

impl<W: Write> Writer<W> {
    /// Wrap `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Consume the sink, returning the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W> fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("inner", &std::any::type_name::<W>())
            .finish()
    }
}

impl<W: Write + Send + 'static> Sink for Writer<W> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}
