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

//! Receivers of the failures a log call swallows.

use std::fmt;
use std::io;
use std::io::Write;

use crate::Error;

/// A receiver of swallowed per-sink failures.
///
/// A log call never fails. Each write or flush failure on a sink is handed to the trap of the
/// logger instead, synchronously and while the logger's lock is held; the remaining sinks are
/// still written.
pub trait Trap: fmt::Debug + Send + Sync + 'static {
    /// Receive one failure.
    fn trap(&self, err: &Error);
}

/// A trap that drops every failure. This is the default.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct DiscardTrap {}

impl Trap for DiscardTrap {
    fn trap(&self, _: &Error) {}
}

/// A trap that prints every failure to the standard error.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct StderrTrap {}

impl Trap for StderrTrap {
    fn trap(&self, err: &Error) {
        let _ = writeln!(io::stderr(), "{err}");
    }
}
