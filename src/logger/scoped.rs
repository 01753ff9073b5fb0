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

use crate::Level;
use crate::Location;
use crate::Logger;

/// A view of a [`Logger`] bound to a scope.
///
/// A view shares everything with its logger: sinks, lock, time zone and configuration. It borrows
/// the logger, so it cannot outlive it.
#[derive(Debug, Clone, Copy)]
pub struct Scoped<'a> {
    logger: &'a Logger,
    scope: &'a str,
}

impl<'a> Scoped<'a> {
    pub(crate) fn new(logger: &'a Logger, scope: &'a str) -> Self {
        Self { logger, scope }
    }

    /// The scope of this view.
    pub fn scope(&self) -> &'a str {
        self.scope
    }

    /// The logger this view belongs to.
    pub fn logger(&self) -> &'a Logger {
        self.logger
    }

    /// Whether a call at `level` under this scope would be written.
    pub fn enabled(&self, level: Level) -> bool {
        self.logger.enabled(level, self.scope)
    }

    /// Log a message at `level` under this scope.
    pub fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        self.logger.log(level, self.scope, None, args);
    }

    /// Log a message at `level` under this scope with a source location.
    pub fn emit_at(&self, level: Level, location: &Location<'_>, args: fmt::Arguments<'_>) {
        self.logger.log(level, self.scope, Some(location), args);
    }

    /// Log a message at the error level.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args);
    }

    /// Log a message at the warning level.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warning, args);
    }

    /// Log a message at the info level.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args);
    }

    /// Log a message at the debug level.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args);
    }

    /// Log a message at the error level with a source location.
    pub fn error_at(&self, location: &Location<'_>, args: fmt::Arguments<'_>) {
        self.emit_at(Level::Error, location, args);
    }

    /// Log a message at the warning level with a source location.
    pub fn warn_at(&self, location: &Location<'_>, args: fmt::Arguments<'_>) {
        self.emit_at(Level::Warning, location, args);
    }

    /// Log a message at the info level with a source location.
    pub fn info_at(&self, location: &Location<'_>, args: fmt::Arguments<'_>) {
        self.emit_at(Level::Info, location, args);
    }

    /// Log a message at the debug level with a source location.
    pub fn debug_at(&self, location: &Location<'_>, args: fmt::Arguments<'_>) {
        self.emit_at(Level::Debug, location, args);
    }
}
