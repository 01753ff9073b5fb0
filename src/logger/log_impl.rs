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

//! Bridge to the [`log`] facade.

use crate::Level;
use crate::Logger;
use crate::level::DEFAULT_SCOPE;

/// The scope of a `log` record: its target when it was set explicitly, the default scope
/// otherwise.
fn scope_of<'a>(record: &log::Record<'a>) -> &'a str {
    match record.module_path() {
        Some(module) if module == record.target() => DEFAULT_SCOPE,
        _ => record.target(),
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, metadata.level().into(), metadata.target())
    }

    fn log(&self, record: &log::Record) {
        // directives name module paths, so the gate sees the target
        if !log::Log::enabled(self, record.metadata()) {
            return;
        }

        // a `log` record carries no function or column, so `%L` stays empty
        self.dispatch(
            Level::from(record.level()),
            scope_of(record),
            None,
            *record.args(),
        );
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

impl Logger {
    /// Install this logger as the global [`log`] logger.
    ///
    /// The global max level is set to the most verbose level the logger's gate lets through;
    /// `trace` records are let through wherever `debug` is, since they are logged as `debug`.
    ///
    /// # Errors
    ///
    /// This function will fail if it is called more than once, or if another library has already
    /// initialized a global logger.
    pub fn apply(self) -> Result<(), log::SetLoggerError> {
        let max_level = match self.gate.max_level() {
            log::LevelFilter::Debug => log::LevelFilter::Trace,
            level => level,
        };
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}
