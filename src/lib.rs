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

//! Logscribe is a template-driven logging front-end: leveled, scoped log calls are rendered
//! through compiled format templates and written to one or more sinks.
//!
//! # Overview
//!
//! A [`Config`] describes the output: a line format, the scope and location sub-formats, level
//! texts and styles, an optional time format, the color policy, buffering and locking. It is
//! compiled once into a [`CompiledConfig`], which validates everything up front, and any number of
//! [`Logger`]s can then be created from it. Each sink gets its own color decision when the logger
//! is created: plain text, ANSI escape codes, or the attributes of a legacy console.
//!
//! A log call never fails. Write failures on a sink are handed to a [`trap::Trap`] and the
//! remaining sinks are still written.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use logscribe::Config;
//! use logscribe::sink::Capture;
//!
//! let capture = Arc::new(Capture::new());
//! let logger = Config::default()
//!     .quiet(true)
//!     .line_format("{\"level\":\"%l\"%s,\"data\":%m}\n")
//!     .scope_format(",\"scope\":\"%s\"")
//!     .compile()
//!     .unwrap()
//!     .init(vec![capture.clone()], None)
//!     .unwrap();
//!
//! logscribe::debug!(logger, "\"json log\"");
//! logscribe::info!(logger.scoped("net"), "{}", 42);
//! assert_eq!(
//!     capture.contents(),
//!     "{\"level\":\"debug\",\"data\":\"json log\"}\n{\"level\":\"info\",\"scope\":\"net\",\"data\":42}\n"
//! );
//! ```
//!
//! A logger can also serve the [`log`] facade:
//!
//! ```
//! let logger = logscribe::Config::default().build().unwrap();
//! logger.apply().unwrap();
//!
//! log::info!("This is an info message.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_docs)]

pub mod color;
pub mod env;
pub mod layout;
pub mod lock;
pub mod sink;
pub mod time;
pub mod trap;

mod config;
mod error;
mod level;
/// Source locations of log calls.
#[doc(hidden)]
pub mod location;
mod logger;
mod macros;

pub use self::config::CompiledConfig;
pub use self::config::Config;
pub use self::config::DEFAULT_BUFFER_CAPACITY;
pub use self::env::Environment;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::level::DEFAULT_SCOPE;
pub use self::level::Level;
pub use self::level::LevelFilter;
pub use self::location::Location;
pub use self::logger::Logger;
pub use self::logger::Scoped;
