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

//! Format templates and their rendering.

mod render;
mod template;

pub(crate) use self::render::Layout;
pub(crate) use self::render::Record;
pub(crate) use self::render::Styles;
pub use self::template::ESCAPE;
pub use self::template::LinePlaceholder;
pub use self::template::LocationPlaceholder;
pub use self::template::Placeholder;
pub use self::template::ScopePlaceholder;
pub use self::template::Segment;
pub use self::template::Template;

/// The default line format: `%l%s: %L%m\n`.
pub const DEFAULT_LINE_FORMAT: &str = "%l%s: %L%m\n";
/// The default scope format: `(%s)`.
pub const DEFAULT_SCOPE_FORMAT: &str = "(%s)";
/// The default location format: `%f:%l:%c: `.
pub const DEFAULT_LOCATION_FORMAT: &str = "%f:%l:%c: ";
