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

use crate::Level;
use crate::Location;
use crate::color::Backend;
use crate::color::StyleSet;
use crate::color::paint;
use crate::layout::LinePlaceholder;
use crate::layout::LocationPlaceholder;
use crate::layout::ScopePlaceholder;
use crate::layout::Segment;
use crate::layout::Template;
use crate::level::DEFAULT_SCOPE;

/// The values of one log call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Record<'a> {
    pub(crate) level: Level,
    pub(crate) scope: &'a str,
    pub(crate) location: Option<&'a Location<'a>>,
    pub(crate) time: Option<&'a str>,
    pub(crate) args: fmt::Arguments<'a>,
}

/// Compiled styles of every placeholder.
#[derive(Debug, Clone, Default)]
pub(crate) struct Styles {
    pub(crate) level: [StyleSet; 4],
    pub(crate) scope: StyleSet,
    pub(crate) time: StyleSet,
    pub(crate) location: StyleSet,
    pub(crate) message: StyleSet,
}

impl Styles {
    pub(crate) fn has_true_color(&self) -> bool {
        self.level.iter().any(StyleSet::has_true_color)
            || [&self.scope, &self.time, &self.location, &self.message]
                .into_iter()
                .any(StyleSet::has_true_color)
    }
}

/// The compiled templates, level texts and styles of a logger.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub(crate) line: Template<LinePlaceholder>,
    pub(crate) scope: Template<ScopePlaceholder>,
    pub(crate) location: Template<LocationPlaceholder>,
    pub(crate) level_text: [String; 4],
    pub(crate) styles: Styles,
}

impl Layout {
    /// Render one record to `w`, styling each placeholder for `backend`.
    pub(crate) fn render<W: Write>(
        &self,
        record: &Record<'_>,
        backend: &Backend,
        w: &mut W,
    ) -> io::Result<()> {
        let styles = &self.styles;

        for segment in self.line.segments() {
            match segment {
                Segment::Literal(text) => w.write_all(text.as_bytes())?,
                Segment::Placeholder(LinePlaceholder::Level) => {
                    let index = record.level.index();
                    let text = self.level_text[index].as_bytes();
                    paint(backend, &styles.level[index], w, |w| w.write_all(text))?;
                }
                Segment::Placeholder(LinePlaceholder::Scope) => {
                    // the default scope drops the whole scope decoration
                    if record.scope != DEFAULT_SCOPE {
                        paint(backend, &styles.scope, w, |w| {
                            self.render_scope(record.scope, w)
                        })?;
                    }
                }
                Segment::Placeholder(LinePlaceholder::Time) => {
                    if let Some(time) = record.time {
                        paint(backend, &styles.time, w, |w| w.write_all(time.as_bytes()))?;
                    }
                }
                Segment::Placeholder(LinePlaceholder::Location) => {
                    if let Some(location) = record.location {
                        paint(backend, &styles.location, w, |w| {
                            self.render_location(location, w)
                        })?;
                    }
                }
                Segment::Placeholder(LinePlaceholder::Message) => {
                    paint(backend, &styles.message, w, |w| w.write_fmt(record.args))?;
                }
            }
        }

        Ok(())
    }

    fn render_scope<W: Write>(&self, scope: &str, w: &mut W) -> io::Result<()> {
        for segment in self.scope.segments() {
            match segment {
                Segment::Literal(text) => w.write_all(text.as_bytes())?,
                Segment::Placeholder(ScopePlaceholder::Name) => w.write_all(scope.as_bytes())?,
            }
        }
        Ok(())
    }

    fn render_location<W: Write>(&self, location: &Location<'_>, w: &mut W) -> io::Result<()> {
        for segment in self.location.segments() {
            match segment {
                Segment::Literal(text) => w.write_all(text.as_bytes())?,
                Segment::Placeholder(p) => match p {
                    LocationPlaceholder::Module => w.write_all(location.module.as_bytes())?,
                    LocationPlaceholder::File => w.write_all(location.file.as_bytes())?,
                    LocationPlaceholder::Function => w.write_all(location.function.as_bytes())?,
                    LocationPlaceholder::Line => write!(w, "{}", location.line)?,
                    LocationPlaceholder::Column => write!(w, "{}", location.column)?,
                },
            }
        }
        Ok(())
    }
}
