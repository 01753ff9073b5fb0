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

use crate::Error;

/// The escape character of all templates.
pub const ESCAPE: char = '%';

/// The vocabulary of placeholders accepted by one kind of template.
pub trait Placeholder: fmt::Debug + Copy + Eq + Send + Sync + 'static {
    /// The template kind, used in error reports.
    const TEMPLATE: &'static str;

    /// Map the character following the escape to a placeholder.
    fn from_char(c: char) -> Option<Self>;

    /// The character this placeholder is spelled with.
    fn as_char(&self) -> char;
}

/// Placeholders of the line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePlaceholder {
    /// `%l`: the level text.
    Level,
    /// `%s`: the rendered scope sub-template.
    Scope,
    /// `%t`: the captured time.
    Time,
    /// `%L`: the rendered location sub-template.
    Location,
    /// `%m`: the message.
    Message,
}

impl Placeholder for LinePlaceholder {
    const TEMPLATE: &'static str = "line format";

    fn from_char(c: char) -> Option<Self> {
        match c {
            'l' => Some(LinePlaceholder::Level),
            's' => Some(LinePlaceholder::Scope),
            't' => Some(LinePlaceholder::Time),
            'L' => Some(LinePlaceholder::Location),
            'm' => Some(LinePlaceholder::Message),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            LinePlaceholder::Level => 'l',
            LinePlaceholder::Scope => 's',
            LinePlaceholder::Time => 't',
            LinePlaceholder::Location => 'L',
            LinePlaceholder::Message => 'm',
        }
    }
}

/// Placeholders of the scope format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePlaceholder {
    /// `%s`: the scope name.
    Name,
}

impl Placeholder for ScopePlaceholder {
    const TEMPLATE: &'static str = "scope format";

    fn from_char(c: char) -> Option<Self> {
        (c == 's').then_some(ScopePlaceholder::Name)
    }

    fn as_char(&self) -> char {
        's'
    }
}

/// Placeholders of the location format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPlaceholder {
    /// `%M`: the module path.
    Module,
    /// `%f`: the source file.
    File,
    /// `%F`: the enclosing function.
    Function,
    /// `%l`: the line number.
    Line,
    /// `%c`: the column number.
    Column,
}

impl Placeholder for LocationPlaceholder {
    const TEMPLATE: &'static str = "location format";

    fn from_char(c: char) -> Option<Self> {
        match c {
            'M' => Some(LocationPlaceholder::Module),
            'f' => Some(LocationPlaceholder::File),
            'F' => Some(LocationPlaceholder::Function),
            'l' => Some(LocationPlaceholder::Line),
            'c' => Some(LocationPlaceholder::Column),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            LocationPlaceholder::Module => 'M',
            LocationPlaceholder::File => 'f',
            LocationPlaceholder::Function => 'F',
            LocationPlaceholder::Line => 'l',
            LocationPlaceholder::Column => 'c',
        }
    }
}

/// One piece of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<P> {
    /// Bytes copied to the output as they are.
    Literal(String),
    /// A value substituted at render time.
    Placeholder(P),
}

/// A template compiled into an ordered list of segments.
///
/// Compilation happens once, when the configuration is compiled, so the hot path only walks the
/// segment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<P> {
    segments: Vec<Segment<P>>,
}

impl<P: Placeholder> Template<P> {
    /// Compile a template string.
    ///
    /// `%%` yields a literal `%`. Any other character after `%` must belong to the vocabulary of
    /// `P`, and a template must not end with a lone `%`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logscribe::layout::LinePlaceholder;
    /// use logscribe::layout::Segment;
    /// use logscribe::layout::Template;
    ///
    /// let template = Template::<LinePlaceholder>::compile("%l: 100%% %m").unwrap();
    /// assert_eq!(
    ///     template.segments(),
    ///     &[
    ///         Segment::Placeholder(LinePlaceholder::Level),
    ///         Segment::Literal(": 100% ".to_string()),
    ///         Segment::Placeholder(LinePlaceholder::Message),
    ///     ]
    /// );
    /// ```
    pub fn compile(template: &str) -> Result<Self, Error> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices();

        while let Some((offset, c)) = chars.next() {
            if c != ESCAPE {
                literal.push(c);
                continue;
            }

            match chars.next() {
                Some((_, ESCAPE)) => literal.push(ESCAPE),
                Some((_, c)) => match P::from_char(c) {
                    Some(placeholder) => {
                        if !literal.is_empty() {
                            segments.push(Segment::Literal(std::mem::take(&mut literal)));
                        }
                        segments.push(Segment::Placeholder(placeholder));
                    }
                    None => {
                        return Err(Error::config("unknown placeholder")
                            .with_context("template", P::TEMPLATE)
                            .with_context("input", template)
                            .with_context("offset", offset)
                            .with_context("placeholder", format!("{ESCAPE}{c}")));
                    }
                },
                None => {
                    return Err(Error::config("dangling escape at the end of template")
                        .with_context("template", P::TEMPLATE)
                        .with_context("input", template)
                        .with_context("offset", offset));
                }
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// The compiled segments, in template order.
    pub fn segments(&self) -> &[Segment<P>] {
        &self.segments
    }

    /// Whether the template contains the given placeholder.
    pub fn contains(&self, placeholder: P) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(p) if *p == placeholder))
    }
}

impl<P: Placeholder> fmt::Display for Template<P> {
    /// Writes the template back in its source syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    for c in text.chars() {
                        if c == ESCAPE {
                            write!(f, "{ESCAPE}{ESCAPE}")?;
                        } else {
                            write!(f, "{c}")?;
                        }
                    }
                }
                Segment::Placeholder(p) => write!(f, "{ESCAPE}{}", p.as_char())?,
            }
        }
        Ok(())
    }
}
