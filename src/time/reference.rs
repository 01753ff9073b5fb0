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

//! The reference layout time format.
//!
//! A layout is written as the reference instant `Mon Jan 2 15:04:05 MST 2006` would be displayed;
//! each recognized spelling of one of its components stands for that component of the formatted
//! instant. Any other text is copied as is.

use std::fmt::Write;

use jiff::Zoned;

const LONG_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const LONG_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    LongMonth,            // January
    ShortMonth,           // Jan
    NumMonth,             // 1
    ZeroMonth,            // 01
    LongWeekday,          // Monday
    ShortWeekday,         // Mon
    Day,                  // 2
    UnderDay,             // _2
    ZeroDay,              // 02
    UnderYearDay,         // __2
    ZeroYearDay,          // 002
    Hour,                 // 15
    Hour12,               // 3
    ZeroHour12,           // 03
    Minute,               // 4
    ZeroMinute,           // 04
    Second,               // 5
    ZeroSecond,           // 05
    LongYear,             // 2006
    Year,                 // 06
    PM,                   // PM
    Pm,                   // pm
    TZ,                   // MST
    NumTZ { colons: bool, hours_only: bool, seconds: bool, z: bool }, // -0700, Z07:00, ...
    Fraction { sep: char, digits: usize, trim: bool }, // .000, ,999
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Chunk {
    Literal(String),
    Token(Token),
}

/// A reference layout compiled into literal and component chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceLayout {
    chunks: Vec<Chunk>,
}

impl ReferenceLayout {
    /// Compile a layout. Every layout is valid: unrecognized text is literal.
    pub fn compile(layout: &str) -> Self {
        let mut chunks = vec![];
        let mut literal = String::new();
        let mut rest = layout;

        while let Some(c) = rest.chars().next() {
            match next_token(rest) {
                Some((token, len)) => {
                    if !literal.is_empty() {
                        chunks.push(Chunk::Literal(std::mem::take(&mut literal)));
                    }
                    chunks.push(Chunk::Token(token));
                    rest = &rest[len..];
                }
                None => {
                    literal.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }

        if !literal.is_empty() {
            chunks.push(Chunk::Literal(literal));
        }

        Self { chunks }
    }

    /// Format `zoned` with this layout.
    pub fn format(&self, zoned: &Zoned, out: &mut String) {
        for chunk in &self.chunks {
            match chunk {
                Chunk::Literal(text) => out.push_str(text),
                Chunk::Token(token) => format_token(*token, zoned, out),
            }
        }
    }

    /// Whether the layout contains no component at all.
    pub fn is_constant(&self) -> bool {
        self.chunks.iter().all(|c| matches!(c, Chunk::Literal(_)))
    }
}

fn next_token(s: &str) -> Option<(Token, usize)> {
    let b = s.as_bytes();
    let at = |i: usize| b.get(i).copied();
    let starts = |p: &str| s.starts_with(p);

    let numtz = |colons, hours_only, seconds, z| Token::NumTZ {
        colons,
        hours_only,
        seconds,
        z,
    };

    let token = match b[0] {
        b'J' if starts("January") => (Token::LongMonth, 7),
        b'J' if starts("Jan") => (Token::ShortMonth, 3),
        b'M' if starts("Monday") => (Token::LongWeekday, 6),
        b'M' if starts("Mon") => (Token::ShortWeekday, 3),
        b'M' if starts("MST") => (Token::TZ, 3),
        b'0' => match at(1) {
            Some(b'1') => (Token::ZeroMonth, 2),
            Some(b'2') => (Token::ZeroDay, 2),
            Some(b'3') => (Token::ZeroHour12, 2),
            Some(b'4') => (Token::ZeroMinute, 2),
            Some(b'5') => (Token::ZeroSecond, 2),
            Some(b'6') => (Token::Year, 2),
            Some(b'0') if at(2) == Some(b'2') => (Token::ZeroYearDay, 3),
            _ => return None,
        },
        b'1' if at(1) == Some(b'5') => (Token::Hour, 2),
        b'1' => (Token::NumMonth, 1),
        b'2' if starts("2006") => (Token::LongYear, 4),
        b'2' => (Token::Day, 1),
        // `_2006` is a literal underscore followed by the year
        b'_' if starts("_2") && !starts("_2006") => (Token::UnderDay, 2),
        b'_' if starts("__2") => (Token::UnderYearDay, 3),
        b'3' => (Token::Hour12, 1),
        b'4' => (Token::Minute, 1),
        b'5' => (Token::Second, 1),
        b'P' if at(1) == Some(b'M') => (Token::PM, 2),
        b'p' if at(1) == Some(b'm') => (Token::Pm, 2),
        b'-' if starts("-07:00:00") => (numtz(true, false, true, false), 9),
        b'-' if starts("-070000") => (numtz(false, false, true, false), 7),
        b'-' if starts("-07:00") => (numtz(true, false, false, false), 6),
        b'-' if starts("-0700") => (numtz(false, false, false, false), 5),
        b'-' if starts("-07") => (numtz(false, true, false, false), 3),
        b'Z' if starts("Z07:00:00") => (numtz(true, false, true, true), 9),
        b'Z' if starts("Z070000") => (numtz(false, false, true, true), 7),
        b'Z' if starts("Z07:00") => (numtz(true, false, false, true), 6),
        b'Z' if starts("Z0700") => (numtz(false, false, false, true), 5),
        b'Z' if starts("Z07") => (numtz(false, true, false, true), 3),
        sep @ (b'.' | b',') => {
            let digit = at(1).filter(|d| *d == b'0' || *d == b'9')?;
            let digits = b[1..].iter().take_while(|d| **d == digit).count();
            // `.0001` is not a fraction: the run must not be followed by another digit
            if at(1 + digits).is_some_and(|d| d.is_ascii_digit()) {
                return None;
            }
            let fraction = Token::Fraction {
                sep: sep as char,
                digits,
                trim: digit == b'9',
            };
            (fraction, 1 + digits)
        }
        _ => return None,
    };

    Some(token)
}

fn pad(out: &mut String, value: i64, width: usize, fill: char) {
    let text = value.unsigned_abs().to_string();
    if value < 0 {
        out.push('-');
    }
    for _ in text.len()..width {
        out.push(fill);
    }
    out.push_str(&text);
}

fn format_token(token: Token, zoned: &Zoned, out: &mut String) {
    let month = usize::try_from(zoned.month() - 1).unwrap_or_default();
    let weekday = usize::try_from(zoned.weekday().to_monday_zero_offset()).unwrap_or_default();
    let hour = i64::from(zoned.hour());
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };

    match token {
        Token::LongMonth => out.push_str(LONG_MONTHS[month]),
        Token::ShortMonth => out.push_str(&LONG_MONTHS[month][..3]),
        Token::NumMonth => pad(out, i64::from(zoned.month()), 0, '0'),
        Token::ZeroMonth => pad(out, i64::from(zoned.month()), 2, '0'),
        Token::LongWeekday => out.push_str(LONG_WEEKDAYS[weekday]),
        Token::ShortWeekday => out.push_str(&LONG_WEEKDAYS[weekday][..3]),
        Token::Day => pad(out, i64::from(zoned.day()), 0, '0'),
        Token::UnderDay => pad(out, i64::from(zoned.day()), 2, ' '),
        Token::ZeroDay => pad(out, i64::from(zoned.day()), 2, '0'),
        Token::UnderYearDay => pad(out, i64::from(zoned.day_of_year()), 3, ' '),
        Token::ZeroYearDay => pad(out, i64::from(zoned.day_of_year()), 3, '0'),
        Token::Hour => pad(out, hour, 2, '0'),
        Token::Hour12 => pad(out, hour12, 0, '0'),
        Token::ZeroHour12 => pad(out, hour12, 2, '0'),
        Token::Minute => pad(out, i64::from(zoned.minute()), 0, '0'),
        Token::ZeroMinute => pad(out, i64::from(zoned.minute()), 2, '0'),
        Token::Second => pad(out, i64::from(zoned.second()), 0, '0'),
        Token::ZeroSecond => pad(out, i64::from(zoned.second()), 2, '0'),
        Token::LongYear => pad(out, i64::from(zoned.year()), 4, '0'),
        Token::Year => pad(out, i64::from(zoned.year()).rem_euclid(100), 2, '0'),
        Token::PM => out.push_str(if hour >= 12 { "PM" } else { "AM" }),
        Token::Pm => out.push_str(if hour >= 12 { "pm" } else { "am" }),
        Token::TZ => format_zone_name(zoned, out),
        Token::NumTZ {
            colons,
            hours_only,
            seconds,
            z,
        } => format_offset(zoned, out, colons, hours_only, seconds, z),
        Token::Fraction { sep, digits, trim } => {
            let nanos = format!("{:09}", zoned.subsec_nanosecond());
            let mut fraction = &nanos[..digits.min(9)];
            if trim {
                fraction = fraction.trim_end_matches('0');
                if fraction.is_empty() {
                    return;
                }
            }
            out.push(sep);
            out.push_str(fraction);
            for _ in 9..digits {
                out.push('0');
            }
        }
    }
}

fn format_zone_name(zoned: &Zoned, out: &mut String) {
    match jiff::fmt::strtime::format("%Z", zoned) {
        Ok(name) if !name.is_empty() => out.push_str(&name),
        _ => format_offset(zoned, out, false, false, false, false),
    }
}

fn format_offset(
    zoned: &Zoned,
    out: &mut String,
    colons: bool,
    hours_only: bool,
    seconds: bool,
    z: bool,
) {
    let offset = zoned.offset().seconds();
    if z && offset == 0 {
        out.push('Z');
        return;
    }

    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.unsigned_abs();
    let (hh, mm, ss) = (offset / 3600, offset / 60 % 60, offset % 60);

    let sep = if colons { ":" } else { "" };
    // writing to a string never fails
    let _ = write!(out, "{sign}{hh:02}");
    if !hours_only {
        let _ = write!(out, "{sep}{mm:02}");
    }
    if seconds {
        let _ = write!(out, "{sep}{ss:02}");
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use jiff::tz::TimeZone;

    use super::*;

    fn reference(tz: TimeZone) -> Zoned {
        date(2006, 1, 2)
            .at(15, 4, 5, 123_456_789)
            .to_zoned(tz)
            .unwrap()
    }

    fn fmt(layout: &str, zoned: &Zoned) -> String {
        let mut out = String::new();
        ReferenceLayout::compile(layout).format(zoned, &mut out);
        out
    }

    #[test]
    fn test_reference_instant_formats_as_itself() {
        let zoned = reference(TimeZone::fixed(jiff::tz::offset(-7)));
        assert_eq!(
            fmt("2006-01-02T15:04:05-07:00", &zoned),
            "2006-01-02T15:04:05-07:00"
        );
        assert_eq!(fmt("Jan _2 15:04:05", &zoned), "Jan  2 15:04:05");
        assert_eq!(fmt("3:04PM", &zoned), "3:04PM");
        assert_eq!(fmt("Monday, 02-Jan-06", &zoned), "Monday, 02-Jan-06");
        assert_eq!(fmt("002 __2", &zoned), "002   2");
    }

    #[test]
    fn test_fractions() {
        let zoned = reference(TimeZone::UTC);
        assert_eq!(fmt("05.000", &zoned), "05.123");
        assert_eq!(fmt("05,000000", &zoned), "05,123456");
        assert_eq!(fmt("05.999999999", &zoned), "05.123456789");

        let whole = date(2024, 8, 11).at(9, 0, 0, 0).to_zoned(TimeZone::UTC).unwrap();
        assert_eq!(fmt("05.999", &whole), "00");
        assert_eq!(fmt("05.000", &whole), "00.000");
        // a dot followed by a longer digit run is literal
        assert_eq!(fmt(".0001", &whole), ".0001");
    }

    #[test]
    fn test_utc_offsets() {
        let zoned = reference(TimeZone::UTC);
        assert_eq!(fmt("Z07:00", &zoned), "Z");
        assert_eq!(fmt("-07:00", &zoned), "+00:00");
        assert_eq!(fmt("-0700", &zoned), "+0000");
        assert_eq!(fmt("-07", &zoned), "+00");

        let zoned = reference(TimeZone::fixed(jiff::tz::offset(8)));
        assert_eq!(fmt("Z0700", &zoned), "+0800");
        assert_eq!(fmt("-07:00:00", &zoned), "+08:00:00");
    }

    #[test]
    fn test_twelve_hour_clock() {
        let midnight = date(2024, 1, 1).at(0, 5, 0, 0).to_zoned(TimeZone::UTC).unwrap();
        assert_eq!(fmt("3:04 pm", &midnight), "12:05 am");
        let noon = date(2024, 1, 1).at(12, 5, 0, 0).to_zoned(TimeZone::UTC).unwrap();
        assert_eq!(fmt("03:04 PM", &noon), "12:05 PM");
    }

    #[test]
    fn test_literals() {
        let layout = ReferenceLayout::compile("[at] ");
        assert!(layout.is_constant());
        let zoned = reference(TimeZone::UTC);
        assert_eq!(fmt("_2006", &zoned), "_2006");
        assert_eq!(fmt("année 2006 ✓", &zoned), "année 2006 ✓");
    }
}
