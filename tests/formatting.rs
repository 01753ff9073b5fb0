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
use std::sync::Arc;

use logscribe::Config;
use logscribe::Environment;
use logscribe::Level;
use logscribe::Logger;
use logscribe::color::Backend;
use logscribe::color::Color;
use logscribe::color::ColorChoice;
use logscribe::color::Style;
use logscribe::color::Terminal;
use logscribe::sink::Capture;
use logscribe::sink::Sink;

fn init(config: Config, sink: &Arc<Capture>, env: Option<&Environment>) -> Logger {
    config
        .quiet(true)
        .compile()
        .unwrap()
        .init(vec![sink.clone()], env)
        .unwrap()
}

#[test]
fn test_default_formatting() {
    let capture = Arc::new(Capture::new());
    let logger = init(Config::default().unstyled(), &capture, None);

    logger.scoped("my_scope").warn(format_args!(""));
    assert_eq!(capture.take(), "warning(my_scope): \n");

    logger.warn(format_args!(""));
    assert_eq!(capture.take(), "warning: \n");
}

#[test]
fn test_literal_percent_in_every_template() {
    let capture = Arc::new(Capture::new());
    let logger = init(
        Config::default()
            .line_format("%%%l%%%s%% %L%m%%\n")
            .scope_format("[%%%s%%]")
            .location_format("%%%f%%%l%% "),
        &capture,
        None,
    );

    let location = logscribe::Location::new("m", "a.rs", "f", 7, 1);
    logger.scoped("s").info_at(&location, format_args!("50%"));
    assert_eq!(capture.contents(), "%info%[%s%]% %a.rs%7% 50%%\n");
}

#[test]
fn test_style_nesting_with_escape_codes() {
    let capture = Arc::new(Capture::new());
    let logger = init(
        Config::default()
            .color(ColorChoice::Always)
            .level_style(Level::Info, vec![Style::Bold, Style::Fg(Color::Red)])
            .message_style(vec![Style::Underline, Style::Bg(Color::Blue)]),
        &capture,
        None,
    );

    logger.info(format_args!("T"));
    assert_eq!(
        capture.contents(),
        "\x1b[1m\x1b[31minfo\x1b[39m\x1b[22m: \x1b[4m\x1b[44mT\x1b[49m\x1b[24m\n"
    );
}

#[test]
fn test_no_color_disables_terminals() {
    let terminal = Arc::new(Capture::new().with_terminal(Terminal::Ansi));
    let plain = Arc::new(Capture::new());
    let sinks: Vec<Arc<dyn Sink>> = vec![terminal.clone(), plain.clone()];

    let env = Environment::from_vars([("NO_COLOR", "1")]);
    let logger = Config::default()
        .quiet(true)
        .compile()
        .unwrap()
        .init(sinks.clone(), Some(&env))
        .unwrap();
    assert!(logger.backends().all(|b| matches!(b, Backend::NoColor)));

    logger.error(format_args!("plain"));
    assert_eq!(terminal.contents(), "error: plain\n");

    // without NO_COLOR only the terminal is colored
    let logger = Config::default()
        .quiet(true)
        .compile()
        .unwrap()
        .init(sinks.clone(), Some(&Environment::empty()))
        .unwrap();
    let backends: Vec<_> = logger.backends().collect();
    assert!(matches!(backends[0], Backend::EscapeCodes));
    assert!(matches!(backends[1], Backend::NoColor));

    // Always colors the in-memory sink as well
    let logger = Config::default()
        .quiet(true)
        .color(ColorChoice::Always)
        .compile()
        .unwrap()
        .init(sinks, None)
        .unwrap();
    assert!(logger.backends().all(|b| matches!(b, Backend::EscapeCodes)));
}

#[test]
fn test_json_shaped_template() {
    let capture = Arc::new(Capture::new());
    let logger = init(
        Config::default()
            .line_format("{\"level\":\"%l\"%s,\"data\":%m}\n")
            .scope_format(",\"scope\":\"%s\""),
        &capture,
        None,
    );

    logscribe::debug!(logger, "\"json log\"");
    assert_eq!(capture.take(), "{\"level\":\"debug\",\"data\":\"json log\"}\n");

    logscribe::warn!(logger.scoped("net"), "{}", serde_json::json!({"retries": 3}));
    let line = capture.take();
    let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(value["level"], "warning");
    assert_eq!(value["scope"], "net");
    assert_eq!(value["data"]["retries"], 3);
}

#[test]
fn test_custom_level_text() {
    let capture = Arc::new(Capture::new());
    let logger = init(
        Config::default()
            .level_text(Level::Warning, "WARN")
            .level_text(Level::Error, "ERROR")
            .line_format("[%l] %m\n"),
        &capture,
        None,
    );

    logscribe::warn!(logger, "disk at {}%", 91);
    logscribe::error!(logger, "disk full");
    assert_eq!(capture.contents(), "[WARN] disk at 91%\n[ERROR] disk full\n");
}

#[test]
fn test_location_macro_renders_call_site() {
    let capture = Arc::new(Capture::new());
    let logger = init(
        Config::default().location_format("%F:%l: "),
        &capture,
        None,
    );

    logscribe::info!(logger, at: "here");
    let line = line!() - 1;
    assert_eq!(
        capture.contents(),
        format!("info: test_location_macro_renders_call_site:{line}: here\n")
    );
}

#[test]
fn test_reference_time_format() {
    let capture = Arc::new(Capture::new());
    let env = Environment::from_vars([("TZ", "UTC")]);
    let logger = init(
        Config::default()
            .line_format("%t|%m\n")
            .time(logscribe::time::TimeFormat::reference(logscribe::time::DATE_ONLY)),
        &capture,
        Some(&env),
    );

    let today = || jiff::Timestamp::now().strftime("%Y-%m-%d").to_string();
    let before = today();
    logger.info(format_args!("x"));
    let after = today();

    let contents = capture.contents();
    let (date, rest) = contents.split_once('|').unwrap();
    assert_eq!(rest, "x\n");
    assert!(date == before || date == after, "{date}");
}
