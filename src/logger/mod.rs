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

//! The logger and its dispatch loop.

use std::cell::RefCell;
use std::fmt;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::sync::Arc;

use crate::CompiledConfig;
use crate::Config;
use crate::Error;
use crate::Level;
use crate::Location;
use crate::color;
use crate::color::Backend;
use crate::env::Environment;
use crate::layout::Layout;
use crate::layout::Record;
use crate::level::DEFAULT_SCOPE;
use crate::level::LevelGate;
use crate::lock::Guard;
use crate::sink::Sink;
use crate::sink::SinkWriter;
use crate::sink::Stderr;
use crate::sink::Stdout;
use crate::time::Clock;
use crate::trap::Trap;

mod log_impl;
mod scoped;

pub use self::scoped::Scoped;

thread_local! {
    static ACTIVE: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a logger as dispatching on the current thread until dropped.
///
/// Once the thread-local set is torn down, e.g. for a call from another thread-local's destructor,
/// calls are let through untracked.
struct Active {
    addr: Option<usize>,
}

impl Active {
    fn enter(logger: &Logger) -> Option<Active> {
        let addr = std::ptr::from_ref(logger) as usize;
        let entered = ACTIVE.try_with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&addr) {
                return false;
            }
            active.push(addr);
            true
        });
        match entered {
            Ok(true) => Some(Active { addr: Some(addr) }),
            Ok(false) => None,
            Err(_) => Some(Active { addr: None }),
        }
    }
}

impl Drop for Active {
    fn drop(&mut self) {
        if let Some(addr) = self.addr {
            let _ = ACTIVE.try_with(|active| active.borrow_mut().retain(|a| *a != addr));
        }
    }
}

/// A sink with the color backend resolved for it at initialization.
#[derive(Debug)]
struct Route {
    sink: Arc<dyn Sink>,
    backend: Backend,
}

/// A logger writing formatted records to a set of sinks.
///
/// A log call never fails: a write or flush failure on one sink is handed to the configured
/// [`Trap`] and the remaining sinks are still written.
///
/// A call made while the same logger is already writing on the current thread, e.g. from the
/// `Display` implementation of a log argument, is dropped.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use logscribe::Config;
/// use logscribe::sink::Capture;
///
/// let capture = Arc::new(Capture::new());
/// let logger = Config::default()
///     .quiet(true)
///     .compile()
///     .unwrap()
///     .init(vec![capture.clone()], None)
///     .unwrap();
///
/// logger.scoped("my_scope").warn(format_args!(""));
/// logger.info(format_args!("hello {}", "world"));
/// assert_eq!(capture.contents(), "warning(my_scope): \ninfo: hello world\n");
/// ```
#[derive(Debug)]
pub struct Logger {
    routes: Vec<Route>,
    layout: Arc<Layout>,
    clock: Option<Clock>,
    gate: Arc<LevelGate>,
    guard: Guard,
    buffer_capacity: Option<usize>,
    trap: Arc<dyn Trap>,
}

impl Logger {
    /// Compile `config` and create a logger in one step.
    ///
    /// # Errors
    ///
    /// See [`Config::compile`] and [`CompiledConfig::init`].
    pub fn init(
        config: &Config,
        sinks: Vec<Arc<dyn Sink>>,
        env: Option<&Environment>,
    ) -> Result<Logger, Error> {
        config.compile()?.init(sinks, env)
    }

    pub(crate) fn new(
        config: &CompiledConfig,
        sinks: Vec<Arc<dyn Sink>>,
        env: Option<&Environment>,
    ) -> Result<Logger, Error> {
        let clock = match &config.time {
            Some(format) => Some(Clock::new(format.clone(), env)?),
            None => None,
        };

        let mut all: Vec<Arc<dyn Sink>> = Vec::with_capacity(sinks.len() + 2);
        if config.stderr {
            all.push(Arc::new(Stderr::default()));
        }
        if config.stdout {
            all.push(Arc::new(Stdout::default()));
        }
        all.extend(sinks);

        let true_color = config.layout.styles.has_true_color();
        let mut routes = Vec::with_capacity(all.len());
        for sink in all {
            let backend = color::resolve(config.color, &sink.terminal(), env)?;
            if true_color && matches!(backend, Backend::ConsoleAttributes(_)) {
                return Err(
                    Error::config("true color styles cannot be rendered on a legacy console")
                        .with_context("sink", format!("{sink:?}")),
                );
            }
            routes.push(Route { sink, backend });
        }

        Ok(Logger {
            routes,
            layout: config.layout.clone(),
            clock,
            gate: config.gate.clone(),
            guard: Guard::new(&config.concurrency),
            buffer_capacity: config.buffer_capacity,
            trap: config.trap.clone(),
        })
    }

    /// Tear the logger down. Equivalent to dropping it; sinks are not closed.
    pub fn deinit(self) {}

    /// A view of this logger that logs under `scope`.
    pub fn scoped<'a>(&'a self, scope: &'a str) -> Scoped<'a> {
        Scoped::new(self, scope)
    }

    /// Whether a call at `level` under `scope` would be written.
    pub fn enabled(&self, level: Level, scope: &str) -> bool {
        self.gate.enabled(level, scope)
    }

    /// The color backend resolved for each sink, in sink order.
    pub fn backends(&self) -> impl ExactSizeIterator<Item = &Backend> {
        self.routes.iter().map(|route| &route.backend)
    }

    /// Log a message at `level` under `scope`, with an optional source location.
    pub fn log(
        &self,
        level: Level,
        scope: &str,
        location: Option<&Location<'_>>,
        args: fmt::Arguments<'_>,
    ) {
        if !self.gate.enabled(level, scope) {
            return;
        }
        self.dispatch(level, scope, location, args);
    }

    /// Log a message at `level` under the default scope.
    pub fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        self.log(level, DEFAULT_SCOPE, None, args);
    }

    /// Log a message at `level` under the default scope with a source location.
    pub fn emit_at(&self, level: Level, location: &Location<'_>, args: fmt::Arguments<'_>) {
        self.log(level, DEFAULT_SCOPE, Some(location), args);
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

    /// Flush every sink. Failures are handed to the trap.
    pub fn flush(&self) {
        let _held = self.guard.acquire();
        for route in &self.routes {
            if let Err(err) = route.sink.flush() {
                self.trap.trap(&sink_error("failed to flush sink", route, err));
            }
        }
    }

    /// Write one record to every sink. The gate has already been checked.
    fn dispatch(
        &self,
        level: Level,
        scope: &str,
        location: Option<&Location<'_>>,
        args: fmt::Arguments<'_>,
    ) {
        let Some(_active) = Active::enter(self) else {
            return;
        };
        let _held = self.guard.acquire();

        // one instant per call, shared by all sinks
        let time = self.clock.as_ref().and_then(|clock| {
            clock
                .render(clock.capture())
                .map_err(|err| self.trap.trap(&err))
                .ok()
        });

        let record = Record {
            level,
            scope,
            location,
            time: time.as_deref(),
            args,
        };

        for route in &self.routes {
            if let Err(err) = self.write(route, &record) {
                self.trap.trap(&sink_error("failed to write to sink", route, err));
            }
        }
    }

    fn write(&self, route: &Route, record: &Record<'_>) -> io::Result<()> {
        let mut writer = SinkWriter::new(route.sink.as_ref());
        let Some(capacity) = self.buffer_capacity else {
            self.layout.render(record, &route.backend, &mut writer)?;
            return writer.flush();
        };

        let mut buffer = BufWriter::with_capacity(capacity, writer);
        let result = self
            .layout
            .render(record, &route.backend, &mut buffer)
            .and_then(|()| buffer.flush());
        // drop whatever a failed call left behind rather than flushing it on drop
        let _ = buffer.into_parts();
        result
    }
}

fn sink_error(message: &'static str, route: &Route, err: io::Error) -> Error {
    Error::from_io_error(err)
        .with_context("operation", message)
        .with_context("sink", format!("{:?}", route.sink))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::color::ColorChoice;
    use crate::color::ConsoleTarget;
    use crate::color::Style;
    use crate::color::Terminal;
    use crate::color::console::testing::RecordingConsole;
    use crate::sink::Capture;

    #[derive(Debug, Default)]
    struct CollectingTrap {
        errors: Mutex<Vec<String>>,
    }

    impl Trap for Arc<CollectingTrap> {
        fn trap(&self, err: &Error) {
            self.errors.lock().unwrap().push(err.to_string());
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl Sink for Broken {
        fn write(&self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    fn logger(config: Config, sinks: Vec<Arc<dyn Sink>>) -> Logger {
        config.quiet(true).compile().unwrap().init(sinks, None).unwrap()
    }

    #[test]
    fn test_gate_skips_everything() {
        let capture = Arc::new(Capture::new());
        let logger = logger(
            Config::default().directives("warn,net=debug"),
            vec![capture.clone()],
        );

        logger.info(format_args!("hidden"));
        logger.scoped("net").debug(format_args!("shown"));
        logger.scoped("db").info(format_args!("hidden"));
        logger.warn(format_args!("shown"));

        assert!(!logger.enabled(Level::Info, DEFAULT_SCOPE));
        assert!(logger.enabled(Level::Debug, "net"));
        assert_eq!(capture.contents(), "debug(net): shown\nwarning: shown\n");
    }

    #[test]
    fn test_failing_sink_does_not_stop_others() {
        let trap = Arc::new(CollectingTrap::default());
        let capture = Arc::new(Capture::new());
        let logger = logger(
            Config::default().trap(trap.clone()),
            vec![Arc::new(Broken), capture.clone()],
        );

        logger.error(format_args!("still here"));

        assert_eq!(capture.contents(), "error: still here\n");
        let errors = trap.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("disk on fire"), "{}", errors[0]);
    }

    #[test]
    fn test_unbuffered_output_matches_buffered() {
        let buffered = Arc::new(Capture::new());
        let unbuffered = Arc::new(Capture::new());
        let a = logger(Config::default(), vec![buffered.clone()]);
        let b = logger(Config::default().buffered(false), vec![unbuffered.clone()]);

        for logger in [&a, &b] {
            logger.scoped("io").info(format_args!("{}-{}", 1, 2));
        }
        assert_eq!(buffered.contents(), unbuffered.contents());
    }

    #[test]
    fn test_small_buffer_still_writes_whole_record() {
        let capture = Arc::new(Capture::new());
        let logger = logger(Config::default().buffer_capacity(4), vec![capture.clone()]);
        logger.info(format_args!("a longer message than the buffer"));
        assert_eq!(capture.contents(), "info: a longer message than the buffer\n");
    }

    #[test]
    fn test_location_rendering() {
        let capture = Arc::new(Capture::new());
        let logger = logger(
            Config::default().location_format("%F@%f:%l: "),
            vec![capture.clone()],
        );
        let location = Location::new("app", "src/main.rs", "main", 3, 5);
        logger.info_at(&location, format_args!("started"));
        logger.info(format_args!("no location"));
        assert_eq!(
            capture.contents(),
            "info: main@src/main.rs:3: started\ninfo: no location\n"
        );
    }

    #[test]
    fn test_true_color_rejected_on_legacy_console() {
        let console = Arc::new(RecordingConsole::new(0x07));
        let sink = Arc::new(Capture::new().with_terminal(Terminal::Legacy(console)));
        let err = Config::default()
            .quiet(true)
            .message_style(vec![Style::rgb(255, 128, 0)])
            .compile()
            .unwrap()
            .init(vec![sink], None)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }

    #[test]
    fn test_legacy_console_attributes_around_level() {
        let console = Arc::new(RecordingConsole::new(0x07));
        let sink = Arc::new(Capture::new().with_terminal(Terminal::Legacy(console.clone())));
        let logger = Config::default()
            .quiet(true)
            .color(ColorChoice::Always)
            .compile()
            .unwrap()
            .init(vec![sink.clone()], None)
            .unwrap();

        match logger.backends().next() {
            Some(Backend::ConsoleAttributes(target)) => {
                let target: &ConsoleTarget = target;
                assert_eq!(target.baseline(), 0x07);
            }
            other => panic!("unexpected backend: {other:?}"),
        }

        logger.warn(format_args!("careful"));
        assert_eq!(sink.contents(), "warning: careful\n");
        // yellow for the level text, then back to the baseline
        assert_eq!(
            *console.history.lock().unwrap(),
            vec![
                crate::color::console::FOREGROUND_RED | crate::color::console::FOREGROUND_GREEN,
                0x07
            ]
        );
    }

    #[test]
    fn test_time_is_rendered_once_per_call() {
        let a = Arc::new(Capture::new());
        let b = Arc::new(Capture::new());
        let env = Environment::from_vars([("TZ", "UTC")]);
        let logger = Config::default()
            .quiet(true)
            .line_format("%t %m\n")
            .time(crate::time::TimeFormat::reference(crate::time::STAMP_NANO))
            .compile()
            .unwrap()
            .init(vec![a.clone(), b.clone()], Some(&env))
            .unwrap();

        logger.info(format_args!("tick"));
        assert_eq!(a.contents(), b.contents());
        assert!(a.contents().ends_with(" tick\n"));
    }

    #[test]
    fn test_recursive_call_is_dropped() {
        struct Nested<'a>(&'a Logger);

        impl fmt::Display for Nested<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.debug(format_args!("formatting"));
                f.write_str("nested")
            }
        }

        let capture = Arc::new(Capture::new());
        let logger = logger(Config::default(), vec![capture.clone()]);
        logger.info(format_args!("{}", Nested(&logger)));
        assert_eq!(capture.contents(), "info: nested\n");

        // the logger is usable again afterwards
        logger.debug(format_args!("after"));
        assert_eq!(capture.contents(), "info: nested\ndebug: after\n");
    }
    #[test]
    fn test_log_from_thread_local_destructor() {
        struct LogOnExit(Arc<Logger>);

        impl Drop for LogOnExit {
            fn drop(&mut self) {
                self.0.info(format_args!("thread exiting"));
            }
        }

        thread_local! {
            static ON_EXIT: RefCell<Option<LogOnExit>> = const { RefCell::new(None) };
        }

        let capture = Arc::new(Capture::new());
        let logger = Arc::new(logger(Config::default(), vec![capture.clone()]));

        let handle = std::thread::spawn({
            let logger = logger.clone();
            move || {
                // registered before the first call, so destroyed after the active set
                ON_EXIT.with_borrow_mut(|slot| *slot = Some(LogOnExit(logger.clone())));
                logger.info(format_args!("running"));
            }
        });
        handle.join().unwrap();

        assert_eq!(capture.contents(), "info: running\ninfo: thread exiting\n");
    }
}
