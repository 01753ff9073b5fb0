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
use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;

use logscribe::Config;
use logscribe::Error;
use logscribe::ErrorKind;
use logscribe::lock::Concurrency;
use logscribe::lock::Lock;
use logscribe::sink::Capture;
use logscribe::sink::Sink;
use logscribe::sink::Writer;
use logscribe::trap::Trap;

#[derive(Debug, Default)]
struct Failing {
    attempts: AtomicUsize,
}

impl Sink for Failing {
    fn write(&self, _: &[u8]) -> io::Result<usize> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }
}

#[derive(Debug, Default, Clone)]
struct Collect(Arc<Mutex<Vec<ErrorKind>>>);

impl Trap for Collect {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.kind());
    }
}

#[test]
fn test_fan_out_survives_failing_sink() {
    let failing = Arc::new(Failing::default());
    let capture = Arc::new(Capture::new());
    let trap = Collect::default();

    let logger = Config::default()
        .quiet(true)
        .trap(trap.clone())
        .compile()
        .unwrap()
        .init(vec![failing.clone(), capture.clone()], None)
        .unwrap();

    logger.error(format_args!("first"));
    logger.scoped("db").info(format_args!("second"));

    assert_eq!(capture.contents(), "error: first\ninfo(db): second\n");
    assert_eq!(failing.attempts.load(Ordering::SeqCst), 2);
    assert_eq!(*trap.0.lock().unwrap(), vec![ErrorKind::Io, ErrorKind::Io]);
}

#[test]
fn test_failed_call_leaves_nothing_behind() {
    // fails once, then accepts everything
    #[derive(Debug, Default)]
    struct Flaky {
        failed: AtomicUsize,
        inner: Capture,
    }

    impl Sink for Flaky {
        fn write(&self, buf: &[u8]) -> io::Result<usize> {
            if self.failed.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(io::Error::other("transient"));
            }
            self.inner.write(buf)
        }
    }

    let flaky = Arc::new(Flaky::default());
    let logger = Config::default()
        .quiet(true)
        .compile()
        .unwrap()
        .init(vec![flaky.clone()], None)
        .unwrap();

    logger.info(format_args!("lost"));
    logger.info(format_args!("kept"));
    assert_eq!(flaky.inner.contents(), "info: kept\n");
}

#[test]
fn test_concurrent_scoped_views_do_not_interleave() {
    let capture = Arc::new(Capture::new());
    let logger = Config::default()
        .quiet(true)
        // unbuffered: every placeholder is a separate write
        .buffered(false)
        .concurrency(Concurrency::Mutex)
        .compile()
        .unwrap()
        .init(vec![capture.clone()], None)
        .unwrap();

    thread::scope(|s| {
        for scope in ["alpha", "beta", "gamma", "delta"] {
            let view = logger.scoped(scope);
            s.spawn(move || {
                for i in 0..200 {
                    view.info(format_args!("{scope} says {i}"));
                }
            });
        }
    });

    let contents = capture.contents();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 800);
    for line in lines {
        let (head, message) = line.split_once(": ").unwrap();
        let scope = head
            .strip_prefix("info(")
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or_else(|| panic!("malformed line: {line}"));
        assert!(message.starts_with(&format!("{scope} says ")), "{line}");
    }
}

static HELD: AtomicUsize = AtomicUsize::new(0);
static MAX_HELD: AtomicUsize = AtomicUsize::new(0);

struct SpinLock(parking_lot::Mutex<()>);

impl Lock for SpinLock {
    fn lock(&self) {
        std::mem::forget(self.0.lock());
        let held = HELD.fetch_add(1, Ordering::SeqCst) + 1;
        MAX_HELD.fetch_max(held, Ordering::SeqCst);
    }

    fn unlock(&self) {
        HELD.fetch_sub(1, Ordering::SeqCst);
        // SAFETY: paired with the guard forgotten in `lock`
        unsafe { self.0.force_unlock() };
    }
}

#[test]
fn test_custom_lock_serializes_calls() {
    let capture = Arc::new(Capture::new());
    let logger = Config::default()
        .quiet(true)
        .concurrency(Concurrency::Custom(|| {
            Box::new(SpinLock(parking_lot::Mutex::new(())))
        }))
        .compile()
        .unwrap()
        .init(vec![capture.clone()], None)
        .unwrap();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..50 {
                    logger.debug(format_args!("tick"));
                }
            });
        }
    });

    assert_eq!(HELD.load(Ordering::SeqCst), 0);
    assert_eq!(MAX_HELD.load(Ordering::SeqCst), 1);
    assert_eq!(capture.contents().lines().count(), 200);
}

#[test]
fn test_hooks_wrap_every_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let capture = Arc::new(Capture::new());
    let logger = Config::default()
        .quiet(true)
        .concurrency(Concurrency::hooks(
            {
                let calls = calls.clone();
                move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                }
            },
            || {},
        ))
        .compile()
        .unwrap()
        .init(vec![capture.clone()], None)
        .unwrap();

    logger.info(format_args!("one"));
    logger.scoped("x").info(format_args!("two"));
    // filtered calls never take the lock
    let logger_filtered = Config::default()
        .quiet(true)
        .directives("off")
        .concurrency(Concurrency::hooks(
            || panic!("locked while filtered"),
            || {},
        ))
        .compile()
        .unwrap()
        .init(vec![capture.clone()], None)
        .unwrap();
    logger_filtered.error(format_args!("never"));

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(capture.contents(), "info: one\ninfo(x): two\n");
}

#[test]
fn test_file_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let file = std::fs::File::create(&path).unwrap();

    let logger = Config::default()
        .quiet(true)
        .line_format("%l%s %m\n")
        .compile()
        .unwrap()
        .init(vec![Arc::new(Writer::new(file))], None)
        .unwrap();

    logger.scoped("boot").info(format_args!("ready in {}ms", 12));
    logger.warn(format_args!("low memory"));
    logger.flush();
    logger.deinit();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "info(boot) ready in 12ms\nwarning low memory\n");
}
