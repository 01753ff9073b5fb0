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

//! Mutual exclusion strategies for log calls.
//!
//! The lock of a logger is held for the whole of a call: the time capture, the rendering and the
//! writes to every sink. None of the strategies are reentrant: a logger drops a call made on a
//! thread that is already writing through it.

use std::fmt;
use std::sync::Arc;

use parking_lot::lock_api::RawMutex as _;

/// A minimal lock, for [`Concurrency::Custom`].
pub trait Lock: Send + Sync + 'static {
    /// Block until the lock is acquired.
    fn lock(&self);

    /// Release a lock acquired by [`Lock::lock`].
    fn unlock(&self);
}

type Hook = Arc<dyn Fn() + Send + Sync + 'static>;

/// A pair of caller-owned lock and unlock functions.
///
/// The logger calls them around every log call and never owns the lock they guard.
#[derive(Clone)]
pub struct Hooks {
    lock: Hook,
    unlock: Hook,
}

impl Hooks {
    /// Call `lock` before and `unlock` after every log call.
    pub fn new(
        lock: impl Fn() + Send + Sync + 'static,
        unlock: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            lock: Arc::new(lock),
            unlock: Arc::new(unlock),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

/// How concurrent log calls on one logger are serialized.
#[derive(Debug, Clone, Default)]
pub enum Concurrency {
    /// No locking: output of concurrent calls may interleave.
    None,
    /// A mutex owned by the logger. A no-op with the `single-threaded` feature.
    #[default]
    Mutex,
    /// Caller-supplied lock and unlock functions.
    Hooks(Hooks),
    /// A caller-supplied lock type; the logger owns the instance built by the factory.
    Custom(fn() -> Box<dyn Lock>),
}

impl Concurrency {
    /// Serialize calls with `lock` and `unlock`.
    pub fn hooks(
        lock: impl Fn() + Send + Sync + 'static,
        unlock: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Concurrency::Hooks(Hooks::new(lock, unlock))
    }
}

/// The lock resource of one logger.
pub(crate) enum Guard {
    None,
    Mutex(parking_lot::RawMutex),
    Hooks(Hooks),
    Custom(Box<dyn Lock>),
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::None => f.write_str("None"),
            Guard::Mutex(_) => f.write_str("Mutex"),
            Guard::Hooks(_) => f.write_str("Hooks"),
            Guard::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl Guard {
    pub(crate) fn new(concurrency: &Concurrency) -> Self {
        match concurrency {
            Concurrency::None => Guard::None,
            #[cfg(feature = "single-threaded")]
            Concurrency::Mutex => Guard::None,
            #[cfg(not(feature = "single-threaded"))]
            Concurrency::Mutex => Guard::Mutex(parking_lot::RawMutex::INIT),
            Concurrency::Hooks(hooks) => Guard::Hooks(hooks.clone()),
            Concurrency::Custom(factory) => Guard::Custom(factory()),
        }
    }

    /// Acquire the lock; it is released when the returned value is dropped.
    pub(crate) fn acquire(&self) -> Held<'_> {
        match self {
            Guard::None => {}
            Guard::Mutex(mutex) => mutex.lock(),
            Guard::Hooks(hooks) => (hooks.lock)(),
            Guard::Custom(lock) => lock.lock(),
        }
        Held { guard: self }
    }
}

#[must_use]
pub(crate) struct Held<'a> {
    guard: &'a Guard,
}

impl Drop for Held<'_> {
    fn drop(&mut self) {
        match self.guard {
            Guard::None => {}
            // SAFETY: a `Held` only exists after `acquire` locked this mutex
            Guard::Mutex(mutex) => unsafe { mutex.unlock() },
            Guard::Hooks(hooks) => (hooks.unlock)(),
            Guard::Custom(lock) => lock.unlock(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;

    #[test]
    fn test_hooks_are_paired() {
        let locks = Arc::new(AtomicUsize::new(0));
        let unlocks = Arc::new(AtomicUsize::new(0));
        let concurrency = Concurrency::hooks(
            {
                let locks = locks.clone();
                move || {
                    locks.fetch_add(1, Ordering::SeqCst);
                }
            },
            {
                let unlocks = unlocks.clone();
                move || {
                    unlocks.fetch_add(1, Ordering::SeqCst);
                }
            },
        );

        let guard = Guard::new(&concurrency);
        {
            let _held = guard.acquire();
            assert_eq!(locks.load(Ordering::SeqCst), 1);
            assert_eq!(unlocks.load(Ordering::SeqCst), 0);
        }
        assert_eq!(unlocks.load(Ordering::SeqCst), 1);
    }

    static CUSTOM_DEPTH: AtomicUsize = AtomicUsize::new(0);

    struct CountingLock;

    impl Lock for CountingLock {
        fn lock(&self) {
            CUSTOM_DEPTH.fetch_add(1, Ordering::SeqCst);
        }

        fn unlock(&self) {
            CUSTOM_DEPTH.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_custom_lock_released_on_panic() {
        let guard = Guard::new(&Concurrency::Custom(|| Box::new(CountingLock)));
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            let _held = guard.acquire();
            assert_eq!(CUSTOM_DEPTH.load(Ordering::SeqCst), 1);
            panic!("display failed");
        }));
        assert!(result.is_err());
        assert_eq!(CUSTOM_DEPTH.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_mutex_can_be_reacquired() {
        let guard = Guard::new(&Concurrency::Mutex);
        drop(guard.acquire());
        drop(guard.acquire());
        if let Guard::Mutex(mutex) = &guard {
            assert!(!mutex.is_locked());
        }
    }
}
