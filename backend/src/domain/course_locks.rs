//! Per-course mutual exclusion for check-then-write sequences.
//!
//! Enroll and drop hold the lock for their course from the duplicate and
//! capacity checks until the write completes, so two requests in this process
//! cannot both claim the last seat. The registry is in-process only.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::identifier::CourseId;

/// Default bound on waiting for a course lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Returned when a course lock is not acquired within the timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("timed out waiting for lock on course {0}")]
pub struct LockTimeout(pub CourseId);

type Registry = DashMap<CourseId, Arc<Mutex<()>>>;

/// Guard releasing the course lock on drop.
///
/// The registry entry is removed on release unless another task is waiting
/// on the same course, so entries only exist for courses currently in use.
#[derive(Debug)]
pub struct CourseGuard {
    course_id: CourseId,
    registry: Arc<Registry>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl CourseGuard {
    /// Locked course.
    pub const fn course_id(&self) -> CourseId {
        self.course_id
    }
}

impl Drop for CourseGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters hold a clone of the mutex, so a count of one means only
        // the registry still refers to it. `remove_if` runs under the shard
        // lock that `acquire` clones under, so no waiter can slip in between.
        self.registry
            .remove_if(&self.course_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

/// Registry of async mutexes keyed by course.
#[derive(Debug)]
pub struct CourseLocks {
    locks: Arc<Registry>,
    timeout: Duration,
}

impl CourseLocks {
    /// Create a registry with the given acquisition timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
            timeout,
        }
    }

    /// Acquisition timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for exclusive access to `course_id`.
    pub async fn acquire(&self, course_id: CourseId) -> Result<CourseGuard, LockTimeout> {
        // The map shard guard must not be held across the await below.
        let mutex = Arc::clone(self.locks.entry(course_id).or_default().value());
        let acquired = tokio::time::timeout(self.timeout, mutex.lock_owned()).await;
        let guard = match acquired {
            Ok(guard) => guard,
            Err(_) => {
                self.locks
                    .remove_if(&course_id, |_, mutex| Arc::strong_count(mutex) == 1);
                return Err(LockTimeout(course_id));
            }
        };
        Ok(CourseGuard {
            course_id,
            registry: Arc::clone(&self.locks),
            guard: Some(guard),
        })
    }

    /// Number of courses with a registered lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no course has a registered lock.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Default for CourseLocks {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}
