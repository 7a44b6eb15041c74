//! Deterministic sleepers for retry tests
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use webex_common::testing::RecordingSleeper;
//! use webex_common::time::Sleeper;
//!
//! # tokio_test_block_on(async {
//! let sleeper = RecordingSleeper::new();
//! sleeper.sleep(Duration::from_secs(60)).await;
//! assert_eq!(sleeper.recorded(), vec![Duration::from_secs(60)]);
//! assert_eq!(sleeper.total(), Duration::from_secs(60));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::time::Sleeper;

/// Returns immediately and remembers every requested delay.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }

    pub fn total(&self) -> Duration {
        self.delays.lock().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().push(duration);
        tokio::task::yield_now().await;
    }
}

/// Never wakes up; used to exercise cancellation of pending waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingSleeper;

#[async_trait]
impl Sleeper for PendingSleeper {
    async fn sleep(&self, _duration: Duration) {
        std::future::pending::<()>().await;
    }
}
