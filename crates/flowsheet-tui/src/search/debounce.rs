//! DebounceGate — single-slot delayed callback.
//!
//! Every `schedule` aborts whatever was pending and arms a fresh timer task,
//! so a burst of keystrokes collapses into one callback that fires once the
//! input has been quiet for the configured delay.

use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

pub struct DebounceGate {
    delay: Duration,
    pending: Option<AbortHandle>,
}

impl DebounceGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the gate with the configured delay.  Must be called from within a
    /// tokio runtime.
    pub fn schedule<F>(&mut self, callback: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.schedule_after(self.delay, callback);
    }

    pub fn schedule_after<F>(&mut self, delay: Duration, callback: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback.await;
        });
        self.pending = Some(handle.abort_handle());
    }

    /// Drop the pending callback, if any.  No side effects.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DebounceGate {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    type Callback = Pin<Box<dyn Future<Output = ()> + Send>>;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Callback) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let make = move |value: &str| -> Callback {
            let sink = Arc::clone(&sink);
            let value = value.to_string();
            Box::pin(async move {
                sink.lock().unwrap().push(value);
            })
        };
        (calls, make)
    }

    /// Give spawned timer tasks a chance to run against the current clock.
    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    async fn wait(ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        settle().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_value() {
        let (calls, make) = recorder();
        let mut gate = DebounceGate::new(Duration::from_millis(1000));

        for text in ["M", "Mi", "Mil", "Mile", "Miles"] {
            gate.schedule(make(text));
            settle().await;
            wait(200).await;
        }
        assert!(calls.lock().unwrap().is_empty());
        assert!(gate.is_pending());

        wait(1000).await;
        assert_eq!(*calls.lock().unwrap(), vec!["Miles".to_string()]);
        assert!(!gate.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_callback() {
        let (calls, make) = recorder();
        let mut gate = DebounceGate::new(Duration::from_millis(500));
        gate.schedule(make("x"));
        settle().await;
        gate.cancel();
        assert!(!gate.is_pending());

        wait(2000).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_gaps_fire_each_time() {
        let (calls, make) = recorder();
        let mut gate = DebounceGate::new(Duration::from_millis(500));

        gate.schedule(make("first"));
        settle().await;
        wait(600).await;
        gate.schedule(make("second"));
        settle().await;
        wait(600).await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (calls, make) = recorder();
        {
            let mut gate = DebounceGate::new(Duration::from_millis(100));
            gate.schedule(make("gone"));
            settle().await;
        }
        wait(1000).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_after_overrides_delay() {
        let (calls, make) = recorder();
        let mut gate = DebounceGate::new(Duration::from_secs(10));
        gate.schedule_after(Duration::from_millis(50), make("now"));
        settle().await;
        wait(60).await;
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}
