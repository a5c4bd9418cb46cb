//! Quiet-period debouncing for search input.
//!
//! Values pushed in quick succession are coalesced; only the last one is emitted once
//! nothing new has arrived for the quiet period.

use std::time::Duration;

use tokio::sync::mpsc;

/// Sending half; cheap to clone into input handlers.
#[derive(Debug)]
pub struct DebounceInput<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for DebounceInput<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> DebounceInput<T> {
    /// Returns `false` once the receiving side is gone.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

#[derive(Debug)]
pub struct Debouncer<T> {
    rx: mpsc::UnboundedReceiver<T>,
    quiet: Duration,
}

pub fn debounce<T>(quiet: Duration) -> (DebounceInput<T>, Debouncer<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DebounceInput { tx }, Debouncer { rx, quiet })
}

impl<T> Debouncer<T> {
    /// Wait for the next settled value.
    ///
    /// Returns `None` once every input has been dropped and nothing is pending. A value
    /// still pending when the inputs close is emitted without waiting out the period.
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;
        loop {
            match tokio::time::timeout(self.quiet, self.rx.recv()).await {
                Ok(Some(value)) => latest = value,
                Ok(None) | Err(_) => return Some(latest),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, sleep, Instant};

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_value() {
        let (input, mut debouncer) = debounce(Duration::from_millis(300));
        let held = input.clone();
        let start = Instant::now();

        tokio::spawn(async move {
            for term in ["r", "ru", "rus", "rust"] {
                input.push(term.to_string());
                sleep(Duration::from_millis(100)).await;
            }
        });

        assert_eq!(debouncer.next().await.as_deref(), Some("rust"));
        // Last keystroke at 300ms, then a full quiet period.
        assert!(start.elapsed() >= Duration::from_millis(600));

        drop(held);
        assert_eq!(debouncer.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_values_each_settle() {
        let (input, mut debouncer) = debounce(Duration::from_millis(50));
        input.push(1);
        assert_eq!(debouncer.next().await, Some(1));

        advance(Duration::from_millis(500)).await;
        input.push(2);
        input.push(3);
        assert_eq!(debouncer.next().await, Some(3));

        drop(input);
        assert_eq!(debouncer.next().await, None);
    }
}
