use fxboard_application::refresh::FetchOutcome;
use fxboard_domain::QuoteSource;
use std::sync::Arc;
use std::time::Duration;

pub enum TaskEvent {
    Input(crossterm::event::Event),
    /// Outcome of one refresh cycle, stamped with the poller generation it
    /// was started under. The receiver drops outcomes from old generations.
    QuotesFetched {
        generation: u64,
        outcome: FetchOutcome,
    },
}

/// The refresh cycle controller: owns the repeating fetch timer and ships
/// every outcome to the app over the event channel.
pub struct QuotePoller {
    tx: tokio::sync::mpsc::UnboundedSender<TaskEvent>,
    feed: Arc<dyn QuoteSource>,
    period: Duration,
    generation: u64,
    timer: Option<tokio::task::JoinHandle<()>>,
}

impl QuotePoller {
    pub fn new(
        tx: tokio::sync::mpsc::UnboundedSender<TaskEvent>,
        feed: Arc<dyn QuoteSource>,
        period: Duration,
    ) -> Self {
        Self {
            tx,
            feed,
            period,
            generation: 0,
            timer: None,
        }
    }

    /// Arms the repeating timer; the first fetch fires immediately. Any
    /// previously armed timer is cancelled first, so at most one timer is
    /// ever live per poller.
    pub fn start(&mut self) {
        self.stop();
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();
        let feed = Arc::clone(&self.feed);
        let period = self.period;
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let outcome = fetch_once(feed.as_ref()).await;
                if tx
                    .send(TaskEvent::QuotesFetched {
                        generation,
                        outcome,
                    })
                    .is_err()
                {
                    break;
                }
            }
        }));
    }

    /// One out-of-band fetch on the current generation; the periodic timer
    /// is left untouched.
    pub fn refresh_now(&self) {
        let generation = self.generation;
        let tx = self.tx.clone();
        let feed = Arc::clone(&self.feed);
        tokio::spawn(async move {
            let outcome = fetch_once(feed.as_ref()).await;
            let _ = tx.send(TaskEvent::QuotesFetched {
                generation,
                outcome,
            });
        });
    }

    /// Cancels the timer and invalidates the current generation, so an
    /// in-flight request that completes later is discarded instead of
    /// mutating state that outlived it. No-op when nothing is armed.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            self.generation += 1;
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for QuotePoller {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

async fn fetch_once(feed: &dyn QuoteSource) -> FetchOutcome {
    match feed.fetch_quotes().await {
        Ok(quotes) => {
            tracing::info!(rows = quotes.len(), "quotes refreshed");
            FetchOutcome::Success(quotes)
        }
        Err(err) => {
            tracing::warn!(error = %err, "quote refresh failed");
            FetchOutcome::Failure(err.to_string())
        }
    }
}
