use crate::logging::LogStore;
use crate::tasks::{QuotePoller, TaskEvent};
use chrono::{DateTime, Local};
use crossterm::event::{Event as CtEvent, KeyCode, KeyEvent, KeyModifiers};
use fxboard_application::refresh::{FetchOutcome, RefreshState};
use std::sync::Arc;

pub struct App {
    pub refresh: RefreshState,
    pub last_updated: Option<DateTime<Local>>,
    pub logs: Arc<parking_lot::Mutex<LogStore>>,
    pub dirty: bool,
    spinner: usize,
    poller: QuotePoller,
}

impl App {
    pub fn new(logs: Arc<parking_lot::Mutex<LogStore>>, poller: QuotePoller) -> Self {
        Self {
            refresh: RefreshState::new(),
            last_updated: None,
            logs,
            dirty: true,
            spinner: 0,
            poller,
        }
    }

    pub fn start_polling(&mut self) {
        self.poller.start();
    }

    pub fn stop_polling(&mut self) {
        self.poller.stop();
    }

    pub fn spawn_input_reader(&self, tx: tokio::sync::mpsc::UnboundedSender<TaskEvent>) {
        std::thread::spawn(move || {
            while let Ok(event) = crossterm::event::read() {
                let _ = tx.send(TaskEvent::Input(event));
            }
        });
    }

    pub fn on_tick(&mut self) {
        if self.refresh.is_loading() {
            self.spinner = (self.spinner + 1) % 4;
            self.dirty = true;
        }
    }

    pub fn spinner_char(&self) -> char {
        match self.spinner {
            0 => '|',
            1 => '/',
            2 => '-',
            _ => '\\',
        }
    }

    /// Returns `Ok(true)` when the app should quit.
    pub fn on_event(&mut self, event: TaskEvent) -> Result<bool, String> {
        match event {
            TaskEvent::Input(ct) => self.on_input(ct),
            TaskEvent::QuotesFetched {
                generation,
                outcome,
            } => {
                if generation != self.poller.generation() {
                    tracing::debug!(generation, "discarding stale fetch outcome");
                    return Ok(false);
                }
                if matches!(outcome, FetchOutcome::Success(_)) {
                    self.last_updated = Some(Local::now());
                }
                self.refresh.apply(outcome);
                self.dirty = true;
                Ok(false)
            }
        }
    }

    fn on_input(&mut self, event: CtEvent) -> Result<bool, String> {
        match event {
            CtEvent::Key(key) => self.on_key(key),
            CtEvent::Resize(_, _) => {
                self.dirty = true;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<bool, String> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.stop_polling();
            return Ok(true);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.stop_polling();
                Ok(true)
            }
            KeyCode::Char('r') => {
                self.poller.refresh_now();
                Ok(false)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fxboard_domain::{FeedError, QuoteRecord, QuoteSource};
    use std::time::Duration;

    /// Never resolves; stands in for a slow upstream.
    struct PendingSource;

    #[async_trait]
    impl QuoteSource for PendingSource {
        async fn fetch_quotes(&self) -> Result<Vec<QuoteRecord>, FeedError> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    fn quote(symbol: &str, bid: f64, ask: f64) -> QuoteRecord {
        QuoteRecord {
            id: symbol.to_string(),
            symbol: symbol.to_string(),
            bid,
            ask,
            change: 0.0001,
            change_percent: 0.01,
        }
    }

    fn test_app() -> (App, tokio::sync::mpsc::UnboundedReceiver<TaskEvent>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let poller = QuotePoller::new(tx, Arc::new(PendingSource), Duration::from_secs(60));
        let app = App::new(
            Arc::new(parking_lot::Mutex::new(LogStore::new(100))),
            poller,
        );
        (app, rx)
    }

    fn key(code: KeyCode) -> TaskEvent {
        TaskEvent::Input(CtEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[tokio::test]
    async fn current_generation_outcome_is_applied() {
        let (mut app, _rx) = test_app();
        app.start_polling();

        let quit = app
            .on_event(TaskEvent::QuotesFetched {
                generation: 1,
                outcome: FetchOutcome::Success(vec![quote("EURUSD=X", 1.1233, 1.1234)]),
            })
            .unwrap();

        assert!(!quit);
        assert!(!app.refresh.is_loading());
        assert_eq!(app.refresh.quotes().len(), 1);
        assert!(app.last_updated.is_some());
    }

    #[tokio::test]
    async fn stale_generation_outcome_is_discarded() {
        let (mut app, _rx) = test_app();
        app.start_polling();
        app.stop_polling();
        app.start_polling();

        // Stamped under the first start; a response landing after teardown.
        app.on_event(TaskEvent::QuotesFetched {
            generation: 1,
            outcome: FetchOutcome::Success(vec![quote("EURUSD=X", 1.1233, 1.1234)]),
        })
        .unwrap();

        assert!(app.refresh.is_loading());
        assert!(app.refresh.quotes().is_empty());
        assert!(app.last_updated.is_none());
    }

    #[tokio::test]
    async fn failure_outcome_keeps_rows_and_ends_loading() {
        let (mut app, _rx) = test_app();
        app.start_polling();

        app.on_event(TaskEvent::QuotesFetched {
            generation: 1,
            outcome: FetchOutcome::Success(vec![quote("EURUSD=X", 1.1233, 1.1234)]),
        })
        .unwrap();
        app.on_event(TaskEvent::QuotesFetched {
            generation: 1,
            outcome: FetchOutcome::Failure("status 500: Error fetching data.".to_string()),
        })
        .unwrap();

        assert!(!app.refresh.is_loading());
        assert_eq!(app.refresh.quotes().len(), 1);
    }

    #[tokio::test]
    async fn quit_keys_exit_and_stop_polling() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let (mut app, _rx) = test_app();
            app.start_polling();
            let before = app.poller.generation();
            assert!(app.on_event(key(code)).unwrap());
            // stop() advanced the generation, invalidating in-flight work.
            assert!(app.poller.generation() > before);
        }
    }

    #[tokio::test]
    async fn spinner_only_animates_while_loading() {
        let (mut app, _rx) = test_app();
        app.start_polling();

        let initial = app.spinner_char();
        app.on_tick();
        assert_ne!(app.spinner_char(), initial);

        app.on_event(TaskEvent::QuotesFetched {
            generation: 1,
            outcome: FetchOutcome::Success(vec![]),
        })
        .unwrap();
        let settled = app.spinner_char();
        app.on_tick();
        assert_eq!(app.spinner_char(), settled);
    }
}
