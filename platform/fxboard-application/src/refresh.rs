use fxboard_domain::QuoteRecord;

/// Result of one refresh cycle, delivered to the view as a value and
/// consumed by pattern matching.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Vec<QuoteRecord>),
    Failure(String),
}

/// Owned dashboard state for the quote table. Lifecycle is tied to the view:
/// created empty and loading, replaced wholesale on each successful fetch,
/// dropped on teardown.
#[derive(Debug, Clone)]
pub struct RefreshState {
    quotes: Vec<QuoteRecord>,
    loading: bool,
    last_error: Option<String>,
}

impl RefreshState {
    pub fn new() -> Self {
        Self {
            quotes: Vec::new(),
            loading: true,
            last_error: None,
        }
    }

    /// Apply one fetch outcome. Success replaces the whole quote set; failure
    /// retains the previous set. Either way the first outcome ends the
    /// loading phase, so a stuck spinner never outlives the first attempt.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Success(quotes) => {
                self.quotes = quotes;
                self.last_error = None;
            }
            FetchOutcome::Failure(reason) => {
                self.last_error = Some(reason);
            }
        }
        self.loading = false;
    }

    pub fn quotes(&self) -> &[QuoteRecord] {
        &self.quotes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new()
    }
}
