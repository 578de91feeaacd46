//! Short code resolution and best-effort visit counting.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::{IncrementOutcome, LinkRepository};
use crate::error::AppError;
use crate::utils::code_generator::{normalize_code, parse_code};

/// How visits are counted when the atomic primitive is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountingMode {
    /// Falls back to read-then-write. Concurrent visits may lose updates.
    #[default]
    Lenient,
    /// The atomic primitive is mandatory; no fallback is attempted.
    Strict,
}

impl FromStr for CountingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "CLICK_COUNTING must be 'lenient' or 'strict', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for CountingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Which store operation recorded a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPath {
    Atomic,
    ReadModifyWrite,
}

impl CounterPath {
    fn as_str(self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::ReadModifyWrite => "read_modify_write",
        }
    }
}

/// Result of [`RedirectService::record_visit`].
///
/// Failures are reported here instead of being returned as errors, so no
/// caller can mistake a counting problem for a reason to withhold a redirect.
#[derive(Debug)]
pub enum VisitOutcome {
    Recorded(CounterPath),
    Failed(AppError),
}

impl VisitOutcome {
    pub fn success(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Self::Recorded(_) => None,
            Self::Failed(e) => Some(e),
        }
    }
}

/// Service resolving short codes and counting visits.
///
/// [`Self::resolve`] and [`Self::record_visit`] are independent: resolving
/// never counts, and counting never implies a successful resolution.
pub struct RedirectService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    counting_mode: CountingMode,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    /// Creates a new redirect service.
    pub fn new(link_repository: Arc<L>, counting_mode: CountingMode) -> Self {
        Self {
            link_repository,
            counting_mode,
        }
    }

    /// Resolves a raw short code to its link.
    ///
    /// Read-only: `click_count` is never modified here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCodeFormat`] before any store access if the
    /// code normalizes to fewer than 3 characters.
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Persistence`] on store errors.
    pub async fn resolve(&self, raw_code: &str) -> Result<Link, AppError> {
        let code = parse_code(raw_code)?;

        self.link_repository
            .find_by_code(&code)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Records one visit for a raw short code.
    ///
    /// Never fails: every error is logged and returned as
    /// [`VisitOutcome::Failed`]. Logs carry the normalized code.
    pub async fn record_visit(&self, raw_code: &str) -> VisitOutcome {
        let code = normalize_code(raw_code);

        match self.try_record_visit(&code).await {
            Ok(path) => {
                tracing::debug!(short_code = %code, path = path.as_str(), "Visit recorded");
                metrics::counter!("linkforge_visits_recorded_total", "path" => path.as_str())
                    .increment(1);
                VisitOutcome::Recorded(path)
            }
            Err(e) => {
                tracing::warn!(short_code = %code, kind = e.kind(), error = %e, "Failed to record visit");
                metrics::counter!("linkforge_visits_failed_total").increment(1);
                VisitOutcome::Failed(e)
            }
        }
    }

    async fn try_record_visit(&self, code: &str) -> Result<CounterPath, AppError> {
        let code = parse_code(code)?;

        match self.link_repository.increment_click_count(&code).await? {
            IncrementOutcome::Incremented => Ok(CounterPath::Atomic),
            IncrementOutcome::NotFound => Err(AppError::NotFound),
            IncrementOutcome::Unsupported => match self.counting_mode {
                CountingMode::Strict => Err(AppError::internal(
                    "increment_click_count is not deployed and strict counting is enabled",
                )),
                CountingMode::Lenient => {
                    tracing::debug!(short_code = %code, "Atomic counter unavailable, using read-then-write");
                    self.read_modify_write(&code).await
                }
            },
        }
    }

    /// Non-atomic increment. Concurrent callers may overwrite each other.
    async fn read_modify_write(&self, code: &str) -> Result<CounterPath, AppError> {
        let current = self
            .link_repository
            .get_click_count(code)
            .await?
            .ok_or(AppError::NotFound)?;

        if !self
            .link_repository
            .set_click_count(code, current.saturating_add(1))
            .await?
        {
            return Err(AppError::NotFound);
        }

        Ok(CounterPath::ReadModifyWrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    fn create_test_link(code: &str, click_count: i64) -> Link {
        Link::new(
            1,
            "user-1".to_string(),
            code.to_string(),
            "https://example.com/page".to_string(),
            click_count,
            Utc::now(),
        )
    }

    fn lenient(mock_repo: MockLinkRepository) -> RedirectService<MockLinkRepository> {
        RedirectService::new(Arc::new(mock_repo), CountingMode::Lenient)
    }

    #[tokio::test]
    async fn test_resolve_normalizes_code() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| Ok(Some(create_test_link(code, 4))));
        mock_repo.expect_increment_click_count().times(0);

        let link = lenient(mock_repo).resolve("  AbC-123 ").await.unwrap();

        assert_eq!(link.short_code, "abc123");
        assert_eq!(link.click_count, 4);
    }

    #[tokio::test]
    async fn test_resolve_short_code_skips_store() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_by_code().times(0);

        let result = lenient(mock_repo).resolve("zz").await;

        assert!(matches!(result, Err(AppError::InvalidCodeFormat)));
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let result = lenient(mock_repo).resolve("missing").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_resolve_store_error() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Err(AppError::persistence("down")));

        let result = lenient(mock_repo).resolve("abc123").await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_record_visit_atomic_path() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_increment_click_count()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(IncrementOutcome::Incremented));
        mock_repo.expect_get_click_count().times(0);
        mock_repo.expect_set_click_count().times(0);

        let outcome = lenient(mock_repo).record_visit("ABC123").await;

        assert!(outcome.success());
        assert!(matches!(outcome, VisitOutcome::Recorded(CounterPath::Atomic)));
    }

    #[tokio::test]
    async fn test_record_visit_falls_back_when_primitive_missing() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_increment_click_count()
            .times(1)
            .returning(|_| Ok(IncrementOutcome::Unsupported));
        mock_repo
            .expect_get_click_count()
            .times(1)
            .returning(|_| Ok(Some(41)));
        mock_repo
            .expect_set_click_count()
            .withf(|code, count| code == "abc123" && *count == 42)
            .times(1)
            .returning(|_, _| Ok(true));

        let outcome = lenient(mock_repo).record_visit("abc123").await;

        assert!(matches!(
            outcome,
            VisitOutcome::Recorded(CounterPath::ReadModifyWrite)
        ));
    }

    #[tokio::test]
    async fn test_record_visit_not_found_does_not_fall_back() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_increment_click_count()
            .times(1)
            .returning(|_| Ok(IncrementOutcome::NotFound));
        mock_repo.expect_get_click_count().times(0);
        mock_repo.expect_set_click_count().times(0);

        let outcome = lenient(mock_repo).record_visit("abc123").await;

        assert!(!outcome.success());
        assert!(matches!(outcome.error(), Some(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_record_visit_fallback_row_missing() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_increment_click_count()
            .times(1)
            .returning(|_| Ok(IncrementOutcome::Unsupported));
        mock_repo
            .expect_get_click_count()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_set_click_count().times(0);

        let outcome = lenient(mock_repo).record_visit("abc123").await;

        assert!(matches!(outcome.error(), Some(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_record_visit_strict_mode_refuses_fallback() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_increment_click_count()
            .times(1)
            .returning(|_| Ok(IncrementOutcome::Unsupported));
        mock_repo.expect_get_click_count().times(0);
        mock_repo.expect_set_click_count().times(0);

        let service = RedirectService::new(Arc::new(mock_repo), CountingMode::Strict);
        let outcome = service.record_visit("abc123").await;

        assert!(matches!(outcome.error(), Some(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_record_visit_store_error_is_swallowed() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_increment_click_count()
            .times(1)
            .returning(|_| Err(AppError::persistence("connection refused")));
        mock_repo.expect_get_click_count().times(0);

        let outcome = lenient(mock_repo).record_visit("abc123").await;

        assert!(!outcome.success());
        assert!(matches!(outcome.error(), Some(AppError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_record_visit_invalid_code_skips_store() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_increment_click_count().times(0);

        let outcome = lenient(mock_repo).record_visit("--").await;

        assert!(matches!(outcome.error(), Some(AppError::InvalidCodeFormat)));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn test_record_visit_logs_normalized_code() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_increment_click_count()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(IncrementOutcome::Incremented));
        mock_repo
            .expect_increment_click_count()
            .withf(|code| code == "gone42")
            .times(1)
            .returning(|_| Ok(IncrementOutcome::NotFound));

        let service = lenient(mock_repo);
        assert!(service.record_visit(" ABC-123 ").await.success());
        assert!(!service.record_visit("Gone-42").await.success());

        let output = logs.contents();
        assert!(output.contains("short_code=abc123"), "{output}");
        assert!(output.contains("short_code=gone42"), "{output}");
        assert!(!output.contains("ABC-123"));
        assert!(!output.contains("Gone-42"));
    }

    #[test]
    fn test_counting_mode_parsing() {
        assert_eq!("lenient".parse::<CountingMode>(), Ok(CountingMode::Lenient));
        assert_eq!(" STRICT ".parse::<CountingMode>(), Ok(CountingMode::Strict));
        assert!("exact".parse::<CountingMode>().is_err());
        assert_eq!(CountingMode::default(), CountingMode::Lenient);
    }
}
