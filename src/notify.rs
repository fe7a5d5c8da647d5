//! Single-slot notification area with auto-dismiss

use log::{error, warn};
use std::fmt;
use std::time::{Duration, Instant};

use crate::error::Error;

/// Notices disappear after this long unless configured otherwise
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Danger,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Warning => "warning",
            Level::Danger => "danger",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
    posted_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.posted_at) >= ttl
    }
}

/// Holds at most one notice; posting replaces whatever was shown.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    ttl: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn post(&mut self, level: Level, message: impl Into<String>) {
        self.post_at(level, message, Instant::now());
    }

    pub fn post_at(&mut self, level: Level, message: impl Into<String>, now: Instant) {
        self.current = Some(Notice {
            level,
            message: message.into(),
            posted_at: now,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.post(Level::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.post(Level::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.post(Level::Warning, message);
    }

    pub fn danger(&mut self, message: impl Into<String>) {
        self.post(Level::Danger, message);
    }

    /// Post the notice for a failed `action` ("saving meal", "loading meals", ...).
    ///
    /// Validation failures become warnings with their short message; anything
    /// else is shown as `Error <action>: <message>`.
    pub fn report(&mut self, action: &str, err: &Error) {
        match err {
            Error::Validation(message) => {
                warn!("Rejected {}: {}", action, message);
                self.warning(message.clone());
            }
            other => {
                error!("Error {}: {:?}", action, other);
                self.danger(format!("Error {}: {}", action, other));
            }
        }
    }

    /// The visible notice, if it has not yet been dismissed
    pub fn current(&self) -> Option<&Notice> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|notice| !notice.is_expired(now, self.ttl))
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrition_planner_api::ApiError;
    use reqwest::StatusCode;

    #[test]
    fn test_new_notice_replaces_previous() {
        let mut board = NoticeBoard::default();
        board.success("Meals refreshed successfully!");
        board.info("Meal cleared");

        let notice = board.current().unwrap();
        assert_eq!(notice.level, Level::Info);
        assert_eq!(notice.message, "Meal cleared");
    }

    #[test]
    fn test_auto_dismiss() {
        let mut board = NoticeBoard::new(Duration::from_secs(5));
        let posted = Instant::now();
        board.post_at(Level::Success, "saved", posted);

        assert!(board.current_at(posted + Duration::from_millis(4_999)).is_some());
        assert!(board.current_at(posted + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_report_maps_taxonomy() {
        let mut board = NoticeBoard::default();

        board.report("saving meal", &Error::validation("Please enter a meal name"));
        let notice = board.current().unwrap();
        assert_eq!(notice.level, Level::Warning);
        assert_eq!(notice.message, "Please enter a meal name");

        let server = Error::Api(ApiError::Api {
            status: StatusCode::BAD_REQUEST,
            message: "meal_name is required".to_string(),
        });
        board.report("saving meal", &server);
        let notice = board.current().unwrap();
        assert_eq!(notice.level, Level::Danger);
        assert_eq!(notice.message, "Error saving meal: meal_name is required");

        let bare = Error::Api(ApiError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
        });
        board.report("loading meals", &bare);
        assert_eq!(
            board.current().unwrap().message,
            "Error loading meals: HTTP error! status: 500"
        );
    }

    #[test]
    fn test_dismiss() {
        let mut board = NoticeBoard::default();
        board.danger("boom");
        board.dismiss();
        assert!(board.current().is_none());
    }
}
