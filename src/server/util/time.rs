//! Clock and date formatting utilities.
//!
//! This module provides the [`Clock`] abstraction used by the delivery date cache and the
//! rate limiter for every "what time is it" question, allowing tests to drive both components
//! through virtual time with [`MockClock`]. It also provides [`DateFormatter`], which renders
//! the localized display names shown to customers in the checkout.

use std::sync::{Arc, Mutex};

use chrono::{
    format::{Item, StrftimeItems},
    DateTime, Duration, Local, Locale, NaiveDate, Utc,
};

use crate::server::error::config::ConfigError;

/// Source of wall-clock time.
///
/// Implementations must be cheap to call; the rate limiter reads the clock on every request.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date used as the starting point for generated delivery dates.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock shared between the components of a running server.
pub type SharedClock = Arc<dyn Clock>;

/// Clock backed by the system time.
///
/// `today` uses the server's local timezone so generated dates line up with the shop's
/// calendar rather than UTC midnight.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock for tests.
///
/// Cloning a `MockClock` shares the underlying instant, so a test can hand one clone to the
/// component under test and advance time through another.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    /// Jump to an arbitrary instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Renders customer-facing display names for delivery dates.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    locale: Locale,
    pattern: String,
}

impl DateFormatter {
    pub const DEFAULT_LOCALE: &'static str = "nl_NL";
    /// Long weekday, numeric day, short month: "maandag 19 okt"
    pub const DEFAULT_PATTERN: &'static str = "%A %-d %b";

    /// Creates a formatter for a POSIX locale name such as `nl_NL` or `en_US`.
    ///
    /// # Arguments
    /// - `locale` - Locale name understood by chrono's locale tables
    /// - `pattern` - strftime-style pattern passed to [`NaiveDate::format_localized`]
    ///
    /// # Returns
    /// - `Ok(DateFormatter)` - Formatter ready for use
    /// - `Err(ConfigError::InvalidEnvValue)` - Unknown locale name, or a pattern with a
    ///   specifier chrono cannot render
    pub fn new(locale: &str, pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let parsed = Locale::try_from(locale).map_err(|_| ConfigError::InvalidEnvValue {
            var: "DISPLAY_LOCALE".to_string(),
            reason: format!("unknown locale '{}'", locale),
        })?;

        // Rendering a pattern containing an error item panics inside `Display`
        let pattern = pattern.into();
        if StrftimeItems::new_with_locale(&pattern, parsed).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidEnvValue {
                var: "DISPLAY_DATE_FORMAT".to_string(),
                reason: format!("unsupported format specifier in '{}'", pattern),
            });
        }

        Ok(Self {
            locale: parsed,
            pattern,
        })
    }

    /// Display name for a single date.
    pub fn display_name(&self, date: NaiveDate) -> String {
        date.format_localized(&self.pattern, self.locale).to_string()
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            locale: Locale::nl_NL,
            pattern: Self::DEFAULT_PATTERN.to_string(),
        }
    }
}

/// Formats an instant as an HTTP-date (RFC 7231), as used by `Last-Modified`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Whole seconds from `now` until `until`, rounded up and never negative.
pub fn seconds_until(now: DateTime<Utc>, until: DateTime<Utc>) -> i64 {
    let millis = (until - now).num_milliseconds().max(0);
    (millis + 999) / 1000
}
