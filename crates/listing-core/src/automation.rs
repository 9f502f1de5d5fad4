//! Browser automation driver interface.
//!
//! The cross-posting workflow drives destination sites through a scripted
//! browser session. Only the capability set is defined here; drivers live
//! outside this workspace.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DomainError;
use crate::rng::DeterministicRng;

/// Shortest delay between two typed characters, in milliseconds.
pub const MIN_KEYSTROKE_DELAY_MS: u32 = 50;

/// Width of the random window added on top of the minimum delay.
pub const KEYSTROKE_JITTER_MS: u32 = 100;

/// Default settle time after a page action.
pub const DEFAULT_LOAD_WAIT: Duration = Duration::from_secs(2);

/// Options for launching a controllable browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Run without a visible window.
    pub headless: bool,
    /// Start with a maximized window.
    pub maximized: bool,
    /// Delay inserted between driver actions.
    pub slow_mo: Duration,
    /// Upper bound for a single navigation.
    pub navigation_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: false,
            maximized: true,
            slow_mo: Duration::from_millis(50),
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

/// Capability set of a scripted browser session.
#[async_trait]
pub trait AutomationDriver: Send {
    /// Launches and configures the browser session.
    async fn launch(&mut self, options: &SessionOptions) -> Result<(), DomainError>;

    /// Navigates the session's page to `url`.
    async fn navigate(&mut self, url: &str) -> Result<(), DomainError>;

    /// Types `text` into the field matched by `selector`, pausing
    /// `keystroke_delay` after each character.
    async fn type_text(
        &mut self,
        selector: &str,
        text: &str,
        keystroke_delay: Duration,
    ) -> Result<(), DomainError>;

    /// Waits for `duration`.
    async fn wait(&mut self, duration: Duration) -> Result<(), DomainError>;

    /// Closes the session. Closing an unopened session is a no-op.
    async fn close(&mut self) -> Result<(), DomainError>;
}

/// Picks a human-looking delay between keystrokes (50–150 ms).
pub fn keystroke_jitter(rng: &mut dyn DeterministicRng) -> Duration {
    let extra = rng.next_u32_range(0, KEYSTROKE_JITTER_MS);
    Duration::from_millis(u64::from(MIN_KEYSTROKE_DELAY_MS + extra))
}

/// Types `text` one character at a time, each with a fresh jitter delay.
///
/// # Errors
///
/// Returns the first error reported by the driver.
pub async fn type_with_jitter(
    driver: &mut dyn AutomationDriver,
    rng: &mut dyn DeterministicRng,
    selector: &str,
    text: &str,
) -> Result<(), DomainError> {
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let delay = keystroke_jitter(rng);
        driver
            .type_text(selector, ch.encode_utf8(&mut buf), delay)
            .await?;
    }
    Ok(())
}

/// Waits the default settle time after a page action.
///
/// # Errors
///
/// Returns the error reported by the driver.
pub async fn wait_for_load(driver: &mut dyn AutomationDriver) -> Result<(), DomainError> {
    driver.wait(DEFAULT_LOAD_WAIT).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct ScriptedDriver {
        typed: Vec<(String, String, Duration)>,
        waits: Vec<Duration>,
        fail_typing: bool,
    }

    #[async_trait]
    impl AutomationDriver for ScriptedDriver {
        async fn launch(&mut self, _options: &SessionOptions) -> Result<(), DomainError> {
            Ok(())
        }

        async fn navigate(&mut self, _url: &str) -> Result<(), DomainError> {
            Ok(())
        }

        async fn type_text(
            &mut self,
            selector: &str,
            text: &str,
            keystroke_delay: Duration,
        ) -> Result<(), DomainError> {
            if self.fail_typing {
                return Err(DomainError::Validation("field detached".into()));
            }
            self.typed
                .push((selector.to_owned(), text.to_owned(), keystroke_delay));
            Ok(())
        }

        async fn wait(&mut self, duration: Duration) -> Result<(), DomainError> {
            self.waits.push(duration);
            Ok(())
        }

        async fn close(&mut self) -> Result<(), DomainError> {
            Ok(())
        }
    }

    struct CountingRng(u32);

    impl DeterministicRng for CountingRng {
        fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
            let v = (min + self.0).min(max);
            self.0 += 40;
            v
        }

        fn next_f64(&mut self) -> f64 {
            0.0
        }
    }

    #[tokio::test]
    async fn test_type_with_jitter_types_each_character_with_bounded_delay() {
        // Arrange
        let mut driver = ScriptedDriver::default();
        let mut rng = CountingRng(0);

        // Act
        type_with_jitter(&mut driver, &mut rng, "#title", "abé")
            .await
            .unwrap();

        // Assert
        let typed: Vec<&str> = driver.typed.iter().map(|(_, t, _)| t.as_str()).collect();
        assert_eq!(typed, vec!["a", "b", "é"]);
        let delays: Vec<u64> = driver
            .typed
            .iter()
            .map(|(_, _, d)| u64::try_from(d.as_millis()).unwrap())
            .collect();
        assert_eq!(delays, vec![50, 90, 130]);
        assert!(driver.typed.iter().all(|(s, _, _)| s == "#title"));
    }

    #[tokio::test]
    async fn test_type_with_jitter_stops_on_first_driver_error() {
        let mut driver = ScriptedDriver {
            fail_typing: true,
            ..ScriptedDriver::default()
        };
        let mut rng = CountingRng(0);

        let result = type_with_jitter(&mut driver, &mut rng, "#title", "abc").await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(driver.typed.is_empty());
    }

    #[tokio::test]
    async fn test_wait_for_load_uses_two_second_default() {
        let mut driver = ScriptedDriver::default();

        wait_for_load(&mut driver).await.unwrap();

        assert_eq!(driver.waits, vec![Duration::from_secs(2)]);
    }

    #[test]
    fn test_default_session_options_are_headed_and_maximized() {
        let options = SessionOptions::default();
        assert!(!options.headless);
        assert!(options.maximized);
        assert_eq!(options.navigation_timeout, Duration::from_secs(30));
    }
}
