//! Outbound mail notifier.
//!
//! Delivery itself is an external collaborator; this seam decides
//! *whether* a message goes out (the `EMAIL_ENABLED` flag) and renders
//! the content. With delivery disabled the message is logged and
//! swallowed, which is also how local development reads reset links.

use tracing::info;

#[derive(Debug, Clone)]
pub struct Mailer {
    enabled: bool,
    base_url: String,
}

impl Mailer {
    pub fn new(enabled: bool, base_url: impl Into<String>) -> Self {
        Self {
            enabled,
            base_url: base_url.into(),
        }
    }

    /// The URL a reset mail points at. The token is the only state.
    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/reset-password?token={}",
            self.base_url.trim_end_matches('/'),
            token
        )
    }

    /// Sends (or, when disabled, logs and skips) the password-reset mail.
    /// Returns whether a message was actually handed to delivery.
    pub fn send_password_reset(&self, to_email: &str, reset_link: &str) -> bool {
        if !self.enabled {
            info!(
                to_email,
                reset_link, "mail delivery disabled; skipping password reset mail"
            );
            return false;
        }

        info!(
            to_email,
            "sending password reset mail (link expires in 1 hour)"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_link_joins_cleanly() {
        let mailer = Mailer::new(false, "https://tracker.example.edu/");
        assert_eq!(
            mailer.reset_link("abc.def"),
            "https://tracker.example.edu/reset-password?token=abc.def"
        );
    }

    #[test]
    fn disabled_mailer_skips_delivery() {
        let mailer = Mailer::new(false, "http://localhost:3000");
        assert!(!mailer.send_password_reset("s@example.edu", "http://x/reset"));
    }

    #[test]
    fn enabled_mailer_reports_delivery() {
        let mailer = Mailer::new(true, "http://localhost:3000");
        assert!(mailer.send_password_reset("s@example.edu", "http://x/reset"));
    }
}
