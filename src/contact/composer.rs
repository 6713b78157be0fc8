//! Message composition.

use crate::mail::{MailAddress, OutboundMessage, SmtpSettings};

use super::ValidatedSubmission;

/// Placeholder shown when the sender left the phone number blank.
const NO_PHONE: &str = "—";

/// Escape HTML-significant characters.
///
/// ```
/// use contact_relay::contact::escape_html;
///
/// assert_eq!(escape_html("<b>Tom & \"Jerry's\"</b>"),
///            "&lt;b&gt;Tom &amp; &quot;Jerry&#39;s&quot;&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make a value safe to place in a mail header.
///
/// Each run of `\r`/`\n` becomes a single space, then the result is trimmed.
pub fn header_safe(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_break = false;
    for c in s.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out.trim().to_string()
}

/// Turns validated submissions into outbound messages.
#[derive(Debug, Clone)]
pub struct MessageComposer {
    subject_prefix: String,
}

impl MessageComposer {
    /// Create a composer whose subjects start with `subject_prefix`.
    pub fn new(subject_prefix: impl Into<String>) -> Self {
        Self {
            subject_prefix: subject_prefix.into(),
        }
    }

    /// Compose the message for one submission.
    pub fn compose(
        &self,
        submission: &ValidatedSubmission,
        settings: &SmtpSettings,
    ) -> OutboundMessage {
        let name = header_safe(&submission.name);
        let email = header_safe(&submission.email);
        let phone = submission.phone.as_deref().map(header_safe);

        let subject = header_safe(&format!("{} — {}", self.subject_prefix, name));

        let text_body = format!(
            "{message}\n\n--\nName: {name}\nEmail: {email}\nPhone: {phone}\n",
            message = submission.message,
            phone = phone.as_deref().unwrap_or(NO_PHONE),
        );

        let html_body = format!(
            "<p style=\"white-space:pre-wrap\">{message}</p>\n\
             <hr>\n\
             <p><b>Name:</b> {name}<br>\n\
             <b>Email:</b> {email}<br>\n\
             <b>Phone:</b> {phone}</p>\n",
            message = escape_html(&submission.message),
            name = escape_html(&name),
            email = escape_html(&email),
            phone = phone.as_deref().map(escape_html).as_deref().unwrap_or(NO_PHONE),
        );

        OutboundMessage {
            message_id: message_id(&settings.from_address),
            from: MailAddress::named(header_safe(&settings.from_name), &settings.from_address),
            to: MailAddress::bare(&settings.recipient),
            reply_to: MailAddress::named(name, email),
            subject,
            text_body,
            html_body,
        }
    }
}

/// Build a `Message-ID` in the sender's domain.
fn message_id(from_address: &str) -> String {
    let domain = from_address
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
        .unwrap_or("localhost");
    format!("<{}@{}>", uuid::Uuid::new_v4(), domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 465,
            implicit_tls: true,
            username: "site@example.com".to_string(),
            password: "secret".to_string(),
            recipient: "inbox@example.com".to_string(),
            from_address: "no-reply@example.com".to_string(),
            from_name: "Contact form".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    fn submission() -> ValidatedSubmission {
        ValidatedSubmission {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: None,
            message: "Hello\nWorld".to_string(),
        }
    }

    fn composer() -> MessageComposer {
        MessageComposer::new("New contact-form message")
    }

    #[test]
    fn test_escape_html_table() {
        assert_eq!(escape_html("&"), "&amp;");
        assert_eq!(escape_html("<"), "&lt;");
        assert_eq!(escape_html(">"), "&gt;");
        assert_eq!(escape_html("\""), "&quot;");
        assert_eq!(escape_html("'"), "&#39;");
        assert_eq!(escape_html("plain text é"), "plain text é");
    }

    #[test]
    fn test_header_safe() {
        assert_eq!(header_safe("Alice"), "Alice");
        assert_eq!(header_safe("Alice\r\nBcc: x@evil.com"), "Alice Bcc: x@evil.com");
        assert_eq!(header_safe("a\n\n\nb"), "a b");
        assert_eq!(header_safe("\nAlice\r"), "Alice");
    }

    #[test]
    fn test_compose_addresses() {
        let message = composer().compose(&submission(), &settings());

        assert_eq!(
            message.from,
            MailAddress::named("Contact form", "no-reply@example.com")
        );
        assert_eq!(message.to, MailAddress::bare("inbox@example.com"));
        assert_eq!(
            message.reply_to,
            MailAddress::named("Alice", "alice@example.com")
        );
        assert!(message.message_id.starts_with('<'));
        assert!(message.message_id.ends_with("@example.com>"));
    }

    #[test]
    fn test_compose_subject() {
        let message = composer().compose(&submission(), &settings());
        assert_eq!(message.subject, "New contact-form message — Alice");
    }

    #[test]
    fn test_compose_text_body() {
        let message = composer().compose(&submission(), &settings());
        assert!(message.text_body.starts_with("Hello\nWorld\n"));
        assert!(message.text_body.contains("Name: Alice"));
        assert!(message.text_body.contains("Email: alice@example.com"));
        assert!(message.text_body.contains("Phone: —"));
    }

    #[test]
    fn test_compose_phone() {
        let mut submission = submission();
        submission.phone = Some("06 00 00 00 00".to_string());
        let message = composer().compose(&submission, &settings());
        assert!(message.text_body.contains("Phone: 06 00 00 00 00"));
        assert!(message.html_body.contains("<b>Phone:</b> 06 00 00 00 00"));
    }

    #[test]
    fn test_compose_html_preserves_line_breaks() {
        let message = composer().compose(&submission(), &settings());
        assert!(message
            .html_body
            .contains("<p style=\"white-space:pre-wrap\">Hello\nWorld</p>"));
    }

    #[test]
    fn test_compose_escapes_user_input() {
        let submission = ValidatedSubmission {
            name: "<script>".to_string(),
            email: "alice@example.com".to_string(),
            phone: Some("<b>1</b>".to_string()),
            message: "<img src=x onerror='alert(1)'> & \"quotes\"".to_string(),
        };
        let message = composer().compose(&submission, &settings());

        assert!(message.html_body.contains("&lt;script&gt;"));
        assert!(!message.html_body.contains("<script>"));
        assert!(!message.html_body.contains("<img"));
        assert!(message
            .html_body
            .contains("&lt;img src=x onerror=&#39;alert(1)&#39;&gt; &amp; &quot;quotes&quot;"));
        assert!(message.html_body.contains("&lt;b&gt;1&lt;/b&gt;"));
    }

    #[test]
    fn test_compose_escapes_exactly_once() {
        let mut submission = submission();
        submission.message = "&amp; &lt;".to_string();
        let message = composer().compose(&submission, &settings());

        assert!(message.html_body.contains(">&amp;amp; &amp;lt;</p>"));
        assert!(!message.html_body.contains("&amp;amp;amp;"));
        // Plain text is never escaped.
        assert!(message.text_body.starts_with("&amp; &lt;"));
    }

    #[test]
    fn test_compose_strips_header_line_breaks() {
        let submission = ValidatedSubmission {
            name: "Mallory\r\nBcc: victim@example.com".to_string(),
            email: "mallory@example.com".to_string(),
            phone: Some("123\n456".to_string()),
            message: "Hi".to_string(),
        };
        let message = composer().compose(&submission, &settings());

        assert!(!message.subject.contains('\n'));
        assert!(!message.subject.contains('\r'));
        assert_eq!(
            message.subject,
            "New contact-form message — Mallory Bcc: victim@example.com"
        );
        assert_eq!(
            message.reply_to.name.as_deref(),
            Some("Mallory Bcc: victim@example.com")
        );
        assert!(message.text_body.contains("Phone: 123 456"));
    }

    #[test]
    fn test_message_id_fallback_domain() {
        assert!(message_id("no-at-sign").ends_with("@localhost>"));
        assert!(message_id("user@").ends_with("@localhost>"));
    }
}
