//! OTP email content.

/// Subject line of every OTP email.
pub const OTP_SUBJECT: &str = "Your OTP Code - Schoolemy";

/// Minutes an OTP stays valid; stated in the email body.
pub const OTP_VALIDITY_MINUTES: u32 = 2;

/// A rendered OTP email ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl OtpMessage {
    /// Render the verification email for `recipient`.
    ///
    /// # Examples
    /// ```
    /// use schoolemy_backend::domain::OtpMessage;
    ///
    /// let message = OtpMessage::new("no-reply@example.com", "kid@example.com", "482913");
    /// assert_eq!(message.subject, "Your OTP Code - Schoolemy");
    /// assert!(message.html.contains("482913"));
    /// ```
    pub fn new(from: impl Into<String>, recipient: impl Into<String>, otp: &str) -> Self {
        let to = recipient.into();
        let html = render_html(&to, otp);
        Self {
            from: from.into(),
            to,
            subject: OTP_SUBJECT.to_owned(),
            html,
        }
    }
}

fn render_html(recipient: &str, otp: &str) -> String {
    let recipient = escape_html(recipient);
    let otp = escape_html(otp);
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 520px; margin: auto; padding: 20px; border: 1px solid #eaeaea;">
  <h2 style="text-align: center;">Verify Your Schoolemy Account</h2>
  <p>Hello <strong>{recipient}</strong>,</p>
  <p>Please use the OTP below to verify your account:</p>
  <h1 style="text-align: center; letter-spacing: 6px;">{otp}</h1>
  <p>This OTP is valid for <strong>{OTP_VALIDITY_MINUTES} minutes</strong>.</p>
  <p style="color: #777;">If you did not request this, please ignore this email.</p>
  <hr />
  <p style="font-size: 12px; color: #999; text-align: center;">&copy; 2025 Schoolemy. All rights reserved.</p>
</div>"#
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
