//! Match reporting: console rendering and e-mail delivery.

pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use html_escape::{encode_double_quoted_attribute, encode_text};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::Message;

use crate::app::{CheckerError, Result};
use crate::domain::MatchSet;

pub use smtp::SmtpMailer;

pub const SENDER: &str = "rss-checker@localhost";
pub const SUBJECT: &str = "Notification from rss-checker";

/// Outbound mail relay.
#[async_trait]
pub trait Mailer {
    /// Establish the relay connection if it is not up yet.
    async fn connect(&self) -> Result<()>;

    /// Deliver one message, connecting first when needed.
    async fn send(&self, message: Message) -> Result<()>;
}

/// Shared by every schedule of the process; holds the one relay connection.
pub struct Notifier {
    mailer: Arc<dyn Mailer + Send + Sync>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer + Send + Sync>) -> Self {
        Self { mailer }
    }

    pub async fn connect(&self) -> Result<()> {
        self.mailer.connect().await
    }

    pub fn build_message(&self, matches: &MatchSet, recipient: &Mailbox) -> Result<Message> {
        Message::builder()
            .from(SENDER.parse()?)
            .to(recipient.clone())
            .subject(SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(render_html(matches))
            .map_err(|e| CheckerError::Send(e.to_string()))
    }

    pub async fn notify(&self, matches: &MatchSet, recipient: &Mailbox) -> Result<()> {
        let message = self.build_message(matches, recipient)?;
        tracing::info!("Sending e-mail to {}", recipient);
        self.mailer.send(message).await
    }
}

/// Plain-text report for the console.
pub fn render(matches: &MatchSet) -> String {
    let mut out = String::new();
    for group in matches.groups() {
        out.push_str(&format!("{}:\n", group.pattern));
        for m in &group.matches {
            out.push_str(&format!("\t* [{}] {}: {}\n", m.published, m.title, m.link));
        }
        out.push('\n');
    }
    out
}

/// HTML report used as the e-mail body.
pub fn render_html(matches: &MatchSet) -> String {
    let mut out = String::from("<html><body>\n");
    for group in matches.groups() {
        out.push_str(&format!("<h3>For \"{}\" pattern:</h3>\n", encode_text(&group.pattern)));
        for m in &group.matches {
            out.push_str(&format!(
                "<p>\t* [{}] <a href=\"{}\">{}</a></p>\n",
                encode_text(&m.published),
                encode_double_quoted_attribute(&m.link),
                encode_text(&m.title)
            ));
        }
    }
    out.push_str("</body></html>\n");
    out
}
