//! SMTP delivery of contact notifications.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::application::contact::{ContactNotifier, NotifyError};
use crate::config::SmtpSettings;
use crate::domain::entities::MessageRecord;

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        let transport = build_transport(settings)?;
        let from = parse_mailbox(&settings.from_address, "from_address")?;
        let to = parse_mailbox(&settings.to_address, "to_address")?;
        Ok(Self {
            transport,
            from,
            to,
        })
    }
}

#[async_trait]
impl ContactNotifier for SmtpNotifier {
    fn channel(&self) -> &'static str {
        "email"
    }

    async fn notify(&self, message: &MessageRecord) -> Result<(), NotifyError> {
        debug!(
            target = "diwan::notify",
            message_id = %message.id,
            "building notification email"
        );

        let email = build_email(&self.from, &self.to, message)?;

        self.transport
            .send(email)
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        Ok(())
    }
}

fn build_email(
    from: &Mailbox,
    to: &Mailbox,
    message: &MessageRecord,
) -> Result<Message, NotifyError> {
    let mut builder = Message::builder()
        .from(from.clone())
        .to(to.clone())
        .subject(format!("New portfolio message from {}", message.name));

    // Replying in the mail client should reach the visitor directly.
    if let Ok(reply_to) = message.email.parse::<Mailbox>() {
        builder = builder.reply_to(reply_to);
    }

    let phone = message.phone.as_deref().unwrap_or("-");
    let body = format!(
        "From: {}\nEmail: {}\nPhone: {}\n\n{}",
        message.name, message.email, phone, message.body
    );

    builder
        .body(body)
        .map_err(|err| NotifyError::Transport(format!("failed to build email: {err}")))
}

fn build_transport(
    settings: &SmtpSettings,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
    let builder = if settings.tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|err| NotifyError::Configuration(format!("SMTP TLS relay error: {err}")))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
    };

    let builder = builder.port(settings.port);

    let builder = if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
        builder.credentials(Credentials::new(user.clone(), pass.clone()))
    } else {
        builder
    };

    Ok(builder.build())
}

fn parse_mailbox(address: &str, key: &'static str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|err| NotifyError::Configuration(format!("invalid `{key}`: {err}")))
}
