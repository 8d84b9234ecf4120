//! Notification dispatch.
//!
//! One transport is selected at startup: SMTP via lettre, a console
//! print, or a file write under the configured output directory.
//! Delivery is best-effort and single-shot: a failed or unconfigured
//! send becomes a warning on the result, never an error for the
//! request. The submitter keeps their reference id either way.

use crate::config::{Config, DevBackend};
use civica_common::{
    CivicaError, ComplaintSubmission, NotificationResult, ReferenceId, VerificationToken,
};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Delivery mechanism, selected once from configuration
pub enum Transport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Console,
    File(PathBuf),
}

impl Transport {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::Console => "console",
            Self::File(_) => "file",
        }
    }
}

/// Sends confirmation and admin notification emails for accepted
/// submissions
pub struct Mailer {
    transport: Option<Transport>,
    sender: Option<String>,
    admin_emails: Vec<String>,
    token_ttl_secs: u64,
    missing_smtp: Vec<&'static str>,
}

impl Mailer {
    pub fn new(config: &Config) -> Self {
        Self {
            transport: select_transport(config),
            sender: config.sender_email.clone(),
            admin_emails: config.admin_emails.clone(),
            token_ttl_secs: config.token_ttl_secs,
            missing_smtp: config.missing_smtp(),
        }
    }

    /// Transport name for startup logging, None when unconfigured
    pub fn transport_kind(&self) -> Option<&'static str> {
        self.transport.as_ref().map(Transport::kind)
    }

    /// Send the confirmation email for an accepted submission and,
    /// best-effort, a notification to the admin list. Never fails the
    /// request: every outcome is folded into the NotificationResult.
    pub async fn dispatch(
        &self,
        submission: &ComplaintSubmission,
        reference_id: &ReferenceId,
        token: &VerificationToken,
    ) -> NotificationResult {
        let subject = format!("Confirm your complaint: {}", reference_id);
        let body = confirmation_body(submission, reference_id, token, self.token_ttl_secs);

        let result = match self
            .send(
                std::slice::from_ref(&submission.contact),
                &subject,
                &body,
                reference_id.as_str(),
            )
            .await
        {
            Ok(()) => {
                info!("Sent confirmation for {} to {}", reference_id, submission.contact);
                NotificationResult::delivered()
            }
            Err(CivicaError::NotConfigured) => {
                warn!(
                    "SMTP not configured (missing: {}), skipping email send",
                    self.missing_smtp.join(",")
                );
                NotificationResult::failed(
                    "We could not send a confirmation email. Please keep this reference id.",
                )
            }
            Err(CivicaError::Address(addr)) => {
                warn!("Contact is not an email address: {}", addr);
                NotificationResult::failed(
                    "The contact you provided is not an email address, so no confirmation email was sent. Please keep this reference id.",
                )
            }
            Err(e) => {
                error!("Failed to send confirmation for {}: {}", reference_id, e);
                NotificationResult::failed(
                    "We could not send a confirmation email. Please contact support or keep this reference id.",
                )
            }
        };

        self.notify_admins(submission, reference_id).await;
        result
    }

    /// Admin notification is best-effort and never affects the
    /// submitter-facing result
    async fn notify_admins(&self, submission: &ComplaintSubmission, reference_id: &ReferenceId) {
        if self.admin_emails.is_empty() {
            return;
        }
        let subject = format!("New complaint submitted: {}", reference_id);
        let body = admin_body(submission, reference_id);
        let file_stem = format!("admin_{}", reference_id);

        match self
            .send(&self.admin_emails, &subject, &body, &file_stem)
            .await
        {
            Ok(()) => info!("Admin notified for {}", reference_id),
            Err(CivicaError::NotConfigured) => {
                warn!(
                    "SMTP not configured (missing: {}), skipping admin notification",
                    self.missing_smtp.join(",")
                );
            }
            Err(e) => warn!("Failed to notify admins for {}: {}", reference_id, e),
        }
    }

    async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        file_stem: &str,
    ) -> Result<(), CivicaError> {
        let transport = self.transport.as_ref().ok_or(CivicaError::NotConfigured)?;
        let to_line = recipients.join(", ");

        match transport {
            Transport::Console => {
                println!("=== DEV EMAIL (console) ===");
                println!("To: {}", to_line);
                println!("Subject: {}", subject);
                println!("{}", body);
                println!("=== END DEV EMAIL ===");
                Ok(())
            }
            Transport::File(dir) => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!("{}.txt", file_stem));
                std::fs::write(&path, format!("To: {}\nSubject: {}\n\n{}\n", to_line, subject, body))?;
                info!("Dev email saved to {}", path.display());
                Ok(())
            }
            Transport::Smtp(smtp) => {
                let sender = self
                    .sender
                    .as_deref()
                    .ok_or(CivicaError::NotConfigured)?;
                let from: Mailbox = sender
                    .parse()
                    .map_err(|e| CivicaError::Address(format!("{}: {}", sender, e)))?;

                let mut builder = Message::builder().from(from).subject(subject);
                for recipient in recipients {
                    let to: Mailbox = recipient
                        .parse()
                        .map_err(|e| CivicaError::Address(format!("{}: {}", recipient, e)))?;
                    builder = builder.to(to);
                }
                let message = builder
                    .header(ContentType::TEXT_PLAIN)
                    .body(body.to_string())
                    .map_err(|e| CivicaError::Delivery(e.to_string()))?;

                smtp.send(message)
                    .await
                    .map(|_| ())
                    .map_err(|e| CivicaError::Delivery(e.to_string()))
            }
        }
    }
}

/// Pick the transport once at startup. A dev backend wins over SMTP;
/// incomplete SMTP config means no transport at all.
fn select_transport(config: &Config) -> Option<Transport> {
    match config.dev_email_backend {
        Some(DevBackend::Console) => return Some(Transport::Console),
        Some(DevBackend::File) => return Some(Transport::File(config.email_output_dir.clone())),
        None => {}
    }

    let (Some(host), Some(port), Some(username), Some(password)) = (
        config.smtp_host.as_deref(),
        config.smtp_port,
        config.smtp_username.as_deref(),
        config.smtp_password.as_deref(),
    ) else {
        return None;
    };
    if config.sender_email.is_none() {
        return None;
    }

    match build_smtp_transport(host, port, username, password, config.smtp_use_tls) {
        Ok(t) => Some(Transport::Smtp(t)),
        Err(e) => {
            warn!("Invalid SMTP configuration: {}", e);
            None
        }
    }
}

/// Port 465 gets wrapper TLS, anything else STARTTLS when enabled.
/// Connection and timeout behavior are the lettre client defaults.
fn build_smtp_transport(
    host: &str,
    port: u16,
    username: &str,
    password: &str,
    use_tls: bool,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, CivicaError> {
    let credentials = Credentials::new(username.to_string(), password.to_string());

    let builder = if port == 465 {
        let tls = TlsParameters::new(host.to_string())
            .map_err(|e| CivicaError::Delivery(e.to_string()))?;
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .tls(Tls::Wrapper(tls))
    } else if use_tls {
        let tls = TlsParameters::new(host.to_string())
            .map_err(|e| CivicaError::Delivery(e.to_string()))?;
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .tls(Tls::Required(tls))
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port)
    };

    Ok(builder.credentials(credentials).build())
}

fn confirmation_body(
    submission: &ComplaintSubmission,
    reference_id: &ReferenceId,
    token: &VerificationToken,
    ttl_secs: u64,
) -> String {
    format!(
        "Hello {name},\n\n\
         Thank you for reporting an issue in the \"{category}\" category.\n\n\
         Your reference id is {reference}.\n\
         Your verification token is {token}. It expires in {hours} hours.\n\n\
         Description on file:\n{description}\n\n\
         Keep this reference id to track your complaint.\n",
        name = submission.name,
        category = submission.category.label(),
        reference = reference_id,
        token = token.value(),
        hours = ttl_secs / 3600,
        description = submission.description,
    )
}

fn admin_body(submission: &ComplaintSubmission, reference_id: &ReferenceId) -> String {
    format!(
        "New complaint {reference}\n\n\
         Name: {name}\n\
         Contact: {contact}\n\
         Category: {category}\n\
         Submitted at: {submitted_at}\n\n\
         {description}\n",
        reference = reference_id,
        name = submission.name,
        contact = submission.contact,
        category = submission.category,
        submitted_at = submission.submitted_at.to_rfc3339(),
        description = submission.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use civica_common::Category;

    fn sample_submission(contact: &str) -> ComplaintSubmission {
        ComplaintSubmission::new(
            "A. Citizen".into(),
            contact.into(),
            Category::Pothole,
            "Large pothole on Main St.".into(),
        )
    }

    fn dispatch_inputs() -> (ComplaintSubmission, ReferenceId, VerificationToken) {
        (
            sample_submission("a@example.com"),
            ReferenceId::generate(),
            VerificationToken::generate(),
        )
    }

    #[test]
    fn test_no_transport_selected_without_config() {
        let mailer = Mailer::new(&Config::default());
        assert!(mailer.transport_kind().is_none());
    }

    #[test]
    fn test_dev_backend_wins_over_smtp() {
        let config = Config {
            smtp_host: Some("smtp.example.com".into()),
            smtp_port: Some(587),
            smtp_username: Some("robot@city.example".into()),
            smtp_password: Some("hunter2".into()),
            sender_email: Some("robot@city.example".into()),
            dev_email_backend: Some(DevBackend::Console),
            ..Config::default()
        };
        let mailer = Mailer::new(&config);
        assert_eq!(mailer.transport_kind(), Some("console"));
    }

    #[test]
    fn test_complete_smtp_selects_smtp_transport() {
        let config = Config {
            smtp_host: Some("smtp.example.com".into()),
            smtp_port: Some(587),
            smtp_username: Some("robot@city.example".into()),
            smtp_password: Some("hunter2".into()),
            sender_email: Some("robot@city.example".into()),
            ..Config::default()
        };
        let mailer = Mailer::new(&config);
        assert_eq!(mailer.transport_kind(), Some("smtp"));
    }

    #[tokio::test]
    async fn test_unconfigured_dispatch_warns_but_accepts() {
        let mailer = Mailer::new(&Config::default());
        let (submission, reference_id, token) = dispatch_inputs();

        let result = mailer.dispatch(&submission, &reference_id, &token).await;
        assert!(!result.delivered);
        let warning = result.warning.expect("warning expected");
        assert!(warning.contains("reference id"));
    }

    #[tokio::test]
    async fn test_console_backend_delivers() {
        let config = Config {
            dev_email_backend: Some(DevBackend::Console),
            ..Config::default()
        };
        let mailer = Mailer::new(&config);
        let (submission, reference_id, token) = dispatch_inputs();

        let result = mailer.dispatch(&submission, &reference_id, &token).await;
        assert!(result.delivered);
        assert!(result.warning.is_none());
    }

    #[tokio::test]
    async fn test_file_backend_writes_confirmation_and_admin_copy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            dev_email_backend: Some(DevBackend::File),
            email_output_dir: dir.path().to_path_buf(),
            admin_emails: vec!["admin@city.example".into()],
            ..Config::default()
        };
        let mailer = Mailer::new(&config);
        let (submission, reference_id, token) = dispatch_inputs();

        let result = mailer.dispatch(&submission, &reference_id, &token).await;
        assert!(result.delivered);

        let confirmation = dir.path().join(format!("{}.txt", reference_id));
        let content = std::fs::read_to_string(&confirmation).expect("confirmation file");
        assert!(content.contains("a@example.com"));
        assert!(content.contains(reference_id.as_str()));
        assert!(content.contains(token.value()));

        let admin = dir.path().join(format!("admin_{}.txt", reference_id));
        let content = std::fs::read_to_string(&admin).expect("admin file");
        assert!(content.contains("admin@city.example"));
        assert!(content.contains("Large pothole on Main St."));
    }

    #[tokio::test]
    async fn test_unreachable_smtp_still_accepts_submission() {
        // Nothing listens on port 1; the connection is refused fast.
        let config = Config {
            smtp_host: Some("127.0.0.1".into()),
            smtp_port: Some(1),
            smtp_username: Some("robot@city.example".into()),
            smtp_password: Some("hunter2".into()),
            sender_email: Some("robot@city.example".into()),
            smtp_use_tls: false,
            ..Config::default()
        };
        let mailer = Mailer::new(&config);
        assert_eq!(mailer.transport_kind(), Some("smtp"));

        let (submission, reference_id, token) = dispatch_inputs();
        let result = mailer.dispatch(&submission, &reference_id, &token).await;
        assert!(!result.delivered);
        assert!(result.warning.is_some());
    }

    #[tokio::test]
    async fn test_phone_contact_cannot_be_emailed_over_smtp() {
        let config = Config {
            smtp_host: Some("127.0.0.1".into()),
            smtp_port: Some(1),
            smtp_username: Some("robot@city.example".into()),
            smtp_password: Some("hunter2".into()),
            sender_email: Some("robot@city.example".into()),
            smtp_use_tls: false,
            ..Config::default()
        };
        let mailer = Mailer::new(&config);
        let submission = sample_submission("+1 555 0100");
        let reference_id = ReferenceId::generate();
        let token = VerificationToken::generate();

        let result = mailer.dispatch(&submission, &reference_id, &token).await;
        assert!(!result.delivered);
        let warning = result.warning.expect("warning expected");
        assert!(warning.contains("not an email address"));
    }

    #[test]
    fn test_confirmation_body_contents() {
        let (submission, reference_id, token) = dispatch_inputs();
        let body = confirmation_body(&submission, &reference_id, &token, 86_400);
        assert!(body.contains("A. Citizen"));
        assert!(body.contains(reference_id.as_str()));
        assert!(body.contains(token.value()));
        assert!(body.contains("24 hours"));
    }
}
