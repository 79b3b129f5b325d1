use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use learnhub_config::EmailConfig;
use learnhub_core::AppError;

use crate::utils::codes::CODE_TTL_MINUTES;

pub const EMAIL_SEND_FAILED: &str = "Email could not be sent";

/// Sends verification and password-reset codes. With SMTP disabled the message
/// is logged instead of sent.
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, code))]
    pub async fn send_verification_code(
        &self,
        to_email: &str,
        to_name: &str,
        code: &str,
    ) -> Result<(), AppError> {
        let text_body = format!(
            "Hi {to_name},\n\n\
             Welcome to LearnHub! Your verification code is:\n\n\
             {code}\n\n\
             The code expires in {CODE_TTL_MINUTES} minutes.\n\n\
             If you did not create an account, please ignore this email.\n\n\
             The LearnHub Team"
        );
        let html_body = code_template(
            "Verify your email",
            to_name,
            "Use this code to verify your email address:",
            code,
        );

        self.send_email(to_email, "Verify your LearnHub account", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, code))]
    pub async fn send_password_reset_code(
        &self,
        to_email: &str,
        to_name: &str,
        code: &str,
    ) -> Result<(), AppError> {
        let text_body = format!(
            "Hi {to_name},\n\n\
             You requested to reset your password. Your reset code is:\n\n\
             {code}\n\n\
             The code expires in {CODE_TTL_MINUTES} minutes.\n\n\
             If you didn't request this, please ignore this email.\n\n\
             The LearnHub Team"
        );
        let html_body = code_template(
            "Reset your password",
            to_name,
            "Use this code to reset your password:",
            code,
        );

        self.send_email(to_email, "Password reset code", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!(to = %to_email, subject, body = %text_body, "SMTP disabled, email not sent");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(from.parse().map_err(|e| send_failed("invalid from address", e))?)
            .to(to_email
                .parse()
                .map_err(|e| send_failed("invalid recipient address", e))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| send_failed("failed to build email", e))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| send_failed("failed to create SMTP relay", e))?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| send_failed("mail task panicked", e))?
            .map_err(|e| send_failed("SMTP send failed", e))?;

        Ok(())
    }
}

fn send_failed(context: &str, err: impl std::fmt::Display) -> AppError {
    tracing::warn!(error = %err, "{}", context);
    AppError::dependency(EMAIL_SEND_FAILED)
}

fn code_template(title: &str, name: &str, intro: &str, code: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="600" cellpadding="0" cellspacing="0" align="center" style="background-color: #ffffff; border-radius: 8px;">
        <tr>
            <td style="background-color: #0F766E; padding: 24px; text-align: center;">
                <h1 style="margin: 0; color: #ffffff; font-size: 26px;">LearnHub</h1>
            </td>
        </tr>
        <tr>
            <td style="padding: 32px; color: #333333; font-size: 16px; line-height: 1.5;">
                <p>Hi {name},</p>
                <p>{intro}</p>
                <p style="font-size: 32px; letter-spacing: 8px; font-weight: bold; text-align: center;">{code}</p>
                <p>The code expires in {CODE_TTL_MINUTES} minutes.</p>
            </td>
        </tr>
    </table>
</body>
</html>"#
    )
}
