use axum::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use receiptr_core::error::AppError;
use std::time::Duration;

use crate::config::SmtpConfig;
use crate::models::{BusinessProfile, ReceiptWithItems};

#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send a customer the shared-receipt link together with a summary of
    /// the receipt itself.
    async fn send_receipt_email(
        &self,
        to_email: &str,
        receipt: &ReceiptWithItems,
        business: &BusinessProfile,
        share_url: &str,
    ) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SmtpEmailService {
    mailer: SmtpTransport,
    from_address: String,
}

impl SmtpEmailService {
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let mailer = SmtpTransport::starttls_relay(&config.host)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e.to_string())))?
            .credentials(creds)
            .port(config.port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.host, "Email service initialized");

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        plain_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let email = Message::builder()
            .from(self.from_address.parse().map_err(
                |e: lettre::address::AddressError| AppError::InternalError(e.into()),
            )?)
            .to(to_email.parse().map_err(
                |e: lettre::address::AddressError| AppError::InternalError(e.into()),
            )?)
            .subject(subject)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain_body.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::InternalError(e.into()))?;

        // Send on the blocking pool so SMTP I/O never stalls the runtime.
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::InternalError(e.into()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to_email, subject = %subject, "Email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e.to_string(), to = %to_email, "Failed to send email");
                Err(AppError::EmailError(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl EmailProvider for SmtpEmailService {
    async fn send_receipt_email(
        &self,
        to_email: &str,
        receipt: &ReceiptWithItems,
        business: &BusinessProfile,
        share_url: &str,
    ) -> Result<(), AppError> {
        let subject = format!("Receipt from {}", business.business_name);

        let item_rows: String = receipt
            .items
            .iter()
            .map(|item| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                    item.description, item.quantity, item.price
                )
            })
            .collect();

        let html_body = format!(
            r#"<html>
    <body style="font-family: Arial, sans-serif;">
        <h2>Receipt from {business}</h2>
        <p>Dear Customer,</p>
        <p>Please find your receipt <strong>{number}</strong> below:</p>
        <table border="1" cellpadding="6" cellspacing="0">
            <tr><th>Description</th><th>Qty</th><th>Price</th></tr>
            {rows}
        </table>
        <p>Subtotal: {subtotal}<br/>VAT: {vat}<br/><strong>Total: {total}</strong></p>
        <p><a href="{url}">View this receipt online</a></p>
    </body>
</html>"#,
            business = business.business_name,
            number = receipt.receipt.receipt_number,
            rows = item_rows,
            subtotal = receipt.receipt.subtotal,
            vat = receipt.receipt.vat,
            total = receipt.receipt.total,
            url = share_url,
        );

        let plain_body = format!(
            "Receipt {number} from {business}\n\nTotal: {total}\n\nView it online: {url}\n",
            number = receipt.receipt.receipt_number,
            business = business.business_name,
            total = receipt.receipt.total,
            url = share_url,
        );

        self.send_email(to_email, &subject, &plain_body, &html_body)
            .await
    }
}

/// Email provider used when SMTP is not configured (dev, tests): logs and
/// succeeds without sending anything.
#[derive(Clone)]
pub struct NoopEmailService;

#[async_trait]
impl EmailProvider for NoopEmailService {
    async fn send_receipt_email(
        &self,
        to_email: &str,
        receipt: &ReceiptWithItems,
        _business: &BusinessProfile,
        _share_url: &str,
    ) -> Result<(), AppError> {
        tracing::info!(
            to = %to_email,
            receipt_number = %receipt.receipt.receipt_number,
            "SMTP not configured; skipping receipt email"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smtp_service_builds_from_config() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: "mailer@example.com".to_string(),
            password: "app-password".to_string(),
            from_address: "receipts@example.com".to_string(),
        };

        assert!(SmtpEmailService::new(&config).is_ok());
    }
}
