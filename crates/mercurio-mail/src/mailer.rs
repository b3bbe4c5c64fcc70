//! SMTP mailer for sale confirmations
//!
//! Every confirmation goes to the configured sales inbox, not to the
//! customer; the conversation only carries a phone number, never an
//! email address.

use crate::config::MailerConfig;
use crate::error::{MailError, Result};
use askama::Template;
use lettre::message::header::ContentType;
use lettre::message::{MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use tracing::info;

/// One purchased product as it appears in the confirmation email
#[derive(Debug, Clone, Default)]
pub struct SaleProduct {
    /// Product code, when known
    pub code: Option<String>,
    /// Product description, when known
    pub description: Option<String>,
    /// Retail price in USD, when known
    pub retail_price: Option<f64>,
}

/// Display-ready table row; missing fields render as "-" and a missing
/// price as 0, matching the store receipt layout
struct SaleRow {
    code: String,
    description: String,
    price: String,
}

impl SaleRow {
    fn from_product(product: &SaleProduct) -> Self {
        Self {
            code: text_or_dash(product.code.as_deref()),
            description: text_or_dash(product.description.as_deref()),
            price: product.retail_price.unwrap_or(0.0).to_string(),
        }
    }
}

fn text_or_dash(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => "-".to_string(),
    }
}

/// HTML template for the sale confirmation email
#[derive(Template)]
#[template(path = "sale_confirmation.html")]
struct SaleConfirmationHtml<'a> {
    client: &'a str,
    phone: &'a str,
    rows: &'a [SaleRow],
    total: f64,
}

/// Plain text template for the sale confirmation email
#[derive(Template)]
#[template(path = "sale_confirmation.txt")]
struct SaleConfirmationText<'a> {
    client: &'a str,
    phone: &'a str,
    rows: &'a [SaleRow],
    total: f64,
}

/// Async SMTP mailer
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    sales_inbox: String,
}

impl Mailer {
    /// Build a STARTTLS transport from the configuration
    pub fn new(config: &MailerConfig) -> Result<Self> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
            sales_inbox: config.sales_inbox.clone(),
        })
    }

    /// Send a sale confirmation to the sales inbox
    pub async fn send_sale_confirmation(
        &self,
        phone: &str,
        products: &[SaleProduct],
        total: f64,
    ) -> Result<()> {
        let rows: Vec<SaleRow> = products.iter().map(SaleRow::from_product).collect();

        let html = SaleConfirmationHtml {
            client: &self.sales_inbox,
            phone,
            rows: &rows,
            total,
        }
        .render()?;
        let text = SaleConfirmationText {
            client: &self.sales_inbox,
            phone,
            rows: &rows,
            total,
        }
        .render()?;

        self.send_multipart(&self.sales_inbox, "Confirmación de tu compra", &text, &html)
            .await
    }

    /// Send a multipart email with plain text and HTML versions
    async fn send_multipart(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<()> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.transport.send(email).await?;

        info!(to = %to, subject = %subject, "sale confirmation email sent");
        Ok(())
    }
}
