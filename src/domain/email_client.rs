use color_eyre::eyre::Result;

use super::Email;

/// One-way outbound email. Callers treat dispatch as fire-and-forget:
/// a failed send is logged and never fails the triggering request.
#[async_trait::async_trait]
pub trait EmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<()>;
}
