mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ContactRequest;

/// Outbound channel that tells the site owner about new contact requests.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Renders the notification text for a saved contact request.
#[must_use]
pub fn contact_message(request: &ContactRequest) -> String {
    let mut message = format!(
        "📩 New portfolio request\n\n👤 {} {}\n📞 {}\n💬 Telegram: {}",
        request.name, request.lastname, request.phone, request.telegram
    );
    if !request.description.is_empty() {
        message.push_str(&format!("\n📝 {}", request.description));
    }
    message.push_str(&format!("\n🌐 IP: {}", request.ip));
    message
}
