use tracing::{info, warn};

use crate::transport::ChatTransport;
use crate::user_registry::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Per-broadcast delivery tally.
pub struct DeliveryReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Fans `message` out to every recipient's delivery address. Per-recipient
/// failures are logged with the recipient identity and do not stop delivery
/// to the rest; the caller gate (owner identity, trigger prefix) has already
/// been applied upstream and is not re-checked here.
pub async fn broadcast(
    transport: &dyn ChatTransport,
    message: &str,
    recipients: &[User],
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    for recipient in recipients {
        match transport.send_text(recipient.chat_id, message).await {
            Ok(_) => report.succeeded += 1,
            Err(error) => {
                report.failed += 1;
                warn!(
                    user_id = recipient.user_id,
                    full_name = %recipient.full_name,
                    "broadcast delivery failed: {error:#}"
                );
            }
        }
    }
    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "broadcast completed"
    );
    report
}
