//! Email collaborator surface. Transport is out of scope for this
//! service; the default implementation logs the send and succeeds, and
//! callers treat failures as non-fatal either way.

use anyhow::Result;
use tracing::info;

pub async fn send_enrollment_confirmation(
    recipient_email: &str,
    recipient_name: &str,
    class_name: &str,
) -> Result<()> {
    info!(
        to = recipient_email,
        class = class_name,
        "Sending enrollment confirmation email to {recipient_name}"
    );
    Ok(())
}
