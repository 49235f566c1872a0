pub mod resend;

use async_trait::async_trait;

use crate::models::Booking;

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

/// Used when no email API key is configured. Every send fails, which the
/// booking flow reports as `emailSent: false` without failing the booking.
pub struct DisabledEmail;

#[async_trait]
impl EmailProvider for DisabledEmail {
    async fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("email provider not configured"))
    }
}

/// Renders the confirmation email for a new booking. Returns (subject, html).
pub fn confirmation_email(
    booking: &Booking,
    business_name: &str,
    business_phone: &str,
) -> (String, String) {
    let subject = format!("Booking Confirmation - {business_name}");
    let formatted_date = booking.date.format("%A, %B %-d, %Y").to_string();
    let time_slot = booking.period.time_window();

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #4A90E2;">Booking Confirmation</h2>
    <p>Dear {client_name},</p>
    <p>Thank you for booking with {business_name}. Your booking details are as follows:</p>
    <div style="background-color: #f8f9fa; padding: 20px; border-radius: 5px; margin: 20px 0;">
        <p><strong>Date:</strong> {formatted_date}</p>
        <p><strong>Time:</strong> {time_slot}</p>
        <p><strong>Service Type:</strong> {service_type}</p>
        <p><strong>Service Address:</strong> {address}</p>
    </div>
    <p>If you need to make any changes to your booking or have any questions, please contact us at {business_phone}.</p>
    <p style="color: #666; font-size: 0.9em; margin-top: 30px;">
        This is an automated message. Please do not reply to this email.
    </p>
</div>"#,
        client_name = booking.client_name,
        service_type = booking.service_type.as_str(),
        address = booking.address,
    );

    (subject, html)
}
