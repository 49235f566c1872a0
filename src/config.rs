use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub uploads_dir: String,
    pub resend_api_key: String,
    pub email_from: String,
    pub business_name: String,
    pub business_phone: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "cleanbook.db".to_string()),
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").unwrap_or_default(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "bookings@example.com".to_string()),
            business_name: env::var("BUSINESS_NAME")
                .unwrap_or_else(|_| "Cleanbook".to_string()),
            business_phone: env::var("BUSINESS_PHONE").unwrap_or_default(),
        }
    }
}
