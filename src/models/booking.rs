use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Period;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "time_period")]
    pub period: Period,
    pub client_name: String,
    pub service_type: ServiceType,
    pub contact: String,
    pub email: Option<String>,
    pub address: String,
    pub payment_method: PaymentMethod,
    pub receipt_path: Option<String>,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

/// Validated input for a new reservation. Built by the handler after enum
/// and required-field checks, consumed by the availability service.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub date: NaiveDate,
    pub period: Period,
    pub client_name: String,
    pub service_type: ServiceType,
    pub contact: String,
    pub email: Option<String>,
    pub address: String,
    pub payment_method: PaymentMethod,
    pub receipt_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Strict parse for admin input.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Lenient parse for stored rows; unknown values fall back to pending.
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or(BookingStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Weekly,
    Fortnightly,
    #[serde(rename = "one-off")]
    OneOff,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Weekly => "weekly",
            ServiceType::Fortnightly => "fortnightly",
            ServiceType::OneOff => "one-off",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weekly" => Some(ServiceType::Weekly),
            "fortnightly" => Some(ServiceType::Fortnightly),
            "one-off" => Some(ServiceType::OneOff),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Online => "online",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "online" => Some(PaymentMethod::Online),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "confirmed", "completed", "cancelled"] {
            assert_eq!(BookingStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(BookingStatus::parse("done").is_none());
        assert_eq!(BookingStatus::from_str("done"), BookingStatus::Pending);
    }

    #[test]
    fn test_service_type_parse() {
        assert_eq!(ServiceType::parse("one-off"), Some(ServiceType::OneOff));
        assert_eq!(ServiceType::parse("weekly"), Some(ServiceType::Weekly));
        assert!(ServiceType::parse("oneoff").is_none());
    }

    #[test]
    fn test_booking_serializes_period_as_time_period() {
        let booking = Booking {
            id: "b-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            period: Period::Afternoon,
            client_name: "Alice".to_string(),
            service_type: ServiceType::Weekly,
            contact: "+60123456789".to_string(),
            email: None,
            address: "1 Main St".to_string(),
            payment_method: PaymentMethod::Cash,
            receipt_path: None,
            status: BookingStatus::Pending,
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        };

        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["time_period"], "afternoon");
        assert_eq!(json["service_type"], "weekly");
        assert_eq!(json["date"], "2024-03-15");
    }
}
