pub mod availability;
pub mod email;
pub mod receipts;
