pub mod booking;
pub mod slot;

pub use booking::{Booking, BookingStatus, NewBooking, PaymentMethod, ServiceType};
pub use slot::{DayAvailability, Period, DEFAULT_CAPACITY};
