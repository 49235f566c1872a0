use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::models::{Booking, BookingStatus, DayAvailability, NewBooking, Period};

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("no slots available for this time")]
    SlotsExhausted,

    #[error("booking not found")]
    BookingNotFound,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for AvailabilityError {
    fn from(e: rusqlite::Error) -> Self {
        AvailabilityError::Storage(e.into())
    }
}

/// Remaining capacity for both periods of a date. Pure read; dates with no
/// ledger rows report the default capacity.
pub fn get_availability(conn: &Connection, date: NaiveDate) -> anyhow::Result<DayAvailability> {
    Ok(DayAvailability {
        morning: queries::capacity(conn, date, Period::Morning)?,
        afternoon: queries::capacity(conn, date, Period::Afternoon)?,
    })
}

/// Creates a booking and consumes one unit of slot capacity.
///
/// The capacity check, booking insert, and decrement run inside one
/// transaction: either all three take effect or none do, so a booking can
/// never exist without its matching capacity unit, and concurrent reserves
/// for the same (date, period) serialize at the storage layer. At most
/// `capacity` reserves succeed for any slot.
pub fn reserve(conn: &mut Connection, fields: NewBooking) -> Result<Booking, AvailabilityError> {
    let tx = conn.transaction()?;

    let remaining = queries::capacity(&tx, fields.date, fields.period)?;
    if remaining <= 0 {
        // Transaction drops here and rolls back; no booking row, no
        // ledger mutation.
        return Err(AvailabilityError::SlotsExhausted);
    }

    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        date: fields.date,
        period: fields.period,
        client_name: fields.client_name,
        service_type: fields.service_type,
        contact: fields.contact,
        email: fields.email,
        address: fields.address,
        payment_method: fields.payment_method,
        receipt_path: fields.receipt_path,
        status: BookingStatus::Pending,
        created_at: Utc::now().naive_utc(),
    };

    queries::insert_booking(&tx, &booking)?;
    queries::decrement_capacity(&tx, booking.date, booking.period)?;

    tx.commit()?;
    Ok(booking)
}

/// Deletes a booking and restores one unit of capacity to its slot, in one
/// transaction. Unknown ids leave the ledger untouched.
pub fn release(conn: &mut Connection, id: &str) -> Result<(NaiveDate, Period), AvailabilityError> {
    let tx = conn.transaction()?;

    let (date, period) =
        queries::delete_booking(&tx, id)?.ok_or(AvailabilityError::BookingNotFound)?;
    queries::increment_capacity(&tx, date, period)?;

    tx.commit()?;
    Ok((date, period))
}

/// Admin override for both periods of a date. Values are stored as supplied
/// and are not reconciled against existing booking counts.
pub fn override_capacity(
    conn: &mut Connection,
    date: NaiveDate,
    morning: i64,
    afternoon: i64,
) -> anyhow::Result<()> {
    let tx = conn.transaction()?;
    queries::set_capacity(&tx, date, Period::Morning, morning)?;
    queries::set_capacity(&tx, date, Period::Afternoon, afternoon)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{PaymentMethod, ServiceType, DEFAULT_CAPACITY};

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_booking(d: &str, period: Period) -> NewBooking {
        NewBooking {
            date: date(d),
            period,
            client_name: "Alice".to_string(),
            service_type: ServiceType::Weekly,
            contact: "+60123456789".to_string(),
            email: None,
            address: "1 Main St".to_string(),
            payment_method: PaymentMethod::Cash,
            receipt_path: None,
        }
    }

    #[test]
    fn test_unwritten_date_defaults_to_full_capacity() {
        let conn = setup_db();
        let avail = get_availability(&conn, date("2024-03-15")).unwrap();
        assert_eq!(avail.morning, DEFAULT_CAPACITY);
        assert_eq!(avail.afternoon, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_reserve_decrements_by_one() {
        let mut conn = setup_db();
        let booking = reserve(&mut conn, new_booking("2024-03-15", Period::Morning)).unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);

        let avail = get_availability(&conn, date("2024-03-15")).unwrap();
        assert_eq!(avail.morning, DEFAULT_CAPACITY - 1);
        assert_eq!(avail.afternoon, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_reserve_at_zero_fails_and_creates_nothing() {
        let mut conn = setup_db();
        override_capacity(&mut conn, date("2024-03-15"), 0, 5).unwrap();

        let result = reserve(&mut conn, new_booking("2024-03-15", Period::Morning));
        assert!(matches!(result, Err(AvailabilityError::SlotsExhausted)));

        let avail = get_availability(&conn, date("2024-03-15")).unwrap();
        assert_eq!(avail.morning, 0);
        assert!(queries::list_bookings(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_reserve_then_release_round_trips_capacity() {
        let mut conn = setup_db();
        let before = get_availability(&conn, date("2024-03-15")).unwrap();

        let booking = reserve(&mut conn, new_booking("2024-03-15", Period::Afternoon)).unwrap();
        let (d, p) = release(&mut conn, &booking.id).unwrap();
        assert_eq!(d, date("2024-03-15"));
        assert_eq!(p, Period::Afternoon);

        let after = get_availability(&conn, date("2024-03-15")).unwrap();
        assert_eq!(after.afternoon, before.afternoon);
        assert!(queries::list_bookings(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_override_then_exhaust() {
        let mut conn = setup_db();
        override_capacity(&mut conn, date("2024-03-15"), 3, 3).unwrap();

        for expected in [2, 1, 0] {
            reserve(&mut conn, new_booking("2024-03-15", Period::Morning)).unwrap();
            let avail = get_availability(&conn, date("2024-03-15")).unwrap();
            assert_eq!(avail.morning, expected);
        }

        let result = reserve(&mut conn, new_booking("2024-03-15", Period::Morning));
        assert!(matches!(result, Err(AvailabilityError::SlotsExhausted)));
        assert_eq!(queries::list_bookings(&conn).unwrap().len(), 3);
    }

    #[test]
    fn test_release_unknown_booking_leaves_ledger_untouched() {
        let mut conn = setup_db();
        override_capacity(&mut conn, date("2024-03-15"), 2, 2).unwrap();

        let result = release(&mut conn, "no-such-id");
        assert!(matches!(result, Err(AvailabilityError::BookingNotFound)));

        let avail = get_availability(&conn, date("2024-03-15")).unwrap();
        assert_eq!(avail.morning, 2);
        assert_eq!(avail.afternoon, 2);
    }

    #[test]
    fn test_release_without_ledger_row_creates_one_above_default() {
        let mut conn = setup_db();
        let booking = reserve(&mut conn, new_booking("2024-03-16", Period::Morning)).unwrap();

        // Simulate an admin wiping the ledger row out from under the booking.
        conn.execute("DELETE FROM slots", []).unwrap();

        release(&mut conn, &booking.id).unwrap();
        let avail = get_availability(&conn, date("2024-03-16")).unwrap();
        assert_eq!(avail.morning, DEFAULT_CAPACITY + 1);
    }

    #[test]
    fn test_negative_override_reads_as_zero() {
        let mut conn = setup_db();
        override_capacity(&mut conn, date("2024-03-15"), -3, 5).unwrap();

        let avail = get_availability(&conn, date("2024-03-15")).unwrap();
        assert_eq!(avail.morning, 0);

        let result = reserve(&mut conn, new_booking("2024-03-15", Period::Morning));
        assert!(matches!(result, Err(AvailabilityError::SlotsExhausted)));
    }

    #[test]
    fn test_concurrent_reserves_respect_capacity() {
        use std::sync::{Arc, Mutex};

        let conn = Arc::new(Mutex::new(setup_db()));
        {
            let mut db = conn.lock().unwrap();
            override_capacity(&mut db, date("2024-03-15"), 1, 1).unwrap();
        }

        let mut handles = vec![];
        for _ in 0..2 {
            let conn = Arc::clone(&conn);
            handles.push(std::thread::spawn(move || {
                let mut db = conn.lock().unwrap();
                reserve(&mut db, new_booking("2024-03-15", Period::Morning)).is_ok()
            }));
        }

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);

        let db = conn.lock().unwrap();
        let avail = get_availability(&db, date("2024-03-15")).unwrap();
        assert_eq!(avail.morning, 0);
        assert_eq!(queries::list_bookings(&db).unwrap().len(), 1);
    }
}
