use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus, PaymentMethod, Period, ServiceType, DEFAULT_CAPACITY};

// ── Slot Ledger ──
//
// One row per (date, period); absence of a row means DEFAULT_CAPACITY.
// All adjustments are single upsert statements so concurrent writers on the
// same key cannot lose updates.

pub fn capacity(conn: &Connection, date: NaiveDate, period: Period) -> anyhow::Result<i64> {
    let result = conn.query_row(
        "SELECT remaining FROM slots WHERE date = ?1 AND period = ?2",
        params![date_str(date), period.as_str()],
        |row| row.get::<_, i64>(0),
    );

    match result {
        // Reads are clamped at zero even if an admin override stored less.
        Ok(remaining) => Ok(remaining.max(0)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(DEFAULT_CAPACITY),
        Err(e) => Err(e.into()),
    }
}

/// Admin override. Stores the value as supplied, without clamping.
pub fn set_capacity(
    conn: &Connection,
    date: NaiveDate,
    period: Period,
    value: i64,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO slots (date, period, remaining) VALUES (?1, ?2, ?3)
         ON CONFLICT(date, period) DO UPDATE SET remaining = excluded.remaining",
        params![date_str(date), period.as_str(), value],
    )?;
    Ok(())
}

/// Consumes one unit of capacity, floored at zero, and returns the new value.
/// A missing row is created at DEFAULT_CAPACITY - 1.
pub fn decrement_capacity(conn: &Connection, date: NaiveDate, period: Period) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO slots (date, period, remaining) VALUES (?1, ?2, ?3)
         ON CONFLICT(date, period) DO UPDATE SET remaining = MAX(remaining - 1, 0)",
        params![date_str(date), period.as_str(), DEFAULT_CAPACITY - 1],
    )?;

    let remaining: i64 = conn.query_row(
        "SELECT remaining FROM slots WHERE date = ?1 AND period = ?2",
        params![date_str(date), period.as_str()],
        |row| row.get(0),
    )?;
    Ok(remaining)
}

/// Restores one unit of capacity. A missing row is created at
/// DEFAULT_CAPACITY + 1, since deletion implies a prior consumed unit.
pub fn increment_capacity(conn: &Connection, date: NaiveDate, period: Period) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO slots (date, period, remaining) VALUES (?1, ?2, ?3)
         ON CONFLICT(date, period) DO UPDATE SET remaining = remaining + 1",
        params![date_str(date), period.as_str(), DEFAULT_CAPACITY + 1],
    )?;
    Ok(())
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, date, period, client_name, service_type, contact, email, address, payment_method, receipt_path, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            booking.id,
            date_str(booking.date),
            booking.period.as_str(),
            booking.client_name,
            booking.service_type.as_str(),
            booking.contact,
            booking.email,
            booking.address,
            booking.payment_method.as_str(),
            booking.receipt_path,
            booking.status.as_str(),
            booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY date DESC, created_at DESC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<Option<Booking>> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;

    if count == 0 {
        return Ok(None);
    }
    get_booking_by_id(conn, id)
}

/// Deletes a booking and returns its slot key so the caller can release the
/// consumed capacity. None when the id is unknown.
pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<(NaiveDate, Period)>> {
    let result = conn.query_row(
        "SELECT date, period FROM bookings WHERE id = ?1",
        params![id],
        |row| {
            let date: String = row.get(0)?;
            let period: String = row.get(1)?;
            Ok((date, period))
        },
    );

    let (date_s, period_s) = match result {
        Ok(key) => key,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;

    let date = NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")?;
    let period = Period::parse(&period_s)
        .ok_or_else(|| anyhow::anyhow!("invalid period in stored booking: {period_s}"))?;
    Ok(Some((date, period)))
}

const BOOKING_COLUMNS: &str =
    "id, date, period, client_name, service_type, contact, email, address, payment_method, receipt_path, status, created_at";

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let date_s: String = row.get(1)?;
    let period_s: String = row.get(2)?;
    let client_name: String = row.get(3)?;
    let service_s: String = row.get(4)?;
    let contact: String = row.get(5)?;
    let email: Option<String> = row.get(6)?;
    let address: String = row.get(7)?;
    let payment_s: String = row.get(8)?;
    let receipt_path: Option<String> = row.get(9)?;
    let status_s: String = row.get(10)?;
    let created_at_s: String = row.get(11)?;

    let date = NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")?;
    let period = Period::parse(&period_s)
        .ok_or_else(|| anyhow::anyhow!("invalid period in stored booking: {period_s}"))?;
    let service_type = ServiceType::parse(&service_s)
        .ok_or_else(|| anyhow::anyhow!("invalid service type in stored booking: {service_s}"))?;
    let payment_method = PaymentMethod::parse(&payment_s)
        .ok_or_else(|| anyhow::anyhow!("invalid payment method in stored booking: {payment_s}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_s, "%Y-%m-%d %H:%M:%S")?;

    Ok(Booking {
        id,
        date,
        period,
        client_name,
        service_type,
        contact,
        email,
        address,
        payment_method,
        receipt_path,
        status: BookingStatus::from_str(&status_s),
        created_at,
    })
}

fn date_str(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
