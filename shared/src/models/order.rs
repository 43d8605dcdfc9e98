//! Order Model
//!
//! Orders are created and moved through their lifecycle by the ordering and
//! dispatch flows; the back office only filters and displays them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status as stored in the `orders.status` column.
///
/// The numeric code never leaves the server: filters arrive as names and
/// listings render names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i64)]
pub enum OrderStatus {
    New = 0,
    Accepted = 1,
    Cooking = 2,
    Ready = 3,
    Delivering = 4,
    Delivered = 5,
    Canceled = 6,
}

/// Name or code outside the fixed status set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownStatus {
    #[error("unknown order status name: {0}")]
    Name(String),
    #[error("unknown order status code: {0}")]
    Code(i64),
}

impl OrderStatus {
    /// Every status, in code order
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::New,
        OrderStatus::Accepted,
        OrderStatus::Cooking,
        OrderStatus::Ready,
        OrderStatus::Delivering,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    #[inline]
    pub const fn code(&self) -> i64 {
        *self as i64
    }

    pub const fn name(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, UnknownStatus> {
        Self::ALL
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| UnknownStatus::Name(name.to_string()))
    }

    pub fn to_name(code: i64) -> Result<&'static str, UnknownStatus> {
        Self::try_from(code).map(|s| s.name())
    }

    /// Translate a list of filter names into stored codes
    pub fn codes_for_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<i64>, UnknownStatus> {
        names
            .iter()
            .map(|n| Self::from_name(n.as_ref()).map(|s| s.code()))
            .collect()
    }
}

impl TryFrom<i64> for OrderStatus {
    type Error = UnknownStatus;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderStatus::New),
            1 => Ok(OrderStatus::Accepted),
            2 => Ok(OrderStatus::Cooking),
            3 => Ok(OrderStatus::Ready),
            4 => Ok(OrderStatus::Delivering),
            5 => Ok(OrderStatus::Delivered),
            6 => Ok(OrderStatus::Canceled),
            _ => Err(UnknownStatus::Code(value)),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Order row as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderRow {
    pub id: i64,
    pub contact_name: String,
    pub phone: String,
    /// Epoch milliseconds
    pub created_at: i64,
    pub price: f64,
    pub status: i64,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub driver_id: Option<i64>,
}

/// Order as shown to operators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderView {
    pub id: i64,
    pub name: String,
    pub phone: String,
    /// RFC 3339
    pub created_at: String,
    pub price: f64,
    pub status: OrderStatus,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub driver_id: Option<i64>,
}

impl TryFrom<OrderRow> for OrderView {
    type Error = UnknownStatus;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: OrderStatus::try_from(row.status)?,
            created_at: crate::util::millis_to_rfc3339(row.created_at),
            id: row.id,
            name: row.contact_name,
            phone: row.phone,
            price: row.price,
            address: row.address,
            lat: row.latitude,
            lng: row.longitude,
            driver_id: row.driver_id,
        })
    }
}
