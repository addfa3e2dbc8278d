use crate::error::CafeError;
use crate::model::TableId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Occupancy of a physical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Occupied,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
        }
    }
}

impl Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = CafeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(TableStatus::Available),
            "occupied" => Ok(TableStatus::Occupied),
            other => Err(CafeError::InvalidArgument(format!(
                "unknown table status '{other}'"
            ))),
        }
    }
}

/// A seating unit customers order from.
///
/// `number` is what is printed on the table and encoded in its QR link. It is
/// assigned as `count + 1` at creation, so deleting a table can produce
/// duplicate numbers later on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub number: u32,
    pub status: TableStatus,
}

impl Table {
    pub fn new(id: TableId, number: u32) -> Self {
        Self {
            id,
            number,
            status: TableStatus::Available,
        }
    }

    /// The ordering link encoded in this table's QR code.
    pub fn order_url(&self, base_url: &str) -> String {
        format!("{}?table={}", base_url.trim_end_matches('/'), self.number)
    }
}

/// Read the table number from an ordering link's query string.
///
/// Accepts either a full URL or a bare query (`table=4&x=1`). Falls back to
/// table 1 when the parameter is missing or not a positive number.
pub fn parse_table_param(url_or_query: &str) -> u32 {
    let query = match url_or_query.split_once('?') {
        Some((_, query)) => query,
        None => url_or_query,
    };
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "table")
        .and_then(|(_, value)| value.parse::<u32>().ok())
        .filter(|number| *number > 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("occupied".parse::<TableStatus>().unwrap(), TableStatus::Occupied);
        assert_eq!(" Available ".parse::<TableStatus>().unwrap(), TableStatus::Available);
        assert!(matches!(
            "reserved".parse::<TableStatus>(),
            Err(CafeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_order_url_round_trips_number() {
        let table = Table::new(TableId(3), 4);
        let url = table.order_url("https://cafe.example/order/");
        assert_eq!(url, "https://cafe.example/order?table=4");
        assert_eq!(parse_table_param(&url), 4);
    }

    #[test]
    fn test_table_param_defaults_to_one() {
        assert_eq!(parse_table_param("https://cafe.example/order"), 1);
        assert_eq!(parse_table_param("table=abc"), 1);
        assert_eq!(parse_table_param("table=0"), 1);
        assert_eq!(parse_table_param("lang=en&table=12#menu"), 12);
    }
}
