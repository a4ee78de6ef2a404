use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Account keyed by the identity-provider subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub alias: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub id: i64,
    pub link_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Hits per alias, one point per owned link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub alias: String,
    pub hits: u64,
}

/// One row of the analytics table: a link joined with its hit aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: i64,
    pub url: String,
    pub alias: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub number_of_hits: u64,
    pub last_hit: Option<DateTime<Utc>>,
}

/// Column a table view may be filtered on.
///
/// Parsing from caller input goes through this enum, so nothing a client
/// sends ever reaches the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
pub enum FilterField {
    #[serde(rename = "createdAt")]
    #[strum(serialize = "createdAt")]
    CreatedAt,
    #[serde(rename = "lastHit")]
    #[strum(serialize = "lastHit")]
    LastHit,
}

/// Exclusive time window on a [`FilterField`]: `field > from AND field < to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFilter {
    pub field: FilterField,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// User columns that may be changed one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserField {
    Name,
    Email,
}

/// Profile values written by an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_filter_field_allow_list() {
        assert_eq!(FilterField::from_str("createdAt").unwrap(), FilterField::CreatedAt);
        assert_eq!(FilterField::from_str("lastHit").unwrap(), FilterField::LastHit);
        assert!(FilterField::from_str("alias").is_err());
        assert!(FilterField::from_str("createdAt > 0 OR 1=1 --").is_err());
    }

    #[test]
    fn test_user_field_allow_list() {
        assert_eq!(UserField::from_str("name").unwrap(), UserField::Name);
        assert_eq!(UserField::from_str("email").unwrap(), UserField::Email);
        assert!(UserField::from_str("id").is_err());
        assert!(UserField::from_str("is_active").is_err());
    }

    #[test]
    fn test_filter_field_serde_names() {
        let json = serde_json::to_string(&FilterField::LastHit).unwrap();
        assert_eq!(json, "\"lastHit\"");
        assert!(serde_json::from_str::<FilterField>("\"updatedAt\"").is_err());
    }
}
