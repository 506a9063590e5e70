//! Raw Open Charge Map POI types, as found in an OCM JSON export.
//!
//! ## Observed shape
//!
//! Each array element is one point of interest. The fields we read are:
//!
//! - `AddressInfo`: object with `Latitude`/`Longitude` (numbers), `Title`
//!   and `Town` (strings). Some exports carry `null` here.
//! - `OperatorInfo`: object with a `Title`, or `null` for independent sites.
//! - `Connections`: array of connector objects whose `PowerKW` may be an
//!   integer, a float or `null`.
//!
//! Real exports contain typos and partial records (string coordinates,
//! `null` connection entries), so every field is decoded leniently: a value
//! of the wrong type is treated as missing rather than failing the record.
//! Whether a record is *usable* is decided later in [`crate::normalize`].

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// A single OCM point of interest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPoi {
    #[serde(rename = "AddressInfo", default, deserialize_with = "lenient_object")]
    pub address_info: Option<RawAddress>,

    #[serde(rename = "OperatorInfo", default, deserialize_with = "lenient_object")]
    pub operator_info: Option<RawOperator>,

    /// Connector entries; non-object elements are dropped during decoding.
    #[serde(rename = "Connections", default, deserialize_with = "lenient_list")]
    pub connections: Vec<RawConnection>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAddress {
    #[serde(rename = "Latitude", default, deserialize_with = "lenient")]
    pub latitude: Option<f64>,

    #[serde(rename = "Longitude", default, deserialize_with = "lenient")]
    pub longitude: Option<f64>,

    #[serde(rename = "Title", default, deserialize_with = "lenient")]
    pub title: Option<String>,

    #[serde(rename = "Town", default, deserialize_with = "lenient")]
    pub town: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawOperator {
    #[serde(rename = "Title", default, deserialize_with = "lenient")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawConnection {
    #[serde(rename = "PowerKW", default, deserialize_with = "lenient")]
    pub power_kw: Option<f64>,
}

impl RawPoi {
    /// Decode one top-level array element. Returns `None` for anything that
    /// is not a JSON object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// Structs would otherwise also accept a positional JSON array.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
