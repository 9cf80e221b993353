use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use super::domain::{ListingStatus, Property, PropertyType};

/// Catalog search criteria. Unset fields do not constrain the result.
///
/// Query strings and form inputs send `""` or `"all"` for "no preference";
/// both decode to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingFilter {
    #[serde(
        default,
        deserialize_with = "choice_or_all",
        skip_serializing_if = "Option::is_none"
    )]
    pub property_type: Option<PropertyType>,
    #[serde(
        default,
        deserialize_with = "number_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "number_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "text_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "choice_or_all",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<ListingStatus>,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.property_type.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.location.is_none()
            && self.status.is_none()
    }

    pub fn matches(&self, property: &Property) -> bool {
        if let Some(kind) = self.property_type {
            if property.property_type != kind {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if property.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if property.price > max {
                return false;
            }
        }
        if let Some(needle) = self.location.as_deref() {
            let needle = needle.trim().to_lowercase();
            if !needle.is_empty() && !property.location.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if property.status != status {
                return false;
            }
        }
        true
    }

    /// Listings satisfying every criterion, in their original order.
    pub fn apply<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        properties
            .iter()
            .filter(|property| self.matches(property))
            .collect()
    }
}

trait Choice: Sized {
    fn parse_choice(raw: &str) -> Option<Self>;
}

impl Choice for PropertyType {
    fn parse_choice(raw: &str) -> Option<Self> {
        PropertyType::parse(raw)
    }
}

impl Choice for ListingStatus {
    fn parse_choice(raw: &str) -> Option<Self> {
        ListingStatus::parse(raw)
    }
}

fn is_unset(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("all")
}

fn choice_or_all<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Choice,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) if is_unset(&value) => Ok(None),
        Some(value) => T::parse_choice(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown value '{value}'"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn number_or_blank<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => finite(value, &value.to_string()),
        Some(NumberOrText::Text(value)) if value.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(value)) => match f64::from_str(value.trim()) {
            Ok(parsed) => finite(parsed, &value),
            Err(_) => Err(serde::de::Error::custom(format!("'{value}' is not a number"))),
        },
    }
}

fn finite<E: serde::de::Error>(value: f64, raw: &str) -> Result<Option<f64>, E> {
    if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(E::custom(format!("'{raw}' is not a finite number")))
    }
}

fn text_or_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::tests::{priced, sample_properties};

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let properties = sample_properties(5);
        let filter = ListingFilter::default();
        assert!(filter.is_empty());
        let result: Vec<Property> = filter.apply(&properties).into_iter().cloned().collect();
        assert_eq!(result, properties);
    }

    #[test]
    fn min_price_keeps_relative_order() {
        let properties = vec![
            priced("a", 100.0, "Astana"),
            priced("b", 200.0, "Almaty"),
            priced("c", 300.0, "Shymkent"),
        ];
        let filter = ListingFilter {
            min_price: Some(150.0),
            ..ListingFilter::default()
        };
        let ids: Vec<&str> = filter.apply(&properties).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn location_is_case_insensitive_substring() {
        let properties = vec![priced("a", 100.0, "Astana"), priced("b", 100.0, "Алматы")];
        let filter = ListingFilter {
            location: Some("as".to_string()),
            ..ListingFilter::default()
        };
        assert_eq!(filter.apply(&properties).len(), 1);

        let cyrillic = ListingFilter {
            location: Some("АЛМА".to_string()),
            ..ListingFilter::default()
        };
        let found = cyrillic.apply(&properties);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "b");
    }

    #[test]
    fn criteria_combine_with_and() {
        let mut properties = vec![
            priced("a", 100.0, "Astana"),
            priced("b", 250.0, "Astana"),
            priced("c", 250.0, "Almaty"),
        ];
        properties[1].property_type = PropertyType::Villa;
        properties[2].property_type = PropertyType::Villa;

        let filter = ListingFilter {
            property_type: Some(PropertyType::Villa),
            max_price: Some(300.0),
            location: Some("ast".to_string()),
            ..ListingFilter::default()
        };
        let ids: Vec<&str> = filter.apply(&properties).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn filtering_twice_matches_filtering_once() {
        let properties = sample_properties(8);
        let filter = ListingFilter {
            min_price: Some(1_000_000.0),
            max_price: Some(5_000_000.0),
            ..ListingFilter::default()
        };
        let once: Vec<Property> = filter.apply(&properties).into_iter().cloned().collect();
        let twice: Vec<Property> = filter.apply(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert_eq!(filter.apply(&properties), filter.apply(&properties));
    }

    #[test]
    fn decodes_all_and_blank_as_unset() {
        let filter: ListingFilter = serde_json::from_value(serde_json::json!({
            "property_type": "all",
            "min_price": "",
            "max_price": "4500000",
            "location": "  ",
            "status": "sold"
        }))
        .expect("filter decodes");

        assert_eq!(filter.property_type, None);
        assert_eq!(filter.min_price, None);
        assert_eq!(filter.max_price, Some(4_500_000.0));
        assert_eq!(filter.location, None);
        assert_eq!(filter.status, Some(ListingStatus::Sold));
    }

    #[test]
    fn unknown_type_is_a_decode_error() {
        let result: Result<ListingFilter, _> =
            serde_json::from_value(serde_json::json!({ "property_type": "castle" }));
        assert!(result.is_err());
    }

    #[test]
    fn non_finite_price_bounds_are_rejected() {
        for raw in ["NaN", "inf", "-infinity"] {
            let result: Result<ListingFilter, _> =
                serde_json::from_value(serde_json::json!({ "min_price": raw }));
            assert!(result.is_err(), "{raw} should not decode");
        }

        let query: ListingFilter =
            serde_json::from_value(serde_json::json!({ "max_price": " 1e6 " })).expect("decodes");
        assert_eq!(query.max_price, Some(1_000_000.0));
    }
}
