use serde::Serialize;

/// Public event pages live under this prefix, followed by the vanity slug.
pub const EVENT_URL_PREFIX: &str = "https://www.fatsoma.com/e/";

/// Normalized, frontend-safe event record.
///
/// Field names and nullability are a stable contract for rendering code:
/// strings missing upstream become `""`, optional values become `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,

    pub name: String,
    pub vanity: String,
    pub seo_name: Option<String>,
    pub url: String,

    pub starts_at: String,
    pub ends_at: String,
    pub last_entry_time: Option<String>,

    pub currency: String,
    pub price: Price,

    pub image: Option<String>,
    pub description_html: Option<String>,

    pub age_restriction: Option<String>,
    pub attendees_count: Option<f64>,

    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Price {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Public subset of an upstream location resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub city: Option<String>,
    pub display_name: String,
}

impl Location {
    pub fn new(name: String, city: Option<String>) -> Self {
        let display_name = match city.as_deref() {
            Some(c) if !c.is_empty() => format!("{}, {}", name, c),
            _ => name.clone(),
        };
        Self {
            name,
            city,
            display_name,
        }
    }
}

impl Event {
    /// Public page URL for a vanity slug; empty when there is no slug.
    pub fn url_for_vanity(vanity: &str) -> String {
        if vanity.is_empty() {
            String::new()
        } else {
            format!("{}{}", EVENT_URL_PREFIX, vanity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display_name_with_city() {
        let loc = Location::new("The Venue".to_string(), Some("Leeds".to_string()));
        assert_eq!(loc.display_name, "The Venue, Leeds");
    }

    #[test]
    fn test_location_display_name_without_city() {
        let loc = Location::new("The Venue".to_string(), None);
        assert_eq!(loc.display_name, "The Venue");

        // Empty city behaves like a missing one
        let loc = Location::new("The Venue".to_string(), Some(String::new()));
        assert_eq!(loc.display_name, "The Venue");
    }

    #[test]
    fn test_url_for_vanity() {
        assert_eq!(Event::url_for_vanity("foo"), "https://www.fatsoma.com/e/foo");
        assert_eq!(Event::url_for_vanity(""), "");
    }

    #[test]
    fn test_serializes_public_shape() {
        let event = Event {
            id: "1".to_string(),
            name: "Launch".to_string(),
            vanity: "launch".to_string(),
            seo_name: None,
            url: Event::url_for_vanity("launch"),
            starts_at: "2025-01-01T00:00:00Z".to_string(),
            ends_at: String::new(),
            last_entry_time: None,
            currency: "GBP".to_string(),
            price: Price { min: Some(5.0), max: None },
            image: None,
            description_html: None,
            age_restriction: None,
            attendees_count: Some(12.0),
            location: Some(Location::new("Hall".to_string(), None)),
        };

        let json = serde_json::to_value(&event).expect("event serializes");
        assert_eq!(json["seoName"], serde_json::Value::Null);
        assert_eq!(json["startsAt"], "2025-01-01T00:00:00Z");
        assert_eq!(json["price"]["min"], 5.0);
        assert_eq!(json["price"]["max"], serde_json::Value::Null);
        assert_eq!(json["attendeesCount"], 12.0);
        assert_eq!(json["location"]["displayName"], "Hall");
        assert!(json["location"].get("id").is_none());
    }
}
