//! Normalization of raw JSON:API payloads into public `Event` records.
//!
//! The upstream document looks like `{ "data": [...], "included": [...] }`.
//! Events live in `data`; their venues are `included` resources of type
//! `"locations"`, referenced through `relationships.location.data.id`.
//!
//! Mapping is total: any missing or mistyped field falls back to a default
//! instead of failing, so a partially broken payload still renders.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::models::{Event, Location, Price};

const LOCATION_RESOURCE_TYPE: &str = "locations";

/// Map an upstream payload to events, preserving the order of `data`.
pub fn map_events(payload: &Value) -> Vec<Event> {
    let locations = index_locations(payload);

    payload
        .get("data")
        .and_then(Value::as_array)
        .map(|data| {
            data.iter()
                .map(|resource| map_event(resource, &locations))
                .collect()
        })
        .unwrap_or_default()
}

/// Build the location-id → public summary lookup from `included`.
fn index_locations(payload: &Value) -> HashMap<String, Location> {
    let mut locations = HashMap::new();

    let Some(included) = payload.get("included").and_then(Value::as_array) else {
        return locations;
    };

    for item in included {
        if item.get("type").and_then(Value::as_str) != Some(LOCATION_RESOURCE_TYPE) {
            continue;
        }
        let Some(id) = resource_id(item).filter(|id| !id.is_empty()) else {
            continue;
        };

        let attrs = Attributes::of(item);
        let name = attrs.string("name");
        let city = attrs.opt_string("city");
        locations.insert(id, Location::new(name, city));
    }

    locations
}

fn map_event(resource: &Value, locations: &HashMap<String, Location>) -> Event {
    let attrs = Attributes::of(resource);
    let vanity = attrs.string("vanity-name");

    let location = resource
        .pointer("/relationships/location/data")
        .and_then(resource_id)
        .and_then(|id| locations.get(&id).cloned());

    Event {
        id: resource_id(resource).unwrap_or_default(),

        name: attrs.string("name"),
        url: Event::url_for_vanity(&vanity),
        vanity,
        seo_name: attrs.opt_string("seo-name"),

        starts_at: attrs.string("starts-at"),
        ends_at: attrs.string("ends-at"),
        last_entry_time: attrs.opt_string("last-entry-time"),

        currency: attrs.string("currency"),
        price: Price {
            min: attrs.number("price-min"),
            max: attrs.number("price-max"),
        },

        image: attrs.opt_string("asset-url"),
        description_html: attrs.opt_string("description"),

        age_restriction: attrs.opt_string("age-restrictions"),
        attendees_count: attrs.number("attendees-count"),

        location,
    }
}

/// JSON:API ids are strings, but tolerate numeric ids.
fn resource_id(resource: &Value) -> Option<String> {
    match resource.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read-only view over a resource's `attributes`; absent means empty.
struct Attributes<'a>(Option<&'a Map<String, Value>>);

impl<'a> Attributes<'a> {
    fn of(resource: &'a Value) -> Self {
        Self(resource.get("attributes").and_then(Value::as_object))
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.and_then(|attrs| attrs.get(key))
    }

    fn opt_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_str).map(str::to_string)
    }

    fn string(&self, key: &str) -> String {
        self.opt_string(key).unwrap_or_default()
    }

    /// Only JSON numbers count; numeric-looking strings are not coerced.
    fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }
}
