//! Normalization of untyped request bodies into typed case commands
//!
//! Mobile clients send multipart-ish JSON: numbers as strings, tags as an
//! array, a JSON-encoded array, or a comma-separated string, and `lat`/`lng`
//! in place of `latitude`/`longitude`. Everything is resolved here, once, so
//! the lifecycle only ever sees `NewCase`, `CasePatch` and `CaseStatus`.

use serde_json::{Map, Value};

use crate::common::GeoPoint;
use crate::domains::cases::errors::CaseError;
use crate::domains::cases::models::{CaseKind, CasePatch, CaseSeverity, CaseStatus, NewCase};

type Body = Map<String, Value>;

/// Build a new operational case from a create request.
pub fn new_case_from_body(body: &Value) -> Result<NewCase, CaseError> {
    let fields = as_object(body)?;
    let (title, description) = required_text(fields)?;

    let kind = match non_empty(fields.get("type")) {
        Some(value) => parse_kind(value)?,
        None => return Err(CaseError::invalid("type is required")),
    };
    let severity = match non_empty(fields.get("severity")) {
        Some(value) => parse_severity(value)?,
        None => return Err(CaseError::invalid("severity is required")),
    };

    Ok(NewCase {
        title,
        description,
        kind,
        severity: Some(severity),
        location: required_location(fields)?,
        image_url: optional_string(fields, "imageUrl")?,
        animal_type: optional_string(fields, "animalType")?,
        animal_count: lenient_count(fields.get("animalCount")),
        tags: parse_tags(fields.get("tags")),
    })
}

/// Build an adoption listing from a create request. `type` and `severity`
/// in the body are ignored.
pub fn new_adoption_from_body(body: &Value) -> Result<NewCase, CaseError> {
    let fields = as_object(body)?;
    let (title, description) = required_text(fields)?;

    Ok(NewCase {
        title,
        description,
        kind: CaseKind::Adoption,
        severity: None,
        location: required_location(fields)?,
        image_url: optional_string(fields, "imageUrl")?,
        animal_type: optional_string(fields, "animalType")?,
        animal_count: lenient_count(fields.get("animalCount")),
        tags: parse_tags(fields.get("tags")),
    })
}

/// Build a descriptive-field patch from an update request.
///
/// Keys outside the descriptive set (`status`, `assignedNgoId`,
/// `reportedById`, ...) are dropped here and never reach the lifecycle.
pub fn case_patch_from_body(body: &Value) -> Result<CasePatch, CaseError> {
    let fields = as_object(body)?;
    let mut patch = CasePatch::default();

    if let Some(Value::String(title)) = fields.get("title") {
        patch.title = Some(title.clone());
    }
    if let Some(Value::String(description)) = fields.get("description") {
        patch.description = Some(description.clone());
    }
    if let Some(value) = non_empty(fields.get("type")) {
        patch.kind = Some(parse_kind(value)?);
    }
    match fields.get("severity") {
        None => {}
        Some(Value::Null) => patch.severity = Some(None),
        Some(value) => patch.severity = Some(Some(parse_severity(value)?)),
    }
    if let Some(value) = alias(fields, "latitude", "lat") {
        patch.latitude = Some(to_number(value));
    }
    if let Some(value) = alias(fields, "longitude", "lng") {
        patch.longitude = Some(to_number(value));
    }
    match fields.get("animalType") {
        None => {}
        Some(Value::Null) => patch.animal_type = Some(None),
        Some(Value::String(animal_type)) => patch.animal_type = Some(Some(animal_type.clone())),
        Some(_) => return Err(CaseError::invalid("animalType must be a string")),
    }
    match fields.get("animalCount") {
        None => {}
        Some(Value::Null) => patch.animal_count = Some(None),
        Some(value) => {
            let count = to_count(to_number(value))
                .ok_or_else(|| CaseError::invalid("animalCount must be a whole number"))?;
            patch.animal_count = Some(Some(count));
        }
    }
    if fields.contains_key("tags") {
        patch.tags = Some(parse_tags(fields.get("tags")));
    }

    Ok(patch)
}

/// Read the optional `status` of a status-change request.
///
/// `None` means the caller is claiming the case.
pub fn status_from_body(body: &Value) -> Result<Option<CaseStatus>, CaseError> {
    let status = match body {
        Value::Null => None,
        Value::Object(fields) => fields.get("status"),
        _ => return Err(CaseError::invalid("Request body must be a JSON object")),
    };

    match status {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .parse::<CaseStatus>()
            .map(Some)
            .map_err(|e| CaseError::invalid(e.to_string())),
        Some(_) => Err(CaseError::invalid("status must be a string")),
    }
}

/// Normalize `tags` given as an array, a JSON-encoded array, or a
/// comma-separated string. Anything else yields no tags.
pub fn parse_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(tag_text).collect(),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items.iter().filter_map(tag_text).collect(),
            Ok(_) => Vec::new(),
            Err(_) => raw
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        },
        _ => Vec::new(),
    }
}

fn tag_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric coercion for loosely-typed inputs: numbers pass through, numeric
/// strings are parsed, everything else is NaN.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                f64::NAN
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    }
}

fn to_count(number: f64) -> Option<i32> {
    let in_range = number >= f64::from(i32::MIN) && number <= f64::from(i32::MAX);
    (number.is_finite() && number.fract() == 0.0 && in_range).then_some(number as i32)
}

/// On create a count that does not coerce is dropped rather than rejected.
fn lenient_count(value: Option<&Value>) -> Option<i32> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => to_count(to_number(value)),
    }
}

fn as_object(body: &Value) -> Result<&Body, CaseError> {
    body.as_object()
        .ok_or_else(|| CaseError::invalid("Request body must be a JSON object"))
}

fn non_empty(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

fn alias<'a>(fields: &'a Body, name: &str, short: &str) -> Option<&'a Value> {
    fields
        .get(name)
        .filter(|v| !v.is_null())
        .or_else(|| fields.get(short))
}

fn required_text(fields: &Body) -> Result<(String, String), CaseError> {
    match (fields.get("title"), fields.get("description")) {
        (Some(Value::String(title)), Some(Value::String(description)))
            if !title.is_empty() && !description.is_empty() =>
        {
            Ok((title.clone(), description.clone()))
        }
        _ => Err(CaseError::invalid("title and description are required")),
    }
}

fn required_location(fields: &Body) -> Result<GeoPoint, CaseError> {
    let latitude = alias(fields, "latitude", "lat").map_or(f64::NAN, to_number);
    let longitude = alias(fields, "longitude", "lng").map_or(f64::NAN, to_number);
    GeoPoint::new(latitude, longitude)
        .map_err(|_| CaseError::invalid("latitude and longitude are required"))
}

fn optional_string(fields: &Body, key: &str) -> Result<Option<String>, CaseError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(CaseError::invalid(format!("{key} must be a string"))),
    }
}

fn parse_kind(value: &Value) -> Result<CaseKind, CaseError> {
    value
        .as_str()
        .ok_or_else(|| CaseError::invalid("type must be a string"))?
        .parse()
        .map_err(|e: anyhow::Error| CaseError::invalid(e.to_string()))
}

fn parse_severity(value: &Value) -> Result<CaseSeverity, CaseError> {
    value
        .as_str()
        .ok_or_else(|| CaseError::invalid("severity must be a string"))?
        .parse()
        .map_err(|e: anyhow::Error| CaseError::invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tags_accept_all_client_shapes() {
        let expected = vec!["dog".to_string(), "injured".to_string()];
        assert_eq!(parse_tags(Some(&json!(["dog", "injured"]))), expected);
        assert_eq!(parse_tags(Some(&json!("[\"dog\",\"injured\"]"))), expected);
        assert_eq!(parse_tags(Some(&json!(" dog , injured ,"))), expected);
        assert!(parse_tags(Some(&json!("{\"a\":1}"))).is_empty());
        assert!(parse_tags(Some(&json!(42))).is_empty());
        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn test_new_case_coerces_strings_and_aliases() {
        let body = json!({
            "title": "Stray puppies",
            "description": "Four puppies under the bridge",
            "type": "STRAY",
            "severity": "Moderate",
            "lat": "12.9716",
            "lng": 77.5946,
            "animalCount": "4",
            "tags": "puppy,stray",
            "imageUrl": "https://img.example.com/p.jpg"
        });

        let new_case = new_case_from_body(&body).unwrap();
        assert_eq!(new_case.kind, CaseKind::Stray);
        assert_eq!(new_case.severity, Some(CaseSeverity::Moderate));
        assert_eq!(new_case.location.latitude, 12.9716);
        assert_eq!(new_case.location.longitude, 77.5946);
        assert_eq!(new_case.animal_count, Some(4));
        assert_eq!(new_case.tags, vec!["puppy", "stray"]);
        assert_eq!(
            new_case.image_url.as_deref(),
            Some("https://img.example.com/p.jpg")
        );
    }

    #[test]
    fn test_new_case_required_fields() {
        let base = json!({
            "title": "t",
            "description": "d",
            "type": "INJURED",
            "severity": "Low",
            "latitude": 1.0,
            "longitude": 2.0
        });
        assert!(new_case_from_body(&base).is_ok());

        for (key, message) in [
            ("title", "title and description are required"),
            ("type", "type is required"),
            ("severity", "severity is required"),
            ("latitude", "latitude and longitude are required"),
        ] {
            let mut body = base.clone();
            body.as_object_mut().unwrap().remove(key);
            match new_case_from_body(&body) {
                Err(CaseError::InvalidArgument(msg)) => assert_eq!(msg, message),
                other => panic!("{key}: unexpected {other:?}"),
            }
        }

        let mut bad_latitude = base.clone();
        bad_latitude["latitude"] = json!("north");
        assert!(new_case_from_body(&bad_latitude).is_err());

        let mut bad_severity = base;
        bad_severity["severity"] = json!("Apocalyptic");
        assert!(matches!(
            new_case_from_body(&bad_severity),
            Err(CaseError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_adoption_ignores_type_and_severity() {
        let body = json!({
            "title": "Kitten",
            "description": "Looking for a home",
            "type": "INJURED",
            "severity": "Critical",
            "latitude": "10",
            "longitude": "20",
            "animalCount": "many"
        });

        let listing = new_adoption_from_body(&body).unwrap();
        assert_eq!(listing.kind, CaseKind::Adoption);
        assert_eq!(listing.severity, None);
        assert_eq!(listing.animal_count, None);
    }

    #[test]
    fn test_patch_drops_status_and_assignment() {
        let body = json!({
            "title": "Updated",
            "status": "Closed",
            "assignedNgoId": "0190c3c4-0000-7000-8000-000000000000",
            "reportedById": "0190c3c4-0000-7000-8000-000000000001"
        });

        let patch = case_patch_from_body(&body).unwrap();
        assert_eq!(
            patch,
            CasePatch {
                title: Some("Updated".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_patch_distinguishes_clear_from_absent() {
        let body = json!({
            "animalType": null,
            "animalCount": "3",
            "latitude": "1.5",
            "tags": []
        });

        let patch = case_patch_from_body(&body).unwrap();
        assert_eq!(patch.animal_type, Some(None));
        assert_eq!(patch.animal_count, Some(Some(3)));
        assert_eq!(patch.latitude, Some(1.5));
        assert_eq!(patch.longitude, None);
        assert_eq!(patch.severity, None);
        assert_eq!(patch.tags, Some(vec![]));
    }

    #[test]
    fn test_patch_keeps_unparseable_coordinates_for_validation() {
        let patch = case_patch_from_body(&json!({ "longitude": "east" })).unwrap();
        assert!(patch.longitude.is_some_and(f64::is_nan));
    }

    #[test]
    fn test_status_body() {
        assert_eq!(status_from_body(&json!({})).unwrap(), None);
        assert_eq!(status_from_body(&Value::Null).unwrap(), None);
        assert_eq!(
            status_from_body(&json!({ "status": "Resolved" })).unwrap(),
            Some(CaseStatus::Resolved)
        );
        match status_from_body(&json!({ "status": "Done" })) {
            Err(CaseError::InvalidArgument(msg)) => assert!(msg.contains("Must be one of")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
