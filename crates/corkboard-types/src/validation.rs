use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::api::{PhotoUpload, SubmitFoundItemRequest, SubmitLostItemRequest};

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024; // 5MB
pub const ACCEPTED_PHOTO_TYPES: &[&str] =
    &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// A single failed field constraint, surfaced inline to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_found_item(req: &SubmitFoundItemRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_length(&mut errors, "description", &req.description, 10, 500, "Description");
    check_length(&mut errors, "locationFound", &req.location_found, 3, 100, "Location");
    check_length(&mut errors, "contactInfo", &req.contact_info, 5, 100, "Contact info");
    if let Some(photo) = &req.photo {
        check_photo(&mut errors, photo);
    }
    finish(errors)
}

pub fn validate_lost_item(req: &SubmitLostItemRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_length(&mut errors, "description", &req.description, 10, 500, "Description");
    check_length(&mut errors, "lastSeenLocation", &req.last_seen_location, 3, 100, "Location");
    check_length(&mut errors, "contactInfo", &req.contact_info, 5, 100, "Contact info");

    if req.last_seen_date > Utc::now().date_naive() {
        errors.push(FieldError::new("lastSeenDate", "Date cannot be in the future."));
    } else if req.last_seen_date.year() < 2000 {
        errors.push(FieldError::new("lastSeenDate", "Date must be in the year 2000 or later."));
    }

    finish(errors)
}

/// A report needs a non-empty reason; checked before anything touches the
/// store.
pub fn validate_report_reason(reason: &str) -> Result<(), Vec<FieldError>> {
    if reason.trim().is_empty() {
        return Err(vec![FieldError::new(
            "reason",
            "Please provide a reason for reporting.",
        )]);
    }
    Ok(())
}

fn check_length(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
    label: &str,
) {
    let length = value.chars().count();
    if length < min {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at least {min} characters long."),
        ));
    } else if length > max {
        errors.push(FieldError::new(
            field,
            format!("{label} must be {max} characters or less."),
        ));
    }
}

fn check_photo(errors: &mut Vec<FieldError>, photo: &PhotoUpload) {
    if !ACCEPTED_PHOTO_TYPES.contains(&photo.content_type.as_str()) {
        errors.push(FieldError::new(
            "photo",
            "Only .jpg, .jpeg, .png and .webp formats are supported.",
        ));
    }
    // Base64 inflates by 4/3, so the payload length bounds the decoded size
    // before any decoding happens. Padding is not content.
    let unpadded = photo.data.trim_end_matches('=').len();
    if unpadded * 3 / 4 > MAX_PHOTO_BYTES {
        errors.push(FieldError::new("photo", "Max image size is 5MB."));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn found_request(description: &str) -> SubmitFoundItemRequest {
        SubmitFoundItemRequest {
            description: description.into(),
            location_found: "Gym Entrance".into(),
            contact_info: "jdoe@x.edu".into(),
            photo: None,
        }
    }

    fn lost_request(last_seen_date: chrono::NaiveDate) -> SubmitLostItemRequest {
        SubmitLostItemRequest {
            description: "Silver water bottle, dented lid".into(),
            last_seen_location: "Lecture Hall B".into(),
            last_seen_date,
            contact_info: "asmith@x.edu".into(),
        }
    }

    #[test]
    fn description_boundary_at_ten_characters() {
        let err = validate_found_item(&found_request(&"x".repeat(9))).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].field, "description");

        assert!(validate_found_item(&found_request(&"x".repeat(10))).is_ok());
        assert!(validate_found_item(&found_request(&"x".repeat(500))).is_ok());
        assert!(validate_found_item(&found_request(&"x".repeat(501))).is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 10 multibyte characters must pass the minimum
        assert!(validate_found_item(&found_request(&"é".repeat(10))).is_ok());
    }

    #[test]
    fn all_failing_fields_are_reported_together() {
        let req = SubmitFoundItemRequest {
            description: "short".into(),
            location_found: "ab".into(),
            contact_info: "x".into(),
            photo: None,
        };
        let errors = validate_found_item(&req).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["description", "locationFound", "contactInfo"]);
    }

    #[test]
    fn last_seen_date_rejects_tomorrow_accepts_today() {
        let today = Utc::now().date_naive();
        assert!(validate_lost_item(&lost_request(today)).is_ok());

        let tomorrow = today.checked_add_days(Days::new(1)).expect("date in range");
        let errors = validate_lost_item(&lost_request(tomorrow)).unwrap_err();
        assert_eq!(errors[0].field, "lastSeenDate");
    }

    #[test]
    fn last_seen_date_rejects_pre_2000() {
        let date = chrono::NaiveDate::from_ymd_opt(1999, 12, 31).expect("valid date");
        let errors = validate_lost_item(&lost_request(date)).unwrap_err();
        assert_eq!(errors[0].field, "lastSeenDate");

        let date = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date");
        assert!(validate_lost_item(&lost_request(date)).is_ok());
    }

    #[test]
    fn photo_mime_and_size_are_checked() {
        let mut req = found_request("Black wallet found near gym");
        req.photo = Some(PhotoUpload {
            file_name: "wallet.gif".into(),
            content_type: "image/gif".into(),
            data: "aGVsbG8=".into(),
        });
        let errors = validate_found_item(&req).unwrap_err();
        assert_eq!(errors[0].field, "photo");

        let oversized = "A".repeat(MAX_PHOTO_BYTES * 4 / 3 + 8);
        req.photo = Some(PhotoUpload {
            file_name: "wallet.png".into(),
            content_type: "image/png".into(),
            data: oversized,
        });
        let errors = validate_found_item(&req).unwrap_err();
        assert_eq!(errors[0].field, "photo");
    }

    #[test]
    fn report_reason_must_not_be_blank() {
        assert!(validate_report_reason("").is_err());
        assert!(validate_report_reason("   ").is_err());
        assert!(validate_report_reason("spam posting").is_ok());
    }
}
