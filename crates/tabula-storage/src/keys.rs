//! Shared key generation for storage backends.
//!
//! Key format: `uploads/{YYYY}/{MM}/{DD}/{uuid}-{filename}`.

use chrono::{DateTime, Utc};
use tabula_core::constants::UPLOAD_KEY_PREFIX;
use uuid::Uuid;

const FALLBACK_FILENAME: &str = "upload.csv";

/// Generate a unique storage key for a file uploaded at `now`.
pub fn generate_storage_key(filename: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{}-{}",
        UPLOAD_KEY_PREFIX,
        now.format("%Y/%m/%d"),
        Uuid::new_v4(),
        sanitize_filename(filename)
    )
}

/// Keep only the final path component so a client filename cannot add key segments.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        base.replace("..", "_")
    }
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> bool {
    !storage_key.is_empty() && !storage_key.contains("..") && !storage_key.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_layout() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        let key = generate_storage_key("people.csv", now);

        assert!(key.starts_with("uploads/2024/03/07/"));
        assert!(key.ends_with("-people.csv"));
        let uuid_part = &key["uploads/2024/03/07/".len()..key.len() - "-people.csv".len()];
        assert!(Uuid::parse_str(uuid_part).is_ok());
    }

    #[test]
    fn test_keys_are_unique() {
        let now = Utc::now();
        assert_ne!(
            generate_storage_key("a.csv", now),
            generate_storage_key("a.csv", now)
        );
    }

    #[test]
    fn test_sanitize_filename_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd.csv"), "passwd.csv");
        assert_eq!(sanitize_filename("C:\\data\\report.csv"), "report.csv");
        assert_eq!(sanitize_filename(".."), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename("..hidden.csv"), "_hidden.csv");
        assert_eq!(sanitize_filename(""), FALLBACK_FILENAME);
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("uploads/2024/01/01/x-a.csv"));
        assert!(!validate_key("/etc/passwd"));
        assert!(!validate_key("uploads/../secret"));
        assert!(!validate_key(""));
    }
}
