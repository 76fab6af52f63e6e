//! Output filename generation and validation.
//!
//! Trimmed outputs are named `trimmed-<uuid v4>.mp4`. Consumers that expose
//! downloads validate incoming names against the same shape so a crafted name
//! cannot traverse out of the output directory.

use uuid::Uuid;

const OUTPUT_PREFIX: &str = "trimmed-";
const OUTPUT_SUFFIX: &str = ".mp4";

/// Length of a hyphenated UUID string.
const UUID_LEN: usize = 36;

/// Generate a fresh output filename.
pub fn output_file_name() -> String {
    format!("{}{}{}", OUTPUT_PREFIX, Uuid::new_v4(), OUTPUT_SUFFIX)
}

/// Check that `name` matches `trimmed-<uuid>.mp4` exactly (case-insensitive).
pub fn is_valid_output_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    let Some(rest) = lower.strip_prefix(OUTPUT_PREFIX) else {
        return false;
    };
    let Some(id) = rest.strip_suffix(OUTPUT_SUFFIX) else {
        return false;
    };
    // Uuid::parse_str also accepts braced/simple forms; pin the hyphenated one.
    id.len() == UUID_LEN && Uuid::parse_str(id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_name_is_valid() {
        let name = output_file_name();
        assert!(name.starts_with("trimmed-"));
        assert!(name.ends_with(".mp4"));
        assert!(is_valid_output_name(&name));
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        assert!(is_valid_output_name(
            "trimmed-6FA459EA-EE8A-3CA4-894E-DB77E160355E.mp4"
        ));
    }

    #[test]
    fn test_rejects_traversal_and_malformed_names() {
        assert!(!is_valid_output_name("../etc/passwd"));
        assert!(!is_valid_output_name("trimmed-../../x.mp4"));
        assert!(!is_valid_output_name("trimmed-.mp4"));
        assert!(!is_valid_output_name("trimmed-not-a-uuid.mp4"));
        assert!(!is_valid_output_name(
            // Simple (unhyphenated) form must not pass.
            "trimmed-6fa459eaee8a3ca4894edb77e160355e.mp4"
        ));
        assert!(!is_valid_output_name(
            "trimmed-6fa459ea-ee8a-3ca4-894e-db77e160355e.webm"
        ));
        assert!(!is_valid_output_name(
            "prefix-trimmed-6fa459ea-ee8a-3ca4-894e-db77e160355e.mp4"
        ));
    }
}
