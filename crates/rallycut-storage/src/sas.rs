//! Service-SAS URL generation for blob reads.
//!
//! Signs the documented string-to-sign (signed version 2020-12-06) with
//! HMAC-SHA256 over the account key. Hand-assembled because the response
//! header overrides (`rscd` for attachment downloads) are not exposed by the
//! SDK's SAS builder.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;

use crate::error::{StorageError, StorageResult};

type HmacSha256 = Hmac<Sha256>;

const SIGNED_VERSION: &str = "2020-12-06";

/// Validity window starts this far in the past to absorb clock skew.
const START_SKEW_SECS: i64 = 300;

/// Signs read-only blob SAS URLs for one storage account.
#[derive(Debug, Clone)]
pub struct SasSigner {
    account: String,
    key: String,
}

impl SasSigner {
    /// Create a signer from the account name and base64 account key.
    pub fn new(account: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            key: key.into(),
        }
    }

    /// Signed read URL for `container/blob`, valid for `ttl`.
    ///
    /// With `content_disposition`, the URL carries an `rscd` override so the
    /// response forces that disposition.
    pub fn signed_blob_url(
        &self,
        container: &str,
        blob: &str,
        ttl: Duration,
        content_disposition: Option<&str>,
    ) -> StorageResult<String> {
        let now = Utc::now();
        let start = now - ChronoDuration::seconds(START_SKEW_SECS);
        let expiry = now
            + ChronoDuration::from_std(ttl)
                .map_err(|e| StorageError::sign_failed(format!("invalid ttl: {e}")))?;
        self.signed_blob_url_at(container, blob, start, expiry, content_disposition)
    }

    fn signed_blob_url_at(
        &self,
        container: &str,
        blob: &str,
        start: DateTime<Utc>,
        expiry: DateTime<Utc>,
        content_disposition: Option<&str>,
    ) -> StorageResult<String> {
        let st = format_sas_time(start);
        let se = format_sas_time(expiry);
        let rscd = content_disposition.unwrap_or("");

        let string_to_sign = blob_string_to_sign(
            &self.account,
            container,
            blob,
            &st,
            &se,
            rscd,
        );
        let signature = self.sign(&string_to_sign)?;

        let mut query: Vec<(&str, String)> = vec![
            ("sv", SIGNED_VERSION.to_string()),
            ("spr", "https".to_string()),
            ("st", st),
            ("se", se),
            ("sr", "b".to_string()),
            ("sp", "r".to_string()),
        ];
        if !rscd.is_empty() {
            query.push(("rscd", rscd.to_string()));
        }
        query.push(("sig", signature));

        let query_string = query
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let blob_path = blob
            .split('/')
            .map(|seg| urlencoding::encode(seg).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        Ok(format!(
            "https://{}.blob.core.windows.net/{}/{}?{}",
            self.account, container, blob_path, query_string
        ))
    }

    fn sign(&self, string_to_sign: &str) -> StorageResult<String> {
        let key_bytes = STANDARD
            .decode(&self.key)
            .map_err(|e| StorageError::sign_failed(format!("account key is not base64: {e}")))?;
        let mut mac = HmacSha256::new_from_slice(&key_bytes)
            .map_err(|e| StorageError::sign_failed(format!("invalid HMAC key: {e}")))?;
        mac.update(string_to_sign.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// Assemble the 16-field service-SAS string-to-sign.
fn blob_string_to_sign(
    account: &str,
    container: &str,
    blob: &str,
    st: &str,
    se: &str,
    rscd: &str,
) -> String {
    let canonicalized = format!("/blob/{account}/{container}/{blob}");
    [
        "r",            // signedPermissions
        st,             // signedStart
        se,             // signedExpiry
        &canonicalized, // canonicalizedResource
        "",             // signedIdentifier
        "",             // signedIP
        "https",        // signedProtocol
        SIGNED_VERSION, // signedVersion
        "b",            // signedResource
        "",             // signedSnapshotTime
        "",             // signedEncryptionScope
        "",             // rscc
        rscd,           // rscd
        "",             // rsce
        "",             // rscl
        "",             // rsct
    ]
    .join("\n")
}

fn format_sas_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Attachment disposition header value for a filename.
pub fn attachment_disposition(name: &str) -> String {
    format!("attachment; filename=\"{name}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_times() -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let expiry = Utc.with_ymd_and_hms(2025, 6, 1, 13, 0, 0).unwrap();
        (start, expiry)
    }

    #[test]
    fn test_string_to_sign_shape() {
        let s = blob_string_to_sign(
            "acct",
            "videos",
            "processed/out.mp4",
            "2025-06-01T12:00:00Z",
            "2025-06-01T13:00:00Z",
            "",
        );
        assert_eq!(s.matches('\n').count(), 15);
        assert!(s.starts_with("r\n2025-06-01T12:00:00Z\n"));
        assert!(s.contains("/blob/acct/videos/processed/out.mp4"));
        assert!(s.contains("\nhttps\n2020-12-06\nb\n"));
    }

    #[test]
    fn test_signed_url_shape() {
        let signer = SasSigner::new("acct", STANDARD.encode(b"secret-key"));
        let (start, expiry) = fixed_times();
        let url = signer
            .signed_blob_url_at("videos", "processed/out.mp4", start, expiry, None)
            .unwrap();

        assert!(url.starts_with("https://acct.blob.core.windows.net/videos/processed/out.mp4?"));
        assert!(url.contains("sv=2020-12-06"));
        assert!(url.contains("sp=r"));
        assert!(url.contains("sr=b"));
        assert!(url.contains("se=2025-06-01T13%3A00%3A00Z"));
        assert!(url.contains("sig="));
        assert!(!url.contains("rscd="));
    }

    #[test]
    fn test_attachment_url_carries_disposition() {
        let signer = SasSigner::new("acct", STANDARD.encode(b"secret-key"));
        let (start, expiry) = fixed_times();
        let disposition = attachment_disposition("match.mp4");
        let url = signer
            .signed_blob_url_at("videos", "processed/out.mp4", start, expiry, Some(&disposition))
            .unwrap();

        assert!(url.contains("rscd=attachment%3B%20filename%3D%22match.mp4%22"));

        // The signature must differ from the plain read URL.
        let plain = signer
            .signed_blob_url_at("videos", "processed/out.mp4", start, expiry, None)
            .unwrap();
        let sig = |u: &str| {
            u.split('&')
                .find(|p| p.starts_with("sig="))
                .unwrap()
                .to_string()
        };
        assert_ne!(sig(&url), sig(&plain));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = SasSigner::new("acct", STANDARD.encode(b"secret-key"));
        let (start, expiry) = fixed_times();
        let a = signer
            .signed_blob_url_at("videos", "inputs/in.mp4", start, expiry, None)
            .unwrap();
        let b = signer
            .signed_blob_url_at("videos", "inputs/in.mp4", start, expiry, None)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_base64_key_rejected() {
        let signer = SasSigner::new("acct", "!!not-base64!!");
        let err = signer
            .signed_blob_url("videos", "x.mp4", Duration::from_secs(60), None)
            .unwrap_err();
        assert!(matches!(err, StorageError::SignFailed(_)));
    }

    #[test]
    fn test_attachment_disposition_format() {
        assert_eq!(
            attachment_disposition("out.mp4"),
            "attachment; filename=\"out.mp4\""
        );
    }
}
