//! Token signing.

use crate::claims::{AdminClaims, ViewerClaims};
use crate::error::TokenError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs tokens for the external verifier with a shared secret.
///
/// Construction is the configuration checkpoint: an empty secret is
/// rejected here so call sites never have to handle it.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret.
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer from the shared secret.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(Self {
            secret: secret.as_bytes().to_vec(),
        })
    }

    /// Sign an ordered field sequence.
    ///
    /// Fields are pipe-joined into the payload; callers must not pass
    /// fields containing a literal `|` (see the claims module). The
    /// result is `base64url(payload) + "." + base64url(signature)`,
    /// URL-safe base64 without padding.
    pub fn sign(&self, fields: &[String]) -> String {
        let payload = fields.join("|");
        let signature = self.hmac(payload.as_bytes());

        let payload_b64 = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        let sig_b64 = URL_SAFE_NO_PAD.encode(signature);

        format!("{payload_b64}.{sig_b64}")
    }

    /// Mint a viewer token for the iframe widget.
    pub fn viewer_token(&self, claims: &ViewerClaims) -> String {
        self.sign(&claims.fields())
    }

    /// Mint an admin token authorizing a server-to-server action.
    pub fn admin_token(&self, claims: &AdminClaims) -> String {
        self.sign(&claims.fields())
    }

    fn hmac(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC-SHA256 accepts any key length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// A token split back into its raw parts.
///
/// Gridgate never verifies tokens (the remote side does), but keeping
/// parsing next to construction means the wire format lives in exactly
/// one module. Tests and diagnostics use this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    /// The decoded pipe-joined payload string.
    pub payload: String,
    /// The raw HMAC-SHA256 signature bytes.
    pub signature: Vec<u8>,
}

impl ParsedToken {
    /// Split a token on the first `.` and decode both segments.
    pub fn parse(token: &str) -> Result<Self, TokenError> {
        let (payload_b64, sig_b64) = token
            .split_once('.')
            .ok_or_else(|| TokenError::Malformed("missing '.' separator".to_string()))?;
        if payload_b64.is_empty() || sig_b64.is_empty() {
            return Err(TokenError::Malformed("empty token segment".to_string()));
        }

        let payload_bytes = URL_SAFE_NO_PAD.decode(payload_b64)?;
        let signature = URL_SAFE_NO_PAD.decode(sig_b64)?;
        let payload = String::from_utf8(payload_bytes)?;

        Ok(Self { payload, signature })
    }

    /// The payload split back into fields.
    pub fn fields(&self) -> Vec<&str> {
        self.payload.split('|').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::AdminAction;

    fn signer() -> TokenSigner {
        TokenSigner::new("s3cr3t").unwrap()
    }

    fn reference_claims() -> ViewerClaims {
        ViewerClaims::at("alice", 1700000000, "http://localhost:8000")
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            TokenSigner::new(""),
            Err(TokenError::MissingSecret)
        ));
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = signer();
        let claims = reference_claims();
        assert_eq!(signer.viewer_token(&claims), signer.viewer_token(&claims));
    }

    #[test]
    fn test_token_structure() {
        let token = signer().viewer_token(&reference_claims());
        let segments: Vec<&str> = token.splitn(2, '.').collect();
        assert_eq!(segments.len(), 2);
        assert!(!segments[0].is_empty());
        assert!(!segments[1].is_empty());
        assert!(!token.contains('='));
        for segment in segments {
            assert!(segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_payload_roundtrip() {
        let token = signer().viewer_token(&reference_claims());
        let parsed = ParsedToken::parse(&token).unwrap();
        assert_eq!(parsed.payload, "alice|1700000000|http://localhost:8000");
        assert_eq!(
            parsed.fields(),
            vec!["alice", "1700000000", "http://localhost:8000"]
        );
    }

    #[test]
    fn test_signature_matches_reference_hmac() {
        // End-to-end vector: independent HMAC over the raw payload
        // bytes must match the signature segment exactly.
        let token = signer().viewer_token(&reference_claims());
        let parsed = ParsedToken::parse(&token).unwrap();

        let mut mac = HmacSha256::new_from_slice(b"s3cr3t").unwrap();
        mac.update(b"alice|1700000000|http://localhost:8000");
        let expected = mac.finalize().into_bytes();

        assert_eq!(parsed.signature, expected.to_vec());
    }

    #[test]
    fn test_field_change_changes_signature() {
        let signer = signer();
        let base = ParsedToken::parse(&signer.viewer_token(&reference_claims()))
            .unwrap()
            .signature;

        let variants = [
            ViewerClaims::at("alicf", 1700000000, "http://localhost:8000"),
            ViewerClaims::at("alice", 1700000001, "http://localhost:8000"),
            ViewerClaims::at("alice", 1700000000, "http://localhost:8001"),
        ];
        for claims in &variants {
            let sig = ParsedToken::parse(&signer.viewer_token(claims))
                .unwrap()
                .signature;
            assert_ne!(sig, base, "perturbed {claims:?} kept the signature");
        }
    }

    #[test]
    fn test_secret_change_changes_signature() {
        let claims = reference_claims();
        let a = ParsedToken::parse(&signer().viewer_token(&claims))
            .unwrap()
            .signature;
        let b = ParsedToken::parse(
            &TokenSigner::new("s3cr3u").unwrap().viewer_token(&claims),
        )
        .unwrap()
        .signature;
        assert_ne!(a, b);
    }

    #[test]
    fn test_admin_token_payload() {
        let claims = AdminClaims {
            action: AdminAction::AddUser,
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            timestamp: 1700000000,
        };
        let token = signer().admin_token(&claims);
        let parsed = ParsedToken::parse(&token).unwrap();
        assert_eq!(parsed.payload, "add_user|bob|bob@example.com|1700000000");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ParsedToken::parse("no-separator").is_err());
        assert!(ParsedToken::parse(".sig").is_err());
        assert!(ParsedToken::parse("payload.").is_err());
        assert!(ParsedToken::parse("not%base64.also%bad").is_err());
    }
}
