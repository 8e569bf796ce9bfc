//! Compact JWT (HS256) access tokens plus opaque refresh tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::AuthError;
use crate::models::Doctor;

type HmacSha256 = Hmac<Sha256>;

/// Access-token claims. `sub` carries the doctor id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub specialization: String,
    pub hospital: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Doctor id parsed out of `sub`.
    pub fn doctor_id(&self) -> Result<i64, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("non-numeric subject".into()))
    }
}

/// Signs and verifies HS256 access tokens for one issuer/audience pair.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, issuer: &str, audience: &str, lifetime_minutes: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            lifetime: Duration::minutes(lifetime_minutes),
        }
    }

    pub fn lifetime_minutes(&self) -> i64 {
        self.lifetime.num_minutes()
    }

    fn mac(&self, signing_input: &str) -> Vec<u8> {
        // HMAC accepts keys of any length, so this cannot fail.
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(signing_input.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Issue an access token for a doctor. Returns the token and its
    /// expiry as a unix timestamp.
    pub fn sign(&self, doctor: &Doctor) -> Result<(String, i64), AuthError> {
        let now = Utc::now();
        let exp = (now + self.lifetime).timestamp();
        let claims = Claims {
            sub: doctor.id.to_string(),
            email: doctor.email.clone(),
            name: format!("{} {}", doctor.first_name, doctor.last_name),
            specialization: doctor.specialization.clone(),
            hospital: doctor.hospital.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp,
        };

        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let signing_input = format!("{header}.{}", URL_SAFE_NO_PAD.encode(payload));
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&signing_input));
        Ok((format!("{signing_input}.{signature}"), exp))
    }

    /// Verify a token's signature, issuer, audience, and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut parts = token.split('.');
        let (header, payload, signature) = match (parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(p), Some(s)) if parts.next().is_none() => (h, p, s),
            _ => return Err(AuthError::InvalidToken("malformed token".into())),
        };

        let expected = self.mac(&format!("{header}.{payload}"));
        let provided = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken("bad signature encoding".into()))?;
        if !bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
            return Err(AuthError::InvalidToken("signature mismatch".into()));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken("bad payload encoding".into()))?;
        let claims: Claims = serde_json::from_slice(&payload)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if claims.iss != self.issuer || claims.aud != self.audience {
            return Err(AuthError::InvalidToken("issuer or audience mismatch".into()));
        }
        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

/// Generate a random refresh token (URL-safe base64, 32 bytes of entropy).
pub fn generate_refresh_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn doctor() -> Doctor {
        Doctor {
            id: 7,
            first_name: "Alex".into(),
            last_name: "Rivera".into(),
            email: "a@h.org".into(),
            password_hash: String::new(),
            specialization: "Cardiology".into(),
            license_number: "LIC-1".into(),
            hospital: "General Hospital".into(),
            refresh_token: None,
            refresh_token_expiry: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", "copilot-auth", "copilot-services", 60)
    }

    #[test]
    fn sign_then_verify_roundtrip() {
        let (token, exp) = signer().sign(&doctor()).unwrap();
        let claims = signer().verify(&token).unwrap();
        assert_eq!(claims.doctor_id().unwrap(), 7);
        assert_eq!(claims.name, "Alex Rivera");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn wrong_secret_rejected() {
        let (token, _) = signer().sign(&doctor()).unwrap();
        let other = TokenSigner::new("other-secret", "copilot-auth", "copilot-services", 60);
        assert!(matches!(
            other.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn wrong_audience_rejected() {
        let (token, _) = signer().sign(&doctor()).unwrap();
        let other = TokenSigner::new("test-secret", "copilot-auth", "someone-else", 60);
        assert!(matches!(
            other.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let past = TokenSigner::new("test-secret", "copilot-auth", "copilot-services", -5);
        let (token, _) = past.sign(&doctor()).unwrap();
        assert!(matches!(
            signer().verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn tampered_payload_rejected() {
        let (token, _) = signer().sign(&doctor()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(br#"{"sub":"1"}"#);
        parts[1] = &forged;
        let tampered = parts.join(".");
        assert!(signer().verify(&tampered).is_err());
    }

    #[test]
    fn refresh_tokens_are_unique() {
        let t1 = generate_refresh_token();
        let t2 = generate_refresh_token();
        assert_ne!(t1, t2);
        assert!(!t1.is_empty());
    }
}
