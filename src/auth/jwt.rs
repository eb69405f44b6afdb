use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::{auth::claims::Claims, state::AppState};

/// HS256 signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_secret(state.config.jwt.secret.as_bytes())
    }
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        let claims = Claims {
            id: user_id,
            iat: OffsetDateTime::now_utc().unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.id, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = JwtKeys::from_secret(b"dev-secret");
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.id, user_id);
        assert!(claims.iat > 0);
    }

    #[test]
    fn keys_from_state_use_configured_secret() {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state).sign(Uuid::new_v4()).unwrap();
        assert!(JwtKeys::from_secret(b"test-secret").verify(&token).is_ok());
    }

    #[test]
    fn verify_rejects_other_secret() {
        let token = JwtKeys::from_secret(b"secret-a").sign(Uuid::new_v4()).unwrap();
        assert!(JwtKeys::from_secret(b"secret-b").verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let keys = JwtKeys::from_secret(b"dev-secret");
        let token = keys.sign(Uuid::new_v4()).unwrap();
        assert!(keys.verify(&format!("{token}x")).is_err());
        assert!(keys.verify("not.a.token").is_err());
        assert!(keys.verify("").is_err());
    }

    #[test]
    fn verify_accepts_token_without_iat() {
        #[derive(serde::Serialize)]
        struct Bare {
            id: Uuid,
        }
        let user_id = Uuid::new_v4();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Bare { id: user_id },
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        let claims = JwtKeys::from_secret(b"dev-secret").verify(&token).unwrap();
        assert_eq!(claims.id, user_id);
    }

    #[test]
    fn verify_rejects_payload_without_id() {
        #[derive(serde::Serialize)]
        struct NoId {
            sub: String,
        }
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoId { sub: "x".into() },
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        assert!(JwtKeys::from_secret(b"dev-secret").verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_other_algorithm() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &Claims { id: Uuid::new_v4(), iat: 0 },
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        assert!(JwtKeys::from_secret(b"dev-secret").verify(&token).is_err());
    }
}
