use crate::models::Claims;
use jsonwebtoken::{DecodingKey, Validation, decode};

/// Decodes and validates an HS256 token issued by the auth service.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
pub mod testing {
    use crate::models::{Claims, TokenType};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub const SECRET: &str = "test-secret";

    fn now() -> usize {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize
    }

    /// Signs a token the way the login endpoint does, valid for 15 minutes.
    pub fn token_for(role: u8, employee_id: Option<u64>, token_type: TokenType) -> String {
        let claims = Claims {
            user_id: 42,
            sub: "jane".to_string(),
            role,
            exp: now() + 900,
            jti: format!("test-{role}-{employee_id:?}"),
            token_type,
            employee_id,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }
}
