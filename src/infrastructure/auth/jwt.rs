use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::config::JwtConfig;
use crate::error::AppError;

use super::Claims;

/// Validates HS256 bearer tokens issued for bot commands.
pub struct JwtValidator {
    /// `None` when no secret is configured; every token is then refused
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(config: &JwtConfig) -> Self {
        let decoding_key = if config.secret.is_empty() {
            tracing::warn!("JWT secret is not configured, all command requests will be refused");
            None
        } else {
            Some(DecodingKey::from_secret(config.secret.as_bytes()))
        };

        let mut validation = Validation::default();
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        if let Some(ref issuer) = config.issuer {
            validation.set_issuer(&[issuer]);
        }

        if let Some(ref audience) = config.audience {
            validation.set_audience(&[audience]);
        }

        Self {
            decoding_key,
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let key = self
            .decoding_key
            .as_ref()
            .ok_or_else(|| AppError::Auth("Token validation is not configured".to_string()))?;

        let token_data = decode::<Claims>(token, key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Auth(format!("Invalid token: {}", e))
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-for-testing";

    fn config() -> JwtConfig {
        JwtConfig {
            secret: SECRET.to_string(),
            ..Default::default()
        }
    }

    fn claims(exp_offset: i64) -> Claims {
        Claims {
            sub: "user-123".to_string(),
            name: Some("Recruiter".to_string()),
            exp: chrono::Utc::now().timestamp() + exp_offset,
            iat: chrono::Utc::now().timestamp(),
            roles: vec!["Staff".to_string()],
            guild_id: Some(1),
            extra: Default::default(),
        }
    }

    fn token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token() {
        let validator = JwtValidator::new(&config());

        let validated = validator.validate(&token(&claims(3600), SECRET)).unwrap();
        assert_eq!(validated.sub, "user-123");
        assert_eq!(validated.guild_id, Some(1));
        assert_eq!(validated.roles, vec!["Staff".to_string()]);
    }

    #[test]
    fn test_expired_token() {
        let validator = JwtValidator::new(&config());

        let result = validator.validate(&token(&claims(-3600), SECRET));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_leeway_accepts_recent_expiry() {
        let validator = JwtValidator::new(&JwtConfig {
            leeway_seconds: 120,
            ..config()
        });

        assert!(validator.validate(&token(&claims(-30), SECRET)).is_ok());
    }

    #[test]
    fn test_wrong_secret_and_garbage() {
        let validator = JwtValidator::new(&config());

        assert!(validator.validate(&token(&claims(3600), "other")).is_err());
        assert!(validator.validate("invalid-token").is_err());
    }

    #[test]
    fn test_missing_secret_refuses_everything() {
        let validator = JwtValidator::new(&JwtConfig::default());

        let result = validator.validate(&token(&claims(3600), ""));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
