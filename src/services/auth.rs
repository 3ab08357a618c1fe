use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::configuration::AuthSettings;
use crate::models::{Group, User};

pub const ACCESS_TOKEN_USE: &str = "access";
pub const ID_TOKEN_USE: &str = "id";
const POLICY_VERSION: &str = "2012-10-17";
const INVOKE_ACTION: &str = "execute-api:Invoke";
const ANONYMOUS_PRINCIPAL: &str = "anonymous";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub groups: Vec<String>,
    pub token_use: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    #[error("missing bearer token")]
    Missing,
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub id_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Issues and verifies the HS256 tokens handed out at login.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(settings: &AuthSettings) -> Self {
        TokenService {
            encoding_key: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            issuer: settings.issuer.clone(),
            ttl: Duration::minutes(settings.token_ttl_minutes),
        }
    }

    fn sign(&self, user: &User, groups: &[String], token_use: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            groups: groups.to_vec(),
            token_use: token_use.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    pub fn issue(&self, user: &User, groups: &[String]) -> Result<IssuedTokens, TokenError> {
        Ok(IssuedTokens {
            access_token: self.sign(user, groups, ACCESS_TOKEN_USE)?,
            id_token: self.sign(user, groups, ID_TOKEN_USE)?,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl.num_seconds(),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }

    /// Verifies an `Authorization` header value of the form `Bearer <jwt>`.
    pub fn verify_bearer(&self, header: &str) -> Result<Claims, TokenError> {
        let token = bearer_token(header).ok_or(TokenError::Missing)?;
        self.verify(token)
    }
}

impl Claims {
    pub fn is_access_token(&self) -> bool {
        self.token_use == ACCESS_TOKEN_USE
    }
}

pub fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(err) => {
            tracing::error!("Stored password hash is unreadable: {}", err);
            false
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

impl AuthorizerResponse {
    fn new(principal_id: String, effect: Effect, method_arn: &str) -> Self {
        AuthorizerResponse {
            principal_id,
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![Statement {
                    action: INVOKE_ACTION.to_string(),
                    effect,
                    resource: method_arn.to_string(),
                }],
            },
        }
    }

    pub fn effect(&self) -> Effect {
        self.policy_document
            .statement
            .first()
            .map(|statement| statement.effect)
            .unwrap_or(Effect::Deny)
    }
}

/// Gateway-style decision: allow iff the token verifies and carries `required`.
pub fn evaluate_policy(
    tokens: &TokenService,
    authorization_token: &str,
    method_arn: &str,
    required: Group,
) -> AuthorizerResponse {
    match tokens.verify_bearer(authorization_token) {
        Ok(claims) => {
            let effect = if required.is_member(&claims.groups) {
                Effect::Allow
            } else {
                Effect::Deny
            };
            tracing::info!(principal = %claims.sub, ?effect, group = required.name(), "Policy evaluated");
            AuthorizerResponse::new(claims.sub, effect, method_arn)
        }
        Err(err) => {
            tracing::warn!("Denying request with unusable token: {}", err);
            AuthorizerResponse::new(ANONYMOUS_PRINCIPAL.to_string(), Effect::Deny, method_arn)
        }
    }
}
