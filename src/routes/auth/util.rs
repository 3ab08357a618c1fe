use std::borrow::Cow;
use std::sync::Arc;

use actix_web::{web, Scope};
use chrono::NaiveDate;
use regex::Regex;
use validator::ValidationError;

use super::{create_group, get_user_role, login, register};
use crate::middleware::Authorization;
use crate::models::Group;
use crate::services::auth::TokenService;

pub fn auth_source(tokens: &Arc<TokenService>) -> Scope {
    web::scope("/auth")
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/role", web::get().to(get_user_role))
        .route(
            "/groups",
            web::post()
                .to(create_group)
                .wrap(Authorization::new(tokens.clone(), &[Group::Admin])),
        )
}

const CHECK_FOR_UPPERCASE: &str = ".*[A-Z].*";
const CHECK_FOR_LOWERCASE: &str = ".*[a-z].*";
const CHECK_FOR_NUMBER: &str = ".*[0-9].*";
const CHECK_FOR_SPECIAL_CHARACTER: &str = r".*[^A-Za-z0-9].*";
const FORBIDDEN_CHARACTERS: &[char] = &['/', '(', ')', '"', '<', '>', '\\', '{', '}', '\''];
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn is_match(pattern: &str, value: &str) -> bool {
    Regex::new(pattern)
        .map(|regex| regex.is_match(value))
        .unwrap_or(false)
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return Err(ValidationError::new("Password length")
            .with_message(Cow::from("Password must be at least 8 characters long")));
    }
    if !is_match(CHECK_FOR_UPPERCASE, password) {
        return Err(
            ValidationError::new("Password missing UpperCase").with_message(Cow::from(
                "Password must contain at least one uppercase letter",
            )),
        );
    }
    if !is_match(CHECK_FOR_LOWERCASE, password) {
        return Err(
            ValidationError::new("Password missing LowerCase").with_message(Cow::from(
                "Password must contain at least one lowercase letter",
            )),
        );
    }
    if !is_match(CHECK_FOR_NUMBER, password) {
        return Err(ValidationError::new("Password missing Number")
            .with_message(Cow::from("Password must contain at least one number")));
    }
    if !is_match(CHECK_FOR_SPECIAL_CHARACTER, password) {
        return Err(
            ValidationError::new("Password missing Special Char").with_message(Cow::from(
                "Password must contain at least one special character",
            )),
        );
    }
    Ok(())
}

pub fn validate_user_name(user_name: &str) -> Result<(), ValidationError> {
    if user_name.len() > 50 {
        return Err(ValidationError::new("User name length error")
            .with_message(Cow::from("User name must be less then 50 characters")));
    }
    if user_name.trim().is_empty() {
        return Err(ValidationError::new("User name length error")
            .with_message(Cow::from("User name can't be empty")));
    }
    if user_name.chars().any(|c| FORBIDDEN_CHARACTERS.contains(&c)) {
        return Err(
            ValidationError::new("User name content error").with_message(Cow::from(
                "User name cannot contain any of the following characters [/, (, ), \", <, >, \\, {, }, ']",
            )),
        );
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("Name length error")
            .with_message(Cow::from("First and last name can't be empty")));
    }
    Ok(())
}

pub fn validate_birth_date(date: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| {
            ValidationError::new("Date format error").with_message(Cow::from(
                "dateOfBirth must be a date formatted as YYYY-MM-DD",
            ))
        })
}
