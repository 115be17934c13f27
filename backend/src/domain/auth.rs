//! Authentication primitives: credentials, registration payloads, and the
//! issued token bundle.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::user::{EmailAddress, NewUser, UserValidationError};

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Domain error returned when auth payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// Email failed the shape check.
    #[error(transparent)]
    Email(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password was shorter than [`PASSWORD_MIN_LEN`].
    #[error("password must be at least {PASSWORD_MIN_LEN} characters")]
    PasswordTooShort,
    /// Birth date did not parse as an ISO-8601 calendar date.
    #[error("birth date must be an ISO-8601 date")]
    InvalidBirthDate,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` passes the address shape check.
/// - `password` is non-empty and retains caller-provided whitespace to
///   avoid surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Address used for the credential lookup.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload: profile data plus the plaintext
/// password awaiting hashing inside the auth boundary.
#[derive(Debug, Clone)]
pub struct Registration {
    profile: NewUser,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration input.
    ///
    /// The birth date is accepted as an ISO-8601 string because that is
    /// what clients send; it is parsed here so repositories only ever see
    /// a calendar date.
    #[expect(clippy::too_many_arguments, reason = "mirrors the registration form")]
    pub fn try_from_parts(
        email: &str,
        password: &str,
        first_name: Option<String>,
        last_name: Option<String>,
        birth_date: &str,
        country_id: String,
        state_id: String,
        municipality_id: String,
    ) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(AuthValidationError::PasswordTooShort);
        }
        let birth_date = birth_date
            .parse::<NaiveDate>()
            .map_err(|_| AuthValidationError::InvalidBirthDate)?;

        Ok(Self {
            profile: NewUser {
                email,
                first_name,
                last_name,
                birth_date,
                country_id,
                state_id,
                municipality_id,
            },
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Profile data stored alongside the hashed credential.
    #[must_use]
    pub const fn profile(&self) -> &NewUser {
        &self.profile
    }

    /// Plaintext password awaiting hashing.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Issued token bundle returned by login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

impl AuthTokens {
    /// Bundle an access token with the standard bearer metadata.
    #[must_use]
    pub fn bearer(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_owned(),
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn registration(email: &str, password: &str, birth_date: &str) -> Result<Registration, AuthValidationError> {
        Registration::try_from_parts(
            email,
            password,
            Some("Ada".to_owned()),
            Some("Lovelace".to_owned()),
            birth_date,
            "MX".to_owned(),
            "14".to_owned(),
            "014".to_owned(),
        )
    }

    #[rstest]
    #[case("no-at", "password1", AuthValidationError::Email(UserValidationError::InvalidEmail))]
    #[case("a@b.com", "", AuthValidationError::EmptyPassword)]
    #[case("a@b.com", "short", AuthValidationError::PasswordTooShort)]
    fn invalid_registration_inputs(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: AuthValidationError,
    ) {
        let err = registration(email, password, "1990-01-01").expect_err("invalid input must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("not-a-date")]
    #[case("1990-13-40")]
    fn invalid_birth_dates_are_rejected(#[case] raw: &str) {
        let err = registration("a@b.com", "12345678", raw).expect_err("bad date must fail");
        assert_eq!(err, AuthValidationError::InvalidBirthDate);
    }

    #[rstest]
    fn valid_registration_parses_the_birth_date() {
        let reg = registration("a@b.com", "12345678", "1990-06-15").expect("valid registration");
        assert_eq!(reg.profile().email.as_str(), "a@b.com");
        assert_eq!(
            reg.profile().birth_date,
            NaiveDate::from_ymd_opt(1990, 6, 15).expect("valid date")
        );
        assert_eq!(reg.password(), "12345678");
    }

    #[rstest]
    fn login_credentials_keep_password_whitespace() {
        let creds = Credentials::try_from_parts("a@b.com", " spaced ").expect("valid creds");
        assert_eq!(creds.password(), " spaced ");
    }

    #[rstest]
    fn bearer_bundle_sets_token_type() {
        let tokens = AuthTokens::bearer("tok".to_owned(), 3600);
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 3600);
    }
}
