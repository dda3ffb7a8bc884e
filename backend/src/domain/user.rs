//! User profile data model.
//!
//! The password hash is deliberately absent from every type here; it only
//! exists in the persistence row, so no read path can leak it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("gender must be one of male, female, other")]
    InvalidGender,
    #[error("blood group must be one of A+, A-, B+, B-, AB+, AB-, O+, O-")]
    InvalidBloodGroup,
    #[error("date of birth must be a calendar date (YYYY-MM-DD)")]
    InvalidDateOfBirth,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Self-declared gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Lowercase wire and storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(UserValidationError::InvalidGender),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    /// Canonical wire and storage form, e.g. `AB+`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl FromStr for BloodGroup {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A+" => Ok(Self::APositive),
            "A-" => Ok(Self::ANegative),
            "B+" => Ok(Self::BPositive),
            "B-" => Ok(Self::BNegative),
            "AB+" => Ok(Self::AbPositive),
            "AB-" => Ok(Self::AbNegative),
            "O+" => Ok(Self::OPositive),
            "O-" => Ok(Self::ONegative),
            _ => Err(UserValidationError::InvalidBloodGroup),
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a date of birth in `YYYY-MM-DD` form, tolerating a trailing
/// RFC 3339 time component as sent by date pickers.
///
/// # Examples
/// ```
/// use schoolemy_backend::domain::parse_date_of_birth;
///
/// let date = parse_date_of_birth("2001-04-09T00:00:00.000Z").expect("valid date");
/// assert_eq!(date.to_string(), "2001-04-09");
/// ```
pub fn parse_date_of_birth(value: &str) -> Result<NaiveDate, UserValidationError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|stamp| stamp.date_naive())
        .map_err(|_| UserValidationError::InvalidDateOfBirth)
}

/// Postal address. Every component is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl Address {
    /// Trim every component, drop blank ones, and return `None` when nothing
    /// remains.
    ///
    /// # Examples
    /// ```
    /// use schoolemy_backend::domain::Address;
    ///
    /// let address = Address { city: Some("  Chennai ".into()), zip: Some(" ".into()), ..Address::default() };
    /// let normalised = address.normalised().expect("city is populated");
    /// assert_eq!(normalised.city.as_deref(), Some("Chennai"));
    /// assert!(normalised.zip.is_none());
    ///
    /// assert!(Address::default().normalised().is_none());
    /// ```
    pub fn normalised(self) -> Option<Self> {
        let address = Self {
            street: populated(self.street),
            city: populated(self.city),
            state: populated(self.state),
            country: populated(self.country),
            zip: populated(self.zip),
        };
        (!address.is_empty()).then_some(address)
    }

    /// Whether no component is set.
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.country.is_none()
            && self.zip.is_none()
    }
}

pub(crate) fn populated(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Inline profile picture and its upload metadata.
///
/// All fields are mandatory: a picture is either stored whole or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePicture {
    /// `data:<mimetype>;base64,<payload>` URI.
    pub data: String,
    pub filename: String,
    pub mimetype: String,
    /// Payload size in bytes.
    pub size: u64,
    pub upload_date: DateTime<Utc>,
}

/// A user's profile as returned to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
    pub father_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub blood_group: Option<BloodGroup>,
    pub address: Option<Address>,
    pub nationality: Option<String>,
    pub occupation: Option<String>,
    pub profile_picture: Option<ProfilePicture>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Minimal profile with only identity fields populated.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            mobile: None,
            father_name: None,
            date_of_birth: None,
            gender: None,
            blood_group: None,
            address: None,
            nationality: None,
            occupation: None,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    #[case("male", Gender::Male)]
    #[case("Female", Gender::Female)]
    #[case(" OTHER ", Gender::Other)]
    fn gender_parses_case_insensitively(#[case] raw: &str, #[case] expected: Gender) {
        assert_eq!(raw.parse::<Gender>(), Ok(expected));
    }

    #[rstest]
    fn gender_rejects_unknown_values() {
        assert_eq!(
            "unknown".parse::<Gender>(),
            Err(UserValidationError::InvalidGender)
        );
    }

    #[rstest]
    #[case("ab+", BloodGroup::AbPositive)]
    #[case("O-", BloodGroup::ONegative)]
    fn blood_group_parses(#[case] raw: &str, #[case] expected: BloodGroup) {
        assert_eq!(raw.parse::<BloodGroup>(), Ok(expected));
        assert_eq!(expected.to_string(), raw.to_ascii_uppercase());
    }

    #[rstest]
    fn blood_group_rejects_unknown_values() {
        assert_eq!(
            "C+".parse::<BloodGroup>(),
            Err(UserValidationError::InvalidBloodGroup)
        );
    }

    #[rstest]
    #[case("1999-12-31")]
    #[case("1999-12-31T00:00:00Z")]
    fn date_of_birth_accepts_dates(#[case] raw: &str) {
        let date = parse_date_of_birth(raw).expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(1999, 12, 31).expect("date"));
    }

    #[rstest]
    #[case("31/12/1999")]
    #[case("1999-02-30")]
    #[case("yesterday")]
    fn date_of_birth_rejects_malformed_values(#[case] raw: &str) {
        assert_eq!(
            parse_date_of_birth(raw),
            Err(UserValidationError::InvalidDateOfBirth)
        );
    }

    #[rstest]
    fn address_normalisation_drops_blank_components() {
        let address = Address {
            street: Some("12 Gandhi Road".into()),
            city: Some("   ".into()),
            state: None,
            country: Some(" India ".into()),
            zip: Some(String::new()),
        };

        let normalised = address.normalised().expect("populated address");
        assert_eq!(
            normalised,
            Address {
                street: Some("12 Gandhi Road".into()),
                country: Some("India".into()),
                ..Address::default()
            }
        );
    }

    #[rstest]
    fn address_with_only_blank_components_is_dropped() {
        let address = Address {
            city: Some(" ".into()),
            ..Address::default()
        };
        assert!(address.normalised().is_none());
    }

    #[rstest]
    fn profile_picture_uses_camel_case_upload_date() {
        let picture = ProfilePicture {
            data: "data:image/png;base64,AA==".into(),
            filename: "me.png".into(),
            mimetype: "image/png".into(),
            size: 1,
            upload_date: DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("timestamp")
                .with_timezone(&Utc),
        };
        let value = serde_json::to_value(&picture).expect("serialise picture");
        assert!(value.get("uploadDate").is_some());
    }
}
