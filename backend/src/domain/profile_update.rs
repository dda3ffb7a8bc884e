//! Partial profile updates.
//!
//! A [`ProfileUpdateDraft`] carries raw caller input; [`ProfileUpdate`] is the
//! validated form handed to the repository. Absent optional fields mean
//! "leave unchanged" at every stage.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::user::populated;
use crate::domain::{Address, BloodGroup, Error, Gender, UserValidationError, parse_date_of_birth};

/// Raw, unvalidated profile fields supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdateDraft {
    pub username: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub father_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub address: Option<Address>,
    pub nationality: Option<String>,
    pub occupation: Option<String>,
}

impl ProfileUpdateDraft {
    /// Return the trimmed username and email, or the required-field error
    /// when either is missing or blank.
    pub fn required_identity(&self) -> Result<(String, String), Error> {
        let username = populated(self.username.clone());
        let email = populated(self.email.clone());
        match (username, email) {
            (Some(username), Some(email)) => Ok((username, email)),
            _ => Err(Error::invalid_request("Username and Email are required")),
        }
    }
}

/// Validated partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
    pub father_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub blood_group: Option<BloodGroup>,
    /// Normalised address; replaces the stored one when present.
    pub address: Option<Address>,
    pub nationality: Option<String>,
    pub occupation: Option<String>,
}

fn validation_error(field: &str, value: &str, cause: &UserValidationError) -> Error {
    Error::invalid_request("Validation failed")
        .with_error(cause.to_string())
        .with_details(json!({
            "field": field,
            "value": value,
            "code": "invalid_value",
        }))
}

fn parse_optional<T>(
    field: &str,
    raw: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, UserValidationError>,
) -> Result<Option<T>, Error> {
    match populated(raw) {
        Some(value) => parse(&value)
            .map(Some)
            .map_err(|cause| validation_error(field, &value, &cause)),
        None => Ok(None),
    }
}

impl TryFrom<ProfileUpdateDraft> for ProfileUpdate {
    type Error = Error;

    fn try_from(draft: ProfileUpdateDraft) -> Result<Self, Self::Error> {
        let (username, email) = draft.required_identity()?;
        let ProfileUpdateDraft {
            username: _,
            email: _,
            mobile,
            father_name,
            date_of_birth,
            gender,
            blood_group,
            address,
            nationality,
            occupation,
        } = draft;

        Ok(Self {
            username,
            email,
            mobile: populated(mobile),
            father_name: populated(father_name),
            date_of_birth: parse_optional("dateofBirth", date_of_birth, parse_date_of_birth)?,
            gender: parse_optional("gender", gender, str::parse::<Gender>)?,
            blood_group: parse_optional("bloodGroup", blood_group, str::parse::<BloodGroup>)?,
            address: address.and_then(Address::normalised),
            nationality: populated(nationality),
            occupation: populated(occupation),
        })
    }
}
