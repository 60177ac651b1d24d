use crate::core::error::ValidationError;
use crate::models::complaint::Status;
use serde::{Deserialize, Serialize};

/// Login and signup form body
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CredentialsForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl CredentialsForm {
    /// Both fields must be present and non-empty
    pub fn validate(self) -> Result<Credentials, ValidationError> {
        match (non_empty(self.username), non_empty(self.password)) {
            (Some(username), Some(password)) => Ok(Credentials { username, password }),
            _ => Err(ValidationError::MissingCredentials),
        }
    }
}

/// New complaint form body
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ComplaintForm {
    pub complaint: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug)]
pub struct ComplaintSubmission {
    pub text: String,
    pub location: String,
}

impl ComplaintForm {
    pub fn validate(self) -> Result<ComplaintSubmission, ValidationError> {
        match (non_empty(self.complaint), non_empty(self.location)) {
            (Some(text), Some(location)) => Ok(ComplaintSubmission { text, location }),
            _ => Err(ValidationError::MissingComplaintFields),
        }
    }
}

/// Status update form body
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StatusForm {
    pub status: Option<String>,
}

impl StatusForm {
    /// `None` leaves the current status alone
    pub fn validate(self) -> Result<Option<Status>, ValidationError> {
        match self.status {
            None => Ok(None),
            Some(raw) => raw
                .parse::<Status>()
                .map(Some)
                .map_err(|_| ValidationError::InvalidStatus(raw)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_both_fields() {
        let form = CredentialsForm {
            username: Some("alice".to_string()),
            password: None,
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingCredentials);

        let form = CredentialsForm {
            username: Some(String::new()),
            password: Some("pw".to_string()),
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingCredentials);

        let creds = CredentialsForm {
            username: Some("alice".to_string()),
            password: Some("pw".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn test_complaint_requires_text_and_location() {
        let form = ComplaintForm {
            complaint: Some("Streetlight broken for days".to_string()),
            location: Some(String::new()),
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingComplaintFields);

        let form = ComplaintForm::default();
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingComplaintFields);
    }

    #[test]
    fn test_complaint_text_kept_verbatim() {
        let submission = ComplaintForm {
            complaint: Some("  Water overflow near market!  ".to_string()),
            location: Some("Ward 9".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(submission.text, "  Water overflow near market!  ");
    }

    #[test]
    fn test_status_form() {
        assert_eq!(StatusForm { status: None }.validate().unwrap(), None);
        assert_eq!(
            StatusForm { status: Some("In Progress".to_string()) }.validate().unwrap(),
            Some(Status::InProgress)
        );
        assert_eq!(
            StatusForm { status: Some("Closed".to_string()) }.validate().unwrap_err(),
            ValidationError::InvalidStatus("Closed".to_string())
        );
    }

    #[test]
    fn test_form_decoding() {
        let form: ComplaintForm =
            serde_urlencoded::from_str("complaint=No+water+today&location=Ward%204").unwrap();
        assert_eq!(form.complaint.as_deref(), Some("No water today"));
        assert_eq!(form.location.as_deref(), Some("Ward 4"));
    }
}
