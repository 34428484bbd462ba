//! Technology submission form validation
//!
//! Declarative length rules for the fields a user fills in before a
//! technology is sent to the backend. All field errors are collected so a
//! caller can show them together.

use thiserror::Error;

use crate::dto::technology::CreateTechnology;

const NAME_LEN: (usize, usize) = (3, 100);
const ABSTRACT_LEN: (usize, usize) = (50, 2000);
// Length of the raw input string, not the numeric value.
const NUM_OF_AXES_LEN: (usize, usize) = (1, 10);

/// Form field identifiers, named as on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Abstract,
    NumOfAxes,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Abstract => "abstract",
            FormField::NumOfAxes => "num_of_axes",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    TooShort {
        field: FormField,
        min: usize,
        message: &'static str,
    },

    #[error("{field}: {message}")]
    TooLong {
        field: FormField,
        max: usize,
        message: &'static str,
    },

    #[error("{field}: Number of axes must be a whole number.")]
    NotANumber { field: FormField, value: String },
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            Self::TooShort { field, .. } | Self::TooLong { field, .. } | Self::NotANumber { field, .. } => {
                *field
            }
        }
    }
}

/// Every field error found in one form submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid technology data: {}", join_errors(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn for_field(&self, field: FormField) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(move |e| e.field() == field)
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw technology form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologyForm {
    pub name: String,
    pub abstract_text: String,
    pub num_of_axes: String,
}

impl TechnologyForm {
    pub fn new(
        name: impl Into<String>,
        abstract_text: impl Into<String>,
        num_of_axes: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            abstract_text: abstract_text.into(),
            num_of_axes: num_of_axes.into(),
        }
    }

    /// Checks every field against its length rule
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        check_len(
            &mut errors,
            FormField::Name,
            &self.name,
            NAME_LEN,
            "Technology name must be at least 3 characters.",
            "Name can't exceed 100 characters.",
        );
        check_len(
            &mut errors,
            FormField::Abstract,
            &self.abstract_text,
            ABSTRACT_LEN,
            "Abstract must be at least 50 characters.",
            "Abstract can't exceed 2000 characters.",
        );
        check_len(
            &mut errors,
            FormField::NumOfAxes,
            &self.num_of_axes,
            NUM_OF_AXES_LEN,
            "Number of axes must be at least 3.",
            "Number of axes can't exceed 10.",
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Validates the form and builds the create request
    ///
    /// The axis count is sent to the API as an integer, so input that passes
    /// the length rule but is not a number is rejected here.
    pub fn into_request(self) -> Result<CreateTechnology, ValidationErrors> {
        self.validate()?;

        let num_of_axes = self.num_of_axes.trim().parse::<u32>().map_err(|_| {
            ValidationErrors(vec![ValidationError::NotANumber {
                field: FormField::NumOfAxes,
                value: self.num_of_axes.clone(),
            }])
        })?;

        Ok(CreateTechnology {
            name: self.name,
            abstract_text: self.abstract_text,
            num_of_axes,
        })
    }
}

fn check_len(
    errors: &mut Vec<ValidationError>,
    field: FormField,
    value: &str,
    (min, max): (usize, usize),
    too_short: &'static str,
    too_long: &'static str,
) {
    let len = value.chars().count();
    if len < min {
        errors.push(ValidationError::TooShort {
            field,
            min,
            message: too_short,
        });
    } else if len > max {
        errors.push(ValidationError::TooLong {
            field,
            max,
            message: too_long,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_abstract() -> String {
        "A flexible adhesive patch that measures wound temperature and pH continuously.".to_string()
    }

    #[test]
    fn test_valid_form() {
        let form = TechnologyForm::new("Smart bandage", valid_abstract(), "4");
        assert!(form.validate().is_ok());

        let req = form.into_request().unwrap();
        assert_eq!(req.num_of_axes, 4);
        assert_eq!(req.name, "Smart bandage");
    }

    #[test]
    fn test_collects_all_errors() {
        let form = TechnologyForm::new("AI", "too short", "");
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.errors().len(), 3);
        assert_eq!(
            errors.for_field(FormField::Name).next().unwrap().to_string(),
            "name: Technology name must be at least 3 characters."
        );
        assert!(matches!(
            errors.for_field(FormField::Abstract).next(),
            Some(ValidationError::TooShort { min: 50, .. })
        ));
        assert!(matches!(
            errors.for_field(FormField::NumOfAxes).next(),
            Some(ValidationError::TooShort { min: 1, .. })
        ));
    }

    #[test]
    fn test_upper_bounds() {
        let form = TechnologyForm::new("n".repeat(101), "a".repeat(2001), "12345678901");
        let errors = form.validate().unwrap_err();
        assert!(errors.errors().iter().all(|e| matches!(e, ValidationError::TooLong { .. })));
        assert_eq!(errors.errors().len(), 3);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let form = TechnologyForm::new("abc", "a".repeat(50), "1");
        assert!(form.validate().is_ok());

        let form = TechnologyForm::new("n".repeat(100), "a".repeat(2000), "1234567890");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_axis_count_is_a_length_rule() {
        // "25" is two characters long and passes, even though it is more than 10 axes.
        let form = TechnologyForm::new("Smart bandage", valid_abstract(), "25");
        assert!(form.validate().is_ok());
        assert_eq!(form.into_request().unwrap().num_of_axes, 25);
    }

    #[test]
    fn test_non_numeric_axis_count_rejected_on_request() {
        let form = TechnologyForm::new("Smart bandage", valid_abstract(), "four");
        assert!(form.validate().is_ok());

        let errors = form.into_request().unwrap_err();
        assert!(matches!(
            errors.errors(),
            [ValidationError::NotANumber { field: FormField::NumOfAxes, .. }]
        ));
    }

    #[test]
    fn test_length_counts_characters() {
        let form = TechnologyForm::new("Été", valid_abstract(), "3");
        assert!(form.validate().is_ok());
    }
}
