#![forbid(unsafe_code)]

//! Required-field validation for the contact form.

/// Class added to an invalid field.
pub const CLASS_ERROR: &str = "error";
/// Class of the message element appended next to an invalid field.
pub const CLASS_ERROR_MESSAGE: &str = "error-message";
/// Fields checked on submit.
pub const REQUIRED_SELECTOR: &str = "input[required], textarea[required]";

/// One required field as read from the DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInput {
    pub name: String,
    pub value: String,
}

impl FieldInput {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Position of the field in the submitted list.
    pub index: usize,
    pub message: String,
}

/// Verdict for one submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    pub errors: Vec<FieldError>,
    /// Fields whose previous error (if any) must be cleared.
    pub cleared: Vec<usize>,
}

impl FormReport {
    /// Submission may proceed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every required field; blank (after trimming) fields get `message`.
///
/// Every field is visited so all errors show at once.
#[must_use]
pub fn validate_fields(fields: &[FieldInput], message: &str) -> FormReport {
    let mut report = FormReport::default();
    for (index, field) in fields.iter().enumerate() {
        if field.is_blank() {
            report.errors.push(FieldError {
                index,
                message: message.to_owned(),
            });
        } else {
            report.cleared.push(index);
        }
    }
    if !report.is_valid() {
        tracing::debug!(
            errors = report.errors.len(),
            fields = fields.len(),
            "form rejected"
        );
    }
    report
}
