use crate::error::AppError;

/// Collects required request fields, remembering every one that is absent
/// so a single error can name them all.
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value, or an empty placeholder after recording `name`.
    pub fn take(&mut self, name: &'static str, value: Option<String>) -> String {
        match value {
            Some(value) => value,
            None => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(format!(
                "Missing required field(s): {}",
                self.missing.join(", ")
            )))
        }
    }
}
