//! Offering entity - the reusable lecture definition.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OfferingId, ValidationError};

/// Maximum length for offering and presenter names.
pub const MAX_NAME_LENGTH: usize = 200;

/// A lecture offering: what is taught and by whom, independent of any date.
///
/// Immutable after creation. Sessions reference an offering by ID but do not
/// own it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    id: OfferingId,
    name: String,
    presenter: String,
}

impl Offering {
    /// Creates an offering.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the name or presenter is blank
    /// - `OutOfRange` if either is longer than [`MAX_NAME_LENGTH`]
    pub fn new(
        id: OfferingId,
        name: impl Into<String>,
        presenter: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let presenter = presenter.into();
        validate_name("offering_name", &name)?;
        validate_name("presenter_name", &presenter)?;
        Ok(Self {
            id,
            name,
            presenter,
        })
    }

    /// Returns the offering ID.
    pub fn id(&self) -> &OfferingId {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the presenter's name.
    pub fn presenter(&self) -> &str {
        &self.presenter
    }
}

fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = value.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(ValidationError::out_of_range(
            field,
            1,
            MAX_NAME_LENGTH as i64,
            len as i64,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_offering() {
        let offering = Offering::new(OfferingId::new(), "Clean Architecture", "Heo Jae").unwrap();
        assert_eq!(offering.name(), "Clean Architecture");
        assert_eq!(offering.presenter(), "Heo Jae");
    }

    #[test]
    fn rejects_empty_presenter() {
        let err = Offering::new(OfferingId::new(), "TDD", "").unwrap_err();
        assert_eq!(err.field(), "presenter_name");
    }

    #[test]
    fn rejects_overlong_name() {
        let err = Offering::new(OfferingId::new(), "n".repeat(MAX_NAME_LENGTH + 1), "Heo")
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }
}
