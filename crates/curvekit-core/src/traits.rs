use crate::error::Result;

/// Structural checks for values that can be built field by field (or
/// deserialized) without going through a checked constructor.
pub trait Validate {
    fn validate(&self) -> Result<()>;

    /// `self`, if it passes [`Validate::validate`].
    fn validated(self) -> Result<Self>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}
