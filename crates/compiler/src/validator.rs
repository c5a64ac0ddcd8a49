//! Variable name validation

/// Checks names given to `var` bindings
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableNameValidator;

impl VariableNameValidator {
    pub fn new() -> Self {
        Self
    }

    /// A name is an ASCII letter followed by ASCII letters or digits
    pub fn is_valid(&self, name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
            _ => false,
        }
    }
}
