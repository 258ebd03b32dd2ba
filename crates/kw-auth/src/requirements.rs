use std::sync::LazyLock;

/// Permissive email shape: something without separators or whitespace, an
/// `@`, a domain segment, a literal dot, and a final segment. No DNS
/// lookup, no length cap.
static LOGIN_SHAPE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[^,;@ \r\n]+@[^,@; \r\n]+\.[^,@; \r\n]+$").expect("login pattern")
});

/// Gates login and password values before they reach the directory or the
/// password writer.
#[derive(Debug, Clone)]
pub struct RequirementValidator {
    minimum_length: usize,
}

impl RequirementValidator {
    pub fn new(minimum_length: usize) -> Self {
        Self { minimum_length }
    }

    pub fn login_meets_requirements(&self, login: &str) -> bool {
        LOGIN_SHAPE.is_match(login)
    }

    /// Length is counted in characters, not bytes. On failure the error
    /// carries the detail callers append to the refusal message.
    pub fn password_meets_requirements(&self, password: &str) -> Result<(), String> {
        if self.minimum_length <= password.chars().count() {
            Ok(())
        } else {
            Err(format!("minimum {} characters", self.minimum_length))
        }
    }
}

impl Default for RequirementValidator {
    fn default() -> Self {
        Self::new(kw_core::PASSWORD_MINIMUM_LENGTH)
    }
}
