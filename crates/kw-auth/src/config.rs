use super::*;
use kw_core::Status;

/// Status gating for account usability.
///
/// When `skip` is set every account is usable regardless of status; the
/// flag is a one-time capability decision (the backing schema may not
/// carry a status column at all), not per-call state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StatusPolicy {
    pub skip: bool,
    pub unverified_value: Status,
    pub open_value: Status,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            skip: false,
            unverified_value: kw_core::UNVERIFIED_STATUS,
            open_value: kw_core::OPEN_STATUS,
        }
    }
}

/// Argon2 cost preset, fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashCost {
    /// Cheapest parameters the algorithm accepts. Test configurations only.
    Minimum,
    /// Library default parameters.
    Standard,
}

impl Default for HashCost {
    fn default() -> Self {
        Self::Standard
    }
}

impl HashCost {
    pub fn params(self) -> argon2::Params {
        match self {
            Self::Minimum => argon2::Params::new(8, 1, 1, None).expect("minimum argon2 params"),
            Self::Standard => argon2::Params::default(),
        }
    }
}

/// User-facing message catalog with the stock texts. Every entry is
/// overridable so embedders control wording and localization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Messages {
    pub no_matching_login: String,
    pub invalid_password: String,
    /// Combined refusal used when the failure reason is concealed.
    pub invalid_credentials: String,
    pub unverified_account: String,
    pub invalid_login_format: String,
    pub password_requirements: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_matching_login: "no matching login".into(),
            invalid_password: "invalid password".into(),
            invalid_credentials: "invalid login or password".into(),
            unverified_account: "unverified account, please verify account before logging in"
                .into(),
            invalid_login_format: "invalid login, not a valid email address".into(),
            password_requirements: "invalid password, does not meet requirements".into(),
        }
    }
}

impl Messages {
    /// Requirement refusal with the failing check's detail appended.
    pub fn password_requirements_detail(&self, detail: &str) -> String {
        format!("{} ({})", self.password_requirements, detail)
    }
}

/// Static configuration for the authentication core, passed explicitly at
/// construction and unchanged for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Minimum accepted password length, in characters.
    pub password_minimum_length: usize,
    /// Session scope key holding the bound account's session value.
    pub session_key: String,
    pub statuses: StatusPolicy,
    pub cost: HashCost,
    pub verify_mode: VerifyMode,
    /// Report the combined refusal message instead of distinguishing
    /// unknown logins from wrong passwords.
    pub conceal_failure_reason: bool,
    pub messages: Messages,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_minimum_length: kw_core::PASSWORD_MINIMUM_LENGTH,
            session_key: kw_core::SESSION_KEY.into(),
            statuses: StatusPolicy::default(),
            cost: HashCost::default(),
            verify_mode: VerifyMode::SecondaryTable,
            conceal_failure_reason: false,
            messages: Messages::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.password_minimum_length, 6);
        assert_eq!(config.session_key, "account_id");
        assert_eq!(config.statuses.unverified_value, 1);
        assert_eq!(config.statuses.open_value, 2);
        assert!(!config.statuses.skip);
        assert!(!config.conceal_failure_reason);
        assert_eq!(config.messages.no_matching_login, "no matching login");
    }

    #[test]
    fn minimum_cost_is_cheaper_than_standard() {
        assert!(HashCost::Minimum.params().m_cost() < HashCost::Standard.params().m_cost());
    }

    #[test]
    fn requirement_detail_is_appended() {
        let messages = Messages::default();
        assert_eq!(
            messages.password_requirements_detail("minimum 6 characters"),
            "invalid password, does not meet requirements (minimum 6 characters)"
        );
    }
}
