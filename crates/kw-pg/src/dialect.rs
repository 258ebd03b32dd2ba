/// Name of the salt-retrieval authentication function.
pub const GET_SALT: &str = "keyward_get_salt";
/// Name of the hash-validation authentication function.
pub const VALID_HASH: &str = "keyward_valid_password_hash";

/// Backend SQL dialect.
///
/// The authentication core is dialect-agnostic except for two decisions
/// made once at startup: whether the backend ships the salt/validate
/// authentication functions, and how those functions are name-qualified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Mysql,
    Mssql,
    Sqlite,
}

impl Dialect {
    /// Whether the backend provides the authentication functions, making
    /// database-offloaded hash comparison available.
    pub fn supports_authentication_functions(self) -> bool {
        matches!(self, Self::Postgres | Self::Mysql | Self::Mssql)
    }

    /// Callable name for a backend function. MSSQL requires the schema
    /// qualifier; the other dialects take the bare name.
    pub fn function_name(self, name: &str) -> String {
        match self {
            Self::Mssql => format!("dbo.{}", name),
            _ => name.to_string(),
        }
    }
}
