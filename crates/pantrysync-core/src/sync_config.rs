/// How the receipt source client authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum SourceCredentials {
    /// Long-lived refresh credential from a previous interactive login.
    RefreshToken(String),
    /// Interactive login; a verification code is requested out of band.
    Account { phone: String, password: String },
}

impl std::fmt::Debug for SourceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceCredentials::RefreshToken(_) => f
                .debug_tuple("RefreshToken")
                .field(&"[redacted]")
                .finish(),
            SourceCredentials::Account { phone, .. } => f
                .debug_struct("Account")
                .field("phone", phone)
                .field("password", &"[redacted]")
                .finish(),
        }
    }
}

#[derive(Clone)]
pub struct SyncConfig {
    pub catalog_url: String,
    pub catalog_service_key: String,
    pub source_language: String,
    pub source_country: String,
    pub credentials: SourceCredentials,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("catalog_url", &self.catalog_url)
            .field("catalog_service_key", &"[redacted]")
            .field("source_language", &self.source_language)
            .field("source_country", &self.source_country)
            .field("credentials", &self.credentials)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
