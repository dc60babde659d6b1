use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub issuer: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
}

/// Argon2 work-factor parameters, tunable per deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct Argon2Config {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub from: String,
    pub contact_inbox: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub argon2: Argon2Config,
    pub mail: MailConfig,
    pub frontend_origin: String,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// When set, the session middleware re-reads role and active state from
    /// the store on every request instead of trusting the token claims.
    pub recheck_role: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            access_secret: std::env::var("JWT_ACCESS_SECRET")?,
            refresh_secret: std::env::var("JWT_REFRESH_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "hirelink".into()),
            access_ttl_minutes: std::env::var("JWT_ACCESS_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(15),
            refresh_ttl_days: std::env::var("JWT_REFRESH_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };
        let argon2 = Argon2Config {
            memory_kib: std::env::var("ARGON2_MEMORY_KIB")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(19 * 1024),
            iterations: std::env::var("ARGON2_ITERATIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(2),
            parallelism: std::env::var("ARGON2_PARALLELISM")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(1),
        };
        let mail = MailConfig {
            from: std::env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@hirelink.local".into()),
            contact_inbox: std::env::var("CONTACT_INBOX")
                .unwrap_or_else(|_| "support@hirelink.local".into()),
        };
        let frontend_origin =
            std::env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".into());
        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| vec![frontend_origin.clone()]);
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let recheck_role = std::env::var("AUTH_RECHECK_ROLE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt,
            argon2,
            mail,
            frontend_origin,
            cors_origins,
            environment,
            recheck_role,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
