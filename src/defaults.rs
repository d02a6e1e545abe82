//! Default values shared across services.

/// HTTP defaults
pub mod http {
    use std::time::Duration;

    /// `User-Agent` attached to every request.
    pub const USER_AGENT: &str = concat!("watson-sdk-rust-", env!("CARGO_PKG_VERSION"));

    /// Connection timeout. Request timeouts are left to the caller.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Authentication defaults
pub mod auth {
    /// IAM token endpoint.
    pub const IAM_URL: &str = "https://iam.bluemix.net/identity/token";

    /// Header carrying a Watson authorization token.
    pub const WATSON_TOKEN_HEADER: &str = "X-Watson-Authorization-Token";

    /// Header opting out of request logging on the service side.
    pub const LEARNING_OPT_OUT_HEADER: &str = "X-Watson-Learning-Opt-Out";

    /// Environment variable holding the platform service catalog.
    pub const VCAP_SERVICES_ENV: &str = "VCAP_SERVICES";

    /// Environment variable pointing at a credentials file or its directory.
    pub const CREDENTIALS_FILE_ENV: &str = "IBM_CREDENTIALS_FILE";

    /// Default credentials file name.
    pub const CREDENTIALS_FILE_NAME: &str = "ibm-credentials.env";
}
