#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listing API endpoint captured from the category page's network traffic.
    pub base_url: String,
    /// Referer sent with every request, mimicking navigation from the category page.
    pub referer: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}
