pub mod fixtures;
pub mod wiremock_helpers;

use companyenrich::config::AppConfig;

/// Default config with zero politeness delay, suitable for tests.
/// Endpoint base URLs still point at the real services; tests that touch
/// the network must override them with a mock server URI.
pub fn test_config() -> AppConfig {
    let mut config: AppConfig =
        toml::from_str(companyenrich::config::DEFAULT_CONFIG).expect("default config parses");
    config.politeness.min_delay_secs = 0.0;
    config.politeness.max_delay_secs = 0.0;
    config.http.probe_timeout_secs = 2;
    config.http.content_timeout_secs = 2;
    config.http.document_timeout_secs = 2;
    config
}
