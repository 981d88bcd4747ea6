//! Environment variable overrides.
//!
//! Variables set to the empty string count as unset.

use crate::config::schema::GatewayConfig;

pub const HOSTNAME_VAR: &str = "HOSTNAME";
pub const IP_VAR: &str = "IP";
pub const PORT_VAR: &str = "PORT";
pub const DEBUG_VAR: &str = "DEBUG";
pub const ANALYTICS_VAR: &str = "GA_TRACKING_ID";

/// Apply overrides from the process environment.
pub fn apply_process_env(config: &mut GatewayConfig) {
    apply_env_overrides(config, |name| std::env::var(name).ok());
}

/// Apply overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

    if let Some(hostname) = get(HOSTNAME_VAR) {
        config.site.hostname = hostname;
    }

    let ip = get(IP_VAR);
    let port = get(PORT_VAR);
    if ip.is_some() || port.is_some() {
        let (current_ip, current_port) = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(ip, port)| (ip.to_string(), port.to_string()))
            .unwrap_or_else(|| (config.listener.bind_address.clone(), String::new()));
        config.listener.bind_address = format!(
            "{}:{}",
            ip.unwrap_or(current_ip),
            port.unwrap_or(current_port)
        );
    }

    if let Some(debug) = get(DEBUG_VAR) {
        // Unparsable values switch debug off rather than keeping the default.
        config.site.debug = parse_bool(&debug).unwrap_or(false);
    }

    if let Some(analytics_id) = get(ANALYTICS_VAR) {
        config.site.analytics_id = analytics_id;
    }
}

/// Parse the boolean spellings accepted by the gateway's environment.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, lookup(&[]));
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, lookup(&[(HOSTNAME_VAR, ""), (PORT_VAR, "")]));
        assert_eq!(config.site.hostname, "gogetver.com");
        assert_eq!(config.listener.bind_address, "127.0.0.1:5000");
    }

    #[test]
    fn test_ip_and_port_override_independently() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, lookup(&[(PORT_VAR, "8080")]));
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");

        apply_env_overrides(&mut config, lookup(&[(IP_VAR, "0.0.0.0")]));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_site_overrides() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                (HOSTNAME_VAR, "go.example.org"),
                (DEBUG_VAR, "true"),
                (ANALYTICS_VAR, "UA-1234"),
            ]),
        );
        assert_eq!(config.site.hostname, "go.example.org");
        assert!(config.site.debug);
        assert_eq!(config.site.analytics_id, "UA-1234");
    }

    #[test]
    fn test_unparsable_debug_is_false() {
        let mut config = GatewayConfig::default();
        config.site.debug = true;
        apply_env_overrides(&mut config, lookup(&[(DEBUG_VAR, "1234")]));
        assert!(!config.site.debug);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("F"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }
}
