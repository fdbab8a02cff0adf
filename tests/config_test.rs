use sporlapi::config::{Config, DEFAULT_FRONTEND_URL, DEFAULT_PORT};

fn config(app_env: &str) -> Config {
    Config {
        app_env: app_env.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_development_modes() {
    for mode in ["development", "dev", "local", "Development", "DEV"] {
        assert!(config(mode).is_development(), "{}", mode);
    }
}

#[test]
fn test_non_development_modes() {
    for mode in ["production", "staging", "test", ""] {
        assert!(!config(mode).is_development(), "{}", mode);
    }
}

#[test]
fn test_defaults() {
    let config = Config::default();

    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.frontend_url, DEFAULT_FRONTEND_URL);
    assert_eq!(config.app_env, "production");
    assert!(!config.is_development());
    assert!(!config.spotify_configured());
}

#[test]
fn test_spotify_configured_needs_both_credentials() {
    let mut config = Config {
        client_id: Some("id".to_string()),
        ..Default::default()
    };
    assert!(!config.spotify_configured());

    config.client_secret = Some("secret".to_string());
    assert!(config.spotify_configured());
}
