use super::*;

fn raw_with_token() -> RawSettings {
    RawSettings {
        admin: RawAdminSettings {
            token: Some("secret".to_string()),
        },
        ..RawSettings::default()
    }
}

#[test]
fn defaults_resolve() {
    let settings = Settings::from_raw(raw_with_token()).expect("settings");

    assert_eq!(settings.server.public_addr.port(), DEFAULT_PUBLIC_PORT);
    assert_eq!(settings.server.admin_addr.port(), DEFAULT_ADMIN_PORT);
    assert_eq!(
        settings.database.max_connections.get(),
        DEFAULT_DB_MAX_CONNECTIONS
    );
    assert_eq!(settings.site.default_locale, Locale::En);
    assert_eq!(
        settings.uploads.max_request_bytes.get(),
        DEFAULT_UPLOAD_REQUEST_LIMIT_BYTES
    );
    assert!(settings.uploads.primary.is_none());
    assert!(settings.notify.email.is_none());
    assert!(settings.notify.telegram.is_none());
}

#[test]
fn missing_admin_token_is_rejected() {
    let err = Settings::from_raw(RawSettings::default()).expect_err("rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "admin.token",
            ..
        }
    ));
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = raw_with_token();
    raw.server.public_port = Some(0);

    let err = Settings::from_raw(raw).expect_err("rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "server.public_port",
            ..
        }
    ));
}

#[test]
fn unknown_locale_is_rejected() {
    let mut raw = raw_with_token();
    raw.site.default_locale = Some("fr".to_string());

    let err = Settings::from_raw(raw).expect_err("rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "site.default_locale",
            ..
        }
    ));
}

#[test]
fn serve_overrides_take_precedence() {
    let mut raw = raw_with_token();
    raw.apply_serve_overrides(&ServeOverrides {
        public_port: Some(8080),
        log_level: Some("debug".to_string()),
        database_url: Some("postgres://localhost/diwan".to_string()),
        site_default_locale: Some("ar".to_string()),
        ..ServeOverrides::default()
    });

    let settings = Settings::from_raw(raw).expect("settings");
    assert_eq!(settings.server.public_addr.port(), 8080);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(
        settings.database.url.as_deref(),
        Some("postgres://localhost/diwan")
    );
    assert_eq!(settings.site.default_locale, Locale::Ar);
}

#[test]
fn image_host_requires_key_and_endpoint_together() {
    let mut raw = raw_with_token();
    raw.uploads.primary = Some(RawImageHostSettings {
        endpoint: Some("https://host.example/upload".to_string()),
        api_key: None,
    });

    let err = Settings::from_raw(raw).expect_err("rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "uploads.primary",
            ..
        }
    ));
}

#[test]
fn configured_image_host_parses_endpoint() {
    let mut raw = raw_with_token();
    raw.uploads.primary = Some(RawImageHostSettings {
        endpoint: Some("https://host.example/upload".to_string()),
        api_key: Some("key".to_string()),
    });
    raw.uploads.secondary = Some(RawImageHostSettings::default());

    let settings = Settings::from_raw(raw).expect("settings");
    let primary = settings.uploads.primary.expect("primary");
    assert_eq!(primary.endpoint.as_str(), "https://host.example/upload");
    // An empty table behaves like an absent host.
    assert!(settings.uploads.secondary.is_none());
}

#[test]
fn telegram_defaults_to_public_api_base() {
    let mut raw = raw_with_token();
    raw.notify.telegram = Some(RawTelegramSettings {
        api_base: None,
        bot_token: Some("123:abc".to_string()),
        chat_id: Some("42".to_string()),
    });

    let settings = Settings::from_raw(raw).expect("settings");
    let telegram = settings.notify.telegram.expect("telegram");
    assert_eq!(telegram.api_base.as_str(), DEFAULT_TELEGRAM_API_BASE);
}

#[test]
fn smtp_channel_disabled_without_host() {
    let mut raw = raw_with_token();
    raw.notify.email = Some(RawSmtpSettings::default());

    let settings = Settings::from_raw(raw).expect("settings");
    assert!(settings.notify.email.is_none());
}
