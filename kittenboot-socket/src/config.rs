//! Socket configuration, builder and validation.

use crate::error::{ConfigError, ConfigResult, SocketResult};
use crate::listener::{ListenerTable, OnConnect};
use crate::payload::Payload;
use crate::settings::SocketSettings;
use crate::socket::KittenSocket;
use crate::transport::Connector;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Validated configuration for a [`KittenSocket`].
///
/// Path segments are stored without a leading `/`; the url always uses a
/// `ws` or `wss` scheme.
#[derive(Clone)]
pub struct SocketConfig {
    url: String,
    register_endpoint: String,
    message_broker_prefix: String,
    application_destination_prefix: String,
    silent: bool,
    debug: bool,
    listeners: ListenerTable,
    on_connect: Option<OnConnect>,
}

impl SocketConfig {
    /// Create a new config builder.
    pub fn builder() -> SocketConfigBuilder {
        SocketConfigBuilder::new()
    }

    /// Validate settings and attach listeners.
    pub fn from_settings(settings: SocketSettings, listeners: ListenerTable) -> ConfigResult<Self> {
        SocketConfigBuilder::new()
            .settings(settings)
            .listeners(listeners)
            .build()
    }

    /// WebSocket base url (`ws://` or `wss://`).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// STOMP endpoint registered on the server.
    pub fn register_endpoint(&self) -> &str {
        &self.register_endpoint
    }

    /// Prefix of server-to-client destinations.
    pub fn message_broker_prefix(&self) -> &str {
        &self.message_broker_prefix
    }

    /// Prefix of client-to-server destinations.
    pub fn application_destination_prefix(&self) -> &str {
        &self.application_destination_prefix
    }

    /// Whether default listeners stay quiet.
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Whether transport debug output is enabled.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Configured lifecycle listeners.
    pub fn listeners(&self) -> &ListenerTable {
        &self.listeners
    }

    pub(crate) fn on_connect(&self) -> Option<&OnConnect> {
        self.on_connect.as_ref()
    }

    /// Full url of the STOMP endpoint.
    pub fn connect_url(&self) -> String {
        join_url(&self.url, &self.register_endpoint)
    }
}

impl fmt::Debug for SocketConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketConfig")
            .field("url", &self.url)
            .field("register_endpoint", &self.register_endpoint)
            .field("message_broker_prefix", &self.message_broker_prefix)
            .field(
                "application_destination_prefix",
                &self.application_destination_prefix,
            )
            .field("silent", &self.silent)
            .field("debug", &self.debug)
            .field("listeners", &self.listeners)
            .field("on_connect", &self.on_connect.is_some())
            .finish()
    }
}

/// Builder for [`SocketConfig`].
#[derive(Clone, Default)]
pub struct SocketConfigBuilder {
    url: Option<String>,
    register_endpoint: Option<String>,
    message_broker_prefix: Option<String>,
    application_destination_prefix: Option<String>,
    silent: bool,
    debug: bool,
    listeners: ListenerTable,
    on_connect: Option<OnConnect>,
}

impl SocketConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server url.
    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the STOMP endpoint registered on the server.
    pub fn register_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.register_endpoint = Some(endpoint.into());
        self
    }

    /// Set the prefix of server-to-client destinations.
    pub fn message_broker_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.message_broker_prefix = Some(prefix.into());
        self
    }

    /// Set the prefix of client-to-server destinations.
    pub fn application_destination_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.application_destination_prefix = Some(prefix.into());
        self
    }

    /// Suppress default listener output.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Enable the transport's frame-level debug output.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Apply every field from loaded settings.
    pub fn settings(mut self, settings: SocketSettings) -> Self {
        self.url = Some(settings.url);
        self.register_endpoint = Some(settings.register_endpoint);
        self.message_broker_prefix = Some(settings.message_broker_prefix);
        self.application_destination_prefix = Some(settings.application_destination_prefix);
        self.silent = settings.silent;
        self.debug = settings.debug;
        self
    }

    /// Replace the whole listener table.
    pub fn listeners(mut self, listeners: ListenerTable) -> Self {
        self.listeners = listeners;
        self
    }

    /// Listener for `room_update`.
    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        self.listeners.on_update = Some(Arc::new(f));
        self
    }

    /// Listener for `queue_not_found`.
    pub fn on_queue_not_found<F>(mut self, f: F) -> Self
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        self.listeners.on_queue_not_found = Some(Arc::new(f));
        self
    }

    /// Listener for `queue_created`.
    pub fn on_queue_created<F>(mut self, f: F) -> Self
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        self.listeners.on_queue_created = Some(Arc::new(f));
        self
    }

    /// Listener for `joined_queue`.
    pub fn on_joined_queue<F>(mut self, f: F) -> Self
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        self.listeners.on_joined_queue = Some(Arc::new(f));
        self
    }

    /// Listener for `player_joined_queue`.
    pub fn on_player_joined_queue<F>(mut self, f: F) -> Self
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        self.listeners.on_player_joined_queue = Some(Arc::new(f));
        self
    }

    /// Listener for `player_left_room`.
    ///
    /// Also receives `player_joined_room` unless
    /// [`on_player_joined_room`](Self::on_player_joined_room) is set.
    pub fn on_player_left_room<F>(mut self, f: F) -> Self
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        self.listeners.on_player_left_room = Some(Arc::new(f));
        self
    }

    /// Listener for `player_left_queue`.
    pub fn on_player_left_queue<F>(mut self, f: F) -> Self
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        self.listeners.on_player_left_queue = Some(Arc::new(f));
        self
    }

    /// Dedicated listener for `player_joined_room`.
    pub fn on_player_joined_room<F>(mut self, f: F) -> Self
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        self.listeners.on_player_joined_room = Some(Arc::new(f));
        self
    }

    /// Callback run after the system topics are subscribed.
    pub fn on_connect<F>(mut self, f: F) -> Self
    where
        F: Fn(&KittenSocket) + Send + Sync + 'static,
    {
        self.on_connect = Some(Arc::new(f));
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> ConfigResult<SocketConfig> {
        let register_endpoint = required(self.register_endpoint, "register_endpoint")?;
        let message_broker_prefix = required(self.message_broker_prefix, "message_broker_prefix")?;
        let application_destination_prefix = required(
            self.application_destination_prefix,
            "application_destination_prefix",
        )?;

        validate_segment("register_endpoint", &register_endpoint)?;
        validate_segment("message_broker_prefix", &message_broker_prefix)?;
        validate_segment(
            "application_destination_prefix",
            &application_destination_prefix,
        )?;

        let url = normalize_url(&required(self.url, "url")?)?;

        Ok(SocketConfig {
            url,
            register_endpoint,
            message_broker_prefix,
            application_destination_prefix,
            silent: self.silent,
            debug: self.debug,
            listeners: self.listeners,
            on_connect: self.on_connect,
        })
    }

    /// Validate, build and connect in one step.
    pub fn connect<C: Connector>(self, connector: C) -> SocketResult<KittenSocket> {
        let config = self.build()?;
        KittenSocket::connect(config, connector)
    }
}

fn required(value: Option<String>, field: &'static str) -> ConfigResult<String> {
    value.ok_or(ConfigError::MissingField(field))
}

/// Check a path segment: non-empty and without a leading `/`.
pub fn validate_segment(field: &'static str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::InvalidField {
            field,
            reason: "can't be empty".to_string(),
        });
    }
    if value.starts_with('/') {
        return Err(ConfigError::InvalidField {
            field,
            reason: format!("can't start with \"/\", got {:?}", value),
        });
    }
    Ok(())
}

/// Coerce `http(s)://` to `ws(s)://` and reject anything else.
///
/// Only the scheme is rewritten; the rest of the url is kept byte for byte.
/// A url the `url` crate can't parse is still accepted, with a warning,
/// since the transport has the final say.
pub fn normalize_url(raw: &str) -> ConfigResult<String> {
    let coerced = if let Some(rest) = raw.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if let Some(rest) = raw.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if raw.starts_with("ws://") || raw.starts_with("wss://") {
        raw.to_string()
    } else {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    };

    match Url::parse(&coerced) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => {}
        Ok(_) => tracing::warn!(url = %coerced, "Socket url has no host"),
        Err(e) => tracing::warn!(url = %coerced, error = %e, "Socket url does not parse"),
    }

    Ok(coerced)
}

/// Append a path segment to a url with exactly one `/` between them.
fn join_url(url: &str, segment: &str) -> String {
    if url.ends_with('/') {
        format!("{}{}", url, segment)
    } else {
        format!("{}/{}", url, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SocketConfigBuilder {
        SocketConfig::builder()
            .url("http://localhost:8080")
            .register_endpoint("register")
            .message_broker_prefix("game_get")
            .application_destination_prefix("game_post")
    }

    #[test]
    fn test_build_valid() {
        let config = base().build().unwrap();
        assert_eq!(config.url(), "ws://localhost:8080");
        assert_eq!(config.connect_url(), "ws://localhost:8080/register");
        assert!(!config.is_silent());
        assert!(!config.is_debug());
    }

    #[test]
    fn test_normalize_url_schemes() {
        assert_eq!(normalize_url("http://host:1/a").unwrap(), "ws://host:1/a");
        assert_eq!(normalize_url("https://host/a/b").unwrap(), "wss://host/a/b");
        assert_eq!(normalize_url("ws://host").unwrap(), "ws://host");
        assert_eq!(normalize_url("wss://host/").unwrap(), "wss://host/");
        assert_eq!(normalize_url("http://host/a/").unwrap(), "ws://host/a/");
    }

    #[test]
    fn test_normalize_url_keeps_unparseable_rest() {
        assert_eq!(normalize_url("http://").unwrap(), "ws://");
        assert_eq!(normalize_url("http://host:99999").unwrap(), "ws://host:99999");
        assert_eq!(normalize_url("ws://").unwrap(), "ws://");
    }

    #[test]
    fn test_connect_url_single_separator() {
        let config = base().url("http://host/a/").build().unwrap();
        assert_eq!(config.url(), "ws://host/a/");
        assert_eq!(config.connect_url(), "ws://host/a/register");

        let config = base().url("https://host/a").build().unwrap();
        assert_eq!(config.connect_url(), "wss://host/a/register");
    }

    #[test]
    fn test_normalize_url_rejects_other_schemes() {
        assert!(normalize_url("ftp://host").is_err());
        assert!(normalize_url("localhost:8080").is_err());
        assert!(normalize_url("HTTP://host").is_err());
        assert!(normalize_url("").is_err());
    }

    #[test]
    fn test_missing_segment() {
        let result = SocketConfig::builder()
            .url("ws://localhost")
            .message_broker_prefix("game_get")
            .application_destination_prefix("game_post")
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingField("register_endpoint"))
        ));
    }

    #[test]
    fn test_leading_slash_rejected() {
        let result = base().message_broker_prefix("/game_get").build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidField {
                field: "message_broker_prefix",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_segment_rejected() {
        let result = base().application_destination_prefix("").build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidField {
                field: "application_destination_prefix",
                ..
            })
        ));
    }

    #[test]
    fn test_segments_checked_before_url() {
        let result = base().url("ftp://nope").register_endpoint("/register").build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidField {
                field: "register_endpoint",
                ..
            })
        ));
    }

    #[test]
    fn test_from_settings() {
        let settings = SocketSettings {
            url: "https://play.example.com".to_string(),
            register_endpoint: "custom_register".to_string(),
            message_broker_prefix: "custom_game_get".to_string(),
            application_destination_prefix: "custom_game_post".to_string(),
            silent: true,
            debug: false,
        };
        let config = SocketConfig::from_settings(settings, ListenerTable::new()).unwrap();
        assert_eq!(
            config.connect_url(),
            "wss://play.example.com/custom_register"
        );
        assert!(config.is_silent());
    }

    #[test]
    fn test_listener_setters() {
        let config = base().on_update(|_| {}).on_connect(|_| {}).build().unwrap();
        assert!(config.listeners().on_update.is_some());
        assert!(config.listeners().on_queue_created.is_none());
        assert!(config.on_connect().is_some());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const ACCEPTED: [&str; 4] = ["http://", "https://", "ws://", "wss://"];

        proptest! {
            #[test]
            fn http_becomes_ws_keeping_the_rest(rest in any::<String>()) {
                let url = normalize_url(&format!("http://{}", rest)).unwrap();
                prop_assert_eq!(url, format!("ws://{}", rest));
            }

            #[test]
            fn https_becomes_wss_keeping_the_rest(rest in any::<String>()) {
                let url = normalize_url(&format!("https://{}", rest)).unwrap();
                prop_assert_eq!(url, format!("wss://{}", rest));
            }

            #[test]
            fn ws_urls_are_untouched(secure in any::<bool>(), rest in any::<String>()) {
                let raw = format!("{}://{}", if secure { "wss" } else { "ws" }, rest);
                prop_assert_eq!(normalize_url(&raw).unwrap(), raw);
            }

            #[test]
            fn other_inputs_are_rejected(raw in any::<String>()) {
                prop_assume!(!ACCEPTED.iter().any(|p| raw.starts_with(p)));
                prop_assert!(matches!(
                    normalize_url(&raw),
                    Err(ConfigError::InvalidUrl(ref got)) if got == &raw
                ));
            }

            #[test]
            fn other_schemes_are_rejected(
                scheme in "[a-zA-Z][a-zA-Z0-9+.-]{0,8}",
                rest in "[a-z0-9./:]{0,20}",
            ) {
                let raw = format!("{}://{}", scheme, rest);
                prop_assume!(!ACCEPTED.iter().any(|p| raw.starts_with(p)));
                prop_assert!(normalize_url(&raw).is_err());
            }

            #[test]
            fn endpoint_joins_with_one_separator(
                path in "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,3}/?",
            ) {
                let config = base().url(format!("http://host/{}", path)).build().unwrap();
                let connect_url = config.connect_url();
                prop_assert!(connect_url.starts_with(config.url()));
                prop_assert!(connect_url.ends_with("/register"));
                prop_assert!(!connect_url.contains("//register"));
            }
        }
    }
}
