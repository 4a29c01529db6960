//! API token lookup. Tokens are only ever *read* here; storing them is up to
//! the user (config file or environment).

use derive_more::Display;
use std::env;
use thiserror::Error;
use tracing::info;
use url::Url;
use xbe_config::Config;

/// Environment variable holding an API token
pub const TOKEN_ENV_VAR: &str = "XBE_TOKEN";

/// Where a resolved token came from
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum TokenSource {
    #[display("--token flag")]
    Flag,
    #[display("$XBE_TOKEN")]
    Environment,
    #[display("config file")]
    Config,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedToken {
    pub token: String,
    pub source: TokenSource,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential is available from any source. Read-only commands treat
    /// this as "proceed unauthenticated"
    #[error(
        "No API token found for {base_url}. Pass --token, set \
        $XBE_TOKEN, or add the token to the config file"
    )]
    NotFound { base_url: Url },
}

/// Find the token for a base URL. Sources, highest precedence first:
/// - `explicit` (the `--token` flag)
/// - `$XBE_TOKEN`
/// - The config file's `tokens` table, keyed by base URL
///
/// Blank values are treated as absent at every level.
pub fn resolve_token(
    config: &Config,
    base_url: &Url,
    explicit: Option<&str>,
) -> Result<ResolvedToken, AuthError> {
    let non_blank = |token: &str| {
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_owned())
    };

    let resolved = explicit
        .and_then(non_blank)
        .map(|token| (token, TokenSource::Flag))
        .or_else(|| {
            env::var(TOKEN_ENV_VAR)
                .ok()
                .and_then(|token| non_blank(&token))
                .map(|token| (token, TokenSource::Environment))
        })
        .or_else(|| {
            config
                .token_for(base_url)
                .and_then(non_blank)
                .map(|token| (token, TokenSource::Config))
        });

    match resolved {
        Some((token, source)) => {
            info!(%base_url, %source, "Resolved API token");
            Ok(ResolvedToken { token, source })
        }
        None => Err(AuthError::NotFound {
            base_url: base_url.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use xbe_util::{assert_err, assert_matches};

    fn config() -> Config {
        Config {
            tokens: indexmap! {
                "https://api.example.com/".into() => "from-config".into(),
                "https://blank.example.com".into() => "  ".into(),
            },
            ..Config::default()
        }
    }

    #[rstest]
    #[case::flag(Some("from-flag"), Some("from-env"), "from-flag", TokenSource::Flag)]
    #[case::blank_flag(Some(" "), Some("from-env"), "from-env", TokenSource::Environment)]
    #[case::env(None, Some("from-env"), "from-env", TokenSource::Environment)]
    #[case::blank_env(None, Some(""), "from-config", TokenSource::Config)]
    #[case::config(None, None, "from-config", TokenSource::Config)]
    fn test_resolve_token(
        #[case] explicit: Option<&str>,
        #[case] env_token: Option<&str>,
        #[case] expected_token: &str,
        #[case] expected_source: TokenSource,
    ) {
        let _guard = env_lock::lock_env([(TOKEN_ENV_VAR, env_token)]);
        let resolved = resolve_token(
            &config(),
            &"https://api.example.com".parse().unwrap(),
            explicit,
        )
        .unwrap();
        assert_eq!(
            resolved,
            ResolvedToken {
                token: expected_token.into(),
                source: expected_source,
            }
        );
    }

    #[rstest]
    #[case::unknown_url("https://other.example.com")]
    #[case::blank_in_config("https://blank.example.com")]
    fn test_resolve_token_not_found(#[case] base_url: &str) {
        let _guard = env_lock::lock_env([(TOKEN_ENV_VAR, None::<&str>)]);
        let result =
            resolve_token(&config(), &base_url.parse().unwrap(), None);
        assert_matches!(&result, Err(AuthError::NotFound { .. }));
        assert_err!(result, "No API token found");
    }
}
