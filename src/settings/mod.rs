//! Reader for the `~/.env` settings shared with the bot.
//!
//! Only the tunnel keys are recognized. A missing or unreadable file yields
//! defaults; nothing here can abort generation.

use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

/// Keys this reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    TunnelMode,
    CloudflareToken,
}

impl SettingKey {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "TUNNEL_MODE" => Some(Self::TunnelMode),
            "CLOUDFLARE_TOKEN" => Some(Self::CloudflareToken),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TunnelMode {
    /// Ephemeral trycloudflare.com endpoint, no credential
    #[default]
    Quick,
    /// Named tunnel authenticated by a token
    Token,
}

impl TunnelMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "quick" => Some(Self::Quick),
            "token" => Some(Self::Token),
            _ => None,
        }
    }
}

impl fmt::Display for TunnelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quick => write!(f, "quick"),
            Self::Token => write!(f, "token"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TunnelSettings {
    pub mode: TunnelMode,
    pub token: String,
}

impl TunnelSettings {
    /// Token mode only counts when a token is actually present.
    pub fn effective_mode(&self) -> TunnelMode {
        match self.mode {
            TunnelMode::Token if !self.token.is_empty() => TunnelMode::Token,
            _ => TunnelMode::Quick,
        }
    }
}

/// Parse settings content. The last occurrence of a key wins.
pub fn parse_settings(content: &str) -> TunnelSettings {
    let mut settings = TunnelSettings::default();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim_start();
        if line.starts_with('#') {
            continue;
        }
        let Some((key, raw)) = line.split_once('=') else {
            continue;
        };
        let Some(key) = SettingKey::from_name(key.trim_end()) else {
            continue;
        };

        let value = strip_matching_quotes(raw.trim());
        match key {
            SettingKey::TunnelMode => match TunnelMode::parse(value) {
                Some(mode) => settings.mode = mode,
                None => {
                    warn!(line = lineno + 1, value, "Unknown TUNNEL_MODE, using quick");
                    settings.mode = TunnelMode::Quick;
                }
            },
            SettingKey::CloudflareToken => settings.token = value.to_string(),
        }
    }

    settings
}

/// Remove one layer of matching single or double quotes.
fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Read and parse the settings file, falling back to defaults on any failure.
pub async fn read_settings(path: &Path) -> TunnelSettings {
    let settings = match tokio::fs::read_to_string(path).await {
        Ok(content) => parse_settings(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No settings file, using defaults");
            TunnelSettings::default()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read settings, using defaults");
            TunnelSettings::default()
        }
    };

    match settings.effective_mode() {
        TunnelMode::Token => {
            info!(token_len = settings.token.len(), "Tunnel token mode")
        }
        TunnelMode::Quick => {
            if settings.mode == TunnelMode::Token {
                warn!("TUNNEL_MODE=token but CLOUDFLARE_TOKEN is empty, using quick mode");
            }
            info!("Tunnel quick mode")
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_defaults() {
        let settings = parse_settings("");
        assert_eq!(settings, TunnelSettings::default());
        assert_eq!(settings.effective_mode(), TunnelMode::Quick);
    }

    #[test]
    fn test_quoted_token() {
        let settings = parse_settings("TUNNEL_MODE=token\nCLOUDFLARE_TOKEN='abc123'\n");
        assert_eq!(settings.mode, TunnelMode::Token);
        assert_eq!(settings.token, "abc123");
        assert_eq!(settings.effective_mode(), TunnelMode::Token);
    }

    #[test]
    fn test_double_quotes_and_whitespace() {
        let settings = parse_settings("CLOUDFLARE_TOKEN =   \"ey J\"  \nTUNNEL_MODE=\"token\"");
        assert_eq!(settings.token, "ey J");
        assert_eq!(settings.mode, TunnelMode::Token);
    }

    #[test]
    fn test_mismatched_quotes_kept() {
        let settings = parse_settings("CLOUDFLARE_TOKEN=\"abc'");
        assert_eq!(settings.token, "\"abc'");
    }

    #[test]
    fn test_token_mode_without_token_falls_back() {
        let settings = parse_settings("TUNNEL_MODE=token\nCLOUDFLARE_TOKEN=\n");
        assert_eq!(settings.mode, TunnelMode::Token);
        assert_eq!(settings.effective_mode(), TunnelMode::Quick);

        let settings = parse_settings("TUNNEL_MODE=token\n");
        assert_eq!(settings.effective_mode(), TunnelMode::Quick);
    }

    #[test]
    fn test_unknown_mode_is_quick() {
        let settings = parse_settings("TUNNEL_MODE=named\nCLOUDFLARE_TOKEN=abc\n");
        assert_eq!(settings.mode, TunnelMode::Quick);
        assert_eq!(settings.effective_mode(), TunnelMode::Quick);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let settings = parse_settings("CLOUDFLARE_TOKEN=first\nCLOUDFLARE_TOKEN=second\n");
        assert_eq!(settings.token, "second");
    }

    #[test]
    fn test_unrecognized_and_comment_lines_ignored() {
        let settings = parse_settings(
            "# CLOUDFLARE_TOKEN=commented\nBOT_TOKEN=123:abc\nTUNNEL_MODE_X=token\nnoise\n",
        );
        assert_eq!(settings, TunnelSettings::default());
    }

    #[test]
    fn test_value_may_contain_equals() {
        let settings = parse_settings("CLOUDFLARE_TOKEN=eyJh==\n");
        assert_eq!(settings.token, "eyJh==");
    }

    #[tokio::test]
    async fn test_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = read_settings(&dir.path().join(".env")).await;
        assert_eq!(settings, TunnelSettings::default());
    }

    #[tokio::test]
    async fn test_unreadable_path_defaults() {
        // A directory cannot be read as a file.
        let dir = tempfile::tempdir().unwrap();
        let settings = read_settings(dir.path()).await;
        assert_eq!(settings, TunnelSettings::default());
    }

    #[tokio::test]
    async fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "TUNNEL_MODE=token\nCLOUDFLARE_TOKEN=\"tok\"\n").unwrap();
        let settings = read_settings(&path).await;
        assert_eq!(settings.effective_mode(), TunnelMode::Token);
        assert_eq!(settings.token, "tok");
    }
}
