//! Client metadata sent with new sessions and activity events.

use crate::types::DeviceInfo;

/// User agent plus device description for the running client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMetadata {
    pub user_agent: String,
    pub device: DeviceInfo,
}

impl ClientMetadata {
    /// Describe the host process.
    pub fn detect() -> Self {
        let platform = format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH);
        let user_agent = format!(
            "lingo/{} ({}; {})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH
        );

        Self {
            user_agent,
            device: DeviceInfo {
                platform,
                language: detect_language(),
                cookie_enabled: false,
                on_line: true,
            },
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientMetadata {
    fn default() -> Self {
        Self::detect()
    }
}

/// Language tag from the POSIX locale, e.g. `vi_VN.UTF-8` → `vi-VN`.
fn detect_language() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.is_empty() && v != "C" && v != "POSIX")
        .map(|v| locale_to_tag(&v))
        .unwrap_or_else(|| "en-US".to_string())
}

fn locale_to_tag(locale: &str) -> String {
    let base = locale.split(['.', '@']).next().unwrap_or(locale);
    base.replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_to_tag() {
        assert_eq!(locale_to_tag("vi_VN.UTF-8"), "vi-VN");
        assert_eq!(locale_to_tag("zh_CN"), "zh-CN");
        assert_eq!(locale_to_tag("de_DE@euro"), "de-DE");
        assert_eq!(locale_to_tag("en"), "en");
    }

    #[test]
    fn test_detect_describes_host() {
        let meta = ClientMetadata::detect();
        assert!(meta.user_agent.starts_with("lingo/"));
        assert!(meta.device.platform.contains(std::env::consts::OS));
        assert!(meta.device.on_line);
        assert!(!meta.device.language.is_empty());
    }

    #[test]
    fn test_user_agent_override() {
        let meta = ClientMetadata::detect().with_user_agent("test-agent");
        assert_eq!(meta.user_agent, "test-agent");
    }
}
