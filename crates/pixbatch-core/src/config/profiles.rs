//! Named batch presets.
//!
//! A handful of presets ship with pixbatch. A `[profiles.<name>]` table in
//! the config file adds a preset or replaces a built-in one of the same
//! name.

use super::{BatchSettings, Config, NamingConfig, Quality, ResizeConfig};
use crate::error::ConfigError;

/// Names of the built-in presets, in listing order.
pub const BUILTIN_PROFILES: [&str; 6] = ["web", "mobile", "thumbnail", "print", "email", "archive"];

fn preset(resize: ResizeConfig, quality: u8, suffix: &str) -> BatchSettings {
    BatchSettings {
        resize,
        quality: Quality(quality),
        naming: NamingConfig {
            suffix: suffix.to_string(),
            ..Default::default()
        },
    }
}

/// Settings of a built-in preset, if `name` is one.
pub fn builtin_profile(name: &str) -> Option<BatchSettings> {
    let settings = match name {
        "web" => preset(ResizeConfig::Width { target: 1920 }, 85, "_web"),
        "mobile" => preset(ResizeConfig::Width { target: 768 }, 75, "_mobile"),
        "thumbnail" => preset(ResizeConfig::Width { target: 300 }, 80, "_thumb"),
        "print" => preset(ResizeConfig::Width { target: 3000 }, 95, "_print"),
        "email" => preset(ResizeConfig::Width { target: 800 }, 70, "_email"),
        "archive" => preset(ResizeConfig::Scale { factor: 1.0 }, 100, "_archive"),
        _ => return None,
    };
    Some(settings)
}

impl Config {
    /// Look up a profile by name. Profiles from the config file take
    /// precedence over built-in ones.
    pub fn profile(&self, name: &str) -> Result<BatchSettings, ConfigError> {
        if let Some(settings) = self.profiles.get(name) {
            return Ok(settings.clone());
        }
        builtin_profile(name).ok_or_else(|| ConfigError::UnknownProfile {
            name: name.to_string(),
            available: self.profile_names().join(", "),
        })
    }

    /// Every selectable profile name: built-ins first, then the ones only
    /// defined in the config file.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTIN_PROFILES.iter().map(|n| n.to_string()).collect();
        names.extend(
            self.profiles
                .keys()
                .filter(|name| !BUILTIN_PROFILES.contains(&name.as_str()))
                .cloned(),
        );
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResizeBounds;

    #[test]
    fn test_builtin_profiles_pass_default_bounds() {
        let bounds = ResizeBounds::default();
        for name in BUILTIN_PROFILES {
            let settings = builtin_profile(name).unwrap();
            assert!(settings.validate(&bounds).is_ok(), "{name}");
        }
        assert!(builtin_profile("social").is_none());
    }

    #[test]
    fn test_builtin_web_profile() {
        let web = Config::default().profile("web").unwrap();
        assert_eq!(web.resize, ResizeConfig::Width { target: 1920 });
        assert_eq!(web.quality, Quality(85));
        assert_eq!(web.naming.suffix, "_web");
    }

    #[test]
    fn test_config_profile_overrides_builtin() {
        let config = Config::from_toml(
            "[profiles.web]\nquality = 60\n[profiles.web.resize]\nmode = \"width\"\ntarget = 1024\n\
             [profiles.banner]\n[profiles.banner.resize]\nmode = \"height\"\ntarget = 200\n",
        )
        .unwrap();

        let web = config.profile("web").unwrap();
        assert_eq!(web.resize, ResizeConfig::Width { target: 1024 });
        assert_eq!(web.quality, Quality(60));
        // Unset fields fall back to batch defaults, not to the built-in preset
        assert_eq!(web.naming.suffix, "_resized");

        let banner = config.profile("banner").unwrap();
        assert_eq!(banner.resize, ResizeConfig::Height { target: 200 });
        assert_eq!(config.profile_names().last().map(String::as_str), Some("banner"));
    }

    #[test]
    fn test_unknown_profile_lists_available_names() {
        let err = Config::default().profile("poster").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'poster'"));
        assert!(message.contains("web, mobile, thumbnail, print, email, archive"));
    }

    #[test]
    fn test_out_of_bounds_profile_rejected_at_load() {
        let err = Config::from_toml(
            "[profiles.huge]\n[profiles.huge.resize]\nmode = \"width\"\ntarget = 9000\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("profiles.huge: width = 9000"));
    }
}
