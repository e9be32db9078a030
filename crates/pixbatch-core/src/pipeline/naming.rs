//! Deterministic output file naming.

use crate::config::NamingConfig;

/// Build the output name for `original` under `config`.
///
/// Pure: identical arguments always give the identical name.
pub fn output_name(original: &str, config: &NamingConfig) -> String {
    let base = if config.keep_original {
        original.to_string()
    } else {
        match original.rsplit_once('.') {
            Some((stem, ext)) => format!("{}{}{}.{}", config.prefix, stem, config.suffix, ext),
            None => format!("{}{}{}", config.prefix, original, config.suffix),
        }
    };

    match config.output_folder_tag.as_deref() {
        Some(tag) if !tag.is_empty() => format!("{}_{}", sanitize_tag(tag), base),
        _ => base,
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_tag(tag: &str) -> String {
    tag.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naming(prefix: &str, suffix: &str) -> NamingConfig {
        NamingConfig {
            keep_original: false,
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            output_folder_tag: None,
        }
    }

    #[test]
    fn test_suffix_before_extension() {
        assert_eq!(output_name("A.jpg", &naming("", "_resized")), "A_resized.jpg");
        assert_eq!(output_name("B.png", &naming("", "_resized")), "B_resized.png");
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert_eq!(output_name("photo.webp", &naming("web_", "_2x")), "web_photo_2x.webp");
    }

    #[test]
    fn test_splits_at_last_dot() {
        assert_eq!(
            output_name("holiday.final.v2.jpeg", &naming("", "_s")),
            "holiday.final.v2_s.jpeg"
        );
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(output_name("README", &naming("p_", "_s")), "p_README_s");
    }

    #[test]
    fn test_keep_original_ignores_affixes() {
        let mut config = naming("pre_", "_suf");
        config.keep_original = true;
        assert_eq!(output_name("cat.gif", &config), "cat.gif");
    }

    #[test]
    fn test_folder_tag_is_sanitized_and_prepended() {
        let mut config = naming("", "_resized");
        config.output_folder_tag = Some("Summer 2024/ä!".to_string());
        assert_eq!(output_name("A.jpg", &config), "Summer_2024____A_resized.jpg");

        config.keep_original = true;
        config.output_folder_tag = Some("web-small_v1".to_string());
        assert_eq!(output_name("A.jpg", &config), "web-small_v1_A.jpg");
    }

    #[test]
    fn test_empty_folder_tag_is_ignored() {
        let mut config = naming("", "_r");
        config.output_folder_tag = Some(String::new());
        assert_eq!(output_name("x.png", &config), "x_r.png");
    }

    #[test]
    fn test_naming_is_pure() {
        let mut config = naming("a", "b");
        config.output_folder_tag = Some("t t".to_string());
        let first = output_name("img.jpg", &config);
        let second = output_name("img.jpg", &config);
        assert_eq!(first, second);
    }
}
