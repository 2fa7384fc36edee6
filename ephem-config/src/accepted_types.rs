use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};

/// Expands the comma-separated shorthand list from `accepted_file_types`
/// (e.g. `jpeg,jpg,png,webp`) into a set of full MIME type strings.
///
/// The source this was distilled from falls back to `image/<token>` for
/// any shorthand it doesn't recognize, which silently accepts typos as
/// new "types". We reject unknown shorthands at load instead: a typo in
/// config should fail startup, not quietly open a new accepted type.
pub fn expand_shorthand_list(raw: &str) -> ConfigResult<HashSet<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            expand_shorthand(token)
                .ok_or_else(|| ConfigError::UnknownFileTypeShorthand(token.to_string()))
        })
        .collect()
}

fn expand_shorthand(token: &str) -> Option<String> {
    match token {
        "jpeg" | "jpg" => Some("image/jpeg".to_string()),
        "png" => Some("image/png".to_string()),
        "gif" => Some("image/gif".to_string()),
        "webp" => Some("image/webp".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_default_list() {
        let set = expand_shorthand_list("jpeg,jpg,png,webp").unwrap();
        assert!(set.contains("image/jpeg"));
        assert!(set.contains("image/png"));
        assert!(set.contains("image/webp"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn rejects_unknown_shorthand() {
        let err = expand_shorthand_list("jpeg,tiff").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFileTypeShorthand(t) if t == "tiff"));
    }

    #[test]
    fn ignores_surrounding_whitespace_and_blank_entries() {
        let set = expand_shorthand_list(" jpeg , , png ").unwrap();
        assert_eq!(set.len(), 2);
    }
}
