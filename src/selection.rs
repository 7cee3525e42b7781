//! Filter rules deciding which build assets are packaged into the archive.

use regex::Regex;

/// Trait describing inclusion filters over final build asset names.
pub trait AssetInclusion {
    /// Returns `true` when the named asset should be packaged.
    fn is_included(&self, asset_name: &str) -> bool;
}

/// One include or exclude rule tested against asset names.
#[derive(Debug, Clone)]
pub enum FilterPattern {
    /// Matches the asset name exactly. A trailing `/` turns the rule into a
    /// directory form that also matches everything nested under the name.
    Name(String),
    /// Matches when the expression matches anywhere in the asset name.
    Regex(Regex),
    /// Matches when any member pattern matches. Declaration order carries no
    /// matching semantics.
    Any(Vec<FilterPattern>),
}

impl FilterPattern {
    /// Test the pattern against an asset name.
    pub fn matches(&self, asset_name: &str) -> bool {
        match self {
            Self::Name(rule) => name_matches(rule, asset_name),
            Self::Regex(pattern) => pattern.is_match(asset_name),
            Self::Any(patterns) => patterns.iter().any(|pattern| pattern.matches(asset_name)),
        }
    }
}

impl From<&str> for FilterPattern {
    fn from(rule: &str) -> Self {
        Self::Name(rule.to_string())
    }
}

impl From<String> for FilterPattern {
    fn from(rule: String) -> Self {
        Self::Name(rule)
    }
}

impl From<Regex> for FilterPattern {
    fn from(pattern: Regex) -> Self {
        Self::Regex(pattern)
    }
}

impl<P: Into<FilterPattern>> From<Vec<P>> for FilterPattern {
    fn from(patterns: Vec<P>) -> Self {
        Self::Any(patterns.into_iter().map(Into::into).collect())
    }
}

/// Selection predicate combining the optional include and exclude patterns.
///
/// An asset is selected iff it matches `include` (or `include` is unset) and
/// does not match `exclude`. Exclusion is checked first and always wins when
/// both patterns match the same name.
#[derive(Debug, Clone, Default)]
pub struct AssetSelection {
    include: Option<FilterPattern>,
    exclude: Option<FilterPattern>,
}

impl AssetSelection {
    /// Build a predicate from the configured patterns.
    pub fn new(include: Option<FilterPattern>, exclude: Option<FilterPattern>) -> Self {
        Self { include, exclude }
    }

    /// Determine whether an asset should be packaged into the archive.
    ///
    /// The name tested is always the original asset name as keyed in the host
    /// build's asset map, never the mapped or prefixed archive path.
    pub fn is_included(&self, asset_name: &str) -> bool {
        if let Some(exclude) = &self.exclude {
            if exclude.matches(asset_name) {
                return false;
            }
        }

        match &self.include {
            Some(include) => include.matches(asset_name),
            None => true,
        }
    }

    /// Returns true when no filtering rules are active.
    #[cfg(test)]
    fn is_unfiltered(&self) -> bool {
        self.include.is_none() && self.exclude.is_none()
    }
}

impl AssetInclusion for AssetSelection {
    fn is_included(&self, asset_name: &str) -> bool {
        AssetSelection::is_included(self, asset_name)
    }
}

fn name_matches(rule: &str, asset_name: &str) -> bool {
    if rule.ends_with('/') {
        scope_matches(rule.trim_end_matches('/'), asset_name)
    } else {
        asset_name == rule
    }
}

fn scope_matches(rule: &str, candidate: &str) -> bool {
    if candidate == rule {
        return true;
    }

    candidate
        .strip_prefix(rule)
        .is_some_and(|suffix| suffix.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_including_every_asset() {
        let selection = AssetSelection::default();
        assert!(selection.is_included("any/asset.js"));
        assert!(selection.is_unfiltered());
    }

    #[test]
    fn exact_names_do_not_match_substrings() {
        let selection = AssetSelection::new(Some("app.js".into()), None);

        assert!(selection.is_included("app.js"));
        assert!(!selection.is_included("app.js.map"));
        assert!(!selection.is_included("vendor/app.js"));
    }

    #[test]
    fn directory_form_matches_nested_assets() {
        let selection = AssetSelection::new(Some("static/".into()), None);

        assert!(selection.is_included("static"));
        assert!(selection.is_included("static/img/logo.png"));
        assert!(!selection.is_included("static-extra/readme.txt"));
    }

    #[test]
    fn regex_matches_anywhere_in_the_name() {
        let pattern = Regex::new(r"\.js$").unwrap();
        let selection = AssetSelection::new(Some(pattern.into()), None);

        assert!(selection.is_included("main.js"));
        assert!(selection.is_included("chunks/vendor.js"));
        assert!(!selection.is_included("main.js.map"));
    }

    #[test]
    fn sequence_matches_when_any_member_matches() {
        let pattern = FilterPattern::from(vec![
            FilterPattern::from("index.html"),
            FilterPattern::from(Regex::new(r"\.css$").unwrap()),
        ]);
        let selection = AssetSelection::new(Some(pattern), None);

        assert!(selection.is_included("index.html"));
        assert!(selection.is_included("styles/site.css"));
        assert!(!selection.is_included("main.js"));
    }

    #[test]
    fn exclude_overrides_include() {
        let include = Regex::new(r"\.js$").unwrap();
        let exclude = Regex::new(r"vendor").unwrap();
        let selection = AssetSelection::new(Some(include.into()), Some(exclude.into()));

        assert!(selection.is_included("main.js"));
        assert!(!selection.is_included("vendor/lodash.js"));
    }

    #[test]
    fn exclude_applies_without_include() {
        let selection = AssetSelection::new(None, Some("secrets.txt".into()));

        assert!(selection.is_included("main.js"));
        assert!(!selection.is_included("secrets.txt"));
    }

    #[test]
    fn empty_sequence_matches_nothing() {
        let selection = AssetSelection::new(Some(FilterPattern::Any(Vec::new())), None);
        assert!(!selection.is_included("main.js"));
    }
}
