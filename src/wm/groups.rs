//! Group Rules
//!
//! Per-application options matched on class, title and window type when a
//! client is first managed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::wm::client_flags::{Layer, WindowType};

/// What a client is matched on
#[derive(Debug, Clone, Copy)]
pub struct GroupMatch<'a> {
    pub class: &'a str,
    pub title: &'a str,
    pub window_type: WindowType,
}

/// Options a group can force on its members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupOptions {
    pub layer: Option<Layer>,
    pub desktop: Option<u32>,
    pub sticky: bool,
    pub no_list: bool,
    pub no_border: bool,
    pub no_title: bool,
    pub maximized: bool,
}

/// Consulted once for every new client
pub trait GroupPolicy {
    fn options_for(&self, candidate: &GroupMatch<'_>) -> GroupOptions;
}

/// One `[[groups]]` entry from the config file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupRule {
    /// Glob on WM_CLASS (`*` matches any run of characters)
    pub class: Option<String>,
    /// Glob on the window title
    pub name: Option<String>,
    pub window_type: Option<WindowType>,

    pub layer: Option<Layer>,
    pub desktop: Option<u32>,
    pub sticky: bool,
    pub no_list: bool,
    pub no_border: bool,
    pub no_title: bool,
    pub maximized: bool,
}

impl GroupRule {
    fn matches(&self, candidate: &GroupMatch<'_>) -> bool {
        let has_pattern = self.class.is_some() || self.name.is_some() || self.window_type.is_some();
        has_pattern
            && self.class.as_deref().is_none_or(|p| glob_match(p, candidate.class))
            && self.name.as_deref().is_none_or(|p| glob_match(p, candidate.title))
            && self.window_type.is_none_or(|t| t == candidate.window_type)
    }
}

/// Group policy driven by the `[[groups]]` config entries. Every matching
/// rule applies, later rules overriding earlier values.
#[derive(Debug, Clone, Default)]
pub struct RuleGroups {
    rules: Vec<GroupRule>,
}

impl RuleGroups {
    pub fn new(rules: Vec<GroupRule>) -> Self {
        Self { rules }
    }
}

impl GroupPolicy for RuleGroups {
    fn options_for(&self, candidate: &GroupMatch<'_>) -> GroupOptions {
        let mut options = GroupOptions::default();
        for rule in self.rules.iter().filter(|r| r.matches(candidate)) {
            debug!("Group rule {:?} matches class '{}'", rule, candidate.class);
            options.layer = rule.layer.or(options.layer);
            options.desktop = rule.desktop.or(options.desktop);
            options.sticky |= rule.sticky;
            options.no_list |= rule.no_list;
            options.no_border |= rule.no_border;
            options.no_title |= rule.no_title;
            options.maximized |= rule.maximized;
        }
        options
    }
}

/// Match `text` against a pattern where `*` stands for any run of characters.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == text;
    }
    let (first, last) = (parts[0], parts[parts.len() - 1]);
    if !text.starts_with(first) || text.len() < first.len() + last.len() || !text.ends_with(last) {
        return false;
    }
    let mut rest = &text[first.len()..text.len() - last.len()];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(index) => rest = &rest[index + part.len()..],
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate<'a>(class: &'a str, title: &'a str) -> GroupMatch<'a> {
        GroupMatch {
            class,
            title,
            window_type: WindowType::Normal,
        }
    }

    #[test]
    fn test_glob() {
        assert!(glob_match("xterm", "xterm"));
        assert!(!glob_match("xterm", "uxterm"));
        assert!(glob_match("*term", "uxterm"));
        assert!(glob_match("Fire*", "Firefox"));
        assert!(glob_match("*a*b*", "xxaxxbxx"));
        assert!(!glob_match("*a*b*", "xxbxxaxx"));
        assert!(glob_match("*", ""));
        assert!(!glob_match("ab*ba", "aba"));
    }

    #[test]
    fn test_rules_merge_in_order() {
        let groups = RuleGroups::new(vec![
            GroupRule {
                class: Some("*term".into()),
                layer: Some(Layer::ABOVE),
                desktop: Some(1),
                ..GroupRule::default()
            },
            GroupRule {
                name: Some("htop".into()),
                desktop: Some(3),
                sticky: true,
                ..GroupRule::default()
            },
            // no pattern at all: never matches
            GroupRule {
                no_border: true,
                ..GroupRule::default()
            },
        ]);
        let options = groups.options_for(&candidate("xterm", "htop"));
        assert_eq!(options.layer, Some(Layer::ABOVE));
        assert_eq!(options.desktop, Some(3));
        assert!(options.sticky);
        assert!(!options.no_border);

        assert_eq!(groups.options_for(&candidate("Firefox", "x")), GroupOptions::default());
    }

    #[test]
    fn test_rule_from_toml() {
        let rule: GroupRule = toml::from_str(
            r#"
            class = "Gimp*"
            window_type = "utility"
            layer = 8
            no_list = true
            "#,
        )
        .unwrap();
        assert_eq!(rule.window_type, Some(WindowType::Utility));
        assert_eq!(rule.layer, Some(Layer::ABOVE));
        assert!(rule.no_list);
        assert!(toml::from_str::<GroupRule>("layer = 40").is_err());
    }
}
