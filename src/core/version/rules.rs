// ─── Platform Rules ───
// Mojang allow/disallow rules attached to libraries and arguments.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsRule>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl Rule {
    pub fn allow() -> Self {
        Self {
            action: RuleAction::Allow,
            os: None,
        }
    }

    pub fn for_os(action: RuleAction, name: &str) -> Self {
        Self {
            action,
            os: Some(OsRule {
                name: Some(name.to_string()),
                ..OsRule::default()
            }),
        }
    }
}

/// Decides whether a rule list applies on one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEvaluator {
    os_name: String,
}

impl RuleEvaluator {
    /// Evaluator for the platform this binary runs on.
    pub fn current() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    /// Evaluator for a Rust platform name (`std::env::consts::OS` style).
    pub fn for_os(platform: &str) -> Self {
        Self {
            os_name: mojang_os_name(platform).to_string(),
        }
    }

    /// The Mojang OS name rules are matched against.
    pub fn os_name(&self) -> &str {
        &self.os_name
    }

    /// Rules logic:
    /// - No rules → allowed.
    /// - Start disallowed, walk rules top-to-bottom.
    /// - A rule matches when it has no OS name or its name equals ours;
    ///   each match sets the state to its action, so the last match wins.
    pub fn applies(&self, rules: &[Rule]) -> bool {
        if rules.is_empty() {
            return true;
        }

        let mut allowed = false;
        for rule in rules {
            let os_matches = match rule.os.as_ref().and_then(|os| os.name.as_deref()) {
                None => true,
                Some(name) => name == self.os_name,
            };

            if os_matches {
                allowed = rule.action == RuleAction::Allow;
            }
        }

        allowed
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::current()
    }
}

/// Translate a Rust platform name to Mojang's naming.
pub fn mojang_os_name(platform: &str) -> &str {
    match platform {
        "macos" => "osx",
        "linux" => "linux",
        "windows" => "windows",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rules_means_allowed() {
        assert!(RuleEvaluator::current().applies(&[]));
    }

    #[test]
    fn allow_only_current_os() {
        let eval = RuleEvaluator::for_os("linux");
        assert!(eval.applies(&[Rule::for_os(RuleAction::Allow, "linux")]));
        assert!(!eval.applies(&[Rule::for_os(RuleAction::Allow, "windows")]));
    }

    #[test]
    fn disallow_current_os() {
        let eval = RuleEvaluator::current();
        let os = eval.os_name().to_string();
        assert!(!eval.applies(&[Rule::for_os(RuleAction::Disallow, &os)]));
        assert!(!eval.applies(&[Rule::allow(), Rule::for_os(RuleAction::Disallow, &os)]));
    }

    #[test]
    fn last_matching_rule_wins() {
        let eval = RuleEvaluator::for_os("windows");
        let rules = [
            Rule::for_os(RuleAction::Disallow, "windows"),
            Rule::allow(),
        ];
        assert!(eval.applies(&rules));
    }

    #[test]
    fn macos_is_matched_as_osx() {
        let eval = RuleEvaluator::for_os("macos");
        assert_eq!(eval.os_name(), "osx");
        assert!(eval.applies(&[Rule::for_os(RuleAction::Allow, "osx")]));
        assert!(!eval.applies(&[Rule::for_os(RuleAction::Allow, "macos")]));
    }

    #[test]
    fn unknown_platforms_pass_through() {
        let eval = RuleEvaluator::for_os("freebsd");
        assert_eq!(eval.os_name(), "freebsd");
        assert!(eval.applies(&[Rule::allow(), Rule::for_os(RuleAction::Disallow, "linux")]));
    }

    #[test]
    fn os_constraint_without_name_matches_everywhere() {
        let rule: Rule =
            serde_json::from_str(r#"{"action":"disallow","os":{"arch":"x86"}}"#).unwrap();
        assert!(!RuleEvaluator::for_os("linux").applies(&[Rule::allow(), rule]));
    }
}
