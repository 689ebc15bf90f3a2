use serde_json::Value;
use tracing::{debug, warn};

use super::{kind, list, text, text_field};
use crate::models::{GeneralRuleGroup, HouseRules};

const CHECK_IN_OUT_GROUP: &str = "checking in and out";

/// Split house rules into additional, general and check-in/out buckets.
pub fn extract_house_rules(house_rules: Option<&Value>) -> HouseRules {
    let Some(section) = house_rules.filter(|v| v.is_object()) else {
        if let Some(other) = house_rules.filter(|v| !v.is_null()) {
            warn!(kind = kind(other), "house rules are not a mapping");
        }
        return HouseRules::default();
    };

    let mut rules = HouseRules {
        additional_rules: additional_rules(section.get("additional")),
        ..HouseRules::default()
    };

    for group in list(section.get("general"), "house_rules.general") {
        let (Some(title), Some(values)) = (group.get("title").and_then(text), group.get("values"))
        else {
            debug!("skipping house rule group without title or values");
            continue;
        };

        let group_rules: Vec<String> = list(Some(values), "house_rules.general.values")
            .iter()
            .filter_map(|item| text_field(item, "title"))
            .collect();

        if group_rules.is_empty() {
            continue;
        }

        if title.eq_ignore_ascii_case(CHECK_IN_OUT_GROUP) {
            rules.check_in_out = group_rules;
        } else {
            rules.general_rules.push(GeneralRuleGroup {
                category: title,
                rules: group_rules,
            });
        }
    }

    rules
}

/// One rule per non-empty line; a block without usable lines becomes a
/// single rule when it has any text at all.
fn additional_rules(raw: Option<&Value>) -> Vec<String> {
    let Some(block) = raw.and_then(text) else {
        return Vec::new();
    };

    let lines: Vec<String> = block
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() && !block.is_empty() {
        vec![block]
    } else {
        lines
    }
}
