use serde::Serialize;
use serde_json::{Map, Number, Value};

/// The subset of a routing rule the provider accepts back on a full update.
///
/// Everything else on a fetched rule (`tag`, `enabled`, provider bookkeeping) is dropped, since
/// the update endpoint rejects fields it manages itself.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct RulePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matchers: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Number>,
}

impl RulePayload {
    /// Reduce a raw rule record to its resubmittable fields.
    ///
    /// Returns `None` if there is no record, or if none of `id` (non-empty), `matchers`
    /// (array), `actions` (array), `name` (non-null) or `priority` (number) is present.
    #[must_use]
    pub fn from_rule(rule: Option<&Value>) -> Option<Self> {
        let rule = rule?.as_object()?;
        let payload = RulePayload {
            id: rule.get("id").and_then(identifier),
            matchers: rule.get("matchers").and_then(Value::as_array).cloned(),
            actions: rule.get("actions").and_then(Value::as_array).cloned(),
            name: rule.get("name").filter(|v| !v.is_null()).cloned(),
            priority: match rule.get("priority") {
                Some(Value::Number(n)) => Some(n.clone()),
                _ => None,
            },
        };
        if payload == RulePayload::default() {
            None
        } else {
            Some(payload)
        }
    }

    /// A payload can only replace a rule if it carries both matchers and actions.
    #[must_use]
    pub fn is_update_ready(&self) -> bool {
        self.matchers.is_some() && self.actions.is_some()
    }

    /// The body of a full rule update: every normalized field except `id` (which belongs in the
    /// path), with `enabled` set.
    #[must_use]
    pub fn into_update_body(self, enabled: bool) -> Value {
        let mut body = Map::new();
        if let Some(matchers) = self.matchers {
            body.insert("matchers".to_string(), Value::Array(matchers));
        }
        if let Some(actions) = self.actions {
            body.insert("actions".to_string(), Value::Array(actions));
        }
        if let Some(name) = self.name {
            body.insert("name".to_string(), name);
        }
        if let Some(priority) = self.priority {
            body.insert("priority".to_string(), Value::Number(priority));
        }
        body.insert("enabled".to_string(), Value::Bool(enabled));
        Value::Object(body)
    }
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_only_resubmittable_fields() {
        let rule = json!({
            "id": "r1",
            "tag": "legacy",
            "enabled": true,
            "name": "alias",
            "priority": 7,
            "matchers": [{ "type": "literal", "field": "to", "value": "a@example.com" }],
            "actions": [{ "type": "forward", "value": ["b@example.com"] }],
        });

        let payload = RulePayload::from_rule(Some(&rule)).unwrap();

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "id": "r1",
                "name": "alias",
                "priority": 7,
                "matchers": [{ "type": "literal", "field": "to", "value": "a@example.com" }],
                "actions": [{ "type": "forward", "value": ["b@example.com"] }],
            })
        );
        assert!(payload.is_update_ready());
    }

    #[test]
    fn missing_actions_is_never_update_ready() {
        let rule = json!({ "id": "r1", "matchers": [{ "field": "to" }] });
        let payload = RulePayload::from_rule(Some(&rule)).unwrap();
        assert!(!payload.is_update_ready());
    }

    #[test]
    fn absent_or_empty_rules_normalize_to_nothing() {
        assert_eq!(RulePayload::from_rule(None), None);
        assert_eq!(RulePayload::from_rule(Some(&json!({}))), None);
        assert_eq!(RulePayload::from_rule(Some(&json!("rule"))), None);
        assert_eq!(
            RulePayload::from_rule(Some(&json!({
                "id": "",
                "name": null,
                "priority": "1",
                "matchers": "to",
                "enabled": false,
            }))),
            None
        );
    }

    #[test]
    fn update_body_drops_id_and_sets_enabled() {
        let payload = RulePayload {
            id: Some("r1".to_string()),
            matchers: Some(vec![json!({ "field": "to" })]),
            actions: Some(vec![json!({ "type": "forward" })]),
            name: Some(json!("n")),
            priority: Some(Number::from(0)),
        };

        assert_eq!(
            payload.into_update_body(false),
            json!({
                "matchers": [{ "field": "to" }],
                "actions": [{ "type": "forward" }],
                "name": "n",
                "priority": 0,
                "enabled": false,
            })
        );
    }
}
