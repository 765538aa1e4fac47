use crate::error::Error;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

lazy_static! {
    static ref LOCAL_PART_REGEX: Regex = Regex::new(r"^[A-Za-z0-9.-]+$").unwrap();
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

const EMAIL_REQUIRED: &str = "email requerido";
const RULE_FIELDS_REQUIRED: &str = "localPart y destEmail requeridos";
const INVALID_LOCAL_PART: &str = "El alias solo puede contener letras, números, puntos y guiones";
const INVALID_DEST_EMAIL: &str = "destEmail debe ser un correo válido";

fn trimmed(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

#[derive(Deserialize, Debug, Clone, Default, Eq, PartialEq)]
pub(super) struct CreateAddressRequest {
    pub email: Option<String>,
}

impl CreateAddressRequest {
    /// The provider request body, or a validation error if `email` is missing or blank.
    pub fn upstream_body(&self) -> Result<Value, Error> {
        let email = trimmed(self.email.as_ref())
            .ok_or_else(|| Error::Validation(EMAIL_REQUIRED.to_string()))?;
        Ok(json!({ "email": email }))
    }
}

#[derive(Deserialize, Debug, Clone, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateRuleRequest {
    pub local_part: Option<String>,
    pub dest_email: Option<String>,
    pub name: Option<String>,
}

/// A validated forwarding rule: `alias` forwards to `destination`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(super) struct NewRule {
    pub alias: String,
    pub destination: String,
    pub name: String,
}

impl CreateRuleRequest {
    /// Trim and check the request fields, building the alias under `domain`.
    pub fn validate(&self, domain: &str) -> Result<NewRule, Error> {
        let (Some(local_part), Some(destination)) = (
            trimmed(self.local_part.as_ref()),
            trimmed(self.dest_email.as_ref()),
        ) else {
            return Err(Error::Validation(RULE_FIELDS_REQUIRED.to_string()));
        };
        if !LOCAL_PART_REGEX.is_match(local_part) {
            return Err(Error::Validation(INVALID_LOCAL_PART.to_string()));
        }
        if !EMAIL_REGEX.is_match(destination) {
            return Err(Error::Validation(INVALID_DEST_EMAIL.to_string()));
        }

        let alias = format!("{local_part}@{domain}");
        let name = match trimmed(self.name.as_ref()) {
            Some(name) => name.to_string(),
            None => format!("{alias} -> {destination}"),
        };
        Ok(NewRule {
            alias,
            destination: destination.to_string(),
            name,
        })
    }
}

impl NewRule {
    /// A single literal match on the `to` field, forwarding to a single destination.
    pub fn upstream_body(&self) -> Value {
        json!({
            "enabled": true,
            "name": self.name,
            "matchers": [{ "type": "literal", "field": "to", "value": self.alias }],
            "actions": [{ "type": "forward", "value": [self.destination] }],
        })
    }
}

/// A whole collection, flattened from however many pages the provider served it in.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub(super) struct ListResult {
    pub success: bool,
    pub result: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_info: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_request(local_part: &str, dest_email: &str, name: Option<&str>) -> CreateRuleRequest {
        CreateRuleRequest {
            local_part: Some(local_part.to_string()),
            dest_email: Some(dest_email.to_string()),
            name: name.map(str::to_string),
        }
    }

    fn validation_message(result: Result<NewRule, Error>) -> String {
        match result {
            Err(Error::Validation(msg)) => msg,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_or_blank_fields_are_required() {
        let cases = [
            CreateRuleRequest::default(),
            rule_request("   ", "dest@example.com", None),
            rule_request("alias", "", None),
        ];
        for case in cases {
            assert_eq!(
                validation_message(case.validate("example.com")),
                RULE_FIELDS_REQUIRED
            );
        }
    }

    #[test]
    fn local_part_character_class() {
        for bad in ["alias+invalido", "a b", "ñandú", "a@b", "a_b"] {
            assert_eq!(
                validation_message(rule_request(bad, "d@example.com", None).validate("x.com")),
                INVALID_LOCAL_PART,
                "{bad}"
            );
        }
        for good in ["alias.valido", "A-1", "x"] {
            assert!(rule_request(good, "d@example.com", None)
                .validate("x.com")
                .is_ok());
        }
    }

    #[test]
    fn destination_must_look_like_an_email() {
        for bad in ["destinoinvalido", "a@b", "a b@c.com", "@c.com"] {
            assert_eq!(
                validation_message(rule_request("alias", bad, None).validate("x.com")),
                INVALID_DEST_EMAIL,
                "{bad}"
            );
        }
    }

    #[test]
    fn fields_are_trimmed_and_name_defaults() {
        let rule = rule_request("  alias.valido  ", "  dest@example.com  ", Some("   "))
            .validate("example.com")
            .unwrap();
        assert_eq!(rule.alias, "alias.valido@example.com");
        assert_eq!(rule.destination, "dest@example.com");
        assert_eq!(rule.name, "alias.valido@example.com -> dest@example.com");

        let named = rule_request("a", "d@example.com", Some("  Nombre personalizado  "))
            .validate("example.com")
            .unwrap();
        assert_eq!(named.name, "Nombre personalizado");
    }

    #[test]
    fn rule_body_shape() {
        let rule = rule_request("alias", "dest@example.com", Some("n"))
            .validate("example.com")
            .unwrap();
        assert_eq!(
            rule.upstream_body(),
            json!({
                "enabled": true,
                "name": "n",
                "matchers": [{ "type": "literal", "field": "to", "value": "alias@example.com" }],
                "actions": [{ "type": "forward", "value": ["dest@example.com"] }],
            })
        );
    }

    #[test]
    fn address_email_is_required_and_trimmed() {
        let blank = CreateAddressRequest {
            email: Some("  ".to_string()),
        };
        assert!(matches!(blank.upstream_body(), Err(Error::Validation(msg)) if msg == EMAIL_REQUIRED));
        assert!(CreateAddressRequest::default().upstream_body().is_err());

        let padded = CreateAddressRequest {
            email: Some(" a@example.com ".to_string()),
        };
        assert_eq!(
            padded.upstream_body().unwrap(),
            json!({ "email": "a@example.com" })
        );
    }
}
