use crate::config::Config;
use crate::error::Error;
use crate::rules::RulePayload;
use crate::upstream::{fetch_all_pages, Upstream, UpstreamResponse};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Look up the full rule behind `identifier` so it can be resubmitted.
///
/// The detail endpoint is tried first. If it answers 404, or answers with a rule that lacks
/// matchers or actions, every rule is listed and the one whose `id` or legacy `tag` equals
/// `identifier` is used instead.
///
/// Returns `Ok(None)` when a rule was found but can't be resubmitted (no matchers or no
/// actions).
///
/// # Errors
///
/// Returns [`Error::RuleNotFound`] when the detail lookup answered 404 and the list holds no
/// matching rule. Any other detail error, and any list error, is returned unchanged.
pub async fn resolve_rule_for_update<U: Upstream + ?Sized>(
    upstream: &U,
    config: &Config,
    identifier: &str,
) -> Result<Option<RulePayload>, Error> {
    let detail_missing = match upstream.get(&config.rule_path(identifier), &[]).await {
        Ok(response) => {
            let rule = response
                .body
                .get("result")
                .filter(|r| !r.is_null())
                .unwrap_or(&response.body);
            if let Some(payload) = RulePayload::from_rule(Some(rule)) {
                if payload.is_update_ready() {
                    return Ok(Some(payload));
                }
            }
            debug!("rule {identifier} detail is incomplete, scanning the rule list");
            false
        }
        Err(err) if err.upstream_status() == Some(404) => {
            debug!("rule {identifier} has no detail record, scanning the rule list");
            true
        }
        Err(err) => return Err(err),
    };

    let rules = fetch_all_pages(upstream, &config.rules_path(), &[], Some(config.page_size)).await?;
    match rules.items.iter().find(|rule| identified_by(rule, identifier)) {
        Some(rule) => Ok(RulePayload::from_rule(Some(rule)).filter(RulePayload::is_update_ready)),
        None if detail_missing => Err(Error::RuleNotFound(identifier.to_string())),
        None => Ok(None),
    }
}

fn identified_by(rule: &Value, identifier: &str) -> bool {
    ["id", "tag"]
        .iter()
        .any(|key| rule.get(*key).and_then(Value::as_str) == Some(identifier))
}

/// Whether a failed minimal update is worth retrying with the full rule. Only client errors
/// qualify, and of those not authentication or authorization failures.
fn fixable_by_resubmission(err: &Error) -> bool {
    match err.upstream_status() {
        Some(status) => (400..500).contains(&status) && status != 401 && status != 403,
        None => false,
    }
}

/// Enable or disable the rule behind `identifier`.
///
/// A flag-only update is sent first. If the provider rejects it with a client error other than
/// 401/403, the full rule is resolved with [`resolve_rule_for_update`] and sent again with
/// `enabled` overridden, addressed by the resolved rule id. No further attempts are made.
///
/// # Errors
///
/// - The minimal update's error, if it isn't fixable by resubmission.
/// - [`Error::RuleNotFound`] or a lookup error from [`resolve_rule_for_update`].
/// - [`Error::IncompleteRule`] wrapping the minimal update's error, if the resolved rule lacks
///   matchers or actions.
/// - If the full update fails too, its error when it carries a JSON body from the provider,
///   otherwise the minimal update's error.
pub async fn update_rule_enabled<U: Upstream + ?Sized>(
    upstream: &U,
    config: &Config,
    identifier: &str,
    enabled: bool,
) -> Result<UpstreamResponse, Error> {
    apply_enabled(upstream, config, identifier, enabled, None).await
}

/// Like [`update_rule_enabled`], but the rule is resolved before anything is written, so a rule
/// that doesn't exist is reported without sending any update. The resolved rule is reused if the
/// full resubmission is needed.
///
/// # Errors
///
/// As [`update_rule_enabled`], except that [`Error::RuleNotFound`] and lookup errors are
/// returned before the flag-only update is sent.
pub async fn update_existing_rule_enabled<U: Upstream + ?Sized>(
    upstream: &U,
    config: &Config,
    identifier: &str,
    enabled: bool,
) -> Result<UpstreamResponse, Error> {
    let resolved = resolve_rule_for_update(upstream, config, identifier).await?;
    apply_enabled(upstream, config, identifier, enabled, Some(resolved)).await
}

// `resolved` is `None` when the rule hasn't been looked up yet.
async fn apply_enabled<U: Upstream + ?Sized>(
    upstream: &U,
    config: &Config,
    identifier: &str,
    enabled: bool,
    resolved: Option<Option<RulePayload>>,
) -> Result<UpstreamResponse, Error> {
    let path = config.rule_path(identifier);
    let original = match upstream.put(&path, &json!({ "enabled": enabled })).await {
        Ok(response) => return Ok(response),
        Err(err) if !fixable_by_resubmission(&err) => return Err(err),
        Err(err) => err,
    };
    info!(
        "flag-only update of rule {identifier} rejected ({:?}), resubmitting full rule",
        original.upstream_status()
    );

    let resolved = match resolved {
        Some(resolved) => resolved,
        None => resolve_rule_for_update(upstream, config, identifier).await?,
    };
    let Some(payload) = resolved else {
        return Err(Error::IncompleteRule {
            source: Box::new(original),
        });
    };

    let target = match payload.id.as_deref() {
        Some(id) if id != identifier => config.rule_path(id),
        _ => path,
    };
    match upstream.put(&target, &payload.into_update_body(enabled)).await {
        Ok(response) => Ok(response),
        Err(fallback) if fallback.upstream_body().is_some() => Err(fallback),
        Err(_) => Err(original),
    }
}
