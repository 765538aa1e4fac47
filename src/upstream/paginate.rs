use crate::error::Error;
use crate::upstream::Upstream;
use serde_json::{Map, Value};
use tracing::debug;

/// Every item of a paginated collection, plus a single `result_info` record describing the
/// whole set as if it had been served as one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSet {
    pub items: Vec<Value>,
    /// `None` when the provider never sent pagination metadata.
    pub result_info: Option<Map<String, Value>>,
}

/// Fetch `path` page by page until the provider reports no further pages.
///
/// Each request carries `params` plus `page` and, if given, `per_page`. The known page count
/// starts at one and is raised to the largest `total_pages` the provider reports. A reply
/// without pagination metadata ends the walk after that page, and so does an empty page after
/// the first. Page bodies whose `result` isn't an array contribute nothing.
///
/// # Errors
///
/// Any error from a page fetch is returned as-is; items from earlier pages are discarded.
pub async fn fetch_all_pages<U: Upstream + ?Sized>(
    upstream: &U,
    path: &str,
    params: &[(&str, String)],
    per_page: Option<u32>,
) -> Result<PageSet, Error> {
    let mut items = Vec::new();
    let mut page: u64 = 1;
    let mut total_pages: u64 = 1;
    let mut base_info: Option<Map<String, Value>> = None;

    loop {
        let mut query = params.to_vec();
        query.push(("page", page.to_string()));
        if let Some(per_page) = per_page {
            query.push(("per_page", per_page.to_string()));
        }

        let response = upstream.get(path, &query).await?;
        let fetched = match page_items(&response.body) {
            Some(Value::Array(page_items)) => {
                items.extend(page_items.iter().cloned());
                page_items.len()
            }
            _ => 0,
        };

        let Some(info) = page_info(&response.body) else {
            break;
        };
        if base_info.is_none() {
            base_info = Some(info.clone());
        }
        if let Some(reported) = reported_total_pages(info) {
            total_pages = total_pages.max(reported);
        }

        if page >= total_pages {
            break;
        }
        // An empty page past the first means the reported page count overshoots.
        if page > 1 && fetched == 0 {
            debug!("{path} page {page} is empty, stopping short of {total_pages} page(s)");
            break;
        }
        page += 1;
    }

    debug!("fetched {} items over {page} page(s) from {path}", items.len());
    let result_info = base_info.map(|mut info| {
        let total_count = match info.get("total_count") {
            Some(count) if !count.is_null() => count.clone(),
            _ => Value::from(items.len()),
        };
        info.insert("page".to_string(), Value::from(1));
        info.insert("count".to_string(), Value::from(items.len()));
        info.insert("total_count".to_string(), total_count);
        info.insert("total_pages".to_string(), Value::from(total_pages.max(1)));
        info
    });

    Ok(PageSet { items, result_info })
}

// The provider nests some collections one level deeper, under `result.result`.
fn page_items(body: &Value) -> Option<&Value> {
    let result = body.get("result").filter(|v| !v.is_null());
    result
        .and_then(|r| r.get("result"))
        .filter(|v| !v.is_null())
        .or(result)
}

fn page_info(body: &Value) -> Option<&Map<String, Value>> {
    body.get("result_info")
        .and_then(Value::as_object)
        .or_else(|| {
            body.get("result")
                .and_then(|r| r.get("result_info"))
                .and_then(Value::as_object)
        })
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn reported_total_pages(info: &Map<String, Value>) -> Option<u64> {
    let raw = info
        .get("total_pages")
        .filter(|v| !v.is_null())
        .or_else(|| info.get("totalPages"))?;
    let total = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if total.is_finite() && total > 0.0 {
        Some(total as u64)
    } else {
        None
    }
}
