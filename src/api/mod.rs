//! HTTP API for managing email forwarding on the routing provider.
//!
//! Every endpoint maps onto one or more provider calls. Successful provider replies are relayed
//! with their own status and body. Failed ones are relayed with the provider's status (500 when
//! the provider never answered) and the provider's JSON error document, or `{"error": "..."}`
//! when there is none. Input validation failures are answered with HTTP 400 and
//! `{"error": "..."}` without contacting the provider.
//!
//! # API Endpoints
//!
//! ## `/health` (GET)
//!
//!   Returns HTTP 200 (OK) and the plain text body `ok`.
//!
//! ## `/api/addresses` (GET)
//!
//!   Lists every destination address on the account, across all provider pages:
//!
//!   ```json
//!   { "success": true, "result": [ ... ], "result_info": { "page": 1, "count": 3, ... } }
//!   ```
//!
//!   `result_info` is omitted when the provider sent no pagination metadata.
//!
//! ## `/api/addresses` (POST)
//!
//!   Registers a destination address. Expects `{ "email": "dest@example.com" }`. A missing body
//!   is treated as `{}`.
//!
//! ## `/api/addresses/:id` (DELETE)
//!
//!   Removes a destination address.
//!
//! ## `/api/rules` (GET)
//!
//!   Lists every routing rule on the zone, in the same shape as `/api/addresses`.
//!
//! ## `/api/rules` (POST)
//!
//!   Creates a rule forwarding `localPart@DOMAIN` to `destEmail`:
//!
//!   ```json
//!   { "localPart": "alias", "destEmail": "dest@example.com", "name": "optional" }
//!   ```
//!
//!   `localPart` may only hold letters, digits, dots and hyphens. All values are trimmed.
//!
//! ## `/api/rules/:id` (DELETE)
//!
//!   Removes a routing rule.
//!
//! ## `/api/rules/:id/enable`, `/api/rules/:id/disable` (POST)
//!
//!   Toggles a rule, see
//!   [`update_existing_rule_enabled`][crate::rules::update_existing_rule_enabled]. `:id` may be
//!   a rule id or a legacy rule tag. Answers HTTP 404 and `{ "error": "Regla no encontrada" }`
//!   when no such rule exists, without sending any update.
//!
//! ## `/api/enable-routing` (POST)
//!
//!   Asks the provider to set up the zone's email routing DNS records.

mod api_error;
mod extract;
mod model;
mod routes;
pub mod server;

pub use server::{new, router};
