//! Field alias resolution.
//!
//! Users configure short keys and aliases (`priority: p1`), the host wants
//! canonical field names and option names (`Priority: P1`). Translation is
//! best-effort: anything unmapped passes through verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AssignmentError;

/// Canonical field name plus alias → actual value pairs for one configured key.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldAlias {
	pub field: String,
	#[serde(default)]
	pub values: BTreeMap<String, String>,
}

/// Configured aliases, keyed by the short field key (`status`, `priority`, ...).
pub type FieldAliasConfig = BTreeMap<String, FieldAlias>;

#[derive(Clone, Debug, Default)]
pub struct FieldResolver {
	aliases: FieldAliasConfig,
}

impl FieldResolver {
	pub fn new(aliases: FieldAliasConfig) -> Self {
		Self { aliases }
	}

	/// Translate `alias` for `field_key`. Never fails; unknown keys or aliases come back unchanged.
	pub fn resolve_value(&self, field_key: &str, alias: &str) -> String {
		self.aliases
			.get(field_key)
			.and_then(|a| a.values.get(alias))
			.cloned()
			.unwrap_or_else(|| alias.to_string())
	}

	/// Canonical field name for `field_key`, or `field_key` itself when unmapped.
	pub fn resolve_field_name(&self, field_key: &str) -> String {
		self.aliases.get(field_key).map(|a| a.field.clone()).unwrap_or_else(|| field_key.to_string())
	}

	/// Both halves at once: `(field name, value)`.
	pub fn resolve(&self, field_key: &str, alias: &str) -> (String, String) {
		(self.resolve_field_name(field_key), self.resolve_value(field_key, alias))
	}

	pub fn aliases(&self) -> &FieldAliasConfig {
		&self.aliases
	}
}

/// Parse `key=value,key=value`. Order is preserved; blank segments are skipped.
pub fn parse_field_assignments(s: &str) -> Result<Vec<(String, String)>, AssignmentError> {
	let mut out = Vec::new();
	for segment in s.split(',') {
		let segment = segment.trim();
		if segment.is_empty() {
			continue;
		}
		let Some((key, value)) = segment.split_once('=') else {
			return Err(AssignmentError::Malformed(segment.to_string()));
		};
		let key = key.trim();
		if key.is_empty() {
			return Err(AssignmentError::EmptyKey(segment.to_string()));
		}
		out.push((key.to_string(), value.trim().to_string()));
	}
	Ok(out)
}
