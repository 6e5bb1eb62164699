//! Triage rules: a query selecting issues plus what to apply to each match.

use std::{collections::BTreeMap, fmt};

use serde::{
	Deserialize, Deserializer, Serialize, Serializer,
	de::{MapAccess, Visitor},
	ser::SerializeMap,
};

use crate::{error::AssignmentError, fields::parse_field_assignments};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TriageApply {
	#[serde(default)]
	pub labels: Vec<String>,
	/// Field key → alias, both resolved through the field alias config. Applied in the order written.
	#[serde(default, deserialize_with = "ordered_pairs", serialize_with = "pairs_as_map")]
	pub fields: Vec<(String, String)>,
}

impl TriageApply {
	/// Set `key`, keeping its original position when it is already present.
	pub fn set_field(&mut self, key: String, alias: String) {
		match self.fields.iter_mut().find(|(k, _)| *k == key) {
			Some(entry) => entry.1 = alias,
			None => self.fields.push((key, alias)),
		}
	}

	pub fn field(&self, key: &str) -> Option<&str> {
		self.fields.iter().find(|(k, _)| k == key).map(|(_, alias)| alias.as_str())
	}
}

fn ordered_pairs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, String)>, D::Error> {
	struct PairsVisitor;

	impl<'de> Visitor<'de> for PairsVisitor {
		type Value = TriageApply;

		fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
			f.write_str("a map of field key to alias")
		}

		fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
			let mut apply = TriageApply::default();
			while let Some((key, alias)) = map.next_entry::<String, String>()? {
				apply.set_field(key, alias);
			}
			Ok(apply)
		}
	}

	deserializer.deserialize_map(PairsVisitor).map(|apply| apply.fields)
}

fn pairs_as_map<S: Serializer>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error> {
	let mut map = serializer.serialize_map(Some(pairs.len()))?;
	for (key, alias) in pairs {
		map.serialize_entry(key, alias)?;
	}
	map.end()
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TriageRule {
	pub query: String,
	#[serde(default)]
	pub apply: TriageApply,
	/// Field keys to ask the operator about, per processed issue.
	#[serde(default)]
	pub interactive: BTreeMap<String, bool>,
}

impl TriageRule {
	/// Build a rule from `--query` and an `--apply "labels=a;b,status=backlog"` string.
	pub fn ad_hoc(query: &str, apply: &str) -> Result<Self, AssignmentError> {
		let mut rule = Self {
			query: query.to_string(),
			..Default::default()
		};
		for (key, value) in parse_field_assignments(apply)? {
			match key.as_str() {
				"labels" | "label" => rule.apply.labels.extend(value.split(';').map(str::trim).filter(|l| !l.is_empty()).map(str::to_string)),
				_ => rule.apply.set_field(key, value),
			}
		}
		Ok(rule)
	}

	pub fn interactive_fields(&self) -> impl Iterator<Item = &str> {
		self.interactive.iter().filter(|(_, on)| **on).map(|(key, _)| key.as_str())
	}
}
