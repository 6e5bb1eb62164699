//! Setting a project item's field, dispatched on the field's declared type.

use color_eyre::eyre::{Result, WrapErr};
use ghpm::{FieldDataType, FieldError, FieldValue, ProjectField};
use tracing::instrument;

use crate::github::{ProjectSource, ProjectWriter};

/// Translate `value` into the mutation payload for `field_name`. Pure; nothing is sent.
///
/// Field names and option names are matched exactly, case included.
pub fn resolve_field_value<'f>(fields: &'f [ProjectField], field_name: &str, value: &str) -> Result<(&'f ProjectField, FieldValue), FieldError> {
	let field = fields
		.iter()
		.find(|f| f.name == field_name)
		.ok_or_else(|| FieldError::FieldNotFound { field: field_name.to_string() })?;

	let payload = match &field.data_type {
		FieldDataType::SingleSelect => {
			let option = field.option_named(value).ok_or_else(|| FieldError::OptionNotFound {
				field: field.name.clone(),
				value: value.to_string(),
				available: field.option_names(),
			})?;
			FieldValue::SingleSelect { option_id: option.id.clone() }
		}
		FieldDataType::Text => FieldValue::Text(value.to_string()),
		FieldDataType::Number => {
			let invalid = || FieldError::InvalidNumber {
				field: field.name.clone(),
				value: value.to_string(),
			};
			let number: f64 = value.trim().parse().map_err(|_| invalid())?;
			if !number.is_finite() {
				return Err(invalid());
			}
			FieldValue::Number(number)
		}
		other => {
			return Err(FieldError::UnsupportedFieldType {
				field: field.name.clone(),
				data_type: other.clone(),
			});
		}
	};
	Ok((field, payload))
}

/// Field definitions of one project, fetched once and reused for every item of a batch.
pub struct FieldSetter<'a, C: ?Sized> {
	client: &'a C,
	project_id: String,
	fields: Vec<ProjectField>,
}

impl<'a, C: ProjectSource + ProjectWriter + ?Sized> FieldSetter<'a, C> {
	/// Fetch the project's fields. Failure here means nothing can be set, so callers treat it as fatal.
	pub async fn load(client: &'a C, project_id: &str) -> Result<Self> {
		let fields = client.fetch_project_fields(project_id).await.wrap_err("Failed to fetch project fields")?;
		tracing::debug!(project_id, n_fields = fields.len(), "loaded project fields");
		Ok(Self {
			client,
			project_id: project_id.to_string(),
			fields,
		})
	}

	pub fn field(&self, name: &str) -> Option<&ProjectField> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// Validate without sending. What a dry-run shows.
	pub fn prepare(&self, field_name: &str, value: &str) -> Result<FieldValue, FieldError> {
		resolve_field_value(&self.fields, field_name, value).map(|(_, payload)| payload)
	}

	/// Exactly one mutation on success, none on a validation error.
	#[instrument(skip(self))]
	pub async fn set(&self, item_id: &str, field_name: &str, value: &str) -> Result<()> {
		let (field, payload) = resolve_field_value(&self.fields, field_name, value)?;
		self.client
			.set_field_value(&self.project_id, item_id, &field.id, &payload)
			.await
			.wrap_err_with(|| format!("Failed to set {field_name} = {value}"))
	}
}

/// One-shot: fetch the field definitions, then set one value.
pub async fn set_field<C: ProjectSource + ProjectWriter + ?Sized>(client: &C, project_id: &str, item_id: &str, field_name: &str, value: &str) -> Result<()> {
	FieldSetter::load(client, project_id).await?.set(item_id, field_name, value).await
}
