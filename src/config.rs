//! YAML configuration.
//!
//! Looked up in order: `--config <path>`, `./.ghpm.yml`, `$XDG_CONFIG_HOME/ghpm/config.yml`.
//! `GHPM__SECTION__KEY` environment variables override file values.

use std::{
	collections::BTreeMap,
	path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use config::{Environment, File, FileFormat};
use ghpm::{FieldAliasConfig, FieldResolver, RepoRef, TriageRule};
use serde::Deserialize;
use smart_default::SmartDefault;

pub const LOCAL_CONFIG_FILE: &str = ".ghpm.yml";
const APP_NAME: &str = "ghpm";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
	pub project: Option<ProjectConfig>,
	/// The first one doubles as the default for bare `#N` references.
	#[serde(default)]
	pub repositories: Vec<RepoRef>,
	#[serde(default)]
	pub defaults: Defaults,
	#[serde(default)]
	pub fields: FieldAliasConfig,
	#[serde(default)]
	pub triage: BTreeMap<String, TriageRule>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProjectConfig {
	pub owner: String,
	pub number: u64,
}

#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Defaults {
	/// Used when `--depth` is not given to read-only listings.
	#[default = 10]
	pub depth: usize,
	#[default = 100]
	pub page_size: u32,
}

impl AppConfig {
	/// Load from the first config file found. No file at all yields an empty config.
	pub fn load(explicit: Option<&Path>) -> Result<Self> {
		let path = locate(explicit)?;
		Self::load_from(path.as_deref(), None)
	}

	/// `env_vars` replaces the process environment; tests use it.
	pub fn load_from(path: Option<&Path>, env_vars: Option<config::Map<String, String>>) -> Result<Self> {
		let mut builder = config::Config::builder();
		if let Some(path) = path {
			tracing::debug!(path = %path.display(), "loading config");
			builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
		}
		builder = builder.add_source(Environment::with_prefix("GHPM").prefix_separator("__").separator("__").try_parsing(true).source(env_vars));

		let built = builder.build().wrap_err_with(|| match path {
			Some(p) => format!("Failed to read config at {}", p.display()),
			None => "Failed to read configuration from environment".to_string(),
		})?;
		built.try_deserialize().wrap_err("The config file is missing required fields or has the wrong shape")
	}

	pub fn project(&self) -> Result<&ProjectConfig> {
		self.project
			.as_ref()
			.ok_or_else(|| eyre!("No project configured. Add `project: {{ owner: <login>, number: <n> }}` to {LOCAL_CONFIG_FILE} or pass GHPM__PROJECT__OWNER / GHPM__PROJECT__NUMBER"))
	}

	pub fn default_repo(&self) -> Option<&RepoRef> {
		self.repositories.first()
	}

	pub fn resolver(&self) -> FieldResolver {
		FieldResolver::new(self.fields.clone())
	}
}

fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
	if let Some(path) = explicit {
		if !path.exists() {
			bail!("Config file not found: {}", path.display());
		}
		return Ok(Some(path.to_path_buf()));
	}
	let local = PathBuf::from(LOCAL_CONFIG_FILE);
	if local.exists() {
		return Ok(Some(local));
	}
	Ok(xdg::BaseDirectories::with_prefix(APP_NAME).find_config_file("config.yml"))
}

/// `GH_TOKEN`, then `GITHUB_TOKEN`.
pub fn github_token() -> Result<String> {
	["GH_TOKEN", "GITHUB_TOKEN"]
		.into_iter()
		.find_map(|var| std::env::var(var).ok().filter(|t| !t.trim().is_empty()))
		.ok_or_else(|| eyre!("No GitHub token found. Set GH_TOKEN or GITHUB_TOKEN (e.g. `export GH_TOKEN=$(gh auth token)`)"))
}
