//! Repository and issue coordinates.
//!
//! Accepted issue reference forms:
//! - `https://github.com/owner/repo/issues/123` (also without scheme)
//! - `owner/repo#123`
//! - `#123` or `123`, resolved against a default repository

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::error::IssueRefError;

/// `owner/name` of a repository.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RepoRef {
	pub owner: String,
	pub name: String,
}

impl RepoRef {
	pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			owner: owner.into(),
			name: name.into(),
		}
	}
}

impl fmt::Display for RepoRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.owner, self.name)
	}
}

impl FromStr for RepoRef {
	type Err = IssueRefError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		let s = s.strip_suffix(".git").unwrap_or(s);
		let Some((owner, name)) = s.split_once('/') else {
			return Err(IssueRefError::InvalidRepo(s.to_string()));
		};
		if owner.is_empty() || name.is_empty() || name.contains('/') || owner.contains(char::is_whitespace) || name.contains(char::is_whitespace) {
			return Err(IssueRefError::InvalidRepo(s.to_string()));
		}
		Ok(Self::new(owner, name))
	}
}

// Config files spell repositories as plain `owner/name` strings.
impl Serialize for RepoRef {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for RepoRef {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

/// A single issue, addressed by repository and number.
///
/// `Display` yields `owner/repo#number`, which is also the key format of the
/// project item index.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct IssueRef {
	pub repo: RepoRef,
	pub number: u64,
}

impl IssueRef {
	pub fn new(repo: RepoRef, number: u64) -> Self {
		Self { repo, number }
	}

	/// Parse any of the accepted reference forms. Bare numbers need `default_repo`.
	pub fn parse(s: &str, default_repo: Option<&RepoRef>) -> Result<Self, IssueRefError> {
		let s = s.trim();

		if s.contains("github.com/") {
			return Self::parse_url(s);
		}

		if let Some((repo, number)) = s.split_once('#')
			&& !repo.is_empty()
		{
			let repo: RepoRef = repo.parse()?;
			return Ok(Self::new(repo, parse_number(number)?));
		}

		let number = parse_number(s.trim_start_matches('#'))?;
		match default_repo {
			Some(repo) => Ok(Self::new(repo.clone(), number)),
			None => Err(IssueRefError::MissingRepository(s.to_string())),
		}
	}

	fn parse_url(s: &str) -> Result<Self, IssueRefError> {
		let with_scheme = if s.starts_with("http://") || s.starts_with("https://") { s.to_string() } else { format!("https://{s}") };
		let url = Url::parse(&with_scheme).map_err(|_| IssueRefError::InvalidReference(s.to_string()))?;
		if url.host_str() != Some("github.com") {
			return Err(IssueRefError::InvalidReference(s.to_string()));
		}
		let segments: Vec<&str> = url.path_segments().map(|p| p.filter(|seg| !seg.is_empty()).collect()).unwrap_or_default();
		// Must be: owner/repo/issues/number
		if segments.len() < 4 || segments[2] != "issues" {
			return Err(IssueRefError::InvalidReference(s.to_string()));
		}
		Ok(Self::new(RepoRef::new(segments[0], segments[1]), parse_number(segments[3])?))
	}

	pub fn url(&self) -> String {
		format!("https://github.com/{}/{}/issues/{}", self.repo.owner, self.repo.name, self.number)
	}
}

fn parse_number(s: &str) -> Result<u64, IssueRefError> {
	s.trim().parse().map_err(|_| IssueRefError::InvalidNumber(s.to_string()))
}

impl fmt::Display for IssueRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}#{}", self.repo, self.number)
	}
}

impl FromStr for IssueRef {
	type Err = IssueRefError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s, None)
	}
}

impl Serialize for IssueRef {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for IssueRef {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}
