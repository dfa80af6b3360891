//! Error types shared by the storage, store and data-loading layers.

use thiserror::Error;

/// Failure of the underlying key-value backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
	/// The host does not provide the storage API at all.
	#[error("storage backend unavailable: {0}")]
	Unavailable(String),

	/// Reading a key failed.
	#[error("failed to read `{key}`: {message}")]
	Read { key: String, message: String },

	/// Writing a key failed (quota exceeded, storage disabled, ...).
	#[error("failed to write `{key}`: {message}")]
	Write { key: String, message: String },

	/// Removing a key failed.
	#[error("failed to remove `{key}`: {message}")]
	Remove { key: String, message: String },
}

impl StorageError {
	pub(crate) fn read(key: &str, message: impl Into<String>) -> Self {
		Self::Read {
			key: key.to_owned(),
			message: message.into(),
		}
	}

	pub(crate) fn write(key: &str, message: impl Into<String>) -> Self {
		Self::Write {
			key: key.to_owned(),
			message: message.into(),
		}
	}

	pub(crate) fn remove(key: &str, message: impl Into<String>) -> Self {
		Self::Remove {
			key: key.to_owned(),
			message: message.into(),
		}
	}
}

/// Failure of a persisted store operation.
#[derive(Debug, Error)]
pub enum StoreError {
	#[error(transparent)]
	Storage(#[from] StorageError),

	#[error("failed to serialize store record: {0}")]
	Serialize(#[from] serde_json::Error),
}

/// An input campaign document could not be parsed.
#[derive(Debug, Error)]
pub enum CampaignDataError {
	#[error("failed to parse {document} document: {source}")]
	Parse {
		document: &'static str,
		#[source]
		source: serde_json::Error,
	},
}

/// An exported layout file is malformed.
#[derive(Debug, Error)]
pub enum LayoutFileError {
	#[error("layout file is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("layout file has no positions list")]
	MissingPositions,

	#[error("layout file has an invalid position entry at index {0}")]
	InvalidPosition(usize),
}
