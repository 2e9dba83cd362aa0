//! On-disk save format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tower_core::GameState;

use super::error::{RepositoryError, Result};

/// JSON envelope around a [`GameState`].
///
/// `checksum` is the hex SHA-256 of the serialized `state`, checked on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub checksum: String,
    pub state: serde_json::Value,
}

impl SaveEnvelope {
    pub const VERSION: u32 = 1;

    pub fn seal(state: &GameState) -> Result<Self> {
        let state = serde_json::to_value(state)?;
        Ok(Self {
            version: Self::VERSION,
            saved_at: Utc::now(),
            checksum: checksum(&state)?,
            state,
        })
    }

    pub fn open(self) -> Result<GameState> {
        if self.version != Self::VERSION {
            return Err(RepositoryError::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        let actual = checksum(&self.state)?;
        if actual != self.checksum {
            return Err(RepositoryError::CorruptedData(format!(
                "checksum mismatch: stored {}, computed {actual}",
                self.checksum
            )));
        }
        Ok(serde_json::from_value(self.state)?)
    }
}

fn checksum(state: &serde_json::Value) -> Result<String> {
    let bytes = serde_json::to_vec(state)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
