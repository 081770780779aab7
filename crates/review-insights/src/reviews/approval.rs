use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use super::domain::ReviewId;

/// Reviews approved for public display when the process starts.
pub const DEFAULT_APPROVED_IDS: [u64; 71] = [
    7454, 7455, 7460, 7461, 7464, 7467, 7469, 7473, 7479, 7480, 7485, 7490, 7491, 7492, 7493,
    7495, 7499, 7503, 7504, 7509, 7510, 7511, 7512, 7513, 7514, 7515, 7516, 7517, 7519, 7520,
    7521, 7525, 7526, 7527, 7529, 7531, 7532, 7533, 7534, 7535, 7537, 7538, 7539, 7540, 7541,
    7542, 7546, 7549, 7551, 7552, 7553, 7554, 7555, 7558, 7559, 7560, 7561, 7562, 7563, 7564,
    7568, 7569, 7571, 7573, 7574, 7576, 7578, 7579, 7580, 7581, 7582,
];

/// Curation flags keyed by review id. Unset ids read as not approved.
pub trait ApprovalStore: Send + Sync {
    fn is_approved(&self, id: ReviewId) -> Result<bool, ApprovalStoreError>;
    /// Ids currently flagged as approved, read under a single lock.
    fn approved_ids(&self) -> Result<HashSet<ReviewId>, ApprovalStoreError>;
    /// Last write wins.
    fn set_approval(&self, id: ReviewId, approved: bool) -> Result<(), ApprovalStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApprovalStoreError {
    #[error("approval store unavailable: {0}")]
    Unavailable(String),
}

/// Process-lifetime approval flags; nothing is persisted.
#[derive(Debug, Default, Clone)]
pub struct InMemoryApprovalStore {
    flags: Arc<RwLock<HashMap<ReviewId, bool>>>,
}

impl InMemoryApprovalStore {
    pub fn seeded<I>(approved: I) -> Self
    where
        I: IntoIterator<Item = ReviewId>,
    {
        let flags = approved.into_iter().map(|id| (id, true)).collect();
        Self {
            flags: Arc::new(RwLock::new(flags)),
        }
    }

    pub fn with_defaults() -> Self {
        Self::seeded(DEFAULT_APPROVED_IDS.into_iter().map(ReviewId))
    }
}

fn poisoned<E>(_: E) -> ApprovalStoreError {
    ApprovalStoreError::Unavailable("approval lock poisoned".to_string())
}

impl ApprovalStore for InMemoryApprovalStore {
    fn is_approved(&self, id: ReviewId) -> Result<bool, ApprovalStoreError> {
        let guard = self.flags.read().map_err(poisoned)?;
        Ok(guard.get(&id).copied().unwrap_or(false))
    }

    fn approved_ids(&self) -> Result<HashSet<ReviewId>, ApprovalStoreError> {
        let guard = self.flags.read().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|(_, approved)| **approved)
            .map(|(id, _)| *id)
            .collect())
    }

    fn set_approval(&self, id: ReviewId, approved: bool) -> Result<(), ApprovalStoreError> {
        let mut guard = self.flags.write().map_err(poisoned)?;
        guard.insert(id, approved);
        Ok(())
    }
}
