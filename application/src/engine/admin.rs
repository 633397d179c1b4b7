//! Council administration: lifecycle of the council itself, weights, and
//! typed configuration.

use super::{EngineError, LifecycleEngine};
use std::collections::BTreeMap;
use tracing::info;
use votum_domain::{
    Council, CouncilId, DomainError, MAX_TITLE_LEN, Principal, PrincipalId, config::ConfigValue,
    validate_config,
};

impl LifecycleEngine {
    /// Create a council bound to a channel. Admin only.
    pub async fn create_council(
        &self,
        id: CouncilId,
        principal: &Principal,
        name: impl Into<String>,
    ) -> Result<Council, EngineError> {
        require_admin(principal)?;
        let lock = self.locks.for_council(id);
        let _section = lock.lock().await;

        if self.store.get(id).await?.is_some() {
            return Err(DomainError::CouncilExists(id).into());
        }
        let council = Council::new(id, name);
        self.store.put(&council).await?;
        info!(council = %id, name = %council.name, "council created");
        Ok(council)
    }

    /// Rename a council. Admin only.
    pub async fn rename_council(
        &self,
        id: CouncilId,
        principal: &Principal,
        name: impl Into<String>,
    ) -> Result<(), EngineError> {
        require_admin(principal)?;
        let lock = self.locks.for_council(id);
        let _section = lock.lock().await;

        let mut council = self.load(id).await?;
        council.name = name.into();
        self.store.put(&council).await?;
        Ok(())
    }

    /// Remove a council and all its state. Admin only.
    pub async fn remove_council(
        &self,
        id: CouncilId,
        principal: &Principal,
    ) -> Result<bool, EngineError> {
        require_admin(principal)?;
        let lock = self.locks.for_council(id);
        let _section = lock.lock().await;

        let removed = self.store.delete(id).await?;
        if removed {
            info!(council = %id, "council removed");
        }
        Ok(removed)
    }

    /// Set the absolute vote weight for a user or role. Admin only.
    pub async fn set_weight(
        &self,
        id: CouncilId,
        principal: &Principal,
        target: PrincipalId,
        weight: u32,
    ) -> Result<(), EngineError> {
        require_admin(principal)?;
        if weight < 1 {
            return Err(DomainError::InvalidWeight.into());
        }
        let lock = self.locks.for_council(id);
        let _section = lock.lock().await;

        let mut council = self.load(id).await?;
        council.vote_weights.insert(target, weight);
        self.store.put(&council).await?;
        info!(council = %id, %target, weight, "vote weight set");
        Ok(())
    }

    /// The council's current weight overrides, keyed by user or role id.
    pub async fn weights(
        &self,
        id: CouncilId,
    ) -> Result<BTreeMap<PrincipalId, u32>, EngineError> {
        Ok(self.load(id).await?.vote_weights)
    }

    /// Validate and set a configuration value. Admin only.
    ///
    /// Unknown keys, deprecated keys, and out-of-range values are rejected
    /// with a [`DomainError`]; nothing is coerced.
    pub async fn set_config(
        &self,
        id: CouncilId,
        principal: &Principal,
        key: &str,
        raw_value: &str,
    ) -> Result<ConfigValue, EngineError> {
        require_admin(principal)?;
        let value = validate_config(key, raw_value)?;

        let lock = self.locks.for_council(id);
        let _section = lock.lock().await;
        let mut council = self.load(id).await?;
        council.config.insert(key.to_string(), value.clone());
        self.store.put(&council).await?;
        info!(council = %id, key, %value, "config set");
        Ok(value)
    }

    /// Clear a configuration key. Admin only. Returns whether it was set.
    pub async fn remove_config(
        &self,
        id: CouncilId,
        principal: &Principal,
        key: &str,
    ) -> Result<bool, EngineError> {
        require_admin(principal)?;
        let lock = self.locks.for_council(id);
        let _section = lock.lock().await;

        let mut council = self.load(id).await?;
        let removed = council.config.remove(key).is_some();
        if removed {
            self.store.put(&council).await?;
        }
        Ok(removed)
    }

    /// Retitle the current motion; the new title must be unique.
    pub async fn set_motion_title(
        &self,
        id: CouncilId,
        title: impl Into<String>,
    ) -> Result<(), EngineError> {
        let title = title.into();
        let len = title.chars().count();
        if len > MAX_TITLE_LEN {
            return Err(DomainError::TitleTooLong { len, max: MAX_TITLE_LEN }.into());
        }

        let lock = self.locks.for_council(id);
        let _section = lock.lock().await;
        let mut council = self.load(id).await?;
        if council.current_motion.is_none() {
            return Err(DomainError::NoActiveMotion.into());
        }
        if !council.title_is_unique(&title) {
            return Err(DomainError::TitleConflict(title).into());
        }
        if let Some(motion) = council.current_motion.as_mut() {
            motion.title = title;
        }
        self.store.put(&council).await?;
        Ok(())
    }
}

fn require_admin(principal: &Principal) -> Result<(), DomainError> {
    if principal.admin {
        Ok(())
    } else {
        Err(DomainError::Unauthorized(
            "admin permissions are required".to_string(),
        ))
    }
}
