//! Read access to the rollapp registry.

use std::collections::BTreeMap;

use dymns_types::RollApp;

/// The rollapp registry as the marketplace sees it.
pub trait RollAppKeeper {
    fn rollapp(&self, rollapp_id: &str) -> Option<RollApp>;

    fn is_rollapp(&self, rollapp_id: &str) -> bool {
        self.rollapp(rollapp_id).is_some()
    }

    /// Whether `account` created `rollapp_id`. False if the rollapp is unknown.
    fn is_creator(&self, rollapp_id: &str, account: &str) -> bool {
        self.rollapp(rollapp_id)
            .is_some_and(|rollapp| rollapp.owner == account)
    }
}

/// A fixed, in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct StaticRollApps {
    rollapps: BTreeMap<String, RollApp>,
}

impl StaticRollApps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with(mut self, rollapp: RollApp) -> Self {
        self.insert(rollapp);
        self
    }

    pub fn insert(&mut self, rollapp: RollApp) {
        self.rollapps.insert(rollapp.rollapp_id.clone(), rollapp);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rollapps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rollapps.is_empty()
    }
}

impl RollAppKeeper for StaticRollApps {
    fn rollapp(&self, rollapp_id: &str) -> Option<RollApp> {
        self.rollapps.get(rollapp_id).cloned()
    }
}
