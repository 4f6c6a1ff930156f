//! Dym-Name records and the hooks that keep their reverse indices in step.
//!
//! Changing a Dym-Name's owner or configuration is always bracketed by the
//! matching hooks:
//!
//! ```text
//! before_*_changed   remove index entries derived from the stored record
//! set_dym_name       write the new record
//! after_*_changed    add index entries derived from the new record
//! ```

use dymns_escrow::BankKeeper;
use dymns_store::{keys, record, Namespace};
use dymns_types::{AddressCodec, Context, DymName, DymnsError, Result, Storage, is_valid_dym_name};

use crate::{keeper::Keeper, rollapp::RollAppKeeper};

fn name_key(name: &str) -> Result<Vec<u8>> {
    if !is_valid_dym_name(name) {
        return Err(DymnsError::InvalidAssetId {
            asset_type: dymns_types::AssetType::DymName,
            asset_id: name.to_string(),
        });
    }
    Ok(keys::dym_name(name))
}

impl<B: BankKeeper, R: RollAppKeeper, A: AddressCodec> Keeper<B, R, A> {
    /// Validate and write `dym_name`. Indices are not touched.
    pub fn set_dym_name(&self, ctx: &mut Context<'_>, dym_name: &DymName) -> Result<()> {
        dym_name.validate(self.codec())?;
        record::save(ctx.storage, &keys::dym_name(&dym_name.name), dym_name)?;
        ctx.emit(dym_name.event());
        Ok(())
    }

    pub fn get_dym_name(&self, storage: &dyn Storage, name: &str) -> Result<Option<DymName>> {
        record::load(storage, &name_key(name)?)
    }

    /// Like [`Self::get_dym_name`], but an expired Dym-Name reads as absent.
    pub fn get_dym_name_with_expiration_check(
        &self,
        storage: &dyn Storage,
        name: &str,
        now_unix: i64,
    ) -> Result<Option<DymName>> {
        Ok(self
            .get_dym_name(storage, name)?
            .filter(|dym_name| !dym_name.is_expired_at(now_unix)))
    }

    /// Delete the record. Indices are not touched; run the `before_*` hooks
    /// first.
    pub fn delete_dym_name(&self, ctx: &mut Context<'_>, name: &str) -> Result<()> {
        ctx.storage.remove(&name_key(name)?);
        Ok(())
    }

    pub fn all_dym_names(&self, storage: &dyn Storage) -> Result<Vec<DymName>> {
        record::load_all(storage, &Namespace::DymName.prefix())
    }

    /// Write a new Dym-Name and index it.
    ///
    /// # Errors
    /// [`DymnsError::AlreadyExists`] if a record with this name exists,
    /// expired or not.
    pub fn register_dym_name(&self, ctx: &mut Context<'_>, dym_name: &DymName) -> Result<()> {
        if self.get_dym_name(ctx.storage, &dym_name.name)?.is_some() {
            return Err(DymnsError::AlreadyExists {
                what: format!("Dym-Name: {}", dym_name.name),
            });
        }
        self.set_dym_name(ctx, dym_name)?;
        self.after_dym_name_owner_changed(ctx.storage, &dym_name.name)?;
        self.after_dym_name_config_changed(ctx.storage, &dym_name.name)?;
        tracing::info!(name = %dym_name.name, owner = %dym_name.owner, "Dym-Name registered");
        Ok(())
    }

    /// Drop the owner index entry of the stored record. No-op if absent.
    pub fn before_dym_name_owner_changed(&self, storage: &mut dyn Storage, name: &str) -> Result<()> {
        let Some(dym_name) = self.get_dym_name(storage, name)? else {
            return Ok(());
        };
        self.remove_owner_index(storage, &dym_name.owner, name)
    }

    /// Index the stored record under its owner.
    ///
    /// # Errors
    /// [`DymnsError::DymNameNotFound`] if the record is absent.
    pub fn after_dym_name_owner_changed(&self, storage: &mut dyn Storage, name: &str) -> Result<()> {
        let dym_name = self
            .get_dym_name(storage, name)?
            .ok_or_else(|| DymnsError::DymNameNotFound(name.to_string()))?;
        self.add_owner_index(storage, &dym_name.owner, name)
    }

    /// Drop configured/fallback address entries of the stored record. No-op
    /// if absent.
    pub fn before_dym_name_config_changed(&self, storage: &mut dyn Storage, name: &str) -> Result<()> {
        let Some(dym_name) = self.get_dym_name(storage, name)? else {
            return Ok(());
        };
        let (configured, fallback) = dym_name.addresses_for_reverse_mapping(self.codec())?;
        for address in &configured {
            self.remove_configured_address_index(storage, address, name)?;
        }
        for address in &fallback {
            self.remove_fallback_address_index(storage, address, name)?;
        }
        Ok(())
    }

    /// Index the stored record under its configured and fallback addresses.
    ///
    /// # Errors
    /// [`DymnsError::DymNameNotFound`] if the record is absent.
    pub fn after_dym_name_config_changed(&self, storage: &mut dyn Storage, name: &str) -> Result<()> {
        let dym_name = self
            .get_dym_name(storage, name)?
            .ok_or_else(|| DymnsError::DymNameNotFound(name.to_string()))?;
        let (configured, fallback) = dym_name.addresses_for_reverse_mapping(self.codec())?;
        for address in &configured {
            self.add_configured_address_index(storage, address, name)?;
        }
        for address in &fallback {
            self.add_fallback_address_index(storage, address, name)?;
        }
        Ok(())
    }
}
