//! Ownership transfer on match.

use dymns_escrow::BankKeeper;
use dymns_types::{AddressCodec, Context, DymName, Result};

use crate::{keeper::Keeper, rollapp::RollAppKeeper};

impl<B: BankKeeper, R: RollAppKeeper, A: AddressCodec> Keeper<B, R, A> {
    /// Hand `dym_name` to `new_owner`.
    ///
    /// The new owner starts clean: controller reset to the owner, configs and
    /// contact cleared. Index entries of the old state are removed before the
    /// write and entries of the new state added after it.
    pub fn transfer_dym_name_ownership(&self, ctx: &mut Context<'_>, dym_name: &DymName, new_owner: &str) -> Result<()> {
        self.codec().decode(new_owner)?;

        self.before_dym_name_owner_changed(ctx.storage, &dym_name.name)?;
        self.before_dym_name_config_changed(ctx.storage, &dym_name.name)?;

        let transferred = DymName {
            owner: new_owner.to_string(),
            controller: new_owner.to_string(),
            configs: Vec::new(),
            contact: String::new(),
            ..dym_name.clone()
        };
        self.set_dym_name(ctx, &transferred)?;

        self.after_dym_name_owner_changed(ctx.storage, &transferred.name)?;
        self.after_dym_name_config_changed(ctx.storage, &transferred.name)?;

        tracing::info!(
            name = %transferred.name,
            from = %dym_name.owner,
            to = %new_owner,
            "Dym-Name ownership transferred"
        );
        Ok(())
    }
}
