//! Alias ↔ rollapp links.
//!
//! Each alias points at exactly one rollapp (`alias → rollapp id` record) and
//! every rollapp keeps the reverse list of its aliases.

use dymns_escrow::BankKeeper;
use dymns_store::{keys, record};
use dymns_types::{
    event, Action, AddressCodec, Context, DymnsError, Event, Result, Storage, is_valid_alias,
};

use crate::{keeper::Keeper, rollapp::RollAppKeeper};

fn alias_event(alias: &str, rollapp_id: &str, action: Action) -> Event {
    Event::new(event::EVENT_TYPE_ALIAS)
        .attr("alias", alias)
        .attr("rollapp_id", rollapp_id)
        .attr("action", action.as_str())
}

fn check_alias(alias: &str) -> Result<()> {
    if is_valid_alias(alias) {
        Ok(())
    } else {
        Err(DymnsError::invalid(format!("invalid alias: {alias}")))
    }
}

impl<B: BankKeeper, R: RollAppKeeper, A: AddressCodec> Keeper<B, R, A> {
    fn check_rollapp_exists(&self, rollapp_id: &str, role: &str) -> Result<()> {
        if self.rollapps().is_rollapp(rollapp_id) {
            Ok(())
        } else {
            Err(DymnsError::invalid(format!("{role} RollApp does not exist: {rollapp_id}")))
        }
    }

    /// Whether `alias` is reserved in params and so cannot be traded.
    #[must_use]
    pub fn is_alias_reserved(&self, alias: &str) -> bool {
        self.params().chains.is_reserved_alias(alias)
    }

    /// The rollapp currently using `alias`, if any.
    pub fn rollapp_id_by_alias(&self, storage: &dyn Storage, alias: &str) -> Result<Option<String>> {
        check_alias(alias)?;
        record::load(storage, &keys::alias_to_rollapp(alias))
    }

    /// Link a free alias to `rollapp_id`.
    ///
    /// # Errors
    /// - ValidationFailed if the alias is malformed or the rollapp is unknown
    /// - [`DymnsError::AlreadyExists`] if another rollapp uses the alias
    pub fn set_alias_for_rollapp(&self, ctx: &mut Context<'_>, rollapp_id: &str, alias: &str) -> Result<()> {
        check_alias(alias)?;
        self.check_rollapp_exists(rollapp_id, "target")?;
        if let Some(used_by) = self.rollapp_id_by_alias(ctx.storage, alias)? {
            return Err(DymnsError::AlreadyExists {
                what: format!("alias {alias} is in use by {used_by}"),
            });
        }

        record::save(ctx.storage, &keys::alias_to_rollapp(alias), &rollapp_id)?;
        self.add_rollapp_alias_index(ctx.storage, rollapp_id, alias)?;
        ctx.emit(alias_event(alias, rollapp_id, Action::Set));
        tracing::debug!(alias, rollapp_id, "alias linked");
        Ok(())
    }

    /// Unlink `alias` from `rollapp_id`.
    ///
    /// # Errors
    /// - [`DymnsError::AliasNotFound`] if the alias is not in use
    /// - [`DymnsError::PermissionDenied`] if another rollapp uses it
    pub fn remove_alias_from_rollapp(&self, ctx: &mut Context<'_>, rollapp_id: &str, alias: &str) -> Result<()> {
        check_alias(alias)?;
        self.check_rollapp_exists(rollapp_id, "source")?;
        let Some(used_by) = self.rollapp_id_by_alias(ctx.storage, alias)? else {
            return Err(DymnsError::AliasNotFound(alias.to_string()));
        };
        if used_by != rollapp_id {
            return Err(DymnsError::denied(format!("alias {alias} is in use by {used_by}")));
        }

        ctx.storage.remove(&keys::alias_to_rollapp(alias));
        self.remove_rollapp_alias_index(ctx.storage, rollapp_id, alias)?;
        ctx.emit(alias_event(alias, rollapp_id, Action::Deleted));
        tracing::debug!(alias, rollapp_id, "alias unlinked");
        Ok(())
    }

    /// Relink `alias` from `source` to `destination`.
    pub fn move_alias_to_rollapp(
        &self,
        ctx: &mut Context<'_>,
        source: &str,
        alias: &str,
        destination: &str,
    ) -> Result<()> {
        check_alias(alias)?;
        self.check_rollapp_exists(source, "source")?;
        self.check_rollapp_exists(destination, "destination")?;
        if source == destination {
            return Err(DymnsError::invalid("destination RollApp is the same as the source"));
        }
        match self.rollapp_id_by_alias(ctx.storage, alias)? {
            None => return Err(DymnsError::AliasNotFound(alias.to_string())),
            Some(used_by) if used_by != source => {
                return Err(DymnsError::denied(format!("source RollApp mismatch: {used_by}")));
            }
            Some(_) => {}
        }

        self.remove_alias_from_rollapp(ctx, source, alias)?;
        self.set_alias_for_rollapp(ctx, destination, alias)?;
        tracing::info!(alias, source, destination, "alias moved");
        Ok(())
    }
}
