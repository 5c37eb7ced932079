use clap::Args;

use super::{ActorArgs, Session};
use crate::error::Result;
use crate::output;

#[derive(Args)]
pub(crate) struct ConfirmArgs {
    /// Id of the reservation to confirm
    reservation_id: String,

    #[command(flatten)]
    actor: ActorArgs,
}

pub(crate) fn run(session: &Session, args: &ConfirmArgs) -> Result<bool> {
    let operation = session.lifecycle()?;
    let result = operation.confirm(&args.reservation_id, &args.actor.to_actor());

    output::print_run(&result, session.format())?;
    Ok(result.success)
}
