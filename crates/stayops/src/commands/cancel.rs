use clap::Args;

use super::{ActorArgs, Session};
use crate::error::Result;
use crate::output;

#[derive(Args)]
pub(crate) struct CancelArgs {
    /// Id of the reservation to cancel
    reservation_id: String,

    #[command(flatten)]
    actor: ActorArgs,

    /// Reason recorded in the reservation notes and the audit log
    #[arg(long)]
    reason: Option<String>,
}

pub(crate) fn run(session: &Session, args: &CancelArgs) -> Result<bool> {
    let operation = session.lifecycle()?;
    let result = operation.cancel(
        &args.reservation_id,
        &args.actor.to_actor(),
        args.reason.as_deref(),
    );

    output::print_run(&result, session.format())?;
    Ok(result.success)
}
