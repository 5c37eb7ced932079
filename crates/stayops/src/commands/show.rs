use clap::Args;
use stayops_operations::operations::ShowOperation;

use super::Session;
use crate::error::Result;
use crate::output;

#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Id of the reservation to show
    reservation_id: String,
}

pub(crate) fn run(session: &Session, args: &ShowArgs) -> Result<bool> {
    let operation = ShowOperation::new(session.open_store()?);
    let overview = operation.execute(&args.reservation_id)?;

    output::print_overview(&overview, session.format())?;
    Ok(true)
}
