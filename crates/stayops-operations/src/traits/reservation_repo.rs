use stayops_core::{Property, Reservation};

use crate::Result;

pub trait ReservationRepo {
    /// Returns `Ok(None)` when no reservation has the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn find_reservation(&self, id: &str) -> Result<Option<Reservation>>;

    /// Overwrites the stored row with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or cannot be written.
    fn update_reservation(&self, reservation: &Reservation) -> Result<()>;
}

/// Read-only access to properties, used for owner and agent lookups.
pub trait PropertyRepo {
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn find_property(&self, id: &str) -> Result<Option<Property>>;
}
