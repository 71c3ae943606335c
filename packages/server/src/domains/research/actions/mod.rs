//! Research actions - entry points called from the HTTP layer.

mod kickoff;

pub use kickoff::kickoff_crew;
