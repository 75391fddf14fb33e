//! Library side of the `roster` command: input files, state handling and
//! logging setup.

pub mod csv_roster;
pub mod logging;
pub mod workspace;
