//! Management commands.
//!
//! Commands are plain structs with `name`, `description`, `help` and an async
//! `execute`; parsing command lines into their arguments is left to the host.

mod seed;

pub use seed::{SeedArgs, SeedCommand, SeedOptions, SeedResult};
