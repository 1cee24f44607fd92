//! Domain layer - contracts between the session store and its collaborators

pub mod abi;
pub mod example;
pub mod location;
