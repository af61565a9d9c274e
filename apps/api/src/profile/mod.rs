// Student profiles: registration, dashboard view, completion tracking.
// The store trait is also the collaborator the intake pipeline writes scores through.

pub mod completion;
pub mod handlers;
pub mod store;

pub use store::{PgProfileStore, ProfileStore};
