// Job postings: create, list, fetch and status changes.

pub mod handlers;
pub mod store;
