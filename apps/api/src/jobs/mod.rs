// Job tracking: saved postings, organizations, statuses, locations.
// Plain CRUD over Postgres. The keyword pipeline only reads job descriptions.

pub mod handlers;
pub mod queries;
pub mod validation;
