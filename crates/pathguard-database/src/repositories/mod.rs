//! Repository implementations over PostgreSQL.

pub mod protection;
