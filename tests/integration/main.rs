//! End-to-end tests wiring the decision engine, the storage wrapper,
//! the DAV interceptor, and the admin API together over an in-memory
//! store and cache.

mod helpers;

mod api_test;
mod dav_test;
mod protection_test;
