// handlers/public/mod.rs - Public handlers (no session required)
//
// Catalog reads and writes, photo upload, and the two endpoints that hand
// out a session: registration and login.
pub mod cooks;
pub mod photos;
pub mod recipes;
pub mod users;
