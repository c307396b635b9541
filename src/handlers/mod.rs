// handlers/mod.rs - HTTP handlers grouped by resource
//
// Read routes are public; mutating routes sit behind the JWT route layer
// (see routes.rs), so handlers never re-check credentials themselves.
pub mod companies;
