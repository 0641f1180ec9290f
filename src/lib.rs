// Library root
// -----------
// This crate exposes a small library surface for the demo CLI. The binary
// (`main.rs`) assembles a literal configuration and runs the demo flow.
//
// Module responsibilities:
// - `config`: explicit configuration struct plus the demo transfer plan.
// - `auth`: access-token resolution, including the one-time interactive
//   authorisation flow.
// - `api`: the storage client contract and the blocking HTTP
//   implementation that talks to the provider.
// - `demo`: the linear four-step flow (account, listing, upload,
//   download) with step-local error reporting.
//
// Keeping this separation makes it easier to test the flow against an
// in-memory client or to grow the demo into a real CLI later.
pub mod api;
pub mod auth;
pub mod config;
pub mod demo;
