//! Stdio host for the content bridge.
//!
//! Reads JSON lines describing page events and runtime pushes from stdin and
//! writes page posts and runtime acknowledgements to stdout.
mod app;
mod logging;
mod preferences;
mod settings;
mod stdio;

pub use app::run_app;
