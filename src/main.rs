//! # Voxel Render Core Entry Point
//!
//! Runs the headless renderer through the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- config.json
//! ```

fn main() {
    if let Err(error) = voxel_render_core::run() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}
