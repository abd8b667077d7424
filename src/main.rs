// What you SEE:
// • The source image fit-centered in a resizable window, outlined by a faint border.
// • Hold Left Mouse: brush shapes in the image's own colors pile up under the cursor.
// • 1/2/3 pick Circle/Square/Letter, I inverts colors, B shows the image underneath.
// • C clears to white. S exports with the image, E exports strokes only. ESC quits.

use clap::Parser;
use impressionist::config::Args;
use impressionist::{host, Error};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    host::run(args)
}
