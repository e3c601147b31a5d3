#[macro_use]
mod logging;

mod campaigns;
mod colors;
mod config;
mod files;
mod font;
mod gallery;
mod geometry;
mod gpu;
mod ledger;
mod window_app;

use std::path::Path;

use anyhow::Context;
use winit::event_loop::EventLoop;

use crate::files::{get_config, load_campaign_data};
use crate::window_app::{GalleryWindow, key_help};

const GALLERY_VERSION: &str = "0.0.1";

fn main() -> anyhow::Result<()> {
    let config = get_config();
    let data = load_campaign_data(Path::new(&config.data.campaigns_path))?;

    println!("relief-gallery v{GALLERY_VERSION}");
    println!(
        "{} campaigns, {} objectives, {} ledger entries",
        data.campaigns.len(),
        data.objectives.len(),
        data.transactions.len()
    );
    print!("{}", key_help(&data));
    log!(
        "Starting with {} campaigns from {}",
        data.campaigns.len(),
        config.data.campaigns_path
    );

    let event_loop = EventLoop::new().context("creating winit event loop")?;
    let mut app = GalleryWindow::new(config, data);
    event_loop.run_app(&mut app).context("running event loop")?;

    log!("Exited cleanly");
    Ok(())
}
