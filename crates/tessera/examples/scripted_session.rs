//! Headless session driven by scripted terminal input.
//!
//! Opens two windows, cycles focus, moves the focused window and resizes it
//! through the same key path a terminal reader would use, then prints the
//! final frame.
//!
//! Run with: RUST_LOG=tessera=debug cargo run -p tessera --example scripted_session

use std::error::Error;
use std::thread;
use std::time::Duration;

use tessera::prelude::*;
use tracing_subscriber::EnvFilter;

const SCREEN: Size = Size::new(48, 14);

fn main() -> std::result::Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = StyleConfig::from_str("[general]\nshadow = yes\nescape_delay_ms = 10\n")?;
    let mut wm = WindowManager::new(Toolkit::init(config), SCREEN);

    for (title, text, x) in [("Notes", "buy milk\nwater plants", 1), ("Log", "12:00 started\n12:01 idle", 22)] {
        let tree = wm.tree_mut();
        let window = tree.new_window(title);
        let label = tree.new_label(text);
        tree.add_widget(window, label)?;
        tree.set_position(window, x, 1);
        wm.new_window(window)?;
    }

    wm.signals().focus_changed.connect(|window| tracing::info!(?window, "focus changed"));
    wm.signals()
        .window_moved
        .connect(|(window, point)| tracing::info!(?window, x = point.x, y = point.y, "window moved"));
    wm.signals()
        .window_resized
        .connect(|(window, size)| tracing::info!(?window, width = size.width, height = size.height, "window resized"));

    let backend = MemoryBackend::new(SCREEN);
    let mut runtime = Runtime::new(wm, backend.clone());
    let sender = runtime.sender();

    let script: &[&[u8]] = &[
        // a-n: focus the second window
        b"\x1bn",
        // a-m, down twice, enter
        b"\x1bm",
        b"\x1b[B\x1b[B",
        b"\r",
        // a-r, right three times, enter
        b"\x1br\x1b[C\x1b[C\x1b[C\r",
    ];
    let feeder = thread::spawn(move || -> Result<()> {
        for chunk in script {
            sender.send(TesseraEvent::Input(chunk.to_vec()))?;
            thread::sleep(Duration::from_millis(5));
        }
        sender.send(TesseraEvent::Quit)
    });

    runtime.run()?;
    feeder.join().map_err(|_| "input thread panicked")??;

    println!("{} frames presented", backend.frame_count());
    if let Some(frame) = backend.last_frame() {
        for line in frame.lines() {
            println!("{line}");
        }
    }
    Ok(())
}
