//! Opens a window and cycles the clear color until it's closed. F2 saves a screenshot.

use native_webgl::platform::{run_animation_loop, Event, LoopControl};
use native_webgl::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut options = InitOptions::default();
    options.window.title = "clear_screen".to_owned();
    options.window.debug_context = true;

    let mut exports = init(options)?;
    let webgl = &exports.webgl;
    log::info!("{} extensions supported", webgl.get_supported_extensions().len());

    let mut t = 0.0f32;
    run_animation_loop(&mut exports.document, 60, |document, events, dt| {
        let size = document.inner_size();
        for event in events {
            match event {
                Event::KeyDown(key) if key.code == "Escape" => return LoopControl::Stop,
                Event::KeyDown(key) if key.code == "F2" => {
                    if let Err(err) = save_screenshot(webgl, size, None) {
                        log::error!("Screenshot failed: {}", err);
                    }
                }
                _ => (),
            }
        }

        t += dt as f32;
        webgl.viewport(0, 0, size.x as i32, size.y as i32);
        webgl.clear_color(t.sin() * 0.5 + 0.5, 0.2, 0.3, 1.0);
        webgl.clear(glow::COLOR_BUFFER_BIT);
        if let Err(err) = webgl.check_for_errors() {
            log::error!("{}", err);
        }
        LoopControl::Continue
    });
    Ok(())
}
