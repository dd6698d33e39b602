use wasm_stopwatch::*;

use super::event::Event;
use super::Document;

/// Returned by an animation-frame callback.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Drives `callback` once per frame, in the manner of `requestAnimationFrame`.
///
/// Each call receives the events gathered since the previous frame and the seconds elapsed
/// since it. Buffers are swapped after every frame. The loop ends when the document should
/// close or the callback returns [`LoopControl::Stop`]. A `fps` of 0 disables frame pacing.
pub fn run_animation_loop<D, F>(document: &mut D, fps: u32, mut callback: F)
where
    D: Document + ?Sized,
    F: FnMut(&mut D, Vec<Event>, f64) -> LoopControl,
{
    let dt_goal = if fps == 0 { 0.0 } else { 1.0 / fps as f64 };

    let mut pacing = Stopwatch::new();
    let mut frame = Stopwatch::new();
    let mut frames = 0u64;

    while !document.should_close() {
        let dt = frame.get_time();
        frame.reset();

        let events = document.poll_events();
        let control = callback(document, events, dt);
        document.swap_buffers();
        frames += 1;
        if control == LoopControl::Stop {
            break;
        }

        // Sleeping here instead of relying on the swap interval, which busy-waits on some
        // drivers.
        if dt_goal > 0.0 {
            pacing.sleep_until(dt_goal);
            pacing.add_time(-dt_goal);
        }
    }

    log::debug!("Animation loop ended after {} frames", frames);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::*;
    use std::os::raw::c_void;

    struct FakeDocument {
        closed: bool,
        swaps: u32,
        pending: Vec<Event>,
    }

    impl Document for FakeDocument {
        fn inner_size(&self) -> Vector2<u32> {
            vec2(1, 1)
        }

        fn set_title(&mut self, _title: &str) {}

        fn poll_events(&mut self) -> Vec<Event> {
            std::mem::take(&mut self.pending)
        }

        fn swap_buffers(&mut self) {
            self.swaps += 1;
        }

        fn should_close(&self) -> bool {
            self.closed
        }

        fn close(&mut self) {
            self.closed = true;
        }

        fn proc_address(&mut self, _name: &str) -> *const c_void {
            std::ptr::null()
        }

        fn time(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn stops_when_callback_asks() {
        let mut document = FakeDocument { closed: false, swaps: 0, pending: vec![Event::FocusGained] };
        let mut seen = vec![];
        run_animation_loop(&mut document, 0, |_, events, _| {
            seen.push(events);
            if seen.len() == 3 {
                LoopControl::Stop
            } else {
                LoopControl::Continue
            }
        });
        assert_eq!(document.swaps, 3);
        assert_eq!(seen[0], vec![Event::FocusGained]);
        assert!(seen[1].is_empty());
    }

    #[test]
    fn stops_when_document_closes() {
        let mut document = FakeDocument { closed: false, swaps: 0, pending: vec![] };
        run_animation_loop(&mut document, 0, |document, _, _| {
            document.close();
            LoopControl::Continue
        });
        assert_eq!(document.swaps, 1);
    }
}
