use crate::canvas::{find_canvas, CanvasSurface};
use crate::config::SkyConfig;
use crate::error::SkyError;
use crate::sky::Sky;
use log::info;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Running `requestAnimationFrame` loop. The loop and its resize listener
/// live as long as the handle: [`cancel`](Self::cancel) or dropping it (for
/// example `free()` from JS) stops both.
#[wasm_bindgen]
pub struct AnimationHandle {
    window: Window,
    running: Rc<Cell<bool>>,
    frame_id: Rc<Cell<i32>>,
    frame_slot: Rc<RefCell<Option<FrameCallback>>>,
    on_resize: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl AnimationHandle {
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn cancel(&mut self) {
        if !self.running.replace(false) {
            return;
        }
        let _ = self.window.cancel_animation_frame(self.frame_id.get());
        if let Some(cb) = self.on_resize.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        }
        // Breaks the closure's self-reference so it can be freed.
        self.frame_slot.borrow_mut().take();
        info!("sky animation stopped");
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn viewport(window: &Window) -> (f64, f64) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}

fn fit_canvas(canvas: &HtmlCanvasElement, sky: &mut Sky, window: &Window) {
    let (width, height) = viewport(window);
    canvas.set_width(width.max(0.0) as u32);
    canvas.set_height(height.max(0.0) as u32);
    sky.initialize(width, height);
}

/// Sizes `canvas_id` to the window, tracks window resizes and renders one
/// frame per display refresh until cancelled.
pub fn run(canvas_id: &str, seed: u64, config: SkyConfig) -> Result<AnimationHandle, SkyError> {
    let window = web_sys::window().ok_or(SkyError::ContextUnavailable)?;
    let canvas = find_canvas(canvas_id)?;
    let mut surface = CanvasSurface::from_canvas(&canvas)?;

    let sky = Rc::new(RefCell::new(Sky::with_config(seed, config)?));
    fit_canvas(&canvas, &mut sky.borrow_mut(), &window);

    let on_resize = {
        let sky = Rc::clone(&sky);
        let window = window.clone();
        let canvas = canvas.clone();
        Closure::<dyn FnMut()>::new(move || {
            fit_canvas(&canvas, &mut sky.borrow_mut(), &window);
        })
    };
    window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(|_| SkyError::ContextUnavailable)?;

    let running = Rc::new(Cell::new(true));
    let frame_id = Rc::new(Cell::new(0));
    let frame_slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

    {
        let running = Rc::clone(&running);
        let frame_id = Rc::clone(&frame_id);
        let slot = Rc::clone(&frame_slot);
        let window = window.clone();
        *frame_slot.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |now_ms: f64| {
            if !running.get() {
                return;
            }
            sky.borrow_mut().tick(now_ms, &mut surface);
            if let Some(cb) = slot.borrow().as_ref() {
                if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    frame_id.set(id);
                }
            }
        }));
    }

    // Built first so an early return below unregisters the resize listener.
    let handle = AnimationHandle {
        window,
        running,
        frame_id,
        frame_slot,
        on_resize: Some(on_resize),
    };
    let first = handle
        .frame_slot
        .borrow()
        .as_ref()
        .map(|cb| handle.window.request_animation_frame(cb.as_ref().unchecked_ref()));
    if let Some(id) = first {
        handle.frame_id.set(id.map_err(|_| SkyError::ContextUnavailable)?);
    }
    info!("sky animation started on #{}", canvas_id);

    Ok(handle)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_canvas(id: &str) {
        let document = web_sys::window().unwrap().document().unwrap();
        let canvas = document
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        canvas.set_id(id);
        document.body().unwrap().append_child(&canvas).unwrap();
    }

    #[wasm_bindgen_test]
    fn dropping_handle_stops_loop_and_listener() {
        mount_canvas("sky-drop");
        let handle = run("sky-drop", 3, SkyConfig::default()).expect("loop starts");
        assert!(handle.is_running());
        assert!(handle.on_resize.is_some());
        let running = Rc::clone(&handle.running);
        let frame_slot = Rc::clone(&handle.frame_slot);

        drop(handle);
        assert!(!running.get());
        assert!(frame_slot.borrow().is_none());

        // Listener was unregistered before its closure was freed.
        let event = web_sys::Event::new("resize").unwrap();
        web_sys::window().unwrap().dispatch_event(&event).unwrap();
    }

    #[wasm_bindgen_test]
    fn cancel_then_drop_is_harmless() {
        mount_canvas("sky-cancel");
        let mut handle = run("sky-cancel", 4, SkyConfig::default()).expect("loop starts");
        handle.cancel();
        assert!(!handle.is_running());
        assert!(handle.on_resize.is_none());
        drop(handle);
    }
}
