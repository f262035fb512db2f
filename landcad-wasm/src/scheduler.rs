use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

/// Coalesces repaint requests into at most one paint per display frame.
///
/// Pointer drags, wheel zooms and segment edits all call [`request`]; the
/// first call in a frame schedules the callback and sets the pending flag,
/// later ones are no-ops. The flag is cleared immediately before the paint
/// runs so the paint always reads the state current at frame time.
///
/// [`request`]: RepaintScheduler::request
pub struct RepaintScheduler {
    window: Window,
    pending: Rc<Cell<bool>>,
    frame: Closure<dyn FnMut()>,
}

impl RepaintScheduler {
    pub fn new(window: Window) -> Rc<Self> {
        let pending = Rc::new(Cell::new(false));
        let flag = pending.clone();
        let frame = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            flag.set(false);
            crate::state::STATE.with(|st| {
                if let Some(rc) = st.borrow().as_ref() {
                    let s = rc.borrow();
                    crate::render::draw(&s);
                }
            });
        }));
        Rc::new(RepaintScheduler {
            window,
            pending,
            frame,
        })
    }

    pub fn request(&self) {
        if self.pending.get() {
            return;
        }
        self.pending.set(true);
        let _ = self
            .window
            .request_animation_frame(self.frame.as_ref().unchecked_ref());
    }
}
