use sidestep::{Timer, TimerRequest};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

type Armed = Rc<RefCell<HashMap<Timer, glib::SourceId>>>;

/// GLib one-shot timeouts keyed by timer name. Arming a name that is already
/// armed cancels the previous source first.
pub struct Timers {
    armed: Armed,
    notify: Rc<dyn Fn(Timer)>,
}

impl Timers {
    pub fn new(notify: impl Fn(Timer) + 'static) -> Self {
        Self {
            armed: Rc::default(),
            notify: Rc::new(notify),
        }
    }

    pub fn apply(&mut self, request: TimerRequest) {
        match request {
            TimerRequest::Arm(timer, after) => {
                self.disarm(timer);
                let armed = self.armed.clone();
                let notify = self.notify.clone();
                let id = glib::timeout_add_local_once(after, move || {
                    // the source is gone once this runs; forget it before anyone
                    // tries to remove it
                    armed.borrow_mut().remove(&timer);
                    notify(timer);
                });
                self.armed.borrow_mut().insert(timer, id);
            }
            TimerRequest::Disarm(timer) => self.disarm(timer),
        }
    }

    fn disarm(&mut self, timer: Timer) {
        if let Some(id) = self.armed.borrow_mut().remove(&timer) {
            id.remove();
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        for (_, id) in self.armed.borrow_mut().drain() {
            id.remove();
        }
    }
}
