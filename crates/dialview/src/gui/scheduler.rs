use dial::{Scheduler, Timer};
use std::rc::Rc;
use std::time::Duration;

/// Brake timer on the glib main loop. Each firing runs `on_tick`, which is expected to
/// post a message back to the component that owns the engine.
#[derive(Clone)]
pub struct GlibScheduler {
    on_tick: Rc<dyn Fn()>,
}

impl GlibScheduler {
    pub fn new(on_tick: impl Fn() + 'static) -> Self {
        Self {
            on_tick: Rc::new(on_tick),
        }
    }
}

impl Scheduler for GlibScheduler {
    type Timer = GlibTimer;

    fn schedule_repeating(&mut self, interval: Duration) -> GlibTimer {
        let on_tick = self.on_tick.clone();
        let source = glib::timeout_add_local(interval, move || {
            on_tick();
            glib::ControlFlow::Continue
        });
        GlibTimer {
            source: Some(source),
        }
    }
}

pub struct GlibTimer {
    source: Option<glib::SourceId>,
}

impl Timer for GlibTimer {
    fn cancel(&mut self) {
        if let Some(source) = self.source.take() {
            source.remove();
        }
    }

    fn is_active(&self) -> bool {
        self.source.is_some()
    }
}

impl Drop for GlibTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
