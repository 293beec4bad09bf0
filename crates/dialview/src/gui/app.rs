use crate::config::{self, CellLabel, Config, build_engine};
use crate::events::AppEvent;
use crate::gui::theme::ThemeColors;
use crate::gui::{Engine, GlibScheduler, Motion, SPIN_STEP, WINDOW_SIZE, view};
use dial::{Point, Size};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub engine: Rc<RefCell<Engine>>,
    pub motion: Rc<RefCell<Motion>>,
    pub scheduler: GlibScheduler,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    TouchBegan(Point),
    TouchMoved(Point),
    TouchEnded,
    Resize(Size),
    BrakeTick,
    ScrollTo(usize),
    AddCell(CellLabel),
    Spin(f64),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ScrollTo(i) => AppMsg::ScrollTo(i),
            AppEvent::AddCell(label) => AppMsg::AddCell(label),
            AppEvent::Spin(v) => AppMsg::Spin(v),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    /// Points the renderer at the current engine: snaps to its layout, then follows
    /// every relayout with the transition the engine asks for.
    fn watch_layout(&self) {
        let mut engine = self.engine.borrow_mut();
        self.motion
            .borrow_mut()
            .retarget(&engine.layout(), glib::monotonic_time());

        let area = self.drawing_area.clone();
        let motion = self.motion.clone();
        engine.subscribe(move |layout| {
            motion.borrow_mut().retarget(layout, glib::monotonic_time());
            area.queue_draw();
        });
    }

    fn reload_config(&mut self) {
        let config = match config::load_config() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };

        let (bounds, offset) = {
            let engine = self.engine.borrow();
            (engine.bounds(), engine.rotation_offset())
        };

        match build_engine(&config, self.scheduler.clone(), bounds, Some(offset)) {
            Ok(engine) => {
                *self.engine.borrow_mut() = engine;
                self.watch_layout();
                self.drawing_area.queue_draw();
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Failed to apply reloaded config: {}", e),
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Dial"),
            set_default_width: WINDOW_SIZE,
            set_default_height: WINDOW_SIZE,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::Left => sender.input(AppMsg::Spin(SPIN_STEP)),
                        gtk::gdk::Key::Right => sender.input(AppMsg::Spin(-SPIN_STEP)),
                        _ => return glib::Propagation::Proceed,
                    }
                    glib::Propagation::Stop
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(Size::new(width as f64, height as f64)));
                },

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::TouchBegan(Point::new(x, y)));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::TouchMoved(Point::new(x + dx, y + dy)));
                        }
                    },
                    connect_drag_end[sender] => move |_, _, _| {
                        sender.input(AppMsg::TouchEnded);
                    },
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        let tick_sender = sender.input_sender().clone();
        let scheduler = GlibScheduler::new(move || tick_sender.emit(AppMsg::BrakeTick));

        let engine = build_engine(&config, scheduler.clone(), Size::default(), None)
            .or_else(|e| {
                log::error!("Invalid dial configuration, using defaults: {}", e);
                build_engine(&Config::default(), scheduler.clone(), Size::default(), None)
            })
            .expect("built-in configuration is valid");

        let model = AppModel {
            engine: Rc::new(RefCell::new(engine)),
            motion: Rc::new(RefCell::new(Motion::new())),
            scheduler,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.watch_layout();

        let motion_tick = model.motion.clone();
        widgets
            .drawing_area
            .add_tick_callback(move |area, clock| {
                if motion_tick.borrow_mut().advance(clock.frame_time()) {
                    area.queue_draw();
                }
                glib::ControlFlow::Continue
            });

        let engine_draw = model.engine.clone();
        let motion_draw = model.motion.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                #[allow(deprecated)]
                let colors = ThemeColors::from_context(&drawing_area.style_context());
                let drawn = view::draw(cr, &engine_draw.borrow(), &motion_draw.borrow(), &colors);
                if let Err(e) = drawn {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::TouchBegan(point) => self.engine.borrow_mut().on_touch_began(point),
            AppMsg::TouchMoved(point) => self.engine.borrow_mut().on_touch_moved(point),
            AppMsg::TouchEnded => self.engine.borrow_mut().on_touch_ended(),
            AppMsg::Resize(size) => self.engine.borrow_mut().set_bounds(size),
            AppMsg::BrakeTick => {
                self.engine.borrow_mut().brake_tick();
            }
            AppMsg::Spin(velocity) => self.engine.borrow_mut().fling(velocity),
            AppMsg::ScrollTo(index) => {
                if let Err(e) = self.engine.borrow_mut().scroll_to(index) {
                    log::warn!("Cannot scroll to cell {}: {}", index, e);
                }
            }
            AppMsg::AddCell(label) => {
                let index = self.engine.borrow_mut().add_cell(label.clone());
                log::info!("Added cell {} '{}'", index, label);
            }
            AppMsg::ConfigReload => self.reload_config(),
        }
    }
}
