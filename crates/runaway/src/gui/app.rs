use crate::config::{self, Config, WindowMode};
use crate::events::AppEvent;
use crate::gui::scene::{self, Scene};
use crate::gui::theme::{self, TILTED_CLASS, ThemeColors, TiltStyle};
use crate::gui::timers::Timers;
use crate::gui::window::{self, CARD_CLASS};
use gdk_pixbuf::prelude::*;
use gdk_pixbuf::{InterpType, Pixbuf, PixbufAnimation};
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use rand::rngs::StdRng;
use relm4::prelude::*;
use sidestep::celebration::{self, CelebrationSequencer, ClickTarget, Stage};
use sidestep::evasion::{self, EvasionController};
use sidestep::Timer;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Instant, SystemTime};

const PICTURE_SIZE: i32 = 320;

pub struct AppModel {
    pub config: Config,
    pub config_path: PathBuf,
    pub evasion: EvasionController,
    pub celebration: CelebrationSequencer,
    pub scene: Rc<RefCell<Scene>>,
    pub timers: Timers,
    pub rng: StdRng,
    pub tilt: TiltStyle,
    pub root: gtk::ApplicationWindow,
    pub playfield: gtk::Overlay,
    pub button_row: gtk::Box,
    pub yes_button: gtk::Button,
    pub no_button: gtk::Button,
    /// Holds the "no" button's place in the row while it is away.
    pub no_slot: gtk::Box,
    pub primary_dialog: gtk::Box,
    pub secondary_dialog: gtk::Box,
    pub picture: gtk::Picture,
    picture_tick: Option<gtk::TickCallbackId>,
}

#[derive(Debug)]
pub enum AppMsg {
    /// Pointer entered, clicked, or touched the "no" button.
    Evade,
    Affirm,
    /// Press inside a dialog, in dialog coordinates.
    DialogPress(f64, f64),
    Close,
    Escape,
    Resize,
    TimerFired(Timer),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Config,
        PathBuf,
        StdRng,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            #[watch]
            set_title: Some(model.config.window.title.as_str()),
            set_default_size: (960, 640),
            add_css_class: "runaway-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gdk::Key::Escape {
                        sender.input(AppMsg::Escape);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            gtk::Overlay {
                #[name = "playfield"]
                #[wrap(Some)]
                set_child = &gtk::Overlay {
                    #[name = "ambient_area"]
                    #[wrap(Some)]
                    set_child = &gtk::DrawingArea {
                        set_hexpand: true,
                        set_vexpand: true,
                        add_css_class: "runaway-drawing-area",
                        connect_resize[sender] => move |_, _, _| {
                            sender.input(AppMsg::Resize);
                        },
                    },

                    add_overlay = &gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,
                        set_halign: gtk::Align::Center,
                        set_valign: gtk::Align::Center,
                        set_spacing: 32,

                        gtk::Label {
                            add_css_class: "runaway-question",
                            set_wrap: true,
                            set_justify: gtk::Justification::Center,
                            #[watch]
                            set_label: &model.config.text.question,
                        },

                        #[name = "button_row"]
                        gtk::Box {
                            set_orientation: gtk::Orientation::Horizontal,
                            set_halign: gtk::Align::Center,
                            set_spacing: 24,

                            #[name = "yes_button"]
                            gtk::Button {
                                set_css_classes: &["runaway-yes", "suggested-action"],
                                #[watch]
                                set_label: &model.config.text.yes,
                                connect_clicked => AppMsg::Affirm,
                            },

                            #[name = "no_button"]
                            gtk::Button {
                                add_css_class: "runaway-no",
                                #[watch]
                                set_label: &model.config.text.no,

                                add_controller = gtk::EventControllerMotion {
                                    connect_enter[sender] => move |_, _, _| {
                                        sender.input(AppMsg::Evade);
                                    }
                                },

                                add_controller = gtk::GestureClick {
                                    set_button: 0, // mouse buttons and touch
                                    connect_pressed[sender] => move |gesture, _, _, _| {
                                        // keep the button from ever activating
                                        gesture.set_state(gtk::EventSequenceState::Claimed);
                                        sender.input(AppMsg::Evade);
                                    }
                                },
                            },
                        },
                    },
                },

                #[name = "primary_dialog"]
                add_overlay = &gtk::Box {
                    add_css_class: "runaway-dialog",
                    #[watch]
                    set_visible: model.celebration.stage() == Stage::PrimaryOpen,

                    add_controller = gtk::GestureClick {
                        connect_released[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::DialogPress(x, y));
                        }
                    },

                    gtk::Box {
                        add_css_class: CARD_CLASS,
                        set_orientation: gtk::Orientation::Vertical,
                        set_spacing: 16,
                        set_hexpand: true,
                        set_halign: gtk::Align::Center,
                        set_valign: gtk::Align::Center,

                        gtk::Label {
                            add_css_class: "runaway-card-title",
                            #[watch]
                            set_label: &model.config.text.primary_title,
                        },

                        gtk::Label {
                            set_wrap: true,
                            #[watch]
                            set_label: &model.config.text.primary_message,
                        },

                        gtk::Button {
                            set_halign: gtk::Align::Center,
                            #[watch]
                            set_label: &model.config.text.close,
                            connect_clicked => AppMsg::Close,
                        },
                    },
                },

                #[name = "secondary_dialog"]
                add_overlay = &gtk::Box {
                    add_css_class: "runaway-dialog",
                    #[watch]
                    set_visible: model.celebration.stage() == Stage::SecondaryOpen,

                    add_controller = gtk::GestureClick {
                        connect_released[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::DialogPress(x, y));
                        }
                    },

                    gtk::Box {
                        add_css_class: CARD_CLASS,
                        set_orientation: gtk::Orientation::Vertical,
                        set_spacing: 16,
                        set_hexpand: true,
                        set_halign: gtk::Align::Center,
                        set_valign: gtk::Align::Center,

                        #[name = "picture"]
                        gtk::Picture {
                            set_can_shrink: true,
                            set_size_request: (PICTURE_SIZE, PICTURE_SIZE),
                            set_visible: false,
                        },

                        gtk::Label {
                            add_css_class: "runaway-card-title",
                            set_wrap: true,
                            #[watch]
                            set_label: &model.config.text.secondary_message,
                        },
                    },
                },

                #[name = "confetti_area"]
                add_overlay = &gtk::DrawingArea {
                    set_can_target: false,
                    add_css_class: "runaway-drawing-area",
                },
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, config_path, mut rng, rx) = init;

        theme::load_css();
        if config.window.mode == WindowMode::Overlay {
            if window::init_layer_shell(&root) {
                root.add_css_class("overlay");
            } else {
                log::warn!("Layer shell not supported, running as a normal window");
            }
        }

        let scene = Rc::new(RefCell::new(Scene::new(&config.ambient, &mut rng)));
        let timer_sender = sender.clone();

        let model = AppModel {
            evasion: EvasionController::new(config.evasion),
            celebration: CelebrationSequencer::new(config.celebration),
            scene: scene.clone(),
            timers: Timers::new(move |timer| timer_sender.input(AppMsg::TimerFired(timer))),
            rng,
            tilt: TiltStyle::new(),
            root: root.clone(),
            playfield: gtk::Overlay::default(),
            button_row: gtk::Box::default(),
            yes_button: gtk::Button::default(),
            no_button: gtk::Button::default(),
            no_slot: gtk::Box::default(),
            primary_dialog: gtk::Box::default(),
            secondary_dialog: gtk::Box::default(),
            picture: gtk::Picture::default(),
            picture_tick: None,
            config,
            config_path,
        };

        let widgets = view_output!();

        let mut model = model;
        model.playfield = widgets.playfield.clone();
        model.button_row = widgets.button_row.clone();
        model.yes_button = widgets.yes_button.clone();
        model.no_button = widgets.no_button.clone();
        model.primary_dialog = widgets.primary_dialog.clone();
        model.secondary_dialog = widgets.secondary_dialog.clone();
        model.picture = widgets.picture.clone();
        model.load_picture();

        let scene_draw = scene.clone();
        widgets
            .ambient_area
            .set_draw_func(move |area, cr, width, height| {
                let colors = ThemeColors::from_context(&area.style_context());
                let viewport = sidestep::Viewport::new(width as f64, height as f64);
                if let Err(e) = scene::draw_ambient(cr, &scene_draw.borrow(), viewport, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let scene_draw = scene.clone();
        widgets
            .confetti_area
            .set_draw_func(move |_, cr, width, height| {
                let viewport = sidestep::Viewport::new(width as f64, height as f64);
                if let Err(e) = scene::draw_confetti(cr, &scene_draw.borrow(), viewport) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let ambient_area = widgets.ambient_area.clone();
        let confetti_area = widgets.confetti_area.clone();
        root.add_tick_callback(move |_, _| {
            let mut current = scene.borrow_mut();
            let had_confetti = !current.confetti.is_empty();
            current.tick(Instant::now());
            ambient_area.queue_draw();
            if had_confetti {
                confetti_area.queue_draw();
            }
            glib::ControlFlow::Continue
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
            AppMsg::Evade => {
                let viewport = window::viewport(&self.playfield);
                let obstacle = window::bounds_in(&self.yes_button, &self.playfield);
                let control = window::bounds_in(&self.no_button, &self.playfield);
                let effects = self
                    .evasion
                    .relocate(viewport, obstacle, control, &mut self.rng);
                self.apply_evasion(effects);
            }
            AppMsg::Affirm => {
                let effects = self.celebration.affirm();
                self.apply_celebration(effects);
            }
            AppMsg::DialogPress(x, y) => {
                let root = match self.celebration.stage() {
                    Stage::PrimaryOpen => &self.primary_dialog,
                    Stage::SecondaryOpen => &self.secondary_dialog,
                    Stage::Idle => return,
                };
                let target = window::click_target(root, x, y);
                let effects = self.celebration.dismiss(target);
                self.apply_celebration(effects);
            }
            AppMsg::Close => {
                let effects = self.celebration.dismiss(ClickTarget::CloseButton);
                self.apply_celebration(effects);
            }
            AppMsg::Escape => {
                if self.celebration.stage() == Stage::Idle {
                    if self.config.window.mode == WindowMode::Overlay {
                        self.root.close();
                    }
                    return;
                }
                let effects = self.celebration.dismiss(ClickTarget::Backdrop);
                self.apply_celebration(effects);
            }
            AppMsg::Resize => {
                let effects = self.evasion.on_resize();
                self.apply_evasion(effects);
            }
            AppMsg::TimerFired(timer) => {
                let effects = self.evasion.fire(timer);
                self.apply_evasion(effects);
                let effects = self.celebration.fire(timer);
                self.apply_celebration(effects);
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(new_config) => {
                    self.evasion.set_params(new_config.evasion);
                    self.celebration.set_params(new_config.celebration);
                    if new_config.ambient != self.config.ambient {
                        self.scene
                            .borrow_mut()
                            .reseed_ambient(&new_config.ambient, &mut self.rng);
                    }
                    let picture_changed = new_config.secondary != self.config.secondary;
                    self.config = new_config;
                    if picture_changed {
                        self.load_picture();
                    }
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    fn apply_evasion(&mut self, effects: Vec<evasion::Effect>) {
        for effect in effects {
            match effect {
                evasion::Effect::Place {
                    position,
                    tilt,
                    detach,
                } => {
                    if detach {
                        self.detach_no_button();
                    }
                    self.no_button.set_margin_start(position.x.round() as i32);
                    self.no_button.set_margin_top(position.y.round() as i32);
                    self.tilt.set(tilt);
                    self.no_button.add_css_class(TILTED_CLASS);
                }
                evasion::Effect::Straighten => self.no_button.remove_css_class(TILTED_CLASS),
                evasion::Effect::Dock => self.dock_no_button(),
                evasion::Effect::Timer(request) => self.timers.apply(request),
            }
        }
    }

    fn apply_celebration(&mut self, effects: Vec<celebration::Effect>) {
        for effect in effects {
            match effect {
                // dialog visibility is bound to the sequencer stage in the view
                celebration::Effect::Show(stage) => log::debug!("showing {}", stage),
                celebration::Effect::Confetti => {
                    let width = self.playfield.width() as f64;
                    self.scene
                        .borrow_mut()
                        .burst(&self.config.confetti, width, &mut self.rng);
                }
                celebration::Effect::Timer(request) => self.timers.apply(request),
            }
        }
    }

    /// Moves the "no" button out of the button row onto the playfield overlay,
    /// where its margins position it relative to the window.
    fn detach_no_button(&self) {
        window::vacate_slot(&self.button_row, &self.no_button, &self.no_slot);
        self.no_button.set_halign(gtk::Align::Start);
        self.no_button.set_valign(gtk::Align::Start);
        self.playfield.add_overlay(&self.no_button);
    }

    fn dock_no_button(&self) {
        self.playfield.remove_overlay(&self.no_button);
        self.no_button.remove_css_class(TILTED_CLASS);
        self.no_button.set_margin_start(0);
        self.no_button.set_margin_top(0);
        self.no_button.set_halign(gtk::Align::Fill);
        self.no_button.set_valign(gtk::Align::Fill);
        window::restore_slot(&self.button_row, &self.no_button, &self.no_slot);
    }

    fn load_picture(&mut self) {
        if let Some(tick) = self.picture_tick.take() {
            tick.remove();
        }

        let animation = self
            .config
            .secondary
            .image
            .as_deref()
            .and_then(load_animation);
        self.picture.set_visible(animation.is_some());
        let Some(animation) = animation else {
            self.picture.set_paintable(None::<&gdk::Texture>);
            return;
        };

        if animation.is_static_image() {
            let texture = animation.static_image().map(|frame| scaled_texture(&frame));
            self.picture.set_paintable(texture.as_ref());
            return;
        }

        let frames = animation.iter(Some(SystemTime::now()));
        self.picture
            .set_paintable(Some(&scaled_texture(&frames.pixbuf())));
        let tick = self.picture.add_tick_callback(move |picture, _| {
            if frames.advance(SystemTime::now()) {
                picture.set_paintable(Some(&scaled_texture(&frames.pixbuf())));
            }
            glib::ControlFlow::Continue
        });
        self.picture_tick = Some(tick);
    }
}

fn load_animation(path: &Path) -> Option<PixbufAnimation> {
    match PixbufAnimation::from_file(path) {
        Ok(animation) => Some(animation),
        Err(e) => {
            log::error!("Failed to load picture {}: {}", path.display(), e);
            None
        }
    }
}

/// Size of a `width` x `height` frame fitted inside `PICTURE_SIZE` square,
/// never scaled up.
fn fit_picture(width: i32, height: i32) -> (i32, i32) {
    let longest = width.max(height).max(1);
    let scale = (PICTURE_SIZE as f64 / longest as f64).min(1.0);
    (
        ((width as f64 * scale).round() as i32).max(1),
        ((height as f64 * scale).round() as i32).max(1),
    )
}

fn scaled_texture(frame: &Pixbuf) -> gdk::Texture {
    let (width, height) = fit_picture(frame.width(), frame.height());
    let scaled = frame
        .scale_simple(width, height, InterpType::Bilinear)
        .unwrap_or_else(|| frame.clone());
    gdk::Texture::for_pixbuf(&scaled)
}
