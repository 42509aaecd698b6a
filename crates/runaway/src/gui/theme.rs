use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;
use sidestep::evasion::Tilt;

pub const TILTED_CLASS: &str = "runaway-tilted";

pub struct ThemeColors {
    pub mote: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            mote: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(1.0, 0.52, 0.64, 0.35),
                Some(0.35),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

fn add_provider(provider: &gtk::CssProvider, priority: u32) {
    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(&display, provider, priority);
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.runaway-window.overlay, .runaway-drawing-area {
    background: none;
    background-color: transparent;
}

.runaway-question {
    font-size: 28px;
    font-weight: bold;
}

.runaway-yes, .runaway-no {
    min-width: 96px;
    min-height: 40px;
    font-size: 18px;
}

.runaway-no {
    transition: transform 250ms ease-out;
}

.runaway-dialog {
    background-color: rgba(0, 0, 0, 0.45);
}

.runaway-card {
    background-color: @theme_bg_color;
    border-radius: 16px;
    padding: 24px 32px;
}

.runaway-card-title {
    font-size: 24px;
    font-weight: bold;
}
";
    provider.load_from_data(css_data);
    add_provider(&provider, gtk::STYLE_PROVIDER_PRIORITY_APPLICATION);
}

/// Holds the rule for the transient tilt of the evading button. The rule is
/// rewritten on every relocation and applies while the button carries
/// [`TILTED_CLASS`]; removing the class lets the CSS transition ease it back.
pub struct TiltStyle {
    provider: gtk::CssProvider,
}

impl TiltStyle {
    pub fn new() -> Self {
        let provider = gtk::CssProvider::new();
        add_provider(&provider, gtk::STYLE_PROVIDER_PRIORITY_APPLICATION + 1);
        Self { provider }
    }

    pub fn set(&self, tilt: Tilt) {
        self.provider.load_from_data(&format!(
            ".runaway-no.{TILTED_CLASS} {{ transform: rotate({:.2}deg) scale({:.3}); }}",
            tilt.degrees, tilt.scale
        ));
    }
}

impl Default for TiltStyle {
    fn default() -> Self {
        Self::new()
    }
}
