use crate::gui::scene::Scene;
use crate::gui::theme::ThemeColors;
use cairo::Context;
use sidestep::Viewport;
use sidestep::ambient::MOTE_RADIUS;
use sidestep::confetti::{Particle, ParticleFrame, Shape};
use std::f64::consts::PI;

fn draw_particle(cr: &Context, particle: &Particle, frame: &ParticleFrame) -> Result<(), cairo::Error> {
    let (r, g, b) = particle.color.components();
    let (w, h) = (particle.width, particle.height);

    cr.save()?;
    cr.translate(frame.origin.x + w / 2.0, frame.origin.y + h / 2.0);
    cr.rotate(frame.rotation.to_radians());
    cr.set_source_rgba(r, g, b, frame.opacity);
    match particle.shape {
        Shape::Square => cr.rectangle(-w / 2.0, -h / 2.0, w, h),
        Shape::Round => {
            cr.scale(w / 2.0, h / 2.0);
            cr.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
        }
    }
    cr.fill()?;
    cr.restore()
}

pub fn draw_confetti(cr: &Context, scene: &Scene, viewport: Viewport) -> Result<(), cairo::Error> {
    for (particle, frame) in scene.confetti.frames(scene.now, viewport.height) {
        draw_particle(cr, particle, &frame)?;
    }
    Ok(())
}

pub fn draw_ambient(
    cr: &Context,
    scene: &Scene,
    viewport: Viewport,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let (r, g, b, a) = colors.mote.into_components();
    for frame in scene.ambient.frames(scene.elapsed(), viewport) {
        cr.set_source_rgba(r, g, b, a * frame.opacity);
        cr.arc(frame.center.x, frame.center.y, MOTE_RADIUS, 0.0, 2.0 * PI);
        cr.fill()?;
    }
    Ok(())
}
