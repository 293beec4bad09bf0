use super::{Engine, MARKER_SIZE, Motion, ORBIT_LINE_WIDTH};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use dial::{CellPlacement, Layout, Point};
use palette::Srgba;
use std::f64::consts::PI;
use std::iter::zip;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct CellRenderer<'a> {
    placement: &'a CellPlacement,
    center: Point,
    label: &'a str,
    radius: f64,
}

impl<'a> CellRenderer<'a> {
    fn new(placement: &'a CellPlacement, center: Point, label: &'a str, radius: f64) -> Self {
        Self {
            placement,
            center,
            label,
            radius,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_circle(cr, colors)?;
        self.draw_label(cr, colors)
    }

    fn draw_circle(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_color(cr, CellState::from(self.placement).color(colors));
        cr.arc(self.center.x, self.center.y, self.radius, 0.0, 2.0 * PI);
        cr.fill()
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_color(cr, colors.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(self.radius * 0.6);
        if let Ok(ext) = cr.text_extents(self.label) {
            cr.move_to(
                self.center.x - ext.width() / 2.0 - ext.x_bearing(),
                self.center.y - ext.height() / 2.0 - ext.y_bearing(),
            );
            cr.show_text(self.label)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellState {
    Active,
    Idle,
}

impl From<&CellPlacement> for CellState {
    fn from(placement: &CellPlacement) -> Self {
        if placement.active {
            Self::Active
        } else {
            Self::Idle
        }
    }
}

impl CellState {
    fn color(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self {
            Self::Active => colors.active,
            Self::Idle => colors.idle,
        }
    }
}

/// Draws cells where `motion` currently has them, highlighted per its target layout.
pub fn draw(
    cr: &Context,
    engine: &Engine,
    motion: &Motion,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let Some(layout) = motion.target() else {
        return Ok(());
    };
    let radius = engine.physics().cell_width / 2.0;

    draw_orbit(cr, layout, colors)?;
    draw_marker(cr, layout, radius, colors)?;

    for (placement, center) in zip(&layout.cells, motion.positions()) {
        let label = engine
            .cell(placement.index)
            .map(|cell| cell.handle().as_str())
            .unwrap_or_default();
        CellRenderer::new(placement, *center, label, radius).draw(cr, colors)?;
    }
    Ok(())
}

fn draw_orbit(cr: &Context, layout: &Layout, colors: &ThemeColors) -> Result<(), cairo::Error> {
    set_color(cr, colors.orbit);
    cr.set_line_width(ORBIT_LINE_WIDTH);
    cr.arc(layout.center.x, layout.center.y, layout.radius, 0.0, 2.0 * PI);
    cr.stroke()
}

/// Small triangle just inside the orbit pointing at the top slot.
fn draw_marker(
    cr: &Context,
    layout: &Layout,
    cell_radius: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let tip_y = layout.center.y - layout.radius + cell_radius + MARKER_SIZE / 2.0;
    set_color(cr, colors.active);
    cr.move_to(layout.center.x, tip_y);
    cr.line_to(layout.center.x - MARKER_SIZE, tip_y + MARKER_SIZE);
    cr.line_to(layout.center.x + MARKER_SIZE, tip_y + MARKER_SIZE);
    cr.close_path();
    cr.fill()
}
