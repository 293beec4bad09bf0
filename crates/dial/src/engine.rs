use crate::angle::{clamp, normalize_angle, touch_angle, unwrap_delta};
use crate::error::DialError;
use crate::geometry::{Point, Size, orbit_radius, position_on_circle};
use crate::physics::{ADD_CELL_TRANSITION, OFFSET_TRANSITION, Physics, Transition};
use crate::scheduler::{Scheduler, Timer};
use std::f64::consts::{FRAC_PI_2, TAU};

/// An externally rendered element and its slot on the dial.
#[derive(Debug, Clone)]
pub struct Cell<C> {
    index: usize,
    handle: C,
}

impl<C> Cell<C> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn handle(&self) -> &C {
        &self.handle
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPlacement {
    pub index: usize,
    pub angle: f64,
    pub position: Point,
    pub active: bool,
}

/// Where every cell should be drawn after the last state change.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub bounds: Size,
    pub center: Point,
    pub radius: f64,
    pub active_index: Option<usize>,
    pub transition: Transition,
    pub cells: Vec<CellPlacement>,
}

impl Layout {
    fn compute(
        cell_count: usize,
        rotation_offset: f64,
        bounds: Size,
        cell_width: f64,
        transition: Transition,
    ) -> Self {
        let center = bounds.center();
        let radius = orbit_radius(bounds, cell_width);
        let active_index = active_index_at(rotation_offset, cell_count);

        let cells = (0..cell_count)
            .map(|index| {
                let angle = cell_angle_at(index, rotation_offset, cell_count);
                CellPlacement {
                    index,
                    angle,
                    position: position_on_circle(center, radius, angle),
                    active: active_index == Some(index),
                }
            })
            .collect();

        Self {
            bounds,
            center,
            radius,
            active_index,
            transition,
            cells,
        }
    }
}

fn active_index_at(rotation_offset: f64, cell_count: usize) -> Option<usize> {
    if cell_count == 0 {
        return None;
    }
    let n = cell_count as i64;
    let mut i = (-(rotation_offset - FRAC_PI_2) * cell_count as f64 / TAU).round() as i64;
    if i < 0 {
        i += n;
    }
    Some(i.rem_euclid(n) as usize)
}

fn cell_angle_at(index: usize, rotation_offset: f64, cell_count: usize) -> f64 {
    TAU * index as f64 / cell_count as f64 + rotation_offset
}

/// Live gesture. `previous_angle` is empty until a sample away from the center arrives.
#[derive(Debug, Clone, Copy, Default)]
struct TouchSession {
    previous_angle: Option<f64>,
}

type LayoutListener = Box<dyn FnMut(&Layout)>;

pub struct DialEngine<C, S: Scheduler> {
    physics: Physics,
    scheduler: S,
    rotation_offset: f64,
    velocity: f64,
    touch: Option<TouchSession>,
    brake_timer: Option<S::Timer>,
    bounds: Size,
    cells: Vec<Cell<C>>,
    listeners: Vec<LayoutListener>,
}

impl<C, S: Scheduler> DialEngine<C, S> {
    pub fn new(physics: Physics, scheduler: S) -> Result<Self, DialError> {
        physics.validate()?;
        Ok(Self {
            physics,
            scheduler,
            rotation_offset: 0.0,
            velocity: 0.0,
            touch: None,
            brake_timer: None,
            bounds: Size::default(),
            cells: Vec::new(),
            listeners: Vec::new(),
        })
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    /// Registers a renderer. Called after every relayout, starting with the next one.
    pub fn subscribe(&mut self, listener: impl FnMut(&Layout) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn add_cell(&mut self, handle: C) -> usize {
        let index = self.cells.len();
        self.cells.push(Cell { index, handle });
        self.relayout(Transition::Animated(ADD_CELL_TRANSITION));
        index
    }

    pub fn cells(&self) -> &[Cell<C>] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell<C>> {
        self.cells.get(index)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn rotation_offset(&self) -> f64 {
        self.rotation_offset
    }

    pub fn set_rotation_offset(&mut self, theta: f64) -> Result<(), DialError> {
        if !theta.is_finite() {
            log::warn!("Rejecting rotation offset {}", theta);
            return Err(DialError::NonFiniteOffset(theta));
        }
        self.apply_offset(theta);
        Ok(())
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_rotating(&self) -> bool {
        self.velocity != 0.0
    }

    pub fn is_braking(&self) -> bool {
        self.brake_timer.as_ref().is_some_and(|t| t.is_active())
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Resizing snaps cells into place without animation.
    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
        self.relayout(Transition::Immediate);
    }

    /// Index of the cell nearest the top of the dial.
    pub fn active_cell_index(&self) -> Result<usize, DialError> {
        active_index_at(self.rotation_offset, self.cells.len()).ok_or(DialError::NoCells)
    }

    pub fn cell_angle(&self, index: usize) -> Result<f64, DialError> {
        let n = self.non_empty_count()?;
        Ok(cell_angle_at(index, self.rotation_offset, n))
    }

    /// Rotation offset that puts `index` exactly at the top.
    pub fn angle_for_index(&self, index: usize) -> Result<f64, DialError> {
        let n = self.non_empty_count()?;
        Ok(-TAU * (index % n) as f64 / n as f64 + FRAC_PI_2)
    }

    /// Stops any spin and snaps `index` to the top.
    pub fn scroll_to(&mut self, index: usize) -> Result<(), DialError> {
        let theta = self.angle_for_index(index)?;
        log::debug!("Scrolling to cell {}", index);
        self.stop_timer();
        self.velocity = 0.0;
        self.apply_offset(theta);
        Ok(())
    }

    pub fn layout(&self) -> Layout {
        Layout::compute(
            self.cells.len(),
            self.rotation_offset,
            self.bounds,
            self.physics.cell_width,
            Transition::Immediate,
        )
    }

    pub fn on_touch_began(&mut self, point: Point) {
        self.stop_timer();
        self.velocity = 0.0;

        let previous_angle = touch_angle(point, self.bounds.center());
        if previous_angle.is_none() {
            log::warn!("Touch began at dial center, waiting for next sample");
        }
        log::debug!("Touch began at ({}, {})", point.x, point.y);
        self.touch = Some(TouchSession { previous_angle });
    }

    pub fn on_touch_moved(&mut self, point: Point) {
        let Some(session) = self.touch.as_mut() else {
            log::trace!("Ignoring touch move outside a gesture");
            return;
        };
        let Some(current) = touch_angle(point, self.bounds.center()) else {
            log::warn!("Ignoring touch sample at dial center");
            return;
        };
        let Some(previous) = session.previous_angle.replace(current) else {
            return;
        };

        let max = self.physics.max_speed;
        self.velocity = clamp(unwrap_delta(current - previous), -max, max);
        log::trace!("Touch moved, velocity {:.4}", self.velocity);
        self.apply_offset(self.rotation_offset + self.velocity);
    }

    pub fn on_touch_ended(&mut self) {
        if self.touch.take().is_none() {
            return;
        }
        log::debug!("Touch ended, velocity {:.4}", self.velocity);
        self.start_braking();
    }

    /// Spins the dial as if released at `velocity` (clamped to the speed limit).
    pub fn fling(&mut self, velocity: f64) {
        let max = self.physics.max_speed;
        self.velocity = if velocity.is_finite() {
            clamp(velocity, -max, max)
        } else {
            0.0
        };
        self.start_braking();
    }

    /// Restarts the brake loop. A still dial schedules nothing.
    pub fn start_braking(&mut self) {
        self.stop_timer();
        if self.velocity == 0.0 {
            return;
        }
        log::debug!("Braking from velocity {:.4}", self.velocity);
        self.brake_timer = Some(self.scheduler.schedule_repeating(self.physics.brake_interval));
    }

    /// One step of the brake loop. Returns whether the dial is still spinning.
    /// Ticks arriving after the timer was cancelled do nothing.
    pub fn brake_tick(&mut self) -> bool {
        if !self.is_braking() {
            return false;
        }

        let brake = self.physics.brake_power;
        self.apply_offset(self.rotation_offset + self.velocity);
        self.velocity -= if self.velocity > 0.0 { brake } else { -brake };
        log::trace!("Brake tick, velocity {:.4}", self.velocity);

        if self.velocity.abs() <= brake {
            self.velocity = 0.0;
            self.stop_timer();
            log::debug!("Dial settled at {:.4}", self.rotation_offset);
            return false;
        }
        true
    }

    fn non_empty_count(&self) -> Result<usize, DialError> {
        match self.cells.len() {
            0 => Err(DialError::NoCells),
            n => Ok(n),
        }
    }

    fn stop_timer(&mut self) {
        if let Some(mut timer) = self.brake_timer.take() {
            timer.cancel();
        }
    }

    fn apply_offset(&mut self, theta: f64) {
        self.rotation_offset = normalize_angle(theta);
        self.relayout(Transition::Animated(OFFSET_TRANSITION));
    }

    fn relayout(&mut self, transition: Transition) {
        let layout = Layout::compute(
            self.cells.len(),
            self.rotation_offset,
            self.bounds,
            self.physics.cell_width,
            transition,
        );
        for listener in &mut self.listeners {
            listener(&layout);
        }
    }
}

impl<C, S: Scheduler> Drop for DialEngine<C, S> {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
