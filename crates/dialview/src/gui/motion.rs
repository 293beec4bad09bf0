use dial::{Layout, Point, Transition};
use std::iter::zip;

/// Positions actually on screen while cells travel towards the latest [`Layout`].
///
/// Times are in microseconds on the monotonic clock, which is what the GDK frame
/// clock reports.
#[derive(Debug, Clone, Default)]
pub struct Motion {
    target: Option<Layout>,
    from: Vec<Point>,
    current: Vec<Point>,
    started_at: i64,
    duration_us: i64,
    animating: bool,
}

fn ease_in_out(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

impl Motion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts moving from wherever cells are drawn now. Cells that were never drawn
    /// start from the dial center.
    pub fn retarget(&mut self, layout: &Layout, now_us: i64) {
        self.from = layout
            .cells
            .iter()
            .map(|cell| {
                self.current
                    .get(cell.index)
                    .copied()
                    .unwrap_or(layout.center)
            })
            .collect();
        self.duration_us = match layout.transition {
            Transition::Immediate => 0,
            Transition::Animated(d) => d.as_micros() as i64,
        };
        self.started_at = now_us;
        self.target = Some(layout.clone());
        self.animating = true;
        self.advance(now_us);
    }

    /// Moves cells to their positions at `now_us`. Returns whether anything moved.
    pub fn advance(&mut self, now_us: i64) -> bool {
        let Some(target) = &self.target else {
            return false;
        };
        if !self.animating {
            return false;
        }

        let t = if self.duration_us <= 0 {
            1.0
        } else {
            ((now_us - self.started_at) as f64 / self.duration_us as f64).clamp(0.0, 1.0)
        };
        let eased = ease_in_out(t);
        self.current = zip(&self.from, &target.cells)
            .map(|(from, cell)| lerp(*from, cell.position, eased))
            .collect();
        self.animating = t < 1.0;
        true
    }

    pub fn target(&self) -> Option<&Layout> {
        self.target.as_ref()
    }

    pub fn positions(&self) -> &[Point] {
        &self.current
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dial::{DialEngine, ManualScheduler, Physics, Size};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded_engine() -> (DialEngine<u8, ManualScheduler>, Rc<RefCell<Vec<Layout>>>) {
        let mut engine = DialEngine::new(Physics::default(), ManualScheduler::new()).unwrap();
        engine.set_bounds(Size::new(200.0, 200.0));
        let seen: Rc<RefCell<Vec<Layout>>> = Rc::default();
        let sink = seen.clone();
        engine.subscribe(move |layout| sink.borrow_mut().push(layout.clone()));
        (engine, seen)
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_resize_snaps() {
        let (mut engine, seen) = recorded_engine();
        engine.add_cell(0);
        engine.set_bounds(Size::new(300.0, 300.0));

        let mut motion = Motion::new();
        motion.retarget(&seen.borrow()[1], 0);
        assert!(!motion.is_animating());
        assert!(close(motion.positions()[0], seen.borrow()[1].cells[0].position));
    }

    #[test]
    fn test_added_cell_grows_out_of_center() {
        let (mut engine, seen) = recorded_engine();
        engine.add_cell(0);
        let layout = seen.borrow()[0].clone();
        assert_eq!(layout.transition, Transition::Animated(dial::physics::ADD_CELL_TRANSITION));

        let mut motion = Motion::new();
        motion.retarget(&layout, 1_000);
        assert!(close(motion.positions()[0], layout.center));
        assert!(motion.is_animating());

        // halfway through 300ms, eased midpoint is the plain midpoint
        assert!(motion.advance(151_000));
        let target = layout.cells[0].position;
        let mid = lerp(layout.center, target, 0.5);
        assert!(close(motion.positions()[0], mid));

        assert!(motion.advance(301_000));
        assert!(close(motion.positions()[0], target));
        assert!(!motion.is_animating());
        assert!(!motion.advance(400_000));
    }

    #[test]
    fn test_rotation_continues_from_drawn_position() {
        let (mut engine, seen) = recorded_engine();
        engine.add_cell(0);
        engine.add_cell(1);

        let mut motion = Motion::new();
        motion.retarget(&seen.borrow()[1], 0);
        motion.advance(1_000_000);
        let settled = motion.positions().to_vec();

        engine.set_rotation_offset(0.5).unwrap();
        let turned = seen.borrow().last().unwrap().clone();
        assert_eq!(turned.transition, Transition::Animated(dial::physics::OFFSET_TRANSITION));

        motion.retarget(&turned, 2_000_000);
        assert!(close(motion.positions()[1], settled[1]));

        motion.advance(2_020_000);
        let part = motion.positions()[1];
        assert!(!close(part, settled[1]));
        assert!(!close(part, turned.cells[1].position));

        // a new target mid-flight starts from the partially moved point
        engine.set_rotation_offset(0.6).unwrap();
        motion.retarget(seen.borrow().last().unwrap(), 2_020_000);
        assert!(close(motion.positions()[1], part));
    }
}
