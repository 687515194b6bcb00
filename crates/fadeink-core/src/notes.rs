//! Sticky notes: drag-to-move and their paper look.

use kurbo::{Point, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Stacking order of a note while it is being dragged.
pub const DRAGGING_Z_INDEX: i32 = 1000;
/// Stacking order of a note at rest.
pub const RESTING_Z_INDEX: i32 = 10;
/// Largest tilt applied to a note, in degrees either way.
pub const MAX_TILT_DEG: f64 = 1.5;

/// Id of the note that holds the project image; it stays straight.
pub const IMAGE_NOTE_ID: &str = "imageNote";
/// Id of the music player note; it keeps its own background.
pub const MUSIC_NOTE_ID: &str = "playSongNote";

/// Pointer and note position captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Grab {
    pointer: Point,
    origin: Point,
}

/// Drag state of one sticky note.
///
/// Pointer moves are coalesced: only the latest target position is kept and
/// it is applied on the next display frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteDrag {
    grab: Option<Grab>,
    pending: Option<Point>,
}

impl NoteDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Start dragging a note whose top-left corner is at `origin`.
    ///
    /// Presses on a note's own controls (music and close buttons) never start a
    /// drag. Returns whether a drag started.
    pub fn start(&mut self, pointer: Point, origin: Point, on_control: bool) -> bool {
        if on_control {
            return false;
        }
        self.grab = Some(Grab { pointer, origin });
        self.pending = None;
        true
    }

    /// Record a pointer move.
    ///
    /// Returns `true` when a frame must be requested to apply it, which is
    /// only the case for the first move since the last applied frame.
    pub fn move_to(&mut self, pointer: Point) -> bool {
        let Some(grab) = self.grab else {
            return false;
        };
        let first = self.pending.is_none();
        self.pending = Some(grab.origin + (pointer - grab.pointer));
        first
    }

    /// The position to apply on this frame, if a move is pending.
    pub fn take_frame(&mut self) -> Option<Point> {
        self.grab?;
        self.pending.take()
    }

    /// Finish the drag. A move still waiting for its frame is dropped.
    /// Returns whether a drag was in progress.
    pub fn end(&mut self) -> bool {
        self.pending = None;
        self.grab.take().is_some()
    }

    pub fn z_index(&self) -> i32 {
        if self.is_dragging() {
            DRAGGING_Z_INDEX
        } else {
            RESTING_Z_INDEX
        }
    }

    /// Offset of the pending position from where the drag started.
    pub fn offset(&self) -> Option<Vec2> {
        let grab = self.grab?;
        Some(self.pending? - grab.origin)
    }
}

/// A light paper tint, as an RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperColor(pub u8, pub u8, pub u8);

/// Tints a note may be given.
pub const PAPER_COLORS: [PaperColor; 8] = [
    PaperColor(255, 242, 204),
    PaperColor(230, 243, 255),
    PaperColor(240, 230, 255),
    PaperColor(255, 240, 240),
    PaperColor(240, 255, 240),
    PaperColor(255, 248, 225),
    PaperColor(245, 245, 245),
    PaperColor(255, 235, 235),
];

/// Tint of the image note.
pub const IMAGE_NOTE_COLOR: PaperColor = PaperColor(232, 244, 253);

impl PaperColor {
    fn gradient(&self, from: f64, to: f64) -> String {
        let PaperColor(r, g, b) = *self;
        format!(
            "linear-gradient(135deg, rgba({r}, {g}, {b}, {from}) 0%, rgba({r}, {g}, {b}, {to}) 100%)"
        )
    }

    /// CSS background at rest.
    pub fn background(&self) -> String {
        self.gradient(0.9, 0.7)
    }

    /// CSS background on hover, slightly more opaque.
    pub fn hover(&self) -> String {
        self.gradient(0.95, 0.8)
    }
}

/// Tilt and tint chosen for a note when the page loads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteLook {
    pub rotation_deg: f64,
    /// `None` keeps the note's stylesheet background.
    pub paper: Option<PaperColor>,
}

impl NoteLook {
    /// Pick the look of the note with element id `id`.
    pub fn pick(id: &str, rng: &mut impl Rng) -> Self {
        match id {
            IMAGE_NOTE_ID => Self {
                rotation_deg: 0.0,
                paper: Some(IMAGE_NOTE_COLOR),
            },
            MUSIC_NOTE_ID => Self {
                rotation_deg: random_tilt(rng),
                paper: None,
            },
            _ => Self {
                rotation_deg: random_tilt(rng),
                paper: Some(PAPER_COLORS[rng.gen_range(0..PAPER_COLORS.len())]),
            },
        }
    }

    /// CSS transform for the tilt.
    pub fn transform(&self) -> String {
        format!("rotate({}deg)", self.rotation_deg)
    }
}

fn random_tilt(rng: &mut impl Rng) -> f64 {
    rng.gen_range(-MAX_TILT_DEG..MAX_TILT_DEG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_drag_follows_pointer_from_grab_offset() {
        let mut drag = NoteDrag::new();
        assert!(drag.start(Point::new(110.0, 220.0), Point::new(100.0, 200.0), false));
        assert!(drag.is_dragging());
        assert_eq!(drag.z_index(), DRAGGING_Z_INDEX);

        assert!(drag.move_to(Point::new(130.0, 215.0)));
        assert_eq!(drag.offset(), Some(Vec2::new(20.0, -5.0)));
        assert_eq!(drag.take_frame(), Some(Point::new(120.0, 195.0)));
        assert_eq!(drag.take_frame(), None);
    }

    #[test]
    fn test_moves_coalesce_into_one_frame() {
        let mut drag = NoteDrag::new();
        drag.start(Point::ZERO, Point::new(50.0, 50.0), false);

        assert!(drag.move_to(Point::new(1.0, 1.0)));
        assert!(!drag.move_to(Point::new(2.0, 2.0)));
        assert!(!drag.move_to(Point::new(3.0, 4.0)));
        assert_eq!(drag.take_frame(), Some(Point::new(53.0, 54.0)));

        // The next move after a frame needs a new frame.
        assert!(drag.move_to(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_controls_never_start_drag() {
        let mut drag = NoteDrag::new();
        assert!(!drag.start(Point::ZERO, Point::ZERO, true));
        assert!(!drag.is_dragging());
        assert!(!drag.move_to(Point::new(10.0, 10.0)));
        assert_eq!(drag.take_frame(), None);
    }

    #[test]
    fn test_end_drops_pending_move() {
        let mut drag = NoteDrag::new();
        drag.start(Point::ZERO, Point::ZERO, false);
        drag.move_to(Point::new(10.0, 10.0));

        assert!(drag.end());
        assert_eq!(drag.take_frame(), None);
        assert_eq!(drag.z_index(), RESTING_Z_INDEX);
        assert!(!drag.end());
    }

    #[test]
    fn test_image_note_stays_straight() {
        let mut rng = SmallRng::seed_from_u64(3);
        let look = NoteLook::pick(IMAGE_NOTE_ID, &mut rng);
        assert_eq!(look.rotation_deg, 0.0);
        assert_eq!(look.paper, Some(IMAGE_NOTE_COLOR));
        assert_eq!(look.transform(), "rotate(0deg)");
    }

    #[test]
    fn test_music_note_keeps_background() {
        let mut rng = SmallRng::seed_from_u64(3);
        let look = NoteLook::pick(MUSIC_NOTE_ID, &mut rng);
        assert!(look.paper.is_none());
        assert!(look.rotation_deg.abs() <= MAX_TILT_DEG);
    }

    #[test]
    fn test_other_notes_get_tilt_and_paper() {
        let mut rng = SmallRng::seed_from_u64(11);
        for i in 0..50 {
            let look = NoteLook::pick(&format!("note{i}"), &mut rng);
            assert!(look.rotation_deg.abs() <= MAX_TILT_DEG);
            let paper = look.paper.unwrap();
            assert!(PAPER_COLORS.contains(&paper));
        }
    }

    #[test]
    fn test_paper_gradients() {
        let paper = PaperColor(255, 242, 204);
        assert_eq!(
            paper.background(),
            "linear-gradient(135deg, rgba(255, 242, 204, 0.9) 0%, rgba(255, 242, 204, 0.7) 100%)"
        );
        assert_eq!(
            paper.hover(),
            "linear-gradient(135deg, rgba(255, 242, 204, 0.95) 0%, rgba(255, 242, 204, 0.8) 100%)"
        );
    }
}
