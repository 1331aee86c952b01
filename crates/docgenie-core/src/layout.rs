//! Three-pane resizable layout.
//!
//! ```text
//! | structure |‖| output (elastic) |‖| chat |
//!             Structure           Chat
//! ```
//!
//! Each divider sits between one explicitly sized pane and the elastic
//! output pane. A drag only ever writes the explicit pane; the output width
//! is always derived as the remainder, so the three widths sum to 100.

use crate::config::LayoutConfig;

/// One of the two draggable dividers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Divider {
    /// Between the structure pane and the output pane.
    Structure,
    /// Between the output pane and the chat pane.
    Chat,
}

/// Input device driving a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Pane widths in percent of the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneLayout {
    structure_pct: f64,
    chat_pct: f64,
    min_pct: f64,
}

impl PaneLayout {
    /// Builds a layout, falling back to defaults when the configured widths
    /// would leave any pane under the floor.
    pub fn from_config(config: &LayoutConfig) -> Self {
        let min_pct = if config.min_percent.is_finite() {
            config.min_percent.clamp(0.0, 100.0 / 3.0)
        } else {
            LayoutConfig::default().min_percent
        };
        let layout = Self {
            structure_pct: config.structure_percent,
            chat_pct: config.chat_percent,
            min_pct,
        };
        if layout.is_valid() {
            return layout;
        }

        tracing::warn!(
            structure = config.structure_percent,
            chat = config.chat_percent,
            min = min_pct,
            "invalid pane widths in config, using defaults"
        );
        let defaults = LayoutConfig::default();
        let fallback = Self {
            structure_pct: defaults.structure_percent,
            chat_pct: defaults.chat_percent,
            min_pct,
        };
        if fallback.is_valid() {
            return fallback;
        }

        // The floor itself is too high for the default widths: lower it to
        // the narrowest default pane so every pane starts at or above it.
        let floor = fallback
            .structure_pct
            .min(fallback.chat_pct)
            .min(fallback.output_pct());
        tracing::warn!(min = min_pct, floor, "minimum pane width too large, lowering it");
        Self {
            min_pct: floor,
            ..fallback
        }
    }

    pub fn structure_pct(&self) -> f64 {
        self.structure_pct
    }

    pub fn chat_pct(&self) -> f64 {
        self.chat_pct
    }

    /// Remaining space, never stored.
    pub fn output_pct(&self) -> f64 {
        100.0 - self.structure_pct - self.chat_pct
    }

    pub fn min_pct(&self) -> f64 {
        self.min_pct
    }

    fn is_valid(&self) -> bool {
        [self.structure_pct, self.output_pct(), self.chat_pct]
            .iter()
            .all(|w| w.is_finite() && *w >= self.min_pct)
    }

    /// `(left, right)` widths in percent for the panes adjacent to `divider`.
    fn adjacent(&self, divider: Divider) -> (f64, f64) {
        match divider {
            Divider::Structure => (self.structure_pct, self.output_pct()),
            Divider::Chat => (self.output_pct(), self.chat_pct),
        }
    }
}

impl Default for PaneLayout {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    divider: Divider,
    kind: PointerKind,
    start_x: f64,
    left_px: f64,
    right_px: f64,
    container_px: f64,
}

/// Converts pointer travel into pane widths.
///
/// Container width is sampled when a drag starts and held for the whole
/// drag; a resize during a drag only takes effect on the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneResizeEngine {
    layout: PaneLayout,
    container_px: f64,
    drag: Option<DragState>,
}

impl PaneResizeEngine {
    pub fn new(layout: PaneLayout) -> Self {
        Self {
            layout,
            container_px: 0.0,
            drag: None,
        }
    }

    pub fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    /// Records the container's measured width. Non-finite or negative
    /// measurements count as "not laid out yet".
    pub fn set_container_width(&mut self, px: f64) {
        self.container_px = if px.is_finite() && px > 0.0 { px } else { 0.0 };
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Starts a drag on `divider`, ending any drag already in progress.
    pub fn begin_drag(&mut self, divider: Divider, kind: PointerKind, pointer_x: f64) {
        if self.drag.is_some() {
            self.end_drag();
        }
        let (left_pct, right_pct) = self.layout.adjacent(divider);
        self.drag = Some(DragState {
            divider,
            kind,
            start_x: pointer_x,
            left_px: left_pct / 100.0 * self.container_px,
            right_px: right_pct / 100.0 * self.container_px,
            container_px: self.container_px,
        });
        tracing::trace!(?divider, ?kind, pointer_x, "drag started");
    }

    /// Applies a pointer move. Returns true when a width changed.
    ///
    /// Moves that would push either adjacent pane to or under the floor are
    /// ignored, leaving the last valid widths in place.
    pub fn on_pointer_move(&mut self, pointer_x: f64) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        if drag.container_px <= 0.0 || !pointer_x.is_finite() {
            return false;
        }

        let dx = pointer_x - drag.start_x;
        let left_pct = (drag.left_px + dx) / drag.container_px * 100.0;
        let right_pct = (drag.right_px - dx) / drag.container_px * 100.0;
        let floor = self.layout.min_pct;
        if left_pct <= floor || right_pct <= floor {
            return false;
        }

        match drag.divider {
            Divider::Structure => self.layout.structure_pct = left_pct,
            Divider::Chat => self.layout.chat_pct = right_pct,
        }
        true
    }

    /// Ends the current drag. Safe to call when idle.
    pub fn end_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            tracing::trace!(divider = ?drag.divider, "drag ended");
        }
    }

    /// Divider currently shown in its resizing state.
    pub fn resizing_divider(&self) -> Option<Divider> {
        self.drag.map(|d| d.divider)
    }

    /// Global cursor override while a mouse drag is active.
    pub fn cursor(&self) -> Option<&'static str> {
        match self.drag {
            Some(DragState {
                kind: PointerKind::Mouse,
                ..
            }) => Some("col-resize"),
            _ => None,
        }
    }

    /// Whether document text selection is suppressed.
    pub fn text_selection_suppressed(&self) -> bool {
        matches!(
            self.drag,
            Some(DragState {
                kind: PointerKind::Mouse,
                ..
            })
        )
    }
}

impl Default for PaneResizeEngine {
    fn default() -> Self {
        Self::new(PaneLayout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn engine(width: f64) -> PaneResizeEngine {
        let mut engine = PaneResizeEngine::default();
        engine.set_container_width(width);
        engine
    }

    fn sum(layout: &PaneLayout) -> f64 {
        layout.structure_pct() + layout.output_pct() + layout.chat_pct()
    }

    #[test]
    fn structure_divider_moves_structure_pane_only() {
        let mut engine = engine(1000.0);
        engine.begin_drag(Divider::Structure, PointerKind::Mouse, 200.0);
        assert!(engine.on_pointer_move(300.0));
        engine.end_drag();

        let layout = engine.layout();
        assert!((layout.structure_pct() - 30.0).abs() < EPS);
        assert!((layout.chat_pct() - 25.0).abs() < EPS);
        assert!((layout.output_pct() - 45.0).abs() < EPS);
    }

    #[test]
    fn chat_divider_moves_chat_pane_only() {
        let mut engine = engine(1000.0);
        engine.begin_drag(Divider::Chat, PointerKind::Touch, 750.0);
        assert!(engine.on_pointer_move(650.0));
        engine.end_drag();

        let layout = engine.layout();
        assert!((layout.chat_pct() - 35.0).abs() < EPS);
        assert!((layout.structure_pct() - 20.0).abs() < EPS);
    }

    #[test]
    fn widths_sum_to_100_across_drag_sequences() {
        let mut engine = engine(1337.0);
        let moves = [
            (Divider::Structure, 100.0, 413.0),
            (Divider::Chat, 900.0, 240.0),
            (Divider::Structure, 50.0, -900.0),
            (Divider::Chat, 10.0, 5000.0),
            (Divider::Structure, 0.0, 17.5),
        ];
        for (divider, start, end) in moves {
            engine.begin_drag(divider, PointerKind::Mouse, start);
            engine.on_pointer_move((start + end) / 2.0);
            engine.on_pointer_move(end);
            engine.end_drag();
            assert!((sum(engine.layout()) - 100.0).abs() < EPS);
        }
    }

    #[test]
    fn floor_is_never_crossed_and_last_valid_width_is_kept() {
        let mut engine = engine(1000.0);
        engine.begin_drag(Divider::Structure, PointerKind::Mouse, 200.0);
        assert!(engine.on_pointer_move(100.0));
        assert!(!engine.on_pointer_move(-5000.0));
        assert!((engine.layout().structure_pct() - 10.0).abs() < EPS);

        assert!(!engine.on_pointer_move(5000.0));
        assert!((engine.layout().structure_pct() - 10.0).abs() < EPS);
        engine.end_drag();

        let layout = engine.layout();
        for width in [layout.structure_pct(), layout.output_pct(), layout.chat_pct()] {
            assert!(width >= layout.min_pct());
        }
    }

    #[test]
    fn zero_width_container_skips_moves() {
        let mut engine = engine(0.0);
        engine.begin_drag(Divider::Structure, PointerKind::Mouse, 10.0);
        assert!(!engine.on_pointer_move(400.0));
        assert_eq!(engine.layout(), &PaneLayout::default());
    }

    #[test]
    fn container_is_frozen_for_the_duration_of_a_drag() {
        let mut engine = engine(1000.0);
        engine.begin_drag(Divider::Structure, PointerKind::Mouse, 200.0);
        engine.set_container_width(2000.0);
        engine.on_pointer_move(300.0);
        assert!((engine.layout().structure_pct() - 30.0).abs() < EPS);
    }

    #[test]
    fn new_drag_implicitly_ends_previous_one() {
        let mut engine = engine(1000.0);
        engine.begin_drag(Divider::Structure, PointerKind::Mouse, 200.0);
        engine.on_pointer_move(250.0);
        engine.begin_drag(Divider::Chat, PointerKind::Touch, 750.0);

        assert_eq!(engine.resizing_divider(), Some(Divider::Chat));
        engine.on_pointer_move(700.0);
        assert!((engine.layout().structure_pct() - 25.0).abs() < EPS);
        assert!((engine.layout().chat_pct() - 30.0).abs() < EPS);
    }

    #[test]
    fn end_drag_is_idempotent_and_clears_feedback() {
        let mut engine = engine(1000.0);
        engine.end_drag();
        engine.begin_drag(Divider::Chat, PointerKind::Mouse, 0.0);
        assert_eq!(engine.cursor(), Some("col-resize"));
        assert!(engine.text_selection_suppressed());

        engine.end_drag();
        engine.end_drag();
        assert!(!engine.is_dragging());
        assert_eq!(engine.cursor(), None);
        assert!(!engine.text_selection_suppressed());
        assert!(!engine.on_pointer_move(10.0));
    }

    #[test]
    fn touch_drag_only_marks_divider() {
        let mut engine = engine(800.0);
        engine.begin_drag(Divider::Structure, PointerKind::Touch, 10.0);
        assert_eq!(engine.resizing_divider(), Some(Divider::Structure));
        assert_eq!(engine.cursor(), None);
        assert!(!engine.text_selection_suppressed());
    }

    #[test]
    fn oversized_floor_is_lowered_to_fit_defaults() {
        let layout = PaneLayout::from_config(&LayoutConfig {
            structure_percent: 20.0,
            chat_percent: 25.0,
            min_percent: 30.0,
        });
        assert!((layout.structure_pct() - 20.0).abs() < EPS);
        assert!((layout.min_pct() - 20.0).abs() < EPS);

        let mut engine = PaneResizeEngine::new(layout);
        engine.set_container_width(1000.0);
        engine.begin_drag(Divider::Structure, PointerKind::Mouse, 200.0);
        assert!(engine.on_pointer_move(250.0));
        assert!((engine.layout().structure_pct() - 25.0).abs() < EPS);
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let layout = PaneLayout::from_config(&LayoutConfig {
            structure_percent: 60.0,
            chat_percent: 50.0,
            min_percent: 5.0,
        });
        assert!((layout.structure_pct() - 20.0).abs() < EPS);
        assert!((layout.chat_pct() - 25.0).abs() < EPS);
    }
}
