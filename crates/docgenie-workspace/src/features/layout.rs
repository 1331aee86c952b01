//! Pane layout feature reducer.
//!
//! Pointer moves are synchronous and never produce effects.

use crate::effects::UiEffect;
use crate::events::LayoutUiEvent;
use crate::state::AppState;

pub fn handle_event(app: &mut AppState, event: LayoutUiEvent) -> Vec<UiEffect> {
    let engine = &mut app.layout;
    match event {
        LayoutUiEvent::ContainerResized { width } => engine.set_container_width(width),
        LayoutUiEvent::DragStarted { divider, kind, x } => engine.begin_drag(divider, kind, x),
        LayoutUiEvent::PointerMoved { x } => {
            engine.on_pointer_move(x);
        }
        LayoutUiEvent::DragEnded => engine.end_drag(),
    }
    vec![]
}
