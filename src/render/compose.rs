use crate::editor::Editor;
use crate::frames::buffer::FrameBuffer;
use crate::playback::controller::PlaybackMode;

/// Rasterize what the drawing surface currently shows.
///
/// - Playing: the frame under the virtual pointer, or the background once the pointer is past
///   the end (or before the first tick).
/// - Editing: the current frame, with the previous frame blended on top at the configured
///   onion-skin alpha when the overlay is on.
pub fn compose_view(editor: &Editor) -> Option<FrameBuffer> {
    let store = editor.store();
    let canvas = store.canvas()?;
    let background = store.background();

    match editor.mode() {
        PlaybackMode::Playing => {
            let frame = editor
                .playback()
                .pointer()
                .and_then(|p| store.frame(p))
                .cloned()
                .unwrap_or_else(|| FrameBuffer::new(canvas, background));
            Some(frame)
        }
        PlaybackMode::Editing => {
            let mut view = FrameBuffer::new(canvas, background);
            view.draw_image(&store.current_frame()?.to_image());
            if editor.onion_skin()
                && let Some(prev) = store.previous_frame()
                && view.blend_over(prev, editor.config().onion_alpha).is_err()
            {
                tracing::warn!("onion-skin frame has a different size; overlay skipped");
            }
            Some(view)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
