pub mod handle;
pub mod resize;

pub use handle::ResizeHandle;
pub use resize::{
    CanvasLayout, RESIZE_PADDING, ResizeEngine, ResizeGesture, ResizeOptions, ResizeUpdate,
    resolve_resize,
};
