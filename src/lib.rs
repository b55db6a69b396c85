pub use lyon;

mod color;
mod dragging;
mod gesture;
mod mesh;
mod page;
mod renderer;
mod resizing;
mod textures;
mod vertex;
mod view;

pub use color::Color;
pub use dragging::{DragOffset, DraggingState};
pub use gesture::{
    Area, Event, EventsTransformer, GestureState, GestureStateMachine, InteractionTarget,
    TouchFrame, TouchPhase, TouchPoints, TransformerConfig, ViewState,
};
pub use mesh::CurlMesh;
pub use page::{PageBitmap, PageSide, TexturePage};
pub use renderer::{CurlRenderer, Margins, PageSlot, ViewInfo};
pub use resizing::{ResizingState, MAX_MARGIN, MAX_SCALE, MIN_MARGIN, MIN_SCALE};
pub use textures::{LoadEvent, PageLoadError, PageProvider, PageTexturesManager};
pub use vertex::{MeshVertex, ShadowStripVertex};
pub use view::{CurlView, ViewConfig, ViewEvent};
