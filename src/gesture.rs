//! Touch gesture handling: raw multi-touch frames are classified into
//! semantic [`Event`]s by the [`EventsTransformer`], and the
//! [`GestureStateMachine`] drives the curl/resize/drag/hot-area lifecycle
//! from those events, calling into a host-supplied [`InteractionTarget`].

mod events;
mod machine;
mod transformer;

pub use events::{Area, Event, TouchFrame, TouchPhase, TouchPoints};
pub use machine::{GestureState, GestureStateMachine, InteractionTarget, ViewState};
pub use transformer::{EventsTransformer, TransformerConfig};
