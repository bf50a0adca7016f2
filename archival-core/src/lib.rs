pub mod config;
pub mod input;
pub mod layout;
pub mod lightbox;
pub mod selection;
pub mod ticker;

mod workstation;
pub use workstation::{InputEvent, InputPort, Workstation};

pub use archival_state;
pub use archival_state::{Catalog, CatalogError, Record, RecordId};

pub use config::NavigationConfig;
pub use input::{InputDebouncer, InputGate, Intent, Key};
pub use layout::{Footprint, LayoutTarget, ScatterDescriptor, StackingSchedule};
pub use lightbox::Lightbox;
pub use selection::{Selection, SelectionMachine, Transition};
pub use ticker::{TickEvents, Ticker};
