pub mod io;
pub mod keys;
pub mod layout;
pub mod phase;
pub mod trial;
pub mod workbook;

pub use io::{AudioPlayer, InputSource, Repeat, Surface};
pub use keys::{InputEvent, Key, ResponseKeyMap, ResponseMode};
pub use layout::{Anchor, OptionLayout};
pub use phase::{Phase, SessionPhase};
pub use trial::{Response, SessionStats, SessionSummary, Trial, TrialState};
pub use workbook::{MemoryStore, Sheet, SpreadsheetStore, Workbook};
