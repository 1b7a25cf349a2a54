pub mod clock;
pub mod coordinator;
pub mod directory;
#[allow(clippy::module_inception)]
pub mod room;
pub mod session;
pub mod ticker;

pub use clock::{ClockState, RoomClock, TickOutcome};
pub use coordinator::{RoomHandle, WeakRoomHandle};
pub use directory::{is_valid_room_name, RoomDirectory};
pub use room::{Admission, Placement, Room};
pub use session::Session;
