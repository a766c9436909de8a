pub mod workout;

pub use workout::{ActivityType, Coords, Workout, WorkoutKind};
