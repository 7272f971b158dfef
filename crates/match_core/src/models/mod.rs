pub mod events;
pub mod roster;
pub mod xt_grid;

pub use events::{
    validate_columns, DefensiveAction, EventId, EventType, MatchEvent, Outcome, PlayerId,
    SetPieceTag, TeamId, PRESSING_ACTIONS, REQUIRED_COLUMNS,
};
pub use roster::{
    is_centre_back, is_forward, MatchContext, RosterPlayer, TeamRoster, TeamSide, CENTRE_BACK,
    FORWARD_POSITIONS,
};
pub use xt_grid::XtGrid;
