pub mod charges;
pub mod confirmation;
pub mod damage;
pub mod return_flow;
pub mod settlement;
pub mod standard_replies;
pub mod timestamps;
