mod account_dto;
mod community_dto;
mod competition_dto;
mod reward_dto;

pub use account_dto::*;
pub use community_dto::*;
pub use competition_dto::*;
pub use reward_dto::*;
