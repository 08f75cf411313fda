//! Wire payloads and their normalization into domain records.
//!
//! Payloads are deliberately permissive; every conversion into a domain
//! type goes through `TryFrom`/`From` here and nowhere else.

mod payloads;
mod primitives;

pub use payloads::{
    normalize_each, AuthPayload, ClaimPayload, CompetitionPayload, ConversionPayload,
    ConvertBody, DailyStatusPayload, EntryPayload, ErrorBody, LeaderboardEntryPayload,
    ListEnvelope, LoginBody, ReferralPayload, SignupBody, UserEnvelope, UserPayload,
    WinnerPayload,
};
pub use primitives::{count_u32, count_u64, WireCount, WireId, WireTimestamp};
