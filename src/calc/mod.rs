//! Sales arithmetic: surplus against stock, recent history sampling, and
//! next-market stock projection.

pub mod surplus;
pub mod history;
pub mod projection;
