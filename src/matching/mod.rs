pub mod logos;
pub mod roster;

pub use logos::LogoResolver;
pub use roster::Roster;
