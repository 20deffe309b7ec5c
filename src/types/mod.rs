mod membership;
mod organization;
mod repository;
mod team;
mod user;

pub use membership::MembershipType;
pub use organization::Owner;
pub use repository::{RepositoryDetail, TeamRepository};
pub use team::Team;
pub use user::Member;
