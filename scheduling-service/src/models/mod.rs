mod schedule;
mod session;
mod user;

pub use schedule::{week_start, YearMonth};
pub use session::{ProviderSession, ProviderUser};
pub use user::{DirectoryUser, Role};
