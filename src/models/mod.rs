//! Domain models shared by the cache, the API layer and the screens.

mod account;
mod attachment;
mod post;
mod profile;

pub use account::Account;
pub use attachment::Attachment;
pub use post::Post;
pub use profile::Profile;
