mod model;

pub use model::{AccountId, UserAccount};
