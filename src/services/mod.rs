// Service exports
pub mod appwrite;
pub mod index;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError, MentorDocument};
pub use index::{MentorIndex, MentorSnapshot, RefreshError};
