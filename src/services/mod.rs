//! Service helpers sitting above the repositories.

pub mod slug;
