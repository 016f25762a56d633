mod cache;

pub use cache::SessionCache;
