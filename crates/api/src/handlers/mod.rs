pub mod pages;
pub mod redirects;
pub mod versions;
