pub mod companion;
pub mod diary;
pub mod http;
pub mod profile;
