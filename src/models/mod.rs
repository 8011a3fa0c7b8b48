pub mod category;
pub mod page;
pub mod product;
pub mod session;
pub mod user;
