pub mod client;
pub mod models;
pub mod request;

pub use client::{ExpenseApi, HttpClient, PROFILE_PICTURE_FIELD};
pub use models::{Category, Expense, PictureUpdated, PictureUpload, UserDetails};
