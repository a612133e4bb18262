pub mod cook;
pub mod recipe;
pub mod user;

pub use cook::{Cook, CookFields};
pub use recipe::{Recipe, RecipeFields};
pub use user::{NewUser, User};
