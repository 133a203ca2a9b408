//! Page building blocks. Each one is a view model rendered by its own
//! template under `templates/partials/`.

pub mod add_product_form;
pub mod email_prompt;
pub mod loading;
pub mod logo;
pub mod product_card;

pub use add_product_form::{AddProductForm, AddProductPanel};
pub use email_prompt::{EmailForm, EmailPromptCard};
pub use loading::{LoadingCard, ProductsLoadingState};
pub use logo::Logo;
pub use product_card::ProductCard;
