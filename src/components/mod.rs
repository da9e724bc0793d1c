pub mod listing;
pub mod templates;

pub use listing::ListingComponent;
pub use templates::TemplateComponent;
