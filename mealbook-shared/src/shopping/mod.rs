/// Shopping-list pipeline
///
/// The export endpoint runs a linear pipeline over the caller's cart:
///
/// ```text
/// gateway snapshot (models::shopping_cart)
///     → aggregate   (one line item per ingredient, exact decimal sums)
///     → normalize   (shortest exact decimal text)
///     → render      (paginated PDF table)
/// ```
///
/// Everything here is synchronous, allocation-local, and free of shared
/// mutable state; the only I/O in the pipeline is the gateway query and
/// the response buffer.
///
/// # Modules
///
/// - `aggregate`: fold ingredient usage rows into ordered line items
/// - `normalize`: canonical decimal formatting
/// - `render`: PDF layout and pagination

pub mod aggregate;
pub mod normalize;
pub mod render;

pub use aggregate::{aggregate_ingredients, IngredientUsage, LineItem};
pub use normalize::normalize_amount;
pub use render::{render_shopping_list, DocumentStyle, RenderError, ShoppingListRow};
