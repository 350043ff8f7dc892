pub mod plan_loader;

pub use plan_loader::{load_plan_input, load_template_file};
