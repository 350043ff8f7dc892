pub mod business_info;
pub mod loaders;
pub mod payload;
pub mod plan;
pub mod section;
pub mod session;
pub mod stage;
pub mod template;

pub use business_info::{BusinessInfo, BusinessInfoPatch};
pub use loaders::{load_plan_input, load_template_file};
pub use payload::{SectionPayload, StructureSummary};
pub use plan::PlanInput;
pub use section::SectionKey;
pub use session::{Session, SectionResult, SectionStatus};
pub use stage::Stage;
pub use template::{TemplateFile, TEMPLATE_EXTENSION};
