pub mod plan_api_client;

pub use plan_api_client::PlanApiClient;
