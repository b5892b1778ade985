pub mod context;
pub mod orchestrator;
pub mod stage;
pub mod stages;

pub use context::BuildContext;
pub use orchestrator::PipelineOrchestrator;
pub use stage::BuildStage;
