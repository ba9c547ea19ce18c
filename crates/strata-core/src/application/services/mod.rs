mod generation_service;
mod scaffold_service;
mod wiring_service;

pub use generation_service::{GenerationOptions, GenerationReport, GenerationService};
pub use scaffold_service::{DEFAULT_TEMPLATE, ScaffoldReport, ScaffoldService};
pub use wiring_service::{StepStatus, WiringReport, WiringService, WiringStep};
