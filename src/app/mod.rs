// Application layer - Use case interactors

pub mod container;
pub mod generation_coordinator;
pub mod preview_interactor;

// Re-export interactors
pub use container::{AppContainer, ContainerOptions, DefaultAppContainer};
pub use generation_coordinator::{CancelHandle, GenerationCoordinator, GenerationReport};
pub use preview_interactor::{PreviewInteractor, SequencePreview};
